// ─── Downloader ───
// Idempotent, SHA-1 verified, retrying artifact fetcher.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{LauncherError, LauncherResult};
use crate::http::build_http_client;

/// Fixed retry budget per artifact.
const RETRY_ATTEMPTS: u32 = 3;
/// Backoff between attempts is `RETRY_BASE_DELAY * attempt`.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// A single file to download with optional SHA-1 for validation.
#[derive(Debug, Clone)]
pub struct DownloadEntry {
    pub url: String,
    pub dest: PathBuf,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

/// Concurrent, SHA-1 validated downloader.
pub struct Downloader {
    client: Client,
    /// Maximum number of parallel downloads in a batch.
    concurrency: usize,
}

impl Downloader {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self {
            client: build_http_client()?,
            concurrency: 8,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            concurrency: 8,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    // ── Single file download ────────────────────────────

    /// Ensure `dest` holds the content at `url`.
    ///
    /// If `dest` already exists and matches `expected_sha1`, returns without
    /// any network traffic. Otherwise fetches with up to [`RETRY_ATTEMPTS`]
    /// attempts and linear backoff. The file is only written after the body
    /// passed verification, so a failed attempt never leaves a partial file.
    pub async fn ensure(
        &self,
        url: &str,
        dest: &Path,
        expected_sha1: Option<&str>,
    ) -> LauncherResult<()> {
        if let Some(expected) = expected_sha1 {
            if dest.exists() && Self::validate_sha1(dest, expected).await.unwrap_or(false) {
                debug!("Cached (checksum ok): {:?}", dest);
                return Ok(());
            }
        }

        let mut last_err = None;
        for attempt in 1..=RETRY_ATTEMPTS {
            match self.download_once(url, dest, expected_sha1).await {
                Ok(()) => return Ok(()),
                Err(
                    err @ (LauncherError::Http(_)
                    | LauncherError::DownloadFailed { .. }
                    | LauncherError::ChecksumMismatch { .. }),
                ) => {
                    warn!("Download attempt {}/{} failed: {}", attempt, RETRY_ATTEMPTS, err);
                    last_err = Some(err);
                    if attempt < RETRY_ATTEMPTS {
                        tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                    }
                }
                // IO errors on the destination are not recoverable by retrying.
                Err(err) => return Err(err),
            }
        }

        Err(last_err.unwrap_or(LauncherError::DownloadFailed {
            url: url.to_string(),
            status: 0,
        }))
    }

    /// One download attempt: GET, verify in memory, then write.
    async fn download_once(
        &self,
        url: &str,
        dest: &Path,
        expected_sha1: Option<&str>,
    ) -> LauncherResult<()> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;

        // Validate SHA-1 before writing (compute on the in-memory buffer)
        if let Some(expected) = expected_sha1 {
            let actual = hex::encode(Sha1::digest(&bytes));
            if actual != expected {
                return Err(LauncherError::ChecksumMismatch {
                    url: url.to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        // Write inside a block so the handle is dropped immediately — the
        // spawned JVM may otherwise hit sharing violations on Windows.
        {
            let mut file =
                tokio::fs::File::create(dest)
                    .await
                    .map_err(|e| LauncherError::Io {
                        path: dest.to_path_buf(),
                        source: e,
                    })?;
            file.write_all(&bytes).await.map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
            file.flush().await.map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }

    // ── Batch concurrent downloads ──────────────────────

    /// Download many files concurrently using `buffer_unordered`.
    ///
    /// Each entry is individually idempotent; the failure of one does not
    /// abort the others. Returns the entries that failed (if any).
    pub async fn download_batch(
        &self,
        entries: Vec<DownloadEntry>,
    ) -> Vec<(DownloadEntry, LauncherError)> {
        info!(
            "Starting batch download: {} files, concurrency={}",
            entries.len(),
            self.concurrency
        );

        let results: Vec<_> = stream::iter(entries)
            .map(|entry| async move {
                let result = self
                    .ensure(&entry.url, &entry.dest, entry.sha1.as_deref())
                    .await;
                (entry, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        results
            .into_iter()
            .filter_map(|(entry, result)| match result {
                Ok(()) => None,
                Err(e) => Some((entry, e)),
            })
            .collect()
    }

    /// Validate an existing file's SHA-1.
    pub async fn validate_sha1(path: &Path, expected: &str) -> LauncherResult<bool> {
        let bytes = tokio::fs::read(path).await.map_err(|e| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(hex::encode(Sha1::digest(&bytes)) == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    fn init_tracing() {
        use tracing_subscriber::EnvFilter;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn sha1_hex(data: &[u8]) -> String {
        hex::encode(Sha1::digest(data))
    }

    enum Stub {
        Body(Vec<u8>),
        Status(u16),
    }

    /// Minimal HTTP stub serving one canned response per connection.
    async fn spawn_stub(responses: Vec<Stub>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let payload = match response {
                    Stub::Body(body) => {
                        let mut head = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            body.len()
                        )
                        .into_bytes();
                        head.extend_from_slice(&body);
                        head
                    }
                    Stub::Status(code) => format!(
                        "HTTP/1.1 {code} ERR\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    )
                    .into_bytes(),
                };
                let _ = socket.write_all(&payload).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/artifact.jar")
    }

    #[tokio::test]
    async fn ensure_skips_network_when_cached_file_matches() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cached.jar");
        tokio::fs::write(&dest, b"already here").await.unwrap();
        let sha = sha1_hex(b"already here");

        // Port 1 is never listening; any network attempt would fail.
        let downloader = Downloader::new().unwrap();
        downloader
            .ensure("http://127.0.0.1:1/unreachable", &dest, Some(&sha))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ensure_refetches_when_cached_file_is_corrupt() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("lib.jar");
        tokio::fs::write(&dest, b"corrupt").await.unwrap();

        let good = b"good bytes".to_vec();
        let sha = sha1_hex(&good);
        let url = spawn_stub(vec![Stub::Body(good.clone())]).await;

        let downloader = Downloader::new().unwrap();
        downloader.ensure(&url, &dest, Some(&sha)).await.unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), good);
    }

    #[tokio::test]
    async fn ensure_retries_until_checksum_matches() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("retry.jar");

        let good = b"the real content".to_vec();
        let sha = sha1_hex(&good);
        let url = spawn_stub(vec![
            Stub::Body(b"wrong 1".to_vec()),
            Stub::Body(b"wrong 2".to_vec()),
            Stub::Body(good.clone()),
        ])
        .await;

        let downloader = Downloader::new().unwrap();
        downloader.ensure(&url, &dest, Some(&sha)).await.unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), good);
    }

    #[tokio::test]
    async fn ensure_fails_and_leaves_no_file_on_permanent_mismatch() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("never.jar");

        let sha = sha1_hex(b"expected content");
        let url = spawn_stub(vec![
            Stub::Body(b"bad".to_vec()),
            Stub::Body(b"bad".to_vec()),
            Stub::Body(b"bad".to_vec()),
        ])
        .await;

        let downloader = Downloader::new().unwrap();
        let err = downloader.ensure(&url, &dest, Some(&sha)).await.unwrap_err();
        assert!(matches!(err, LauncherError::ChecksumMismatch { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn ensure_reports_http_status_failures() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.jar");

        let url = spawn_stub(vec![Stub::Status(404), Stub::Status(404), Stub::Status(404)]).await;

        let downloader = Downloader::new().unwrap();
        let err = downloader.ensure(&url, &dest, None).await.unwrap_err();
        match err {
            LauncherError::DownloadFailed { status, .. } => assert_eq!(status, 404),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn download_batch_reports_per_entry_failures() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let good = b"object".to_vec();
        let sha = sha1_hex(&good);
        let ok_url = spawn_stub(vec![Stub::Body(good.clone())]).await;
        let bad_url = spawn_stub(vec![Stub::Status(500), Stub::Status(500), Stub::Status(500)]).await;

        let entries = vec![
            DownloadEntry {
                url: ok_url,
                dest: dir.path().join("ok.bin"),
                sha1: Some(sha),
                size: Some(good.len() as u64),
            },
            DownloadEntry {
                url: bad_url.clone(),
                dest: dir.path().join("bad.bin"),
                sha1: None,
                size: None,
            },
        ];

        let downloader = Downloader::new().unwrap();
        let failures = downloader.download_batch(entries).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.url, bad_url);
        assert!(dir.path().join("ok.bin").exists());
    }
}
