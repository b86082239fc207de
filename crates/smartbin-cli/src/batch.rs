//! Batch download of every video in a bin.
//!
//! Attempts run one after another, spaced by `BATCH_DOWNLOAD_DELAY`. A failed
//! attempt is reported and does not stop the ones after it.

use serde::Serialize;
use smartbin_core::download::{build_staggered_download_sequence, BATCH_DOWNLOAD_DELAY};
use smartbin_core::ScheduledDownload;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::ApiClient;

/// Save-as name for the `ordinal`-th video of a bin.
pub fn batch_file_name(bin_id: Uuid, ordinal: usize) -> String {
    format!("bin-{}-video-{}.mp4", bin_id, ordinal)
}

#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub bin_id: Uuid,
    pub downloaded: usize,
    pub failed: usize,
    pub results: Vec<BatchOutcome>,
}

/// Schedule for `download_urls` using the batch delay.
pub fn plan(download_urls: &[String]) -> Vec<ScheduledDownload> {
    build_staggered_download_sequence(download_urls, BATCH_DOWNLOAD_DELAY)
}

/// Fetch every scheduled URL into `out_dir`.
pub async fn run(
    client: &ApiClient,
    bin_id: Uuid,
    schedule: &[ScheduledDownload],
    out_dir: &Path,
) -> anyhow::Result<BatchReport> {
    tokio::fs::create_dir_all(out_dir).await?;

    let start = Instant::now();
    let mut results = Vec::with_capacity(schedule.len());
    for attempt in schedule {
        tokio::time::sleep_until(start + attempt.offset).await;

        let path = out_dir.join(batch_file_name(bin_id, attempt.ordinal()));
        let outcome = match fetch_to(client, &attempt.url, &path).await {
            Ok(size) => {
                tracing::info!(url = %attempt.url, path = %path.display(), size, "Downloaded");
                BatchOutcome {
                    url: attempt.url.clone(),
                    path: Some(path),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(url = %attempt.url, error = %e, "Download failed");
                BatchOutcome {
                    url: attempt.url.clone(),
                    path: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(outcome);
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    Ok(BatchReport {
        bin_id,
        downloaded: results.len() - failed,
        failed,
        results,
    })
}

async fn fetch_to(client: &ApiClient, url: &str, path: &Path) -> anyhow::Result<usize> {
    let data = client.fetch_bytes(url).await?;
    tokio::fs::write(path, &data).await?;
    Ok(data.len())
}

/// Total wall time the schedule needs before its last attempt starts.
pub fn schedule_span(schedule: &[ScheduledDownload]) -> Duration {
    schedule.last().map(|a| a.offset).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_one_based() {
        let bin_id = Uuid::nil();
        assert_eq!(
            batch_file_name(bin_id, 1),
            "bin-00000000-0000-0000-0000-000000000000-video-1.mp4"
        );
    }

    #[test]
    fn plan_spaces_attempts_one_second_apart() {
        let urls = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let schedule = plan(&urls);
        let offsets: Vec<u64> = schedule.iter().map(|a| a.offset_ms()).collect();
        assert_eq!(offsets, vec![0, 1000, 2000]);
        assert_eq!(schedule_span(&schedule), Duration::from_millis(2000));
        assert_eq!(schedule_span(&[]), Duration::ZERO);
    }

    #[tokio::test]
    async fn failures_do_not_stop_later_attempts() {
        let dir = tempfile::tempdir().unwrap();
        // Nothing listens on port 9; every fetch fails fast.
        let client = ApiClient::new("http://127.0.0.1:9".to_string()).unwrap();
        let urls = vec![
            "http://127.0.0.1:9/upload/fl_attachment/a.mp4".to_string(),
            "http://127.0.0.1:9/upload/fl_attachment/b.mp4".to_string(),
        ];
        let schedule: Vec<ScheduledDownload> = plan(&urls)
            .into_iter()
            .map(|mut a| {
                a.offset = Duration::ZERO;
                a
            })
            .collect();

        let report = run(&client, Uuid::nil(), &schedule, dir.path()).await.unwrap();
        assert_eq!(report.failed, 2);
        assert_eq!(report.downloaded, 0);
        assert!(report.results.iter().all(|r| r.error.is_some()));
    }
}
