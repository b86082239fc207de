//! Download link composition.
//!
//! Stored asset URLs point at the media host's delivery path. Inserting the
//! `fl_attachment` flag after the `/upload/` segment asks the host to serve the
//! blob with a `Content-Disposition: attachment` header, so browsers save it
//! instead of playing it inline.

use std::time::Duration;

/// Path segment the media host uses for delivered uploads.
pub const UPLOAD_PATH_MARKER: &str = "/upload/";

/// Path under which the API delivers media host blobs. Ends in the
/// [`UPLOAD_PATH_MARKER`] segment so delivered URLs accept the attachment flag.
pub const MEDIA_DELIVERY_PATH: &str = "/media/upload";

/// Flag inserted after [`UPLOAD_PATH_MARKER`] to force a download.
pub const ATTACHMENT_FLAG: &str = "fl_attachment/";

/// Delay between downloads triggered by the browser download page.
pub const PAGE_DOWNLOAD_DELAY: Duration = Duration::from_millis(3000);

/// Extra time after the last page download before the completion notice.
pub const PAGE_COMPLETION_GRACE: Duration = Duration::from_millis(2000);

/// Delay between sequential downloads in the batch (CLI) flow.
pub const BATCH_DOWNLOAD_DELAY: Duration = Duration::from_millis(1000);

/// Derive the forced-download variant of a stored asset URL.
///
/// Inserts [`ATTACHMENT_FLAG`] right after the first `/upload/` segment. URLs
/// without the segment are returned unchanged.
///
/// Not idempotent: a URL that already carries the flag gets it a second time.
pub fn to_download_url(url: &str) -> String {
    match url.find(UPLOAD_PATH_MARKER) {
        Some(pos) => {
            let split = pos + UPLOAD_PATH_MARKER.len();
            let mut out = String::with_capacity(url.len() + ATTACHMENT_FLAG.len());
            out.push_str(&url[..split]);
            out.push_str(ATTACHMENT_FLAG);
            out.push_str(&url[split..]);
            out
        }
        None => url.to_string(),
    }
}

/// One attempt in a staggered download sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDownload {
    /// Zero-based position in the sequence.
    pub index: usize,
    /// URL to fetch.
    pub url: String,
    /// Time after the start of the sequence at which the attempt fires.
    pub offset: Duration,
}

impl ScheduledDownload {
    /// One-based position, used in save-as file names.
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    pub fn offset_ms(&self) -> u64 {
        self.offset.as_millis() as u64
    }
}

/// Build N independent attempts where attempt `i` fires at `i * delay`.
pub fn build_staggered_download_sequence<S: AsRef<str>>(
    urls: &[S],
    delay: Duration,
) -> Vec<ScheduledDownload> {
    urls.iter()
        .enumerate()
        .map(|(index, url)| ScheduledDownload {
            index,
            url: url.as_ref().to_string(),
            offset: delay * index as u32,
        })
        .collect()
}

/// When the completion notice fires for a sequence of `count` attempts:
/// `count * delay + grace`.
pub fn completion_offset(count: usize, delay: Duration, grace: Duration) -> Duration {
    delay * count as u32 + grace
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_attachment_flag_after_upload_segment() {
        assert_eq!(
            to_download_url("https://host/upload/v1/x.mp4"),
            "https://host/upload/fl_attachment/v1/x.mp4"
        );
    }

    #[test]
    fn leaves_urls_without_marker_unchanged() {
        let url = "http://localhost:4000/media/videos/abc.mp4";
        assert_eq!(to_download_url(url), url);
        assert_eq!(to_download_url(""), "");
    }

    #[test]
    fn only_first_marker_is_rewritten() {
        assert_eq!(
            to_download_url("https://host/upload/a/upload/b.mp4"),
            "https://host/upload/fl_attachment/a/upload/b.mp4"
        );
    }

    #[test]
    fn applying_twice_inserts_flag_twice() {
        let once = to_download_url("https://host/upload/v1/x.mp4");
        let twice = to_download_url(&once);
        assert_eq!(
            twice,
            "https://host/upload/fl_attachment/fl_attachment/v1/x.mp4"
        );
    }

    #[test]
    fn staggered_sequence_offsets() {
        let urls = vec!["a", "b", "c"];
        let seq = build_staggered_download_sequence(&urls, PAGE_DOWNLOAD_DELAY);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0].offset_ms(), 0);
        assert_eq!(seq[1].offset_ms(), 3000);
        assert_eq!(seq[2].offset_ms(), 6000);
        assert_eq!(seq[2].ordinal(), 3);
        assert_eq!(seq[1].url, "b");
    }

    #[test]
    fn empty_sequence_and_completion_offset() {
        let seq = build_staggered_download_sequence::<String>(&[], BATCH_DOWNLOAD_DELAY);
        assert!(seq.is_empty());
        assert_eq!(
            completion_offset(0, PAGE_DOWNLOAD_DELAY, PAGE_COMPLETION_GRACE),
            Duration::from_millis(2000)
        );
        assert_eq!(
            completion_offset(4, PAGE_DOWNLOAD_DELAY, PAGE_COMPLETION_GRACE),
            Duration::from_millis(14000)
        );
    }
}
