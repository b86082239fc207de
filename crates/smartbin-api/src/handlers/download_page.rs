//! Browser download page: one HTML document that fetches every video of a bin
//! in a staggered sequence and saves each one locally.

use crate::error::log_error;
use crate::services::{AssetService, BinService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use smartbin_core::download::PAGE_COMPLETION_GRACE;
use smartbin_core::models::{Asset, Bin};
use smartbin_core::{
    build_staggered_download_sequence, completion_offset, to_download_url, AppError,
    ErrorMetadata,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageDownload {
    url: String,
    file_name: String,
    delay_ms: u64,
}

#[utoipa::path(
    get,
    path = "/assets/by-bin/{bin_id}/download-page",
    tag = "assets",
    params(
        ("bin_id" = String, Path, description = "Bin ID")
    ),
    responses(
        (status = 200, description = "Download page", content_type = "text/html"),
        (status = 400, description = "Malformed bin id", content_type = "text/html"),
        (status = 404, description = "Bin not found", content_type = "text/html"),
        (status = 500, description = "Internal server error", content_type = "text/html")
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_page"))]
pub async fn download_page(
    State(state): State<Arc<AppState>>,
    Path(bin_id): Path<String>,
) -> Response {
    let delay = Duration::from_millis(state.config.download_page_delay_ms());
    match load_bin_assets(&state, &bin_id).await {
        Ok((_, assets)) if assets.is_empty() => Html(render_message_page(
            "No Videos Found",
            "This bin does not have any videos yet.",
        ))
        .into_response(),
        Ok((bin, assets)) => Html(render_download_page(&bin, &assets, delay)).into_response(),
        Err(err) => {
            log_error(&err);
            let status = StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Html(render_message_page("Error", &err.client_message())),
            )
                .into_response()
        }
    }
}

async fn load_bin_assets(state: &AppState, bin_id: &str) -> Result<(Bin, Vec<Asset>), AppError> {
    let bin_id: Uuid = bin_id
        .parse()
        .map_err(|_| AppError::InvalidInput("Invalid bin id".to_string()))?;
    let bin = BinService::new(state).require_bin(bin_id).await?;
    let assets = AssetService::new(state).list_assets(bin_id).await?;
    Ok((bin, assets))
}

/// Escape text for an HTML text or attribute context.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a value for a `<script>` block. `<` is escaped so no string
/// can close the element.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c")
}

fn page_file_name(ordinal: usize) -> String {
    format!("video_{}.mp4", ordinal)
}

pub fn render_message_page(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<main>
<h1>{title}</h1>
<p>{message}</p>
</main>
</body>
</html>
"#,
        title = escape_html(title),
        message = escape_html(message),
        style = PAGE_STYLE,
    )
}

/// Render the page for a bin with at least one asset.
pub fn render_download_page(bin: &Bin, assets: &[Asset], delay: Duration) -> String {
    let urls: Vec<String> = assets.iter().map(|a| to_download_url(&a.url)).collect();
    let sequence = build_staggered_download_sequence(&urls, delay);
    let completion_ms = completion_offset(sequence.len(), delay, PAGE_COMPLETION_GRACE).as_millis();

    let downloads: Vec<PageDownload> = sequence
        .iter()
        .map(|d| PageDownload {
            url: d.url.clone(),
            file_name: page_file_name(d.ordinal()),
            delay_ms: d.offset_ms(),
        })
        .collect();

    let items: String = sequence
        .iter()
        .map(|d| {
            format!(
                "<li><a href=\"{url}\" download=\"{name}\">{name}</a></li>\n",
                url = escape_html(&d.url),
                name = escape_html(&page_file_name(d.ordinal())),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Download Videos - {bin_name}</title>
<style>{style}</style>
</head>
<body>
<main>
<h1>Downloading {count} video(s) from {bin_name}</h1>
<p id="status">Starting downloads...</p>
<ol>
{items}</ol>
<p class="hint">If a download does not start, use the links above.</p>
</main>
<script>
const downloads = {downloads};
const statusEl = document.getElementById("status");
async function downloadOne(item) {{
  try {{
    const res = await fetch(item.url);
    if (!res.ok) throw new Error("HTTP " + res.status);
    const blob = await res.blob();
    const href = URL.createObjectURL(blob);
    const a = document.createElement("a");
    a.href = href;
    a.download = item.fileName;
    document.body.appendChild(a);
    a.click();
    a.remove();
    URL.revokeObjectURL(href);
    statusEl.textContent = "Downloaded " + item.fileName;
  }} catch (err) {{
    console.error("Download failed for " + item.fileName, err);
    window.open(item.url, "_blank");
  }}
}}
downloads.forEach(function (item) {{
  setTimeout(function () {{ downloadOne(item); }}, item.delayMs);
}});
setTimeout(function () {{
  statusEl.textContent = "All downloads have been started. Check your downloads folder.";
}}, {completion_ms});
</script>
</body>
</html>
"#,
        bin_name = escape_html(&bin.name),
        count = sequence.len(),
        items = items,
        downloads = script_json(&downloads),
        completion_ms = completion_ms,
        style = PAGE_STYLE,
    )
}

const PAGE_STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f4f6f4;color:#1d2b1f}\
main{max-width:640px;margin:48px auto;padding:24px;background:#fff;border-radius:8px}\
h1{font-size:1.4rem}.hint{color:#5b6b5e;font-size:.9rem}";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bin(name: &str) -> Bin {
        Bin {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn asset(bin_id: Uuid, url: &str) -> Asset {
        Asset {
            id: Uuid::new_v4(),
            bin_id,
            url: url.to_string(),
            storage_id: "videos/a.mp4".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn page_schedules_every_asset_with_download_urls() {
        let bin = bin("BIN-001");
        let assets = vec![
            asset(bin.id, "https://host/upload/v1/a.mp4"),
            asset(bin.id, "https://host/upload/v1/b.mp4"),
        ];
        let html = render_download_page(&bin, &assets, Duration::from_millis(3000));

        assert!(html.contains("https://host/upload/fl_attachment/v1/a.mp4"));
        assert!(html.contains("https://host/upload/fl_attachment/v1/b.mp4"));
        assert!(html.contains(r#""delayMs":0"#));
        assert!(html.contains(r#""delayMs":3000"#));
        assert!(html.contains(r#""fileName":"video_2.mp4""#));
        // 2 * 3000 + 2000
        assert!(html.contains("}, 8000);"));
        assert!(html.contains("window.open(item.url"));
    }

    #[test]
    fn page_escapes_bin_name_and_script_payload() {
        let bin = bin("<script>alert(1)</script>");
        let assets = vec![asset(bin.id, "https://host/upload/</script><script>x.mp4")];
        let html = render_download_page(&bin, &assets, Duration::from_millis(3000));

        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn message_page_escapes_content() {
        let html = render_message_page("No Videos Found", "a < b");
        assert!(html.contains("<h1>No Videos Found</h1>"));
        assert!(html.contains("a &lt; b"));
    }
}
