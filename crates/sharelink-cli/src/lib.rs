use std::path::Path;

use anyhow::anyhow;
use serde::Serialize;
use sharelink_core::download::{DOWNLOAD_FAILED_MESSAGE, LINK_UNAVAILABLE_MESSAGE};
use sharelink_core::{
    log_error, DownloadOutcome, DownloadPanel, DownloadPhase, DownloadState, ErrorMetadata,
    LinkStatus, ShareError, UploadPhase,
};

/// Truncate a string to max_chars characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// MIME type for a local file, guessed from its extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Reduce a server-supplied filename to a bare name that is safe to create
/// inside the output directory.
pub fn safe_filename(name: Option<&str>, fallback: &str) -> String {
    let candidate = name
        .and_then(|n| n.rsplit(|c: char| c == '/' || c == '\\').next())
        .map(|n| {
            n.chars()
                .filter(|c| !c.is_control())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    if candidate.is_empty() || candidate == "." || candidate == ".." {
        fallback.to_string()
    } else {
        candidate
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Text rendering of the download page.
pub fn render_panel(panel: &DownloadPanel) -> String {
    match panel {
        DownloadPanel::Loading => "Loading...".to_string(),
        DownloadPanel::Available {
            filename,
            remaining_label,
        } => {
            let mut lines = Vec::new();
            if let Some(name) = filename {
                lines.push(format!("File: {}", truncate_string(name, 80)));
            }
            lines.push("Status: available".to_string());
            if let Some(label) = remaining_label {
                lines.push(label.clone());
            }
            lines.join("\n")
        }
        DownloadPanel::Unavailable { filename, text } => {
            let mut lines = Vec::new();
            if let Some(name) = filename {
                lines.push(format!("File: {}", truncate_string(name, 80)));
            }
            lines.push(text.clone());
            lines.join("\n")
        }
    }
}

/// Log a client error at its own level and turn it into the message shown to
/// the user. Sensitive detail stays in the log.
pub fn report_error(err: &ShareError, context: &str) -> anyhow::Error {
    log_error(err, context);
    if err.is_recoverable() {
        anyhow!("{}: {} (try again)", context, err.client_message())
    } else {
        anyhow!("{}: {}", context, err.client_message())
    }
}

/// Share URL of a finished upload, or the message of a failed one.
pub fn upload_result(phase: &UploadPhase) -> anyhow::Result<&str> {
    match phase {
        UploadPhase::Done { share_url } => Ok(share_url),
        UploadPhase::Failed { message } => Err(anyhow!("{}", message)),
        other => Err(anyhow!("Upload did not complete (phase: {:?})", other)),
    }
}

/// Fail when link info could not be loaded. Terminal statuses such as
/// expired still count as loaded.
pub fn ensure_loaded(state: &DownloadState) -> anyhow::Result<()> {
    if state.phase != DownloadPhase::Error {
        return Ok(());
    }
    let message = state
        .message
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(LINK_UNAVAILABLE_MESSAGE);
    Err(anyhow!("{}", message))
}

/// Transfer target handed out for a download action, or why there is none.
pub fn download_target(
    outcome: DownloadOutcome,
    panel: &DownloadPanel,
) -> anyhow::Result<String> {
    match (outcome, panel) {
        (DownloadOutcome::Navigate(url), _) => Ok(url),
        (_, DownloadPanel::Unavailable { text, .. }) => Err(anyhow!("{}", text)),
        (DownloadOutcome::Updated, _) => Err(anyhow!("{}", DOWNLOAD_FAILED_MESSAGE)),
        (DownloadOutcome::Ignored, _) => Err(anyhow!("{}", LINK_UNAVAILABLE_MESSAGE)),
    }
}

/// JSON shape printed by `sharelink info --json`.
#[derive(Debug, Serialize)]
pub struct InfoView {
    pub file_id: Option<String>,
    pub status: Option<LinkStatus>,
    pub filename: Option<String>,
    pub message: Option<String>,
    pub remaining_downloads: Option<u32>,
    pub expires_at: Option<String>,
}

impl From<&DownloadState> for InfoView {
    fn from(state: &DownloadState) -> Self {
        Self {
            file_id: state.file_id.clone(),
            status: state.status(),
            filename: state.filename.clone(),
            message: state.message.clone(),
            remaining_downloads: state.remaining_downloads,
            expires_at: state.expires_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout carries only
/// share URLs and JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}
