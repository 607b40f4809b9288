//! Sharelink CLI: share files through expiring, download-limited links.
//!
//! Set SHARELINK_API_BASE_URL (or API_BASE_URL), or pass --api-base-url.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sharelink_api_client::ShareClient;
use sharelink_cli::{
    download_target, ensure_loaded, format_size, guess_mime, init_tracing, render_panel,
    report_error, safe_filename, upload_result, InfoView,
};
use sharelink_core::validation::file_id_from_share_url;
use sharelink_core::{
    ClientConfig, DownloadOrchestrator, ExpiryHours, LoadOutcome, SelectedFile, ShareError,
    UploadOrchestrator,
};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "sharelink", version, about = "Sharelink file-sharing CLI")]
struct Cli {
    /// API base URL; overrides SHARELINK_API_BASE_URL
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Request timeout in seconds (transport default when omitted)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file and print its share link
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// How many times the link may be used (1-5)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
        max_downloads: u8,
        /// Link lifetime in hours: 1, 6, 24 or 72
        #[arg(long, default_value = "24")]
        expires_in_hours: ExpiryHours,
        /// Content type; guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Download a shared file
    Download {
        /// File id or share URL
        target: String,
        /// Directory to save the file into
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Show link status without consuming a download
        #[arg(long)]
        info_only: bool,
    },
    /// Show link status without consuming a download
    Info {
        /// File id or share URL
        target: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check that the API is reachable
    Health,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn build_client(
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<ShareClient> {
    let config = match api_base_url {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    }
    .map_err(|e| {
        report_error(
            &e,
            "Invalid configuration. Set SHARELINK_API_BASE_URL or pass --api-base-url",
        )
    })?
    .with_timeout(timeout_secs.map(Duration::from_secs));

    ShareClient::new(config).map_err(|e| report_error(&e, "Failed to create API client"))
}

/// Cancel `token` when the user presses Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted");
            token.cancel();
        }
    });
}

async fn upload(
    client: &ShareClient,
    file: &Path,
    max_downloads: u8,
    expiry: ExpiryHours,
    content_type: Option<String>,
) -> anyhow::Result<()> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Upload path has no file name")?;
    let mime_type = content_type.unwrap_or_else(|| guess_mime(file));
    let metadata = tokio::fs::metadata(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut flow = UploadOrchestrator::new();
    flow.set_max_downloads(max_downloads);
    flow.set_expiry(expiry);

    // Check the declared size and type before reading anything into memory.
    let declared = SelectedFile::declared(name.clone(), mime_type.clone(), metadata.len());
    if let Some(message) = flow.select_file(declared).error_message() {
        bail!("{}", message);
    }

    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let selected = SelectedFile::new(name, mime_type, Bytes::from(data));
    if let Some(message) = flow.select_file(selected).error_message() {
        bail!("{}", message);
    }

    tracing::info!(
        filename = %file.display(),
        max_downloads,
        expires_in_hours = expiry.hours(),
        "Uploading"
    );

    let share_url = upload_result(flow.submit(client).await)?;
    println!("{}", share_url);
    Ok(())
}

/// Load the download page for `target`, honoring Ctrl-C while the info fetch
/// is pending.
async fn load_page(
    client: &ShareClient,
    target: &str,
    cancel: &CancellationToken,
) -> anyhow::Result<DownloadOrchestrator> {
    let file_id = file_id_from_share_url(target);
    let mut page = DownloadOrchestrator::new(Some(&file_id));

    if page.load(client, cancel).await == LoadOutcome::Cancelled {
        bail!("Cancelled");
    }
    Ok(page)
}

async fn download(
    client: &ShareClient,
    target: &str,
    output_dir: &Path,
    info_only: bool,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let mut page = load_page(client, target, &cancel).await?;
    println!("{}", render_panel(&page.panel()));

    if info_only {
        return ensure_loaded(page.state());
    }

    let url = download_target(page.download(client).await, &page.panel())?;
    let fallback = page.state().file_id.clone().unwrap_or_default();
    let filename = safe_filename(page.state().filename.as_deref(), &fallback);
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let saved = match client
        .fetch_to_path(&url, &output_dir.join(filename), &cancel)
        .await
    {
        Ok(saved) => saved,
        Err(ShareError::Cancelled) => bail!("Cancelled"),
        Err(err) => return Err(report_error(&err, "Failed to save file")),
    };

    println!("Saved {} ({})", saved.path.display(), format_size(saved.bytes));
    if let Some(remaining) = page.state().remaining_downloads {
        println!("Remaining downloads: {}", remaining);
    }
    Ok(())
}

async fn info(client: &ShareClient, target: &str, json: bool) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let page = load_page(client, target, &cancel).await?;
    if json {
        print_json(&InfoView::from(page.state()))?;
    } else {
        println!("{}", render_panel(&page.panel()));
        if let Some(expires_at) = page.state().expires_at {
            println!("Expires: {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
        }
    }

    ensure_loaded(page.state())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = build_client(cli.api_base_url, cli.timeout_secs)?;

    match cli.command {
        Commands::Upload {
            file,
            max_downloads,
            expires_in_hours,
            content_type,
        } => upload(&client, &file, max_downloads, expires_in_hours, content_type).await,
        Commands::Download {
            target,
            output_dir,
            info_only,
        } => download(&client, &target, &output_dir, info_only).await,
        Commands::Info { target, json } => info(&client, &target, json).await,
        Commands::Health => {
            client
                .health()
                .await
                .map_err(|e| report_error(&e, "API health check failed"))?;
            println!("ok");
            Ok(())
        }
    }
}
