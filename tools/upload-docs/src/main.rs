//! Bulk PDF uploader for AwaasChat
//!
//! Walks a file or directory, posts each PDF to the web adaptor's
//! `/api/upload` route as multipart form data, and reports per-file results
//! plus an overall summary.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PDF file or directory of PDFs to upload
    #[arg(short, long, default_value = "./documents")]
    path: PathBuf,

    /// Base URL of the AwaasChat UI server
    #[arg(short, long, default_value = "http://localhost:3000")]
    api_url: String,
}

/// Collect the PDFs to upload: a single file, or the non-recursive listing
/// of a directory. Non-PDF entries are returned separately so the caller can
/// report them.
fn collect_pdfs(path: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut pdfs = Vec::new();
    let mut skipped = Vec::new();

    if path.is_file() {
        if is_pdf(path) {
            pdfs.push(path.to_path_buf());
        } else {
            skipped.push(path.to_path_buf());
        }
        return Ok((pdfs, skipped));
    }

    let entries = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?;
    for entry in entries {
        let entry_path = entry?.path();
        if !entry_path.is_file() {
            continue;
        }
        if is_pdf(&entry_path) {
            pdfs.push(entry_path);
        } else {
            skipped.push(entry_path);
        }
    }
    pdfs.sort();
    Ok((pdfs, skipped))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

async fn upload_one(client: &reqwest::Client, api_url: &str, path: &Path) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str("application/pdf")?,
    );

    let resp = client
        .post(format!("{}/api/upload", api_url.trim_end_matches('/')))
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("Upload request for {} failed", filename))?;

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_default();
    if status.is_success() {
        println!(
            "  {} -> {} ({} chunks)",
            filename,
            body["message"].as_str().unwrap_or("ok"),
            body["chunks_added"].as_u64().unwrap_or(0)
        );
        Ok(())
    } else {
        bail!(
            "{} -> {}: {}",
            filename,
            status,
            body["error"].as_str().unwrap_or("unknown error")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.path.exists() {
        bail!("Path {} does not exist", cli.path.display());
    }

    let (pdfs, skipped) = collect_pdfs(&cli.path)?;
    for path in &skipped {
        println!("Skipping non-PDF file: {}", path.display());
    }
    if pdfs.is_empty() {
        bail!("No PDF files found under {}", cli.path.display());
    }

    println!("Uploading {} file(s) to {}", pdfs.len(), cli.api_url);
    let client = reqwest::Client::new();
    let mut uploaded = 0;
    for path in &pdfs {
        match upload_one(&client, &cli.api_url, path).await {
            Ok(()) => uploaded += 1,
            Err(e) => println!("  {}", e),
        }
    }

    println!("{}/{} uploaded", uploaded, pdfs.len());
    if uploaded == 0 {
        bail!("No file was uploaded successfully");
    }
    Ok(())
}
