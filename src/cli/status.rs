//! `kleio status`: list translation status records.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use super::args::StatusArgs;
use super::common::{connect, load_scope, resolve};
use crate::cache::{StatusCache, StatusRecord};
use crate::config::KleioConfig;
use crate::core::StatusCode;

pub async fn run_status(args: &StatusArgs, config: &KleioConfig) -> Result<()> {
    let target = resolve(config, args.path.as_deref())?;
    let cache = StatusCache::new(connect(config)?);

    // A file's status comes with its directory's listing
    let dir = if target.is_file() {
        target.parent().unwrap_or(&target).to_path_buf()
    } else {
        target.clone()
    };
    if !load_scope(&cache, config, &dir).await {
        bail!("{}", cache.placeholder_message());
    }

    if target.is_file() {
        let status = cache.query(&target.to_string_lossy());
        match status {
            Some(status) => println!("{} {}", paint(status), status.label()),
            None => println!("{}", "no status".dimmed()),
        }
        return Ok(());
    }

    let records: Vec<StatusRecord> = cache
        .records()
        .into_iter()
        .filter(|record| args.status.is_none_or(|s| record.status == s))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", cache.placeholder_message().dimmed());
        return Ok(());
    }
    for record in &records {
        println!("{} {}", paint(record.status), record.path);
    }
    Ok(())
}

/// Status code colored by severity.
pub fn paint(status: StatusCode) -> String {
    let code = status.code().to_string();
    match status {
        StatusCode::Errors => code.red().bold().to_string(),
        StatusCode::Warnings => code.yellow().bold().to_string(),
        StatusCode::ReadyForImport | StatusCode::NeedsImport => code.green().to_string(),
        StatusCode::Translating | StatusCode::Queued => code.blue().to_string(),
        StatusCode::NeedsTranslation => code.dimmed().to_string(),
    }
}
