//! Default command: create a snapshot from captured output

use std::io::Read;
use std::path::Path;

use chrono::Local;
use log::debug;

use crate::classify::{SnapshotType, detect_snapshot_type};
use crate::cli::SnapshotArgs;
use crate::client::{SnapshellClient, SnapshotApi, SnapshotRequest};
use crate::config::AuthConfig;
use crate::error::{Error, Result};

/// Run the snapshot-creation command: read input, resolve type and label,
/// upload, and print the snapshot URL on stdout.
pub async fn run(args: SnapshotArgs, api_url: &str, config_path: Option<&str>) -> Result<()> {
    let content = read_content(args.file.as_deref())?;
    if content.is_empty() {
        return Err(Error::EmptyInput);
    }

    let snapshot_type = match args.snapshot_type {
        Some(t) => t,
        None => {
            let detected = detect_snapshot_type(&content);
            eprintln!("Auto-detected snapshot type: {detected}");
            detected
        }
    };

    let label = resolve_label(args.label, args.file.as_deref(), snapshot_type);

    // A stored credential pins the API it was issued for
    let credential = AuthConfig::load(config_path)?;
    let (api_url, token) = match &credential {
        Some(cred) => (cred.api_url.as_str(), Some(cred.token.clone())),
        None => (api_url, None),
    };
    debug!("creating snapshot at {api_url} (authenticated: {})", token.is_some());

    let client = SnapshellClient::new(api_url, token)?;
    let request = SnapshotRequest {
        label,
        snapshot_type,
        content,
        is_private: args.private,
        expires_in_days: args.expires,
    };

    let created = client.create_snapshot(&request).await?;
    println!("{}", client.snapshot_url(&created.id));

    Ok(())
}

/// Read input from a file, or from stdin when no file is given
fn read_content(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| Error::ReadInput {
            path: path.to_path_buf(),
            source: e,
        }),
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// Default the label: explicit flag, then the file's base name, then the
/// content type plus a timestamp.
fn resolve_label(
    label: Option<String>,
    file: Option<&Path>,
    snapshot_type: SnapshotType,
) -> String {
    if let Some(label) = label {
        return label;
    }

    if let Some(path) = file
        && let Some(name) = path.file_name()
    {
        return name.to_string_lossy().into_owned();
    }

    format!(
        "{}-{}",
        snapshot_type,
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    )
}
