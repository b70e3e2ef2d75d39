//! Login command implementation

use std::time::Duration;

use colored::Colorize;

use crate::auth;
use crate::config::AuthConfig;
use crate::error::Result;

/// Run the login command: browser token exchange, then persist the
/// credential wholesale (replacing any previous login).
pub async fn run(api_url: &str, timeout_secs: Option<u64>, config_path: Option<&str>) -> Result<()> {
    let timeout = timeout_secs.map(Duration::from_secs);
    let credential = auth::perform_login(api_url, timeout).await?;

    let saved_to = credential.save(config_path)?;
    println!(
        "{} CLI login successful! Token saved to {}",
        "✓".green(),
        saved_to.display()
    );

    Ok(())
}
