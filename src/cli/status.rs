//! Status command implementation

use colored::Colorize;

use crate::config::AuthConfig;
use crate::error::Result;

/// Run the status command to display authentication state
pub fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}\n", "SnapShell Status".bold());

    let path = AuthConfig::resolve_path(config_path)?;
    println!("Credential file: {}", path.display().to_string().cyan());

    match AuthConfig::load_from(&path) {
        Ok(Some(credential)) => {
            println!("{} Logged in", "✓".green());
            println!("  API: {}", credential.api_url.cyan());
        }
        Ok(None) => {
            println!("{} Not logged in", "○".dimmed());
            println!("  → Run {} to authenticate", "snapshell login".cyan());
        }
        Err(err) => {
            println!("{} Credential file unreadable: {}", "✗".red(), err);
            println!(
                "  → Run {} then {} to start over",
                "snapshell logout".cyan(),
                "snapshell login".cyan()
            );
        }
    }

    Ok(())
}
