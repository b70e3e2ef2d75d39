//! Logout command implementation

use colored::Colorize;

use crate::config::AuthConfig;
use crate::error::Result;

/// Run the logout command: delete the stored credential. Logging out while
/// already logged out is a success.
pub fn run(config_path: Option<&str>) -> Result<()> {
    AuthConfig::delete(config_path)?;
    println!("{} Logged out successfully", "✓".green());
    Ok(())
}
