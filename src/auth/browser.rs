//! Best-effort default-browser launch

use std::io;
use std::process::Command;

/// Open `url` in the platform's default browser.
///
/// The child is spawned and not waited on; a failure here only means the
/// user has to click the printed URL themselves.
pub fn open(url: &str) -> io::Result<()> {
    let mut command = launcher(url)?;
    command.spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> io::Result<Command> {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    Ok(cmd)
}

#[cfg(target_os = "linux")]
fn launcher(url: &str) -> io::Result<Command> {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    Ok(cmd)
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> io::Result<Command> {
    let mut cmd = Command::new("rundll32");
    cmd.arg("url.dll,FileProtocolHandler").arg(url);
    Ok(cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn launcher(_url: &str) -> io::Result<Command> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no known browser launcher for this platform",
    ))
}
