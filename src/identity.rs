use anyhow::{bail, Context, Result};

/// Resolve the local OS principal name for the logged-in user.
///
/// Checked once at startup; every directory lookup and sheet entry is
/// keyed on this name.
pub fn current_username() -> Result<String> {
    let name = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .context("could not determine the local username from USER/USERNAME")?;

    if name.trim().is_empty() {
        bail!("local username is empty");
    }

    Ok(name)
}
