pub mod auth;
pub mod predict;

use diasys_cli::{CLIError, Result};

/// Prompt for a password on the terminal without echo.
pub(crate) fn prompt_password(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(prompt)
        .map_err(|e| CLIError::FileError(format!("Failed to read password: {}", e)))?;
    if password.is_empty() {
        return Err(CLIError::Cancelled);
    }
    Ok(password)
}
