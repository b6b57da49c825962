//! Bearer token sources for the Spotify Web API.

use crate::music::MusicServiceError;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Timeout for token command execution.
const TOKEN_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the access token comes from.
///
/// Obtaining the token (the OAuth flow) happens outside this program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Fixed access token.
    Static(String),
    /// Shell command printing a fresh access token on stdout, run before
    /// each request (for rotating tokens).
    Command(String),
}

impl TokenSource {
    /// Get the current access token, running the command if necessary.
    pub async fn token(&self) -> Result<String, MusicServiceError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Command(cmd) => {
                debug!(command = %cmd, "Fetching access token via command");

                let result = tokio::time::timeout(
                    TOKEN_COMMAND_TIMEOUT,
                    Command::new("sh").arg("-c").arg(cmd).output(),
                )
                .await;

                let output = match result {
                    Ok(Ok(output)) => output,
                    Ok(Err(e)) => {
                        warn!(command = %cmd, error = %e, "Token command failed to execute");
                        return Err(MusicServiceError::Auth(format!(
                            "Failed to execute token command: {}",
                            e
                        )));
                    }
                    Err(_) => {
                        warn!(command = %cmd, "Token command timed out");
                        return Err(MusicServiceError::Auth(
                            "Token command timed out".to_string(),
                        ));
                    }
                };

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(command = %cmd, stderr = %stderr, "Token command failed");
                    return Err(MusicServiceError::Auth(format!(
                        "Token command exited with {}: {}",
                        output.status, stderr
                    )));
                }

                let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if token.is_empty() {
                    return Err(MusicServiceError::Auth(
                        "Token command returned an empty token".to_string(),
                    ));
                }
                Ok(token)
            }
        }
    }
}
