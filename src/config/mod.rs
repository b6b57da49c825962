mod file_config;

pub use file_config::{FileConfig, LlmFileConfig, SpotifyFileConfig};

use crate::agent::llm::{DEFAULT_MODEL, GEMINI_OPENAI_BASE_URL};
use crate::agent::DEFAULT_MAX_ROUNDS;
use crate::spotify::{TokenSource, SPOTIFY_API_BASE};
use anyhow::{bail, Result};
use std::time::Duration;

pub const DEFAULT_HTTP_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_MODEL_TIMEOUT_SEC: u64 = 120;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub spotify_api_base: String,
    pub spotify_token: Option<String>,
    pub spotify_token_command: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub http_timeout_sec: u64,
    pub model_timeout_sec: u64,
    pub max_tool_rounds: usize,
    pub seed: Option<u64>,
    pub temperature: f32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            spotify_api_base: SPOTIFY_API_BASE.to_string(),
            spotify_token: None,
            spotify_token_command: None,
            llm_base_url: GEMINI_OPENAI_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_api_key: None,
            http_timeout_sec: DEFAULT_HTTP_TIMEOUT_SEC,
            model_timeout_sec: DEFAULT_MODEL_TIMEOUT_SEC,
            max_tool_rounds: DEFAULT_MAX_ROUNDS,
            seed: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifySettings,
    pub llm: LlmSettings,
    /// Fixed seed for seed sampling; `None` draws from the OS.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub api_base: String,
    pub token: TokenSource,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tool_rounds: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let spotify_file = file.spotify.unwrap_or_default();
        let llm_file = file.llm.unwrap_or_default();

        // A token source in the file replaces the command-line one as a whole,
        // so a file-level command is never shadowed by an environment token.
        let token = token_source(spotify_file.token, spotify_file.token_command)
            .or_else(|| token_source(cli.spotify_token.clone(), cli.spotify_token_command.clone()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "A Spotify access token must be specified via --spotify-token, \
                     --spotify-token-command or the [spotify] section of the config file"
                )
            })?;

        let http_timeout_sec = spotify_file.http_timeout_sec.unwrap_or(cli.http_timeout_sec);
        if http_timeout_sec == 0 {
            bail!("http_timeout_sec must be greater than zero");
        }
        let model_timeout_sec = llm_file.timeout_sec.unwrap_or(cli.model_timeout_sec);
        if model_timeout_sec == 0 {
            bail!("model timeout must be greater than zero");
        }

        let max_tool_rounds = llm_file.max_tool_rounds.unwrap_or(cli.max_tool_rounds);
        if max_tool_rounds == 0 {
            bail!("max_tool_rounds must be at least 1");
        }

        let spotify = SpotifySettings {
            api_base: spotify_file
                .api_base
                .unwrap_or_else(|| cli.spotify_api_base.clone()),
            token,
            http_timeout: Duration::from_secs(http_timeout_sec),
        };

        let llm = LlmSettings {
            base_url: llm_file
                .base_url
                .unwrap_or_else(|| cli.llm_base_url.clone()),
            model: llm_file.model.unwrap_or_else(|| cli.llm_model.clone()),
            api_key: llm_file.api_key.or_else(|| cli.llm_api_key.clone()),
            timeout: Duration::from_secs(model_timeout_sec),
            temperature: llm_file.temperature.unwrap_or(cli.temperature),
            max_tool_rounds,
        };

        Ok(Self {
            spotify,
            llm,
            seed: file.seed.or(cli.seed),
        })
    }
}

/// A static token wins over a command when both are given.
fn token_source(token: Option<String>, command: Option<String>) -> Option<TokenSource> {
    let non_blank = |s: String| {
        let trimmed = s.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };
    token
        .and_then(non_blank)
        .map(TokenSource::Static)
        .or_else(|| command.and_then(non_blank).map(TokenSource::Command))
}
