use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autospotify::agent::llm::{
    CompletionOptions, LlmProvider, OpenAiCompatProvider, DEFAULT_MODEL, GEMINI_OPENAI_BASE_URL,
};
use autospotify::agent::trace::TRACE_HEADERS;
use autospotify::agent::{music_tools, DEFAULT_MAX_ROUNDS};
use autospotify::cli_style::{self, get_styles, CommandHelp, TableBuilder};
use autospotify::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_HTTP_TIMEOUT_SEC, DEFAULT_MODEL_TIMEOUT_SEC,
    DEFAULT_TEMPERATURE,
};
use autospotify::music::{CatalogLookup, RecommendationClient};
use autospotify::spotify::SPOTIFY_API_BASE;
use autospotify::{
    ExtractionStatus, Orchestrator, RecommendationResult, Session, SpotifyClient,
};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

/// Features shown by the `saved` command, in column order.
const SAVED_FEATURE_COLUMNS: [&str; 5] =
    ["energy", "valence", "danceability", "acousticness", "tempo"];

#[derive(Parser, Debug)]
#[command(styles = get_styles(), version, about = "Conversational music recommendations")]
struct CliArgs {
    /// Path to a TOML configuration file. Values in the file override the flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Root of the Spotify Web API.
    #[clap(long, default_value = SPOTIFY_API_BASE)]
    pub spotify_api_base: String,

    /// Spotify access token.
    #[clap(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub spotify_token: Option<String>,

    /// Shell command printing a Spotify access token, run before each request.
    #[clap(long, env = "SPOTIFY_TOKEN_COMMAND")]
    pub spotify_token_command: Option<String>,

    /// Base URL of the OpenAI-compatible chat completions API.
    #[clap(long, default_value = GEMINI_OPENAI_BASE_URL)]
    pub llm_base_url: String,

    /// Model name.
    #[clap(long, default_value = DEFAULT_MODEL)]
    pub llm_model: String,

    /// API key for the language model service.
    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Timeout for each Spotify request, in seconds.
    #[clap(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SEC)]
    pub http_timeout_sec: u64,

    /// Timeout for each model round-trip, in seconds.
    #[clap(long, default_value_t = DEFAULT_MODEL_TIMEOUT_SEC)]
    pub model_timeout_sec: u64,

    /// Maximum number of model round-trips per request.
    #[clap(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    pub max_tool_rounds: usize,

    /// Seed for seed sampling, for reproducible recommendations.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Sampling temperature of the model.
    #[clap(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            spotify_api_base: self.spotify_api_base.clone(),
            spotify_token: self.spotify_token.clone(),
            spotify_token_command: self.spotify_token_command.clone(),
            llm_base_url: self.llm_base_url.clone(),
            llm_model: self.llm_model.clone(),
            llm_api_key: self.llm_api_key.clone(),
            http_timeout_sec: self.http_timeout_sec,
            model_timeout_sec: self.model_timeout_sec,
            max_tool_rounds: self.max_tool_rounds,
            seed: self.seed,
            temperature: self.temperature,
        }
    }
}

#[derive(Parser)]
#[command(styles = get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Ask for music in plain language.
    Ask {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Shows the current recommendations.
    Results,

    /// Plays the recommendation at the given position.
    Play { position: usize },

    /// Shows the tool calls made for the current recommendations.
    Trace,

    /// Lists the genre tags usable as seeds.
    Genres,

    /// Shows audio features of your most recently saved tracks.
    Saved {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Shows this help.
    Help,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

struct App {
    runtime: Runtime,
    spotify: Arc<SpotifyClient>,
    orchestrator: Orchestrator,
    session: Session,
}

const RECOMMENDATION_COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "ask",
        args: "<text>",
        description: "Ask for music (any line that is not a command works too)",
    },
    CommandHelp {
        name: "results",
        args: "",
        description: "Show the current recommendations",
    },
    CommandHelp {
        name: "play",
        args: "<n>",
        description: "Play recommendation number n on your active device",
    },
    CommandHelp {
        name: "trace",
        args: "",
        description: "Show the tool calls behind the current recommendations",
    },
];

const LIBRARY_COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "genres",
        args: "",
        description: "List genre tags usable as seeds",
    },
    CommandHelp {
        name: "saved",
        args: "[--limit N]",
        description: "Audio features of your last saved tracks",
    },
];

const SYSTEM_COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "help",
        args: "",
        description: "Show this help",
    },
    CommandHelp {
        name: "exit",
        args: "",
        description: "Close this program",
    },
];

fn print_help() {
    cli_style::print_help(&[
        ("Recommendations", RECOMMENDATION_COMMANDS),
        ("Library", LIBRARY_COMMANDS),
        ("System", SYSTEM_COMMANDS),
    ]);
}

fn print_result(result: &RecommendationResult) {
    cli_style::print_reply(&result.reply);
    println!();

    match &result.status {
        ExtractionStatus::Found if !result.tracks.is_empty() => {
            cli_style::print_section_header("Recommendations");
            cli_style::track_table(
                result
                    .tracks
                    .iter()
                    .map(|t| (t.name.as_str(), t.artist.as_str())),
            )
            .print();
            cli_style::print_section_footer();
        }
        ExtractionStatus::Found => cli_style::print_empty_list("The service found no matching tracks"),
        ExtractionStatus::NoRecommendation => {
            cli_style::print_empty_list("No recommendations for this request")
        }
        ExtractionStatus::Malformed(reason) => cli_style::print_warning(&format!(
            "Could not read the recommendations: {}",
            reason
        )),
    }
}

fn print_trace(result: &RecommendationResult) {
    let table = result.trace_table();
    if table.is_empty() {
        cli_style::print_empty_list("No tools were called for this request");
        return;
    }
    let mut builder = TableBuilder::new(&TRACE_HEADERS);
    for row in table.rows() {
        builder.add_row(&[&row.kind, &row.tool, &row.payload]);
    }
    builder.print();
}

fn ask(app: &mut App, text: &str) -> CommandExecutionResult {
    let text = text.trim();
    if text.is_empty() {
        return CommandExecutionResult::Ok;
    }
    cli_style::print_info("Thinking...");

    match app
        .runtime
        .block_on(app.session.fetch(&app.orchestrator, text))
    {
        Ok(result) => {
            print_result(result);
            CommandExecutionResult::Ok
        }
        Err(err) => {
            error!(error = %err, "Request failed");
            CommandExecutionResult::Error(err.to_string())
        }
    }
}

fn execute_command(line: String, app: &mut App, command_names: &[String]) -> CommandExecutionResult {
    let line = line.trim();
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    // Anything that does not start with a command name is a request.
    let is_command = args
        .first()
        .map(|first| command_names.iter().any(|name| name == first))
        .unwrap_or(false);
    if !is_command {
        return ask(app, line);
    }

    let cli = match InnerCli::try_parse_from(
        std::iter::once(" ").chain(args.iter().map(String::as_str)),
    ) {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            return CommandExecutionResult::Ok;
        }
    };

    match cli.command {
        InnerCommand::Ask { words } => return ask(app, &words.join(" ")),
        InnerCommand::Results => match app.session.result() {
            Some(result) => print_result(result),
            None => cli_style::print_empty_list("Nothing yet, ask for some music first"),
        },
        InnerCommand::Play { position } => {
            if position == 0 {
                return CommandExecutionResult::Error("Positions start at 1".to_string());
            }
            let played = app
                .runtime
                .block_on(app.session.play(app.spotify.as_ref(), position - 1));
            match played {
                Ok(track) => cli_style::print_success(&format!("Playing {}", track.label())),
                Err(err) => return CommandExecutionResult::Error(err.to_string()),
            }
        }
        InnerCommand::Trace => match app.session.result() {
            Some(result) => print_trace(result),
            None => cli_style::print_empty_list("Nothing yet, ask for some music first"),
        },
        InnerCommand::Genres => match app.runtime.block_on(app.spotify.list_genre_seeds()) {
            Ok(genres) => {
                cli_style::print_section_header("Genre Seeds");
                for chunk in genres.chunks(6) {
                    println!("  {}", chunk.join(", "));
                }
                cli_style::print_section_footer();
                cli_style::print_key_value("Total", &genres.len().to_string());
            }
            Err(err) => return CommandExecutionResult::Error(err.to_string()),
        },
        InnerCommand::Saved { limit } => {
            match app
                .runtime
                .block_on(app.spotify.saved_tracks_audio_features(limit))
            {
                Ok(saved) if saved.is_empty() => {
                    cli_style::print_empty_list("No saved tracks");
                }
                Ok(saved) => {
                    let mut headers = vec!["Track"];
                    headers.extend(SAVED_FEATURE_COLUMNS);
                    let mut table = TableBuilder::new(&headers);
                    for track in &saved {
                        let mut row = vec![track.name.clone()];
                        row.extend(SAVED_FEATURE_COLUMNS.iter().map(|feature| {
                            track
                                .features
                                .get(*feature)
                                .map(|v| format!("{:.2}", v))
                                .unwrap_or_else(|| "-".to_string())
                        }));
                        table.add_row(row.as_slice());
                    }
                    table.print();
                }
                Err(err) => return CommandExecutionResult::Error(err.to_string()),
            }
        }
        InnerCommand::Help => print_help(),
        InnerCommand::Exit => return CommandExecutionResult::Exit,
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct ShellHelper {
    commands_names: Vec<String>,
}

impl ShellHelper {
    pub fn new(commands_names: Vec<String>) -> Self {
        ShellHelper { commands_names }
    }
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for ShellHelper {}
impl Validator for ShellHelper {}
impl Helper for ShellHelper {}

fn init_tracing() -> Result<()> {
    // Logs go to stderr so they do not interleave with tables on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")
}

fn build_app(config: &AppConfig) -> Result<App> {
    let runtime = Runtime::new().context("Failed to start async runtime")?;

    let spotify = Arc::new(SpotifyClient::new(
        config.spotify.api_base.clone(),
        config.spotify.token.clone(),
        config.spotify.http_timeout,
    )?);

    let recommender = match config.seed {
        Some(seed) => RecommendationClient::with_seed(spotify.clone(), spotify.clone(), seed),
        None => RecommendationClient::new(spotify.clone(), spotify.clone()),
    };
    let tools = Arc::new(music_tools(Arc::new(recommender)));

    let llm = Arc::new(OpenAiCompatProvider::new(
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.api_key.clone(),
    ));
    let options = CompletionOptions::new(config.llm.temperature, config.llm.timeout);
    let orchestrator = Orchestrator::new(llm, tools)
        .with_max_rounds(config.llm.max_tool_rounds)
        .with_completion_options(options);

    Ok(App {
        runtime,
        spotify,
        orchestrator,
        session: Session::new(),
    })
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init_tracing()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    let mut app = build_app(&config)?;

    info!(
        spotify_api = %config.spotify.api_base,
        model = %config.llm.model,
        "Starting interactive session"
    );
    cli_style::print_welcome(&[
        ("Model", config.llm.model.as_str()),
        ("LLM API", config.llm.base_url.as_str()),
        ("Spotify API", config.spotify.api_base.as_str()),
    ]);

    let llm = app.orchestrator.llm().clone();
    if let Err(err) = app.runtime.block_on(llm.health_check()) {
        cli_style::print_warning(&format!("Language model not reachable yet: {}", err));
    }

    let command_names: Vec<String> = InnerCli::command()
        .get_subcommands()
        .map(|sc| sc.get_name().to_string())
        .collect();

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<ShellHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(ShellHelper::new(command_names.clone())));

    let prompt = cli_style::get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut app, &command_names) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                cli_style::print_error(&format!("{:?}", e));
                break;
            }
        }
    }

    cli_style::print_goodbye();
    Ok(())
}
