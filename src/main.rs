use std::path::PathBuf;
use std::process::ExitCode;

use clap::parser::MatchesError;
use clap::{Arg, ArgAction, Command};
use log::{info, LevelFilter};
use thiserror::Error;

use spanalyze::config::{ConfigError, SpanalyzeConfig, DEFAULT_CONFIG_PATH};
use spanalyze::{
    import_playlist, playlist_id_from_link, AnalysisError, GenreResolver, ImportError,
    LastFmTagging, PlaylistReport, SpotifyCatalog,
};

struct Args {
    playlist: String,
    config_path: PathBuf,
    verbosity: u8,
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid arguments: {0}")]
    Args(#[from] MatchesError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Could not import playlist: {0}")]
    Import(#[from] ImportError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Could not encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn parse_cli_args() -> Result<Args, MatchesError> {
    let cmd = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("playlist")
                .value_name("PLAYLIST")
                .help("Spotify playlist link or id")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .required(false)
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .help("Increase verbosity (-v = info, -vv = debug, -vvv = trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the statistics as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let args = Args {
        playlist: cmd
            .try_get_one::<String>("playlist")?
            .cloned()
            .unwrap_or_default(),
        config_path: cmd
            .try_get_one::<String>("config")?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        verbosity: cmd.try_get_one::<u8>("verbose")?.copied().unwrap_or(0),
        json: cmd.try_get_one::<bool>("json")?.copied().unwrap_or(false),
    };
    Ok(args)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: &Args) -> Result<ExitCode, CliError> {
    let config = SpanalyzeConfig::load(&args.config_path)?;
    let catalog = SpotifyCatalog::new(config.client_credentials());
    let resolver = GenreResolver::new(LastFmTagging::new(config.lastfm_api_key()));

    let playlist_id = playlist_id_from_link(&args.playlist);
    info!("Analysing playlist {playlist_id}");
    let playlist = import_playlist(&catalog, &resolver, playlist_id)?;

    if playlist.len() <= 1 {
        println!("Playlist has less than 2 songs - Try another playlist or adding more songs");
        return Ok(ExitCode::FAILURE);
    }

    let report = PlaylistReport::from_playlist(&playlist)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = match parse_cli_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", CliError::from(err));
            return ExitCode::FAILURE;
        }
    };
    init_logging(args.verbosity);

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
