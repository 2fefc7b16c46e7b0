//! Switchback CLI entry point.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use switchback_runtime::{HostConfig, Repl, Session, run_batch};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    config_file: Option<PathBuf>,
    player: Option<String>,
    grants: Vec<String>,
    online: Vec<String>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    let mut args = args.into_iter().skip(1);

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} requires a value"));
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "-c" | "--config" => config.config_file = Some(PathBuf::from(value("--config")?)),
            "--as" => config.player = Some(value("--as")?),
            "--grant" => config.grants.push(value("--grant")?),
            "--online" => config.online.extend(
                value("--online")?
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from),
            ),
            other => return Err(format!("unknown option: {other}").into()),
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("switchback {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut host = match &cli.config_file {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    if cli.player.is_some() {
        host.session.player = cli.player;
    }
    host.session.grants.extend(cli.grants);
    host.session.online.extend(cli.online);

    let session = Session::new(host.router, &host.session)?;

    if cli.batch_mode {
        let stdin = io::stdin();
        run_batch(&session, stdin.lock(), &mut io::stdout().lock())?;
        return Ok(());
    }

    Repl::new(session)?.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mSwitchback\x1b[0m - Typed command router console

\x1b[1mUSAGE:\x1b[0m
    switchback [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help           Print help information
    -V, --version        Print version information
    -c, --config FILE    Load router and session settings from a TOML file
    -b, --batch          Read commands from stdin, one per line, and exit
        --as NAME        Issue commands as the player NAME instead of the console
        --grant PERM     Grant PERM to the player (repeatable)
        --online A,B     Mark other players online

\x1b[1mEXAMPLES:\x1b[0m
    switchback                                   Start the console
    switchback --as alice --grant switchback.chunk
    echo '/chunk preload 8' | switchback -b      Run one command and exit

\x1b[1mLOGGING:\x1b[0m
    Set RUST_LOG (e.g. RUST_LOG=debug) to change log verbosity."
    );
}
