use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use easydebug_core::{init_tracing, EasyDebugConfig, FileTracer, Mode};
use tracing::{error, info, warn};

fn cli() -> Command {
    Command::new("easydebug")
        .version(easydebug_core::VERSION)
        .about("Add or remove value dumps after every binding in a Go source file")
        .arg(
            Arg::new("mode")
                .long("mode")
                .value_name("N")
                .help("0 inserts dumps and the helper, 1 removes them")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("0"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Go source file to rewrite in place"),
        )
        .arg(
            Arg::new("temp-dir")
                .long("temp-dir")
                .value_name("DIR")
                .help("Directory for the staging file (default: the file's own directory)"),
        )
}

fn main() -> ExitCode {
    init_tracing();

    let mut command = cli();
    let matches = command.get_matches_mut();

    let file = matches
        .get_one::<String>("file")
        .filter(|file| !file.is_empty());
    let Some(file) = file else {
        eprintln!("{}", command.render_help());
        return ExitCode::from(2);
    };

    match run(&matches, file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches, file: &str) -> Result<()> {
    let code = matches.get_one::<i64>("mode").copied().unwrap_or(0);
    let Some(mode) = Mode::from_code(code) else {
        warn!(mode = code, "unknown mode, nothing to do");
        return Ok(());
    };

    let mut config = EasyDebugConfig::new(mode, file);
    if let Some(dir) = matches.get_one::<String>("temp-dir") {
        config = config.with_temp_dir(dir);
    }

    let summary = FileTracer::new()?
        .run(&config)
        .with_context(|| format!("failed to {} dumps in {file}", mode.name()))?;

    if !summary.changed() {
        info!("no dumps found in {file}");
    }
    Ok(())
}
