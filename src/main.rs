use std::{env, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use neonplayer::{config::Config, fs::ensure_audio, logging, ui};
use tracing::{error, info};

const USAGE: &str = "usage: neonplayer [AUDIO_FILE]";

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("neonplayer: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let mut args = env::args_os().skip(1);
    let arg = args.next();
    if args.next().is_some() {
        anyhow::bail!("too many arguments\n{USAGE}");
    }
    if matches!(arg.as_deref().and_then(|a| a.to_str()), Some("-h" | "--help")) {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::load_default().context("loading configuration")?;
    logging::init(&config.log_path())?;

    let source = arg.map(PathBuf::from).unwrap_or_else(|| config.source.clone());
    let file_type = ensure_audio(&source)?;
    info!(mime = %file_type.mime, "source is {}", source.display());

    ui::run(source, &config)
}
