use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use firefox_configurator::{Host, HostConfig, logging, platform};

/// Native messaging host that lets the Firefox Configurator extension
/// rewrite user.js and restart the browser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Firefox directory containing profiles.ini (defaults to the OS location)
    #[arg(long, env = "FIREFOX_CONFIGURATOR_PROFILE_ROOT")]
    profile_root: Option<PathBuf>,

    /// Arguments Firefox appends when it launches the host (manifest path,
    /// extension id)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    launcher_args: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    tracing::info!(launcher_args = ?args.launcher_args, "host started");

    let host = Host::new(
        platform::detect(),
        HostConfig {
            profile_root: args.profile_root,
        },
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    host.run(&mut stdin.lock(), &mut stdout.lock())
        .context("native messaging channel failed")?;

    Ok(())
}
