use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use firefox_configurator::{
    InstallError,
    installer::{self, DEFAULT_EXTENSION_ID, InstallOptions},
    logging, platform,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Register the Firefox Configurator native messaging host", long_about = None)]
struct Args {
    /// Host executable to register (defaults to the one next to this installer)
    #[arg(long)]
    host_path: Option<PathBuf>,

    /// Extension id allowed to talk to the host
    #[arg(long, default_value = DEFAULT_EXTENSION_ID)]
    extension_id: String,

    /// Directory to write the manifest into (defaults to the OS location)
    #[arg(long)]
    target_dir: Option<PathBuf>,

    /// Remove the manifest instead of writing it
    #[arg(long)]
    uninstall: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    installer::check_privileges()?;

    let target_dir = match args.target_dir {
        Some(dir) => dir,
        None => platform::detect()
            .native_messaging_dir()
            .ok_or(InstallError::NoTargetDir)?,
    };

    if args.uninstall {
        if installer::uninstall(&target_dir)? {
            println!("Native messaging host removed from {}", target_dir.display());
        } else {
            println!("Nothing to remove in {}", target_dir.display());
        }
        return Ok(());
    }

    let host_path = match args.host_path {
        Some(path) => path,
        None => default_host_path()?,
    };

    println!("Host executable: {}", host_path.display());
    let manifest = installer::install(&InstallOptions {
        host_path,
        extension_id: args.extension_id,
        target_dir,
    })
    .context("Installation failed")?;

    println!("Native messaging host installed: {}", manifest.display());
    Ok(())
}

fn default_host_path() -> Result<PathBuf> {
    let exe = env::current_exe().context("Cannot locate the installer executable")?;
    let dir = exe
        .parent()
        .context("Installer executable has no parent directory")?;
    Ok(dir.join(format!(
        "{}{}",
        env!("CARGO_PKG_NAME"),
        env::consts::EXE_SUFFIX
    )))
}
