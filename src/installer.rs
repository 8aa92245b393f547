use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::InstallError;

pub const HOST_NAME: &str = "firefox_configurator";
pub const HOST_DESCRIPTION: &str = "Native messaging host for Firefox Configurator";
pub const DEFAULT_EXTENSION_ID: &str = "firefox_configurator@example.com";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: String,
    pub allowed_extensions: Vec<String>,
}

impl Manifest {
    pub fn new(host_path: PathBuf, extension_id: impl Into<String>) -> Self {
        Manifest {
            name: HOST_NAME.to_string(),
            description: HOST_DESCRIPTION.to_string(),
            path: host_path,
            kind: "stdio".to_string(),
            allowed_extensions: vec![extension_id.into()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub host_path: PathBuf,
    pub extension_id: String,
    pub target_dir: PathBuf,
}

pub fn manifest_path(target_dir: &Path) -> PathBuf {
    target_dir.join(format!("{HOST_NAME}.json"))
}

pub fn install(opts: &InstallOptions) -> Result<PathBuf, InstallError> {
    if !opts.host_path.is_file() {
        return Err(InstallError::HostMissing(opts.host_path.clone()));
    }
    // Firefox requires an absolute path in the manifest.
    let host_path = std::path::absolute(&opts.host_path)?;

    fs::create_dir_all(&opts.target_dir)?;
    mark_executable(&host_path)?;

    let manifest = Manifest::new(host_path, opts.extension_id.clone());
    let target = manifest_path(&opts.target_dir);
    fs::write(&target, serde_json::to_string_pretty(&manifest)?)?;

    tracing::info!(manifest = %target.display(), host = %manifest.path.display(), "installed");
    Ok(target)
}

// false when there was no manifest
pub fn uninstall(target_dir: &Path) -> Result<bool, InstallError> {
    let target = manifest_path(target_dir);
    match fs::remove_file(&target) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Refuses root on Unix, requires an elevated shell on Windows.
pub fn check_privileges() -> Result<(), InstallError> {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        if unsafe { libc::geteuid() } == 0 {
            return Err(InstallError::RunningAsRoot);
        }
    }

    #[cfg(windows)]
    {
        // `net session` only succeeds from an elevated prompt.
        let elevated = std::process::Command::new("net")
            .arg("session")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if !elevated {
            return Err(InstallError::NotAdministrator);
        }
    }

    Ok(())
}
