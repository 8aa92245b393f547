use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while handling a recognized request. All of these are reported
/// back to the extension as `{"success": false, "error": ...}`.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Could not find Firefox profile directory")]
    ProfileNotFound,
    #[error("Unknown command")]
    UnknownCommand,
    #[error("Missing 'content' for WRITE_USER_JS")]
    MissingContent,
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("Failed to restart Firefox")]
    RestartFailure,
}

/// Failures on the framed stdio channel itself.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("stream ended inside a frame ({read} of {expected} bytes)")]
    Truncated { read: usize, expected: usize },
    #[error("frame declares {0} bytes, over the request limit")]
    TooLarge(usize),
    #[error("Native messaging error: {0}")]
    Native(String),
}

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Please run this installer without sudo")]
    RunningAsRoot,
    #[error("Please run this installer as Administrator")]
    NotAdministrator,
    #[error("Could not determine the native messaging directory")]
    NoTargetDir,
    #[error("Host executable not found at {}", .0.display())]
    HostMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
