use std::{
    fs,
    io::{Read, Write},
    path::PathBuf,
    process::Stdio,
};

use serde_json::Value;

use crate::{
    Request, Response,
    error::{FrameError, HostError},
    framing::{read_frame, write_frame},
    platform::{self, PlatformPaths},
    profile::{USER_JS, resolve_profile_dir},
};

#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Replaces the platform's Firefox directory when set.
    pub profile_root: Option<PathBuf>,
}

pub struct Host {
    platform: Box<dyn PlatformPaths>,
    config: HostConfig,
}

impl Host {
    pub fn new(platform: Box<dyn PlatformPaths>, config: HostConfig) -> Self {
        Host { platform, config }
    }

    /// Serves frames until `reader` is closed. Only framing and output
    /// failures end the loop early; request failures are answered in-band.
    pub fn run(&self, reader: &mut impl Read, writer: &mut impl Write) -> Result<(), FrameError> {
        while let Some(payload) = read_frame(reader)? {
            let response = self.handle_payload(&payload);
            write_frame(writer, &response)?;
        }
        tracing::info!("input closed, shutting down");
        Ok(())
    }

    pub fn handle_payload(&self, payload: &[u8]) -> Response {
        match serde_json::from_slice::<Value>(payload) {
            Ok(value) => self.handle(&Request::from_value(&value)),
            Err(e) => {
                tracing::warn!(error = %e, len = payload.len(), "undecodable request");
                Response::failure(format!("Invalid request: {}", e))
            }
        }
    }

    pub fn handle(&self, request: &Request) -> Response {
        let result = self.dispatch(request);
        if let Err(e) = &result {
            tracing::warn!(%request, error = %e, "request failed");
        }
        result.into()
    }

    pub fn dispatch(&self, request: &Request) -> Result<(), HostError> {
        match request {
            Request::WriteUserJs { content } => {
                let content = content.as_deref().ok_or(HostError::MissingContent)?;
                self.write_user_js(content)
            }
            Request::RestartBrowser => self.restart_browser(),
            Request::Unknown { cmd } => {
                tracing::debug!(?cmd, "unknown command");
                Err(HostError::UnknownCommand)
            }
        }
    }

    fn profile_root(&self) -> Option<PathBuf> {
        self.config
            .profile_root
            .clone()
            .or_else(|| self.platform.profile_root())
    }

    fn write_user_js(&self, content: &str) -> Result<(), HostError> {
        let root = self.profile_root().ok_or(HostError::ProfileNotFound)?;
        let profile = resolve_profile_dir(&root)?.ok_or(HostError::ProfileNotFound)?;

        let target = profile.join(USER_JS);
        fs::write(&target, content)?;
        tracing::info!(path = %target.display(), bytes = content.len(), "wrote user.js");
        Ok(())
    }

    fn restart_browser(&self) -> Result<(), HostError> {
        // The browser may not be running; a failed kill is not an error.
        let mut kill = self.platform.kill_command();
        match kill
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => tracing::debug!(cmd = %platform::describe(&kill), %status, "kill issued"),
            Err(e) => tracing::debug!(cmd = %platform::describe(&kill), error = %e, "kill failed"),
        }

        // stdout belongs to the protocol, the new browser must not inherit it.
        let mut launch = self.platform.launch_command();
        launch
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                tracing::warn!(cmd = %platform::describe(&launch), error = %e, "launch failed");
                HostError::RestartFailure
            })?;

        tracing::info!("browser restart issued");
        Ok(())
    }
}
