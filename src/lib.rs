use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod error;
pub mod framing;
pub mod host;
pub mod installer;
pub mod logging;
pub mod platform;
pub mod profile;

pub use error::{FrameError, HostError, InstallError};
pub use host::{Host, HostConfig};

/// A decoded request from the extension.
///
/// The command set is closed: anything that is not a known `cmd` tag ends up
/// as [`Request::Unknown`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Overwrite `user.js` in the default profile. `content` is `None` when
    /// the field was missing or not a string.
    WriteUserJs { content: Option<String> },
    RestartBrowser,
    Unknown { cmd: Option<String> },
}

impl Request {
    pub const WRITE_USER_JS: &'static str = "WRITE_USER_JS";
    pub const RESTART_BROWSER: &'static str = "RESTART_BROWSER";

    pub fn from_value(value: &Value) -> Self {
        let cmd = value.get("cmd").and_then(Value::as_str);
        match cmd {
            Some(Self::WRITE_USER_JS) => Request::WriteUserJs {
                content: value
                    .get("content")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            Some(Self::RESTART_BROWSER) => Request::RestartBrowser,
            other => Request::Unknown {
                cmd: other.map(str::to_owned),
            },
        }
    }
}

// Log form: the command tag and payload size, never the payload.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::WriteUserJs { content: Some(c) } => {
                write!(f, "{} ({} bytes)", Self::WRITE_USER_JS, c.len())
            }
            Request::WriteUserJs { content: None } => {
                write!(f, "{} (no content)", Self::WRITE_USER_JS)
            }
            Request::RestartBrowser => f.write_str(Self::RESTART_BROWSER),
            Request::Unknown { cmd: Some(cmd) } => write!(f, "unknown {:?}", cmd),
            Request::Unknown { cmd: None } => f.write_str("missing cmd"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>, // present iff !success
}

impl Response {
    pub fn ok() -> Self {
        Response {
            success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Response {
            success: false,
            error: Some(message.into()),
        }
    }
}

impl From<Result<(), HostError>> for Response {
    fn from(result: Result<(), HostError>) -> Self {
        match result {
            Ok(()) => Response::ok(),
            Err(e) => Response::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_commands() {
        let req = Request::from_value(&json!({"cmd": "WRITE_USER_JS", "content": "x"}));
        assert_eq!(
            req,
            Request::WriteUserJs {
                content: Some("x".into())
            }
        );
        let req = Request::from_value(&json!({"cmd": "RESTART_BROWSER"}));
        assert_eq!(req, Request::RestartBrowser);
    }

    #[test]
    fn unrecognized_or_missing_cmd_is_unknown() {
        assert_eq!(
            Request::from_value(&json!({"cmd": "NOOP"})),
            Request::Unknown {
                cmd: Some("NOOP".into())
            }
        );
        assert_eq!(
            Request::from_value(&json!({"content": "x"})),
            Request::Unknown { cmd: None }
        );
        assert_eq!(
            Request::from_value(&json!({"cmd": 7})),
            Request::Unknown { cmd: None }
        );
        assert_eq!(
            Request::from_value(&json!(["WRITE_USER_JS"])),
            Request::Unknown { cmd: None }
        );
    }

    #[test]
    fn non_string_content_is_treated_as_missing() {
        let req = Request::from_value(&json!({"cmd": "WRITE_USER_JS", "content": 1}));
        assert_eq!(req, Request::WriteUserJs { content: None });
    }

    #[test]
    fn display_omits_user_js_content() {
        let req = Request::WriteUserJs {
            content: Some("user_pref(\"secret.token\", \"abc\");".into()),
        };
        let shown = req.to_string();
        assert_eq!(shown, "WRITE_USER_JS (33 bytes)");
        assert!(!shown.contains("secret"));
        assert_eq!(Request::Unknown { cmd: None }.to_string(), "missing cmd");
    }

    #[test]
    fn response_error_field_only_on_failure() {
        assert_eq!(
            serde_json::to_string(&Response::ok()).unwrap(),
            r#"{"success":true}"#
        );
        assert_eq!(
            serde_json::to_string(&Response::failure("Unknown command")).unwrap(),
            r#"{"success":false,"error":"Unknown command"}"#
        );
    }
}
