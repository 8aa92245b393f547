use std::{
    env,
    path::PathBuf,
    process::Command,
};

pub trait PlatformPaths {
    fn profile_root(&self) -> Option<PathBuf>; // dir holding profiles.ini
    fn kill_command(&self) -> Command;
    fn launch_command(&self) -> Command;
    fn native_messaging_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct Linux {
    pub home: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct MacOs {
    pub home: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Windows {
    pub app_data: Option<PathBuf>,
    pub program_files: Option<PathBuf>,
}

impl PlatformPaths for Linux {
    fn profile_root(&self) -> Option<PathBuf> {
        self.home.as_deref().map(|h| h.join(".mozilla").join("firefox"))
    }

    fn kill_command(&self) -> Command {
        let mut cmd = Command::new("pkill");
        cmd.arg("firefox");
        cmd
    }

    fn launch_command(&self) -> Command {
        Command::new("firefox")
    }

    fn native_messaging_dir(&self) -> Option<PathBuf> {
        self.home
            .as_deref()
            .map(|h| h.join(".mozilla").join("native-messaging-hosts"))
    }
}

impl PlatformPaths for MacOs {
    fn profile_root(&self) -> Option<PathBuf> {
        self.home.as_deref().map(|h| {
            h.join("Library")
                .join("Application Support")
                .join("Firefox")
        })
    }

    fn kill_command(&self) -> Command {
        let mut cmd = Command::new("pkill");
        cmd.arg("firefox");
        cmd
    }

    fn launch_command(&self) -> Command {
        let mut cmd = Command::new("open");
        cmd.args(["-a", "Firefox"]);
        cmd
    }

    fn native_messaging_dir(&self) -> Option<PathBuf> {
        Some(PathBuf::from(
            "/Library/Application Support/Mozilla/NativeMessagingHosts",
        ))
    }
}

impl PlatformPaths for Windows {
    fn profile_root(&self) -> Option<PathBuf> {
        self.app_data
            .as_deref()
            .map(|d| d.join("Mozilla").join("Firefox"))
    }

    fn kill_command(&self) -> Command {
        let mut cmd = Command::new("taskkill");
        cmd.args(["/F", "/IM", "firefox.exe"]);
        cmd
    }

    fn launch_command(&self) -> Command {
        // `start` is a cmd builtin; the empty string is the window title.
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", "firefox"]);
        cmd
    }

    fn native_messaging_dir(&self) -> Option<PathBuf> {
        self.program_files
            .as_deref()
            .map(|d| d.join("Mozilla").join("NativeMessagingHosts"))
    }
}

fn env_dir(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn detect() -> Box<dyn PlatformPaths> {
    if cfg!(target_os = "windows") {
        Box::new(Windows {
            app_data: env_dir("APPDATA"),
            program_files: env_dir("PROGRAMFILES"),
        })
    } else if cfg!(target_os = "macos") {
        Box::new(MacOs {
            home: home::home_dir(),
        })
    } else {
        Box::new(Linux {
            home: home::home_dir(),
        })
    }
}

pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn join_home(home: &Path, parts: &[&str]) -> PathBuf {
        parts.iter().fold(home.to_path_buf(), |acc, p| acc.join(p))
    }

    #[test]
    fn linux_paths_hang_off_home() {
        let linux = Linux {
            home: Some(PathBuf::from("/home/u")),
        };
        assert_eq!(
            linux.profile_root().unwrap(),
            join_home(Path::new("/home/u"), &[".mozilla", "firefox"])
        );
        assert_eq!(
            linux.native_messaging_dir().unwrap(),
            join_home(Path::new("/home/u"), &[".mozilla", "native-messaging-hosts"])
        );
        assert_eq!(describe(&linux.kill_command()), "pkill firefox");
        assert_eq!(describe(&linux.launch_command()), "firefox");
    }

    #[test]
    fn macos_uses_application_support() {
        let mac = MacOs {
            home: Some(PathBuf::from("/Users/u")),
        };
        assert_eq!(
            mac.profile_root().unwrap(),
            join_home(
                Path::new("/Users/u"),
                &["Library", "Application Support", "Firefox"]
            )
        );
        assert_eq!(describe(&mac.launch_command()), "open -a Firefox");
    }

    #[test]
    fn windows_without_env_has_no_dirs() {
        let win = Windows {
            app_data: None,
            program_files: None,
        };
        assert!(win.profile_root().is_none());
        assert!(win.native_messaging_dir().is_none());
        assert_eq!(describe(&win.kill_command()), "taskkill /F /IM firefox.exe");
        assert_eq!(describe(&win.launch_command()), "cmd /C start  firefox");
    }

    #[test]
    fn missing_home_means_no_profile_root() {
        assert!(Linux { home: None }.profile_root().is_none());
        assert!(MacOs { home: None }.profile_root().is_none());
    }
}
