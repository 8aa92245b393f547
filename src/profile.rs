use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::HostError;

pub const PROFILES_INI: &str = "profiles.ini";
pub const USER_JS: &str = "user.js";

#[derive(Debug, Default)]
struct Section {
    default: bool,
    path: Option<String>,
}

/// Returns the `Path` of the first section with `Default=1`, in file order.
/// That section wins even if it has no `Path`, in which case there is no
/// default profile.
pub fn find_default_profile(ini: &str) -> Option<String> {
    let mut current = Section::default();

    for line in ini.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            if current.default {
                return current.path;
            }
            current = Section::default();
        } else if line.starts_with(';') || line.starts_with('#') {
            continue;
        } else if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "Default" => current.default = value.trim() == "1",
                "Path" => current.path = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    if current.default { current.path } else { None }
}

// Re-reads profiles.ini on every call.
pub fn resolve_profile_dir(base: &Path) -> Result<Option<PathBuf>, HostError> {
    let ini_path = base.join(PROFILES_INI);
    let ini = match fs::read_to_string(&ini_path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %ini_path.display(), "profiles.ini not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let Some(profile) = find_default_profile(&ini) else {
        tracing::debug!(path = %ini_path.display(), "no section with Default=1");
        return Ok(None);
    };

    let profile = PathBuf::from(profile);
    if profile.is_absolute() {
        Ok(Some(profile))
    } else {
        Ok(Some(base.join(profile)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_default_section_wins() {
        let ini = "\
[General]
StartWithLastProfile=1

[Profile1]
Name=work
Path=Profiles/work.default
Default=1

[Profile0]
Name=default
Path=Profiles/abcd.default
Default=1
";
        assert_eq!(
            find_default_profile(ini).as_deref(),
            Some("Profiles/work.default")
        );
    }

    #[test]
    fn no_default_section() {
        let ini = "[Profile0]\nPath=a\nDefault=0\n[Profile1]\nPath=b\n";
        assert_eq!(find_default_profile(ini), None);
    }

    #[test]
    fn default_in_last_section_is_found() {
        let ini = "[General]\nVersion=2\n[Profile0]\nPath=last\nDefault=1";
        assert_eq!(find_default_profile(ini).as_deref(), Some("last"));
    }

    #[test]
    fn default_without_path_stops_the_search() {
        let ini = "[Profile0]\nDefault=1\n[Profile1]\nPath=p1\nDefault=1\n";
        assert_eq!(find_default_profile(ini), None);
    }

    #[test]
    fn keys_and_values_are_trimmed() {
        let ini = "[Profile0]\n  Path = spaced \n Default = 1 \n";
        assert_eq!(find_default_profile(ini).as_deref(), Some("spaced"));
    }

    #[test]
    fn missing_ini_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_profile_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn relative_path_is_joined_with_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PROFILES_INI),
            "[Profile0]\nPath=Profiles/x.default\nDefault=1\n",
        )
        .unwrap();
        let resolved = resolve_profile_dir(dir.path()).unwrap().unwrap();
        assert_eq!(resolved, dir.path().join("Profiles/x.default"));
    }

    #[test]
    fn absolute_path_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PROFILES_INI),
            format!("[Profile0]\nPath={}\nDefault=1\n", elsewhere.path().display()),
        )
        .unwrap();
        let resolved = resolve_profile_dir(dir.path()).unwrap().unwrap();
        assert_eq!(resolved, elsewhere.path());
    }
}
