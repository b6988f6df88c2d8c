//! Config file path resolution.
//!
//! Priority:
//! 1. `--config <path>` (explicit flag)
//! 2. `VIMOUSE_CONFIG` (ignores empty string)
//! 3. `<config dir>/vimouse/config.json` (`~/.config` on Linux)
//! 4. Built-in defaults

use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "VIMOUSE_CONFIG";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line; must exist.
    Flag(PathBuf),
    /// Named by `VIMOUSE_CONFIG`; must exist.
    Env(PathBuf),
    /// The per-user default location; may be absent.
    UserDefault(PathBuf),
    /// No file at all.
    BuiltIn,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Env(p) | Self::UserDefault(p) => Some(p),
            Self::BuiltIn => None,
        }
    }

    /// Whether a missing file is an error.
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Flag(_) | Self::Env(_))
    }
}

/// Default per-user config file location, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vimouse").join("config.json"))
}

/// Resolve the config source with priority fallback.
pub fn resolve_config(flag: Option<&Path>) -> ConfigSource {
    // 1. Explicit flag
    if let Some(path) = flag {
        return ConfigSource::Flag(path.to_path_buf());
    }

    // 2. Env override (ignore empty)
    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return ConfigSource::Env(PathBuf::from(path));
        }
    }

    // 3. Per-user default
    if let Some(path) = user_config_path() {
        return ConfigSource::UserDefault(path);
    }

    ConfigSource::BuiltIn
}


#[cfg(test)]
mod tests {
    use super::test_env::EnvGuard;
    use super::*;

    #[test]
    fn flag_wins_over_env() {
        let _guard = EnvGuard::new(&[CONFIG_ENV]);
        // SAFETY: We hold ENV_MUTEX via _guard
        unsafe { std::env::set_var(CONFIG_ENV, "/from/env.json") };

        assert_eq!(
            resolve_config(Some(Path::new("/from/flag.json"))),
            ConfigSource::Flag(PathBuf::from("/from/flag.json"))
        );
    }

    #[test]
    fn env_override() {
        let _guard = EnvGuard::new(&[CONFIG_ENV]);
        // SAFETY: We hold ENV_MUTEX via _guard
        unsafe { std::env::set_var(CONFIG_ENV, "/from/env.json") };

        let source = resolve_config(None);
        assert_eq!(source, ConfigSource::Env(PathBuf::from("/from/env.json")));
        assert!(source.is_explicit());
    }

    #[test]
    fn empty_env_is_ignored() {
        let _guard = EnvGuard::new(&[CONFIG_ENV]);
        // SAFETY: We hold ENV_MUTEX via _guard
        unsafe { std::env::set_var(CONFIG_ENV, "") };

        let source = resolve_config(None);
        assert!(!source.is_explicit());
        if let Some(path) = source.path() {
            assert!(path.ends_with("vimouse/config.json"));
        }
    }

    #[test]
    fn user_default_is_not_explicit() {
        let source = ConfigSource::UserDefault(PathBuf::from("/home/u/.config/vimouse/config.json"));
        assert!(!source.is_explicit());
        assert!(ConfigSource::BuiltIn.path().is_none());
    }
}
