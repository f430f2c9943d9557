//! Settings file loading

use std::path::{Path, PathBuf};

use podwatch_core::prelude::*;

use super::types::Settings;

/// Name of the settings file inside the config directory
pub const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# podwatch configuration

[behavior]
auto_start = true         # Start watching when the dashboard opens

[feed]
kubectl = "kubectl"       # Binary name or path
namespace = ""            # Empty = kubectl's current namespace
context = ""              # Empty = current kubeconfig context
all_namespaces = false
stop_timeout_ms = 2000    # How long quit waits for the feed to stop

[ui]
show_status_bar = true
"#;

/// `<config dir>/podwatch/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("podwatch").join(CONFIG_FILENAME))
}

/// Load settings from `config_path`
///
/// A missing file yields defaults; an unreadable or invalid one is logged
/// and also yields defaults.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write a commented default config file unless one already exists
pub fn init_config_file(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Ok(());
    }

    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir).context(format!("Failed to create {:?}", dir))?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .context(format!("Failed to write {:?}", config_path))?;

    info!("Created default config at {:?}", config_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join(CONFIG_FILENAME));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[feed]
namespace = "payments"
stop_timeout_ms = 500
"#,
        )
        .unwrap();

        let settings = load_settings(&path);

        assert_eq!(settings.feed.namespace, "payments");
        assert_eq!(settings.feed.stop_timeout_ms, 500);
        assert_eq!(settings.feed.kubectl, "kubectl");
        assert!(settings.behavior.auto_start);
        assert!(settings.ui.show_status_bar);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[feed\nnamespace = ").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_init_writes_loadable_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("podwatch").join(CONFIG_FILENAME);

        init_config_file(&path).unwrap();

        assert!(path.exists());
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[behavior]\nauto_start = false\n").unwrap();

        init_config_file(&path).unwrap();

        assert!(!load_settings(&path).behavior.auto_start);
    }

    #[test]
    fn test_init_reports_io_error_when_parent_is_a_file() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("podwatch").join(CONFIG_FILENAME);

        let err = init_config_file(&path).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_default_config_path_ends_with_filename() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("podwatch/config.toml"));
        }
    }
}
