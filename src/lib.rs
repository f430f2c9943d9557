//! podwatch - A live terminal dashboard for Kubernetes pod lifecycle events
//!
//! The binary parses flags and hands them to [`run`]. Everything else lives in
//! the workspace crates:
//! - `podwatch-core`: records, lifecycle events, errors, logging
//! - `podwatch-source`: the watch source trait, kubectl and scripted sources
//! - `podwatch-app`: reconciler model, event bridge, engine, config
//! - `podwatch-tui`: rendering and the controller loop

use std::path::PathBuf;
use std::sync::Arc;

use podwatch_app::config::{self, Settings};
use podwatch_core::prelude::*;
use podwatch_source::{KubectlSource, ScriptedSource, WatchSource};

/// Command-line values that override the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub namespace: Option<String>,
    pub all_namespaces: bool,
    pub context: Option<String>,
    pub kubectl: Option<String>,
    /// Use the scripted demo source instead of kubectl
    pub demo: bool,
    /// Start with the feed idle
    pub no_watch: bool,
    /// Settings file to load instead of the default location
    pub config: Option<PathBuf>,
}

impl Overrides {
    /// Apply the flags that were given on top of `settings`
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ns) = &self.namespace {
            settings.feed.namespace = ns.clone();
        }
        if self.all_namespaces {
            settings.feed.all_namespaces = true;
        }
        if let Some(ctx) = &self.context {
            settings.feed.context = ctx.clone();
        }
        if let Some(kubectl) = &self.kubectl {
            settings.feed.kubectl = kubectl.clone();
        }
        if self.no_watch {
            settings.behavior.auto_start = false;
        }
    }

    /// The settings file this run reads
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(config::default_config_path)
    }
}

/// Load settings and apply command-line overrides
pub fn resolve_settings(overrides: &Overrides) -> Settings {
    let mut settings = match overrides.config_path() {
        Some(path) => config::load_settings(&path),
        None => {
            warn!("No config directory on this platform, using defaults");
            Settings::default()
        }
    };
    overrides.apply(&mut settings);
    settings
}

/// Pick the watch source for this run
pub fn build_source(settings: &Settings, demo: bool) -> Result<Arc<dyn WatchSource>> {
    if demo {
        info!("Using scripted demo source");
        return Ok(Arc::new(ScriptedSource::demo()));
    }
    let source = KubectlSource::new(settings.feed.kubectl_options())?;
    Ok(Arc::new(source))
}

/// Write the default settings file and return its path
pub fn init_config(overrides: &Overrides) -> Result<PathBuf> {
    let path = overrides
        .config_path()
        .ok_or_else(|| Error::config("no config directory on this platform"))?;
    config::init_config_file(&path)?;
    Ok(path)
}

/// Main application entry point
pub async fn run(overrides: Overrides) -> Result<()> {
    // Initialize logging (to file, since the TUI owns stdout)
    podwatch_core::logging::init()?;

    let settings = resolve_settings(&overrides);
    debug!("Settings: {:?}", settings);

    let source = build_source(&settings, overrides.demo)?;

    let result = podwatch_tui::run(source, settings).await;

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("podwatch exiting");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let mut settings = Settings::default();
        settings.feed.namespace = "from-file".to_string();

        let overrides = Overrides {
            namespace: Some("from-flag".to_string()),
            context: Some("prod".to_string()),
            kubectl: Some("/opt/bin/kubectl".to_string()),
            no_watch: true,
            ..Default::default()
        };
        overrides.apply(&mut settings);

        assert_eq!(settings.feed.namespace, "from-flag");
        assert_eq!(settings.feed.context, "prod");
        assert_eq!(settings.feed.kubectl, "/opt/bin/kubectl");
        assert!(!settings.behavior.auto_start);
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let mut settings = Settings::default();
        settings.feed.namespace = "from-file".to_string();
        settings.feed.all_namespaces = true;

        Overrides::default().apply(&mut settings);

        assert_eq!(settings.feed.namespace, "from-file");
        assert!(settings.feed.all_namespaces);
        assert!(settings.behavior.auto_start);
    }

    #[test]
    fn test_explicit_config_path_is_loaded() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("podwatch.toml");
        std::fs::write(&path, "[ui]\nshow_status_bar = false\n").unwrap();

        let settings = resolve_settings(&Overrides {
            config: Some(path),
            ..Default::default()
        });

        assert!(!settings.ui.show_status_bar);
    }

    #[test]
    fn test_demo_source_needs_no_kubectl() {
        let mut settings = Settings::default();
        settings.feed.kubectl = "definitely-not-a-real-kubectl-binary".to_string();

        let source = build_source(&settings, true).unwrap();
        assert_eq!(source.name(), "demo");

        assert!(matches!(
            build_source(&settings, false),
            Err(Error::KubectlNotFound)
        ));
    }
}
