//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use podwatch_source::KubectlOptions;

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub behavior: BehaviorSettings,

    #[serde(default)]
    pub feed: FeedSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Behavior settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BehaviorSettings {
    /// Start watching as soon as the dashboard opens
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

/// Watch feed settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedSettings {
    /// kubectl binary name or path
    #[serde(default = "default_kubectl")]
    pub kubectl: String,

    /// Namespace to watch (empty = kubectl's current namespace)
    #[serde(default)]
    pub namespace: String,

    /// kubeconfig context (empty = current context)
    #[serde(default)]
    pub context: String,

    #[serde(default)]
    pub all_namespaces: bool,

    /// How long quit waits for the feed to stop before abandoning it
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            kubectl: default_kubectl(),
            namespace: String::new(),
            context: String::new(),
            all_namespaces: false,
            stop_timeout_ms: default_stop_timeout_ms(),
        }
    }
}

impl FeedSettings {
    /// kubectl invocation options; empty strings mean "not set"
    pub fn kubectl_options(&self) -> KubectlOptions {
        KubectlOptions {
            kubectl: self.kubectl.clone(),
            namespace: non_empty(&self.namespace),
            all_namespaces: self.all_namespaces,
            context: non_empty(&self.context),
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_status_bar: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

fn default_stop_timeout_ms() -> u64 {
    2000
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.behavior.auto_start);
        assert_eq!(settings.feed.kubectl, "kubectl");
        assert_eq!(settings.feed.stop_timeout(), Duration::from_secs(2));
        assert!(settings.ui.show_status_bar);
    }

    #[test]
    fn test_empty_strings_are_unset_in_kubectl_options() {
        let opts = FeedSettings::default().kubectl_options();
        assert_eq!(opts, KubectlOptions::default());
    }

    #[test]
    fn test_kubectl_options_carry_values() {
        let feed = FeedSettings {
            namespace: "kube-system".to_string(),
            context: " staging ".to_string(),
            ..Default::default()
        };
        let opts = feed.kubectl_options();
        assert_eq!(opts.namespace.as_deref(), Some("kube-system"));
        assert_eq!(opts.context.as_deref(), Some("staging"));
    }
}
