//! Kubernetes pod watch events and their conversion into records
//!
//! Only the fields the dashboard shows are modelled; everything else in the
//! pod object is ignored by serde.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::source::SourceEvent;
use podwatch_core::prelude::*;
use podwatch_core::Record;

/// Shown when a pod carries no creation timestamp
const UNKNOWN_AGE: &str = "<unknown>";

/// Type field of a watch event (`--output-watch-events`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WatchEventType {
    Added,
    Modified,
    Deleted,
    Error,
    Bookmark,
}

/// One document of `kubectl get pods --watch --output-watch-events -o json`
#[derive(Debug, Clone, Deserialize)]
pub struct WatchEnvelope {
    #[serde(rename = "type")]
    pub kind: WatchEventType,
    #[serde(default)]
    pub object: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: PodStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deletion_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub container_statuses: Vec<ContainerStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerStatus {
    #[serde(default)]
    pub state: Option<ContainerState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerState {
    #[serde(default)]
    pub waiting: Option<StateReason>,
    #[serde(default)]
    pub terminated: Option<StateReason>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateReason {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of an ERROR watch event (a `metav1.Status`)
#[derive(Debug, Clone, Default, Deserialize)]
struct StatusObject {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl Pod {
    /// Status column, roughly as `kubectl get pods` prints it
    pub fn display_status(&self) -> String {
        if self.metadata.deletion_timestamp.is_some() {
            return "Terminating".to_string();
        }

        let container_reason = self.status.container_statuses.iter().find_map(|c| {
            let state = c.state.as_ref()?;
            state
                .waiting
                .as_ref()
                .and_then(|w| w.reason.clone())
                .or_else(|| state.terminated.as_ref().and_then(|t| t.reason.clone()))
        });

        container_reason
            .or_else(|| self.status.reason.clone())
            .or_else(|| self.status.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Record key: the name, optionally qualified by namespace
    pub fn key(&self, qualify_namespace: bool) -> String {
        match (&self.metadata.namespace, qualify_namespace) {
            (Some(ns), true) => format!("{}/{}", ns, self.metadata.name),
            _ => self.metadata.name.clone(),
        }
    }

    pub fn to_record(&self, now: DateTime<Utc>, qualify_namespace: bool) -> Record {
        let age = self
            .metadata
            .creation_timestamp
            .map(|created| format_age(now - created))
            .unwrap_or_else(|| UNKNOWN_AGE.to_string());

        Record::new(self.key(qualify_namespace), self.display_status(), age)
    }
}

/// Human-readable age in kubectl's coarse style ("45s", "5m", "3h", "12d", "2y")
pub fn format_age(age: Duration) -> String {
    let secs = age.num_seconds().max(0);
    if secs < 120 {
        format!("{}s", secs)
    } else if secs < 180 * 60 {
        format!("{}m", secs / 60)
    } else if secs < 48 * 3600 {
        format!("{}h", secs / 3600)
    } else if secs < 730 * 86400 {
        format!("{}d", secs / 86400)
    } else {
        format!("{}y", secs / (365 * 86400))
    }
}

/// Turns raw watch envelopes into [`SourceEvent`]s.
///
/// The API server only sends the new object on MODIFIED, so the tracker
/// remembers the last record per key to supply the old one.
#[derive(Debug, Default)]
pub struct PodTracker {
    last_seen: HashMap<String, Record>,
    qualify_namespace: bool,
}

impl PodTracker {
    pub fn new(qualify_namespace: bool) -> Self {
        Self {
            last_seen: HashMap::new(),
            qualify_namespace,
        }
    }

    /// Translate one decoded document. `None` for events with no dashboard effect.
    pub fn translate(&mut self, document: Value, now: DateTime<Utc>) -> Option<SourceEvent> {
        let envelope: WatchEnvelope = match serde_json::from_value(document) {
            Ok(env) => env,
            Err(e) => {
                warn!("Skipping malformed watch event: {}", e);
                return None;
            }
        };

        match envelope.kind {
            WatchEventType::Bookmark => None,
            WatchEventType::Error => {
                let status: StatusObject =
                    serde_json::from_value(envelope.object).unwrap_or_default();
                let message = status
                    .message
                    .or(status.reason)
                    .unwrap_or_else(|| "watch error".to_string());
                Some(SourceEvent::Error(message))
            }
            kind => {
                let pod: Pod = match serde_json::from_value(envelope.object) {
                    Ok(pod) => pod,
                    Err(e) => {
                        warn!("Skipping {:?} event with malformed pod: {}", kind, e);
                        return None;
                    }
                };
                if pod.metadata.name.is_empty() {
                    warn!("Skipping {:?} event for pod without a name", kind);
                    return None;
                }

                let record = pod.to_record(now, self.qualify_namespace);
                trace!("{:?} {}", kind, record);

                Some(match kind {
                    WatchEventType::Added => {
                        self.last_seen.insert(record.key.clone(), record.clone());
                        SourceEvent::Added(record)
                    }
                    WatchEventType::Modified => {
                        let old = self.last_seen.insert(record.key.clone(), record.clone());
                        SourceEvent::Modified { old, new: record }
                    }
                    _ => {
                        self.last_seen.remove(&record.key);
                        SourceEvent::Deleted(record)
                    }
                })
            }
        }
    }

    /// Number of pods currently known
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
