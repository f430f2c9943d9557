//! Scripted watch source: replays a fixed list of events
//!
//! Backs `--demo` mode and gives tests a deterministic source.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::source::{SourceEvent, Subscription, WatchSource};
use podwatch_core::prelude::*;
use podwatch_core::Record;

/// One step of a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Emit(SourceEvent),
    Pause(Duration),
}

/// What happens once the last step has run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptEnd {
    /// Close the stream (the feed sees it as terminated)
    Close,
    /// Keep the stream open until unsubscribed
    #[default]
    HoldOpen,
    /// Start over from the first step
    Repeat,
}

/// A [`WatchSource`] that plays back `steps` on every subscription
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    name: String,
    steps: Vec<ScriptStep>,
    end: ScriptEnd,
}

impl ScriptedSource {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            name: "scripted".to_string(),
            steps,
            end: ScriptEnd::default(),
        }
    }

    /// Emit each event in order with no pauses
    pub fn from_events(events: impl IntoIterator<Item = SourceEvent>) -> Self {
        Self::new(events.into_iter().map(ScriptStep::Emit).collect())
    }

    pub fn with_end(mut self, end: ScriptEnd) -> Self {
        self.end = end;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// A small, endlessly churning namespace for trying the dashboard out
    pub fn demo() -> Self {
        let tick = Duration::from_millis(700);
        let pod = |name: &str, status: &str, age: &str| Record::new(name, status, age);

        let steps = vec![
            ScriptStep::Emit(SourceEvent::Added(pod("api-7d9f", "Running", "3d"))),
            ScriptStep::Emit(SourceEvent::Added(pod("web-5c2a", "Running", "2h"))),
            ScriptStep::Emit(SourceEvent::Added(pod("redis-0", "Running", "12d"))),
            ScriptStep::Pause(tick),
            ScriptStep::Emit(SourceEvent::Added(pod("worker-x1", "Pending", "0s"))),
            ScriptStep::Pause(tick),
            ScriptStep::Emit(SourceEvent::Modified {
                old: Some(pod("worker-x1", "Pending", "0s")),
                new: pod("worker-x1", "ContainerCreating", "1s"),
            }),
            ScriptStep::Pause(tick),
            ScriptStep::Emit(SourceEvent::Modified {
                old: Some(pod("worker-x1", "ContainerCreating", "1s")),
                new: pod("worker-x1", "Running", "3s"),
            }),
            ScriptStep::Pause(tick * 2),
            ScriptStep::Emit(SourceEvent::Modified {
                old: Some(pod("web-5c2a", "Running", "2h")),
                new: pod("web-5c2a", "Terminating", "2h"),
            }),
            ScriptStep::Pause(tick),
            ScriptStep::Emit(SourceEvent::Deleted(pod("web-5c2a", "Terminating", "2h"))),
            ScriptStep::Emit(SourceEvent::Added(pod("web-9e1b", "Pending", "0s"))),
            ScriptStep::Pause(tick),
            ScriptStep::Emit(SourceEvent::Modified {
                old: Some(pod("web-9e1b", "Pending", "0s")),
                new: pod("web-9e1b", "Running", "2s"),
            }),
            ScriptStep::Pause(tick * 2),
            ScriptStep::Emit(SourceEvent::Deleted(pod("worker-x1", "Completed", "8s"))),
            ScriptStep::Emit(SourceEvent::Deleted(pod("web-9e1b", "Running", "5s"))),
            ScriptStep::Emit(SourceEvent::Added(pod("web-5c2a", "Running", "2h"))),
            ScriptStep::Pause(tick * 2),
        ];

        Self::new(steps).with_name("demo").with_end(ScriptEnd::Repeat)
    }
}

impl WatchSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self) -> Result<Subscription> {
        let (subscription, event_tx, cancel_rx) = Subscription::channel();
        tokio::spawn(play(self.steps.clone(), self.end, event_tx, cancel_rx));
        Ok(subscription)
    }
}

async fn play(
    steps: Vec<ScriptStep>,
    end: ScriptEnd,
    event_tx: mpsc::Sender<SourceEvent>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    loop {
        for step in &steps {
            match step {
                ScriptStep::Emit(event) => {
                    tokio::select! {
                        _ = &mut cancel_rx => return,
                        sent = event_tx.send(event.clone()) => {
                            if sent.is_err() {
                                return;
                            }
                        }
                    }
                }
                ScriptStep::Pause(duration) => {
                    tokio::select! {
                        _ = &mut cancel_rx => return,
                        _ = tokio::time::sleep(*duration) => {}
                    }
                }
            }
        }

        match end {
            ScriptEnd::Close => {
                debug!("Script finished, closing stream");
                return;
            }
            ScriptEnd::HoldOpen => {
                let _ = cancel_rx.await;
                return;
            }
            // An empty script would spin forever
            ScriptEnd::Repeat if steps.is_empty() => {
                let _ = cancel_rx.await;
                return;
            }
            ScriptEnd::Repeat => continue,
        }
    }
}
