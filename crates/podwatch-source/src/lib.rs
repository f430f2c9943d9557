//! podwatch-source - Pod watch sources for podwatch
//!
//! This crate owns everything on the far side of the feed: the
//! [`WatchSource`] trait the app subscribes through, the kubectl-backed
//! implementation, and a scripted source used for demos and tests.
//!
//! ## Public API
//!
//! - [`WatchSource`], [`Subscription`], [`SourceEvent`] - the subscription contract
//! - [`KubectlSource`], [`KubectlOptions`] - `kubectl get pods --watch` backed source
//! - [`JsonStreamDecoder`] - incremental decoder for concatenated JSON documents
//! - [`pod`] - Kubernetes pod JSON model and pod → [`Record`](podwatch_core::Record) conversion
//! - [`ScriptedSource`], [`ScriptStep`], [`ScriptEnd`] - replayable event script

pub mod decoder;
pub mod kubectl;
pub mod pod;
pub mod scripted;
pub mod source;

pub use decoder::JsonStreamDecoder;
pub use kubectl::{KubectlOptions, KubectlSource};
pub use pod::{format_age, PodTracker, WatchEnvelope, WatchEventType};
pub use scripted::{ScriptEnd, ScriptStep, ScriptedSource};
pub use source::{SourceEvent, Subscription, WatchSource, SUBSCRIPTION_CAPACITY};
