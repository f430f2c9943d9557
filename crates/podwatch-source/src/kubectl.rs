//! `kubectl get pods --watch` backed watch source
//!
//! Each subscription spawns its own kubectl child. The reader task owns the
//! child and kills it when the subscription is cancelled or dropped.

use std::path::PathBuf;
use std::process::Stdio;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};

use crate::decoder::JsonStreamDecoder;
use crate::pod::PodTracker;
use crate::source::{SourceEvent, Subscription, WatchSource};
use podwatch_core::prelude::*;

/// Size of a single stdout read
const READ_CHUNK: usize = 8 * 1024;

/// Number of trailing stderr lines kept for error reporting
const STDERR_TAIL: usize = 5;

/// What to watch and how to reach the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubectlOptions {
    /// Binary name or path
    pub kubectl: String,
    /// Namespace to watch; `None` uses kubectl's current namespace
    pub namespace: Option<String>,
    pub all_namespaces: bool,
    pub context: Option<String>,
}

impl Default for KubectlOptions {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            namespace: None,
            all_namespaces: false,
            context: None,
        }
    }
}

impl KubectlOptions {
    /// Arguments for `kubectl`, excluding the binary itself
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "get",
            "pods",
            "--watch",
            "--output-watch-events",
            "-o",
            "json",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        if self.all_namespaces {
            args.push("--all-namespaces".to_string());
        } else if let Some(ns) = &self.namespace {
            args.push("--namespace".to_string());
            args.push(ns.clone());
        }

        if let Some(ctx) = &self.context {
            args.push("--context".to_string());
            args.push(ctx.clone());
        }

        args
    }
}

/// Watch source backed by a `kubectl` child process
#[derive(Debug, Clone)]
pub struct KubectlSource {
    binary: PathBuf,
    options: KubectlOptions,
}

impl KubectlSource {
    /// Resolve the kubectl binary. Fails with [`Error::KubectlNotFound`] if it
    /// is not on PATH (or the configured path does not exist).
    pub fn new(options: KubectlOptions) -> Result<Self> {
        let binary = which::which(&options.kubectl).map_err(|e| {
            debug!("kubectl lookup for '{}' failed: {}", options.kubectl, e);
            Error::KubectlNotFound
        })?;
        info!("Using kubectl at {}", binary.display());
        Ok(Self { binary, options })
    }

    pub fn options(&self) -> &KubectlOptions {
        &self.options
    }

    fn spawn_child(&self) -> Result<Child> {
        let args = self.options.args();
        info!("Spawning: {} {}", self.binary.display(), args.join(" "));

        Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::KubectlNotFound
                } else {
                    Error::source_spawn(e.to_string())
                }
            })
    }
}

impl WatchSource for KubectlSource {
    fn name(&self) -> &str {
        "kubectl"
    }

    fn subscribe(&self) -> Result<Subscription> {
        let mut child = self.spawn_child()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::source_spawn("kubectl stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::source_spawn("kubectl stderr was not captured"))?;

        let (subscription, event_tx, cancel_rx) = Subscription::channel();
        let tracker = PodTracker::new(self.options.all_namespaces);

        tokio::spawn(run_watch(child, stdout, stderr, tracker, event_tx, cancel_rx));
        Ok(subscription)
    }
}

/// Why the read loop ended
enum ReadOutcome {
    Cancelled,
    Eof,
    ReadFailed(std::io::Error),
    DecodeFailed(String),
    ReceiverGone,
}

/// Background task: owns the child, decodes stdout, emits events.
async fn run_watch<R: AsyncRead + Unpin>(
    mut child: Child,
    mut stdout: R,
    stderr: tokio::process::ChildStderr,
    mut tracker: PodTracker,
    event_tx: mpsc::Sender<SourceEvent>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let stderr_task = tokio::spawn(stderr_tail(stderr));
    let mut decoder = JsonStreamDecoder::new();
    let mut chunk = vec![0u8; READ_CHUNK];

    let outcome = 'read: loop {
        let read = tokio::select! {
            // Fires on unsubscribe, and on drop of the subscription
            _ = &mut cancel_rx => break 'read ReadOutcome::Cancelled,
            read = stdout.read(&mut chunk) => read,
        };

        let n = match read {
            Ok(0) => break 'read ReadOutcome::Eof,
            Ok(n) => n,
            Err(e) => break 'read ReadOutcome::ReadFailed(e),
        };

        for document in decoder.push(&chunk[..n]) {
            let document = match document {
                Ok(doc) => doc,
                Err(e) => break 'read ReadOutcome::DecodeFailed(e.to_string()),
            };
            let Some(event) = tracker.translate(document, Utc::now()) else {
                continue;
            };
            let is_error = matches!(event, SourceEvent::Error(_));
            if event_tx.send(event).await.is_err() {
                break 'read ReadOutcome::ReceiverGone;
            }
            if is_error {
                // The API server closes the watch after an ERROR event
                break 'read ReadOutcome::Cancelled;
            }
        }
    };

    match outcome {
        ReadOutcome::Cancelled | ReadOutcome::ReceiverGone => {
            debug!("kubectl watch cancelled, killing child");
            if let Err(e) = child.kill().await {
                warn!("Failed to kill kubectl: {}", e);
            }
            stderr_task.abort();
        }
        ReadOutcome::Eof => {
            let status = child.wait().await;
            let tail = stderr_task.await.unwrap_or_default();
            match status {
                Ok(status) if status.success() => {
                    info!("kubectl watch stream ended");
                }
                Ok(status) => {
                    let reason = if tail.is_empty() {
                        format!("kubectl exited with {}", status)
                    } else {
                        format!("kubectl exited with {}: {}", status, tail)
                    };
                    warn!("{}", reason);
                    let _ = event_tx.send(SourceEvent::Error(reason)).await;
                }
                Err(e) => {
                    error!("Error waiting for kubectl: {}", e);
                    let _ = event_tx.send(SourceEvent::Error(e.to_string())).await;
                }
            }
        }
        ReadOutcome::ReadFailed(e) => {
            error!("Failed reading kubectl output: {}", e);
            let _ = child.kill().await;
            stderr_task.abort();
            let _ = event_tx
                .send(SourceEvent::Error(format!("read failed: {}", e)))
                .await;
        }
        ReadOutcome::DecodeFailed(e) => {
            error!("Malformed kubectl output: {}", e);
            let _ = child.kill().await;
            stderr_task.abort();
            let _ = event_tx
                .send(SourceEvent::Error(format!("malformed output: {}", e)))
                .await;
        }
    }
}

/// Collect the last few stderr lines, joined with "; "
async fn stderr_tail(stderr: tokio::process::ChildStderr) -> String {
    let mut reader = BufReader::new(stderr).lines();
    let mut tail: Vec<String> = Vec::with_capacity(STDERR_TAIL);

    while let Ok(Some(line)) = reader.next_line().await {
        trace!("kubectl stderr: {}", line);
        if line.trim().is_empty() {
            continue;
        }
        if tail.len() == STDERR_TAIL {
            tail.remove(0);
        }
        tail.push(line);
    }

    tail.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = KubectlOptions::default().args();
        assert_eq!(
            args,
            vec!["get", "pods", "--watch", "--output-watch-events", "-o", "json"]
        );
    }

    #[test]
    fn test_namespace_and_context_args() {
        let opts = KubectlOptions {
            namespace: Some("kube-system".to_string()),
            context: Some("prod".to_string()),
            ..Default::default()
        };
        let args = opts.args();
        assert!(args.windows(2).any(|w| w == ["--namespace", "kube-system"]));
        assert!(args.windows(2).any(|w| w == ["--context", "prod"]));
    }

    #[test]
    fn test_all_namespaces_overrides_namespace() {
        let opts = KubectlOptions {
            namespace: Some("ignored".to_string()),
            all_namespaces: true,
            ..Default::default()
        };
        let args = opts.args();
        assert!(args.contains(&"--all-namespaces".to_string()));
        assert!(!args.contains(&"--namespace".to_string()));
    }

    #[test]
    fn test_missing_binary_is_kubectl_not_found() {
        let opts = KubectlOptions {
            kubectl: "definitely-not-a-real-kubectl-binary".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            KubectlSource::new(opts),
            Err(Error::KubectlNotFound)
        ));
    }
}
