//! Spawns evaluation workers and enforces the time limit

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::Semaphore;

use super::{WorkerReply, WORKER_SUBCOMMAND};
use crate::application::errors::SandboxError;
use crate::domain::calculator::{ErrorKind, EvaluationOutcome, SanitizedExpression};

/// How to start a worker process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The running binary, re-invoked as a worker
    pub fn current_exe() -> Result<Self, SandboxError> {
        let program = std::env::current_exe().map_err(SandboxError::Spawn)?;
        Ok(Self::new(program, &[WORKER_SUBCOMMAND]))
    }
}

/// Runs each evaluation in its own short-lived worker process.
///
/// A worker that outlives `limit` is killed and reaped before the
/// timeout is reported, so nothing keeps running in the background.
/// At most `max_workers` evaluations are in flight at once; further
/// requests wait for a free slot.
pub struct Supervisor {
    command: WorkerCommand,
    limit: Duration,
    slots: Semaphore,
}

impl Supervisor {
    pub fn new(command: WorkerCommand, limit: Duration, max_workers: usize) -> Self {
        Self {
            command,
            limit,
            slots: Semaphore::new(max_workers.max(1)),
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Start a worker process without sending it anything yet
    pub fn spawn(&self) -> Result<Worker, SandboxError> {
        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(SandboxError::Spawn)?;

        tracing::debug!(pid = ?child.id(), "Spawned evaluation worker");
        Ok(Worker { child })
    }

    /// Evaluate `expr` in a fresh worker, bounded by the time limit
    pub async fn evaluate(&self, expr: &SanitizedExpression) -> EvaluationOutcome {
        let _slot = match self.slots.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::error!("Worker slots closed: {}", e);
                return EvaluationOutcome::Failure(ErrorKind::Internal("calculator unavailable".into()));
            }
        };

        match self.spawn() {
            Ok(worker) => worker.run(expr.as_str(), self.limit).await,
            Err(e) => {
                tracing::error!("Failed to start evaluation worker: {}", e);
                EvaluationOutcome::Failure(ErrorKind::Internal("calculator unavailable".into()))
            }
        }
    }
}

/// A single worker process, good for exactly one evaluation
pub struct Worker {
    child: Child,
}

impl Worker {
    /// OS process id, `None` once the process has been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Send `expr`, wait for the reply and tear the process down
    pub async fn run(mut self, expr: &str, limit: Duration) -> EvaluationOutcome {
        let pid = self.child.id();
        let result = tokio::time::timeout(limit, self.exchange(expr)).await;

        match result {
            Ok(Ok(reply)) => reply.into(),
            Ok(Err(e)) => {
                tracing::warn!(?pid, "Evaluation worker failed: {}", e);
                self.reap().await;
                EvaluationOutcome::Failure(ErrorKind::Internal("calculation failed".into()))
            }
            Err(_) => {
                tracing::warn!(?pid, "Evaluation of {} exceeded {:?}, killing worker", expr, limit);
                self.reap().await;
                EvaluationOutcome::Failure(ErrorKind::Timeout)
            }
        }
    }

    async fn exchange(&mut self, expr: &str) -> Result<WorkerReply, SandboxError> {
        if let Some(mut stdin) = self.child.stdin.take() {
            // A worker may exit before reading its input; its reply or
            // exit status tells the rest.
            if let Err(e) = stdin.write_all(expr.as_bytes()).await {
                tracing::debug!("Could not write to worker stdin: {}", e);
            }
        }

        let mut stdout = self
            .child
            .stdout
            .take()
            .ok_or_else(|| SandboxError::Io(std::io::Error::other("worker stdout not captured")))?;
        let mut output = String::new();
        stdout.read_to_string(&mut output).await?;

        let status = self.child.wait().await?;
        if !status.success() {
            return Err(SandboxError::Exited(status));
        }

        Ok(serde_json::from_str(output.trim())?)
    }

    /// Kill the process if it is still running and wait for it to exit
    async fn reap(&mut self) {
        if let Ok(Some(_)) = self.child.try_wait() {
            return;
        }
        if let Err(e) = self.child.kill().await {
            tracing::warn!("Failed to kill evaluation worker: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_spawn_failure_is_internal_error() {
        let supervisor = Supervisor::new(
            WorkerCommand::new("/nonexistent/harmonbot-worker", &[]),
            Duration::from_secs(1),
            1,
        );
        let outcome = supervisor.evaluate(&crate::domain::calculator::sanitize("2+2")).await;
        assert_eq!(
            outcome,
            EvaluationOutcome::Failure(ErrorKind::Internal("calculator unavailable".into()))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_worker_is_killed() {
        let supervisor = Supervisor::new(WorkerCommand::new("sleep", &["30"]), Duration::from_millis(200), 1);
        let worker = supervisor.spawn().unwrap();
        #[cfg(target_os = "linux")]
        let pid = worker.id().expect("worker running");

        let started = Instant::now();
        let outcome = worker.run("2+2", supervisor.limit()).await;

        assert_eq!(outcome, EvaluationOutcome::Failure(ErrorKind::Timeout));
        assert!(started.elapsed() < Duration::from_secs(5));
        #[cfg(target_os = "linux")]
        assert!(!std::path::Path::new(&format!("/proc/{}", pid)).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_garbage_reply_is_internal_error() {
        let supervisor = Supervisor::new(WorkerCommand::new("echo", &["not json"]), Duration::from_secs(5), 1);
        let outcome = supervisor.evaluate(&crate::domain::calculator::sanitize("1")).await;
        assert_eq!(
            outcome,
            EvaluationOutcome::Failure(ErrorKind::Internal("calculation failed".into()))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_exit_is_internal_error() {
        let supervisor = Supervisor::new(WorkerCommand::new("false", &[]), Duration::from_secs(5), 1);
        let outcome = supervisor.evaluate(&crate::domain::calculator::sanitize("1")).await;
        assert!(matches!(outcome, EvaluationOutcome::Failure(ErrorKind::Internal(_))));
    }
}
