//! Child process supervision.
//!
//! Children are started in order with a pause after each. The supervisor
//! returns from [`Supervisor::wait`] when the launcher is interrupted or
//! any child exits, then [`Supervisor::shutdown`] stops whatever is left.

use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::error::LauncherError;
use crate::plan::ServiceSpec;

/// How long a child gets to exit after SIGTERM before it is killed.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Why [`Supervisor::wait`] returned.
#[derive(Debug)]
pub enum StopReason {
    Interrupted,
    ChildExited {
        name: &'static str,
        status: std::io::Result<ExitStatus>,
    },
}

struct Running {
    name: &'static str,
    child: Child,
}

pub struct Supervisor {
    env: Vec<(&'static str, String)>,
    children: Vec<Running>,
    grace: Duration,
}

impl Supervisor {
    pub fn new(env: Vec<(&'static str, String)>) -> Self {
        Self {
            env,
            children: Vec::new(),
            grace: DEFAULT_GRACE_PERIOD,
        }
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn running(&self) -> usize {
        self.children.len()
    }

    /// Start one service and sleep for its startup delay.
    pub async fn start(&mut self, spec: &ServiceSpec) -> Result<(), LauncherError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).kill_on_drop(true);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let child = cmd.spawn().map_err(|source| LauncherError::Spawn {
            name: spec.name.to_string(),
            program: spec.program.display().to_string(),
            source,
        })?;
        tracing::info!(service = spec.name, pid = child.id(), "Started");

        self.children.push(Running {
            name: spec.name,
            child,
        });
        tokio::time::sleep(spec.startup_delay).await;
        Ok(())
    }

    /// Start every service in order. On failure the ones already running are
    /// left to the caller's [`shutdown`](Self::shutdown).
    pub async fn start_all(&mut self, specs: &[ServiceSpec]) -> Result<(), LauncherError> {
        for spec in specs {
            self.start(spec).await?;
        }
        Ok(())
    }

    /// Block until Ctrl+C / SIGTERM or until any child exits.
    pub async fn wait(&mut self) -> StopReason {
        tokio::select! {
            _ = shutdown_signal() => StopReason::Interrupted,
            (name, status) = first_exit(&mut self.children) => {
                StopReason::ChildExited { name, status }
            }
        }
    }

    /// Terminate all children, escalating to SIGKILL after the grace period.
    pub async fn shutdown(&mut self) {
        for running in self.children.iter_mut().rev() {
            stop_child(running, self.grace).await;
        }
        self.children.clear();
    }
}

/// Resolves when the first child exits. Pending forever with no children.
async fn first_exit(children: &mut [Running]) -> (&'static str, std::io::Result<ExitStatus>) {
    if children.is_empty() {
        return std::future::pending().await;
    }
    loop {
        for running in children.iter_mut() {
            match running.child.try_wait() {
                Ok(Some(status)) => return (running.name, Ok(status)),
                Ok(None) => {}
                Err(e) => return (running.name, Err(e)),
            }
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

async fn stop_child(running: &mut Running, grace: Duration) {
    let name = running.name;
    if let Ok(Some(status)) = running.child.try_wait() {
        tracing::info!(service = name, %status, "Already exited");
        return;
    }

    request_terminate(&running.child);
    match tokio::time::timeout(grace, running.child.wait()).await {
        Ok(Ok(status)) => tracing::info!(service = name, %status, "Stopped"),
        Ok(Err(e)) => tracing::warn!(service = name, error = %e, "Failed to wait for child"),
        Err(_) => {
            tracing::warn!(service = name, "Did not exit in time, killing");
            if let Err(e) = running.child.kill().await {
                tracing::warn!(service = name, error = %e, "Failed to kill child");
            }
        }
    }
}

#[cfg(unix)]
fn request_terminate(child: &Child) {
    if let Some(pid) = child.id() {
        // Safety: `kill` only sends a signal to the given pid; the child has
        // not been reaped yet so the pid still refers to it.
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGTERM);
        }
    }
}

#[cfg(not(unix))]
fn request_terminate(_child: &Child) {}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::PathBuf;

    use assert_matches::assert_matches;

    use super::*;

    fn shell(name: &'static str, script: &str) -> ServiceSpec {
        ServiceSpec {
            name,
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), script.into()],
            startup_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn child_exit_stops_wait() {
        let mut sup = Supervisor::new(vec![]);
        sup.start(&shell("long", "sleep 30")).await.unwrap();
        sup.start(&shell("short", "exit 3")).await.unwrap();

        let reason = sup.wait().await;
        assert_matches!(reason, StopReason::ChildExited { name: "short", status: Ok(s) } if s.code() == Some(3));

        sup.shutdown().await;
        assert_eq!(sup.running(), 0);
    }

    #[tokio::test]
    async fn env_is_passed_to_children() {
        let mut sup = Supervisor::new(vec![("BACKEND_PORT", "8123".into())]);
        sup.start(&shell("check", "test \"$BACKEND_PORT\" = 8123"))
            .await
            .unwrap();

        let reason = sup.wait().await;
        assert_matches!(reason, StopReason::ChildExited { status: Ok(s), .. } if s.success());
    }

    #[tokio::test]
    async fn shutdown_kills_children_ignoring_sigterm() {
        let mut sup = Supervisor::new(vec![]).with_grace_period(Duration::from_millis(300));
        sup.start(&shell("stubborn", "trap '' TERM; sleep 30"))
            .await
            .unwrap();

        let started = std::time::Instant::now();
        sup.shutdown().await;
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(sup.running(), 0);
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let mut sup = Supervisor::new(vec![]);
        let spec = ServiceSpec {
            name: "ghost",
            program: PathBuf::from("/nonexistent/skinai-ghost"),
            args: vec![],
            startup_delay: Duration::ZERO,
        };
        let err = sup.start(&spec).await.unwrap_err();
        assert_matches!(err, LauncherError::Spawn { ref name, .. } if name == "ghost");
    }
}
