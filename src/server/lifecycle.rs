//! Server start/stop and the termination state machine
//!
//! ```text
//! Running --SIGINT/SIGTERM--> ShuttingDown --shutdown()--> Terminated
//! ```
//!
//! Shutdown is best-effort: a failure to stop the listener is logged and the
//! process still exits with the received signal number.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::server::shutdown::{shutdown_channel, ShutdownController, TerminationSignal};

/// Time allowed for in-flight requests before the serving task is aborted
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StartError {
    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read bound address: {0}")]
    LocalAddr(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("Server did not stop within {0:?}")]
    Timeout(Duration),

    #[error("Server task failed: {0}")]
    Join(#[from] JoinError),

    #[error("Server exited with error: {0}")]
    Serve(#[from] io::Error),
}

/// The running HTTP listener
pub struct ServerHandle {
    local_addr: SocketAddr,
    controller: ShutdownController,
    /// Taken once the serving task has been joined or aborted
    task: Option<JoinHandle<io::Result<()>>>,
}

impl ServerHandle {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Bind `0.0.0.0:port` and serve `app` on a spawned task
///
/// Returns once the listener is bound; requests are served on the runtime's
/// worker threads while the caller goes on to wait for signals.
pub async fn start(app: Router, port: u16) -> Result<ServerHandle, StartError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartError::Bind { port, source })?;
    let local_addr = listener.local_addr().map_err(StartError::LocalAddr)?;
    // Log after successful bind - server is actually listening
    info!(address = %local_addr, "HTTP server listening");

    let (controller, mut signal) = shutdown_channel();
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { signal.wait().await })
            .await
    });

    Ok(ServerHandle {
        local_addr,
        controller,
        task: Some(task),
    })
}

/// Stop accepting connections and wait up to `grace` for the server to exit
///
/// On timeout the serving task is aborted so the port is released anyway.
/// Calling this on an already stopped handle is a no-op.
pub async fn shutdown(handle: &mut ServerHandle, grace: Duration) -> Result<(), ShutdownError> {
    let Some(mut task) = handle.task.take() else {
        debug!(address = %handle.local_addr, "HTTP server already stopped");
        return Ok(());
    };
    handle.controller.shutdown();

    match tokio::time::timeout(grace, &mut task).await {
        Ok(joined) => {
            joined??;
            info!(address = %handle.local_addr, "HTTP server stopped");
            Ok(())
        }
        Err(_) => {
            task.abort();
            Err(ShutdownError::Timeout(grace))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    ShuttingDown,
    Terminated,
}

/// Drives the server from running to terminated on a signal
pub struct Lifecycle<'a> {
    state: LifecycleState,
    handle: &'a mut ServerHandle,
    grace: Duration,
}

impl<'a> Lifecycle<'a> {
    pub fn new(handle: &'a mut ServerHandle) -> Self {
        Self::with_grace_period(handle, SHUTDOWN_GRACE_PERIOD)
    }

    pub fn with_grace_period(handle: &'a mut ServerHandle, grace: Duration) -> Self {
        Self {
            state: LifecycleState::Running,
            handle,
            grace,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Shut the server down and return the exit code for `signal`
    ///
    /// Shutdown failures are logged as warnings and never change the result.
    pub async fn terminate(&mut self, signal: TerminationSignal) -> i32 {
        if self.state != LifecycleState::Running {
            debug!(state = ?self.state, "Termination already in progress");
            return signal.number();
        }

        self.transition(LifecycleState::ShuttingDown);
        if let Err(e) = shutdown(self.handle, self.grace).await {
            warn!(error = %e, "Failed to shutdown the server");
        }
        self.transition(LifecycleState::Terminated);

        signal.number()
    }

    fn transition(&mut self, next: LifecycleState) {
        info!(from = ?self.state, to = ?next, "Lifecycle transition");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;
