//! Graceful shutdown handling
//!
//! Handles SIGTERM and SIGINT signals for clean shutdown:
//! - Stops accepting new connections
//! - Lets in-flight requests finish on a best-effort basis
//! - Releases the listening port

use tokio::sync::watch;
use tracing::info;

/// Shutdown signal receiver
///
/// Handed to the serving task, which stops once it fires.
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for shutdown signal
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                // Sender dropped, treat as shutdown
                break;
            }
        }
    }

    /// Check if shutdown was signaled (non-blocking)
    #[cfg(test)]
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Controller for triggering shutdown
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

impl ShutdownController {
    /// Trigger shutdown
    pub fn shutdown(&self) {
        let _ = self.sender.send(true);
        info!("Shutdown signal sent");
    }
}

/// Create a new shutdown signal pair
///
/// Returns (controller, signal) where:
/// - controller: Used to trigger shutdown
/// - signal: Passed to the component that needs to listen
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownController { sender }, ShutdownSignal { receiver })
}

/// Termination signal that ends the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl TerminationSignal {
    /// Signal name, as logged
    pub fn name(&self) -> &'static str {
        match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
        }
    }

    /// OS signal number, used as the process exit code
    #[cfg(unix)]
    pub fn number(&self) -> i32 {
        use tokio::signal::unix::SignalKind;

        match self {
            TerminationSignal::Interrupt => SignalKind::interrupt().as_raw_value(),
            TerminationSignal::Terminate => SignalKind::terminate().as_raw_value(),
        }
    }

    #[cfg(not(unix))]
    pub fn number(&self) -> i32 {
        match self {
            TerminationSignal::Interrupt => 2,
            TerminationSignal::Terminate => 15,
        }
    }
}

/// Registered SIGTERM/SIGINT handlers
///
/// Registration replaces the default "terminate immediately" disposition,
/// so it happens before startup and stays in place until exit.
#[cfg(unix)]
pub struct SignalListener {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    /// Register the handlers; fails only on OS resource exhaustion
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for SIGTERM or SIGINT
    pub async fn recv(&mut self) -> TerminationSignal {
        let received = tokio::select! {
            _ = self.sigterm.recv() => TerminationSignal::Terminate,
            _ = self.sigint.recv() => TerminationSignal::Interrupt,
        };
        info!(signal = received.name(), "Received termination signal");
        received
    }
}

/// Ctrl+C handler (non-Unix)
#[cfg(not(unix))]
pub struct SignalListener {
    _private: (),
}

#[cfg(not(unix))]
impl SignalListener {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self { _private: () })
    }

    pub async fn recv(&mut self) -> TerminationSignal {
        use tracing::error;

        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to wait for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!(signal = "CTRL_C", "Received termination signal");
        TerminationSignal::Interrupt
    }
}
