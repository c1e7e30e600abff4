//! Tests for graceful shutdown handling

use super::shutdown::*;
use std::time::Duration;

/// Test that shutdown channel works correctly
#[tokio::test]
async fn test_shutdown_channel_initially_not_shutdown() {
    let (_controller, signal) = shutdown_channel();

    assert!(!signal.is_shutdown());
}

/// Test that shutdown can be triggered
#[tokio::test]
async fn test_shutdown_channel_triggers_shutdown() {
    let (controller, signal) = shutdown_channel();

    assert!(!signal.is_shutdown());

    controller.shutdown();

    assert!(signal.is_shutdown());
}

/// Test that wait completes when shutdown is triggered
#[tokio::test]
async fn test_shutdown_wait_completes_on_signal() {
    let (controller, mut signal) = shutdown_channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.shutdown();
    });

    let result = tokio::time::timeout(Duration::from_secs(1), signal.wait()).await;

    assert!(
        result.is_ok(),
        "wait() should complete when shutdown triggered"
    );
    assert!(signal.is_shutdown());
}

/// Dropping the controller also releases waiters
#[tokio::test]
async fn test_shutdown_wait_completes_when_controller_dropped() {
    let (controller, mut signal) = shutdown_channel();
    drop(controller);

    let result = tokio::time::timeout(Duration::from_secs(1), signal.wait()).await;
    assert!(result.is_ok(), "wait() should not hang without a sender");
}

/// Exit codes follow the conventional signal numbers
#[cfg(unix)]
#[test]
fn test_termination_signal_numbers() {
    assert_eq!(TerminationSignal::Interrupt.number(), 2);
    assert_eq!(TerminationSignal::Terminate.number(), 15);
    assert_eq!(TerminationSignal::Interrupt.name(), "SIGINT");
    assert_eq!(TerminationSignal::Terminate.name(), "SIGTERM");
}

/// Installing the listener succeeds inside a runtime
#[tokio::test]
async fn test_signal_listener_installs() {
    assert!(SignalListener::install().is_ok());
}
