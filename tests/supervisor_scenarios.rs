// End-to-end scenarios against the public API, using an in-memory transport.

mod common;

use std::time::{Duration, Instant};

use btspool::{ConnectError, ConnectionState, ConnectionSupervisor, WriteError};
use common::{DialOutcome, RecordingConnector};

const PRINTER: &str = "AA:BB:CC:DD:EE:FF";

fn supervisor_with(outcome: DialOutcome) -> (ConnectionSupervisor, RecordingConnector) {
    let connector = RecordingConnector::new(outcome);
    let supervisor =
        ConnectionSupervisor::new(Box::new(connector.clone()), Duration::from_millis(200));
    (supervisor, connector)
}

#[tokio::test]
async fn test_receipt_round_trip() {
    let (supervisor, connector) = supervisor_with(DialOutcome::Accept);

    supervisor.connect(PRINTER).await.unwrap();
    assert_eq!(supervisor.state().await, ConnectionState::Connected);

    let handle = supervisor.print("Hello").await.unwrap();
    handle.await.unwrap().unwrap();

    supervisor.disconnect().await;
    assert_eq!(supervisor.state().await, ConnectionState::Disconnected);

    let err = supervisor.print("World").await.unwrap_err();
    assert!(matches!(err, WriteError::NotConnected));

    assert_eq!(connector.delivered(), vec![b"Hello".to_vec()]);
    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_print_while_disconnected_never_reaches_transport() {
    let (supervisor, connector) = supervisor_with(DialOutcome::Accept);
    let err = supervisor.print("orphan").await.unwrap_err();
    assert!(matches!(err, WriteError::NotConnected));
    assert!(connector.delivered().is_empty());
    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_printer_times_out() {
    let (supervisor, _) = supervisor_with(DialOutcome::Hang);
    let started = Instant::now();
    let err = supervisor.connect(PRINTER).await.unwrap_err();
    assert!(matches!(err, ConnectError::RefusedOrTimeout));
    // Bounded by the configured timeout, not by the peer.
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(supervisor.state().await, ConnectionState::Failed);
    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_refused_connect_settles_to_failed() {
    let (supervisor, _) = supervisor_with(DialOutcome::Refuse);
    let err = supervisor.connect(PRINTER).await.unwrap_err();
    assert!(matches!(err, ConnectError::RefusedOrTimeout));
    let state = supervisor.state().await;
    assert!(
        state == ConnectionState::Failed || state == ConnectionState::Disconnected,
        "connect failure left state {:?}",
        state
    );
    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_disconnect_twice_is_harmless() {
    let (supervisor, _) = supervisor_with(DialOutcome::Accept);
    supervisor.connect(PRINTER).await.unwrap();
    supervisor.disconnect().await;
    assert_eq!(supervisor.state().await, ConnectionState::Disconnected);
    supervisor.disconnect().await;
    assert_eq!(supervisor.state().await, ConnectionState::Disconnected);
    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_reconnect_after_write_failure() {
    let (supervisor, connector) = supervisor_with(DialOutcome::Accept);
    supervisor.connect(PRINTER).await.unwrap();

    connector
        .fail_writes
        .store(true, std::sync::atomic::Ordering::Release);
    let handle = supervisor.print("doomed").await.unwrap();
    assert!(matches!(
        handle.await.unwrap().unwrap_err(),
        WriteError::Io(_)
    ));
    assert_eq!(supervisor.state().await, ConnectionState::Failed);

    // Explicit reconnect restores service; nothing retried automatically.
    connector
        .fail_writes
        .store(false, std::sync::atomic::Ordering::Release);
    supervisor.connect(PRINTER).await.unwrap();
    let handle = supervisor.print("recovered").await.unwrap();
    handle.await.unwrap().unwrap();
    assert_eq!(connector.delivered(), vec![b"recovered".to_vec()]);
    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_malformed_address_is_rejected_up_front() {
    let (supervisor, _) = supervisor_with(DialOutcome::Accept);
    for bad in ["", "printer", "AA:BB:CC:DD:EE", "zz:zz:zz:zz:zz:zz"] {
        let err = supervisor.connect(bad).await.unwrap_err();
        assert!(matches!(err, ConnectError::InvalidAddress(_)), "{:?}", bad);
    }
    assert_eq!(supervisor.state().await, ConnectionState::Disconnected);
    supervisor.shutdown().await;
}
