//! Shared in-memory connector for integration tests: records every payload
//! delivered through it and can be told to refuse, hang, or fail writes.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use btspool::error::ConnectError;
use btspool::transport::{Connector, Transport};
use btspool::DeviceAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialOutcome {
    Accept,
    Refuse,
    /// Never resolves; exercises the connect timeout.
    Hang,
}

#[derive(Clone)]
pub struct RecordingConnector {
    outcome: DialOutcome,
    delivered: Arc<Mutex<Vec<Vec<u8>>>>,
    pub fail_writes: Arc<AtomicBool>,
}

impl RecordingConnector {
    pub fn new(outcome: DialOutcome) -> Self {
        Self {
            outcome,
            delivered: Arc::new(Mutex::new(Vec::new())),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Every payload delivered so far, in wire order.
    pub fn delivered(&self) -> Vec<Vec<u8>> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn dial(&self, _address: &DeviceAddress) -> Result<Box<dyn Transport>, ConnectError> {
        match self.outcome {
            DialOutcome::Accept => Ok(Box::new(RecordingTransport {
                delivered: self.delivered.clone(),
                fail_writes: self.fail_writes.clone(),
            })),
            DialOutcome::Refuse => Err(ConnectError::RefusedOrTimeout),
            DialOutcome::Hang => std::future::pending().await,
        }
    }
}

pub struct RecordingTransport {
    delivered: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        }
        self.delivered.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }

    async fn shutdown(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
