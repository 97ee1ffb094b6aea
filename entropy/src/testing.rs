use bytes::Bytes;
use http::Uri;
use qrand_transport::{Transport, TransportError};
use qrand_types::PacketShape;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::config::AcquirerConfig;
use crate::error::FallbackError;
use crate::fallback::FallbackSource;
use crate::retry::RetryPolicy;

/// One scripted reply from [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub enum Reply {
    /// The GET itself fails.
    Down,
    /// The GET succeeds but the body cannot be read.
    BrokenBody,
    /// The GET succeeds with this body.
    Body(String),
}

/// In-memory transport replaying a script, then repeating `then` forever.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    then: Reply,
    gets: AtomicUsize,
    uris: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Reply>, then: Reply) -> Self {
        Self {
            script: Mutex::new(script.into()),
            then,
            gets: AtomicUsize::new(0),
            uris: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: Reply) -> Self {
        Self::new(Vec::new(), reply)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn uris(&self) -> Vec<String> {
        self.uris.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    type Response = Reply;

    async fn get(&self, uri: &Uri) -> Result<Reply, TransportError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.uris.lock().unwrap().push(uri.to_string());
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.then.clone());
        match reply {
            Reply::Down => Err(TransportError::ConnectionFailed("connection refused".into())),
            other => Ok(other),
        }
    }

    async fn read_body(&self, response: Reply) -> Result<Bytes, TransportError> {
        match response {
            Reply::Body(body) => Ok(Bytes::from(body)),
            _ => Err(TransportError::Body("connection reset".into())),
        }
    }
}

/// A well-formed packet of `shape` whose every byte is `byte`.
pub fn packet(shape: PacketShape, byte: u8) -> Reply {
    let item = format!("{byte:02x}").repeat(shape.size);
    let data = vec![item; shape.length];
    packet_with(shape, true, &data)
}

pub fn packet_with(shape: PacketShape, success: bool, data: &[String]) -> Reply {
    Reply::Body(
        serde_json::json!({
            "type": "string",
            "length": shape.length,
            "size": shape.size,
            "data": data,
            "success": success,
        })
        .to_string(),
    )
}

/// Config against a local endpoint with immediate retries.
pub fn config(shape: PacketShape, attempts: u32) -> AcquirerConfig {
    AcquirerConfig {
        endpoint: "http://127.0.0.1:9/API/jsonI.php".into(),
        packet: shape,
        retry: RetryPolicy::new(attempts, Duration::ZERO),
        ..AcquirerConfig::default()
    }
}

/// Fills with a constant so fallback bytes are recognizable.
pub struct ConstFallback(pub u8);

impl FallbackSource for ConstFallback {
    fn fill(&self, dest: &mut [u8]) -> Result<usize, FallbackError> {
        dest.fill(self.0);
        Ok(dest.len())
    }
}

pub struct FailingFallback;

impl FallbackSource for FailingFallback {
    fn fill(&self, _dest: &mut [u8]) -> Result<usize, FallbackError> {
        Err(FallbackError::Rng("entropy pool exhausted".into()))
    }
}

/// Reports writing half of what was asked.
pub struct ShortFallback;

impl FallbackSource for ShortFallback {
    fn fill(&self, dest: &mut [u8]) -> Result<usize, FallbackError> {
        let half = dest.len() / 2;
        dest[..half].fill(0x5a);
        Ok(half)
    }
}
