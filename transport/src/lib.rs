//! HTTP plumbing for the remote entropy service.
//!
//! The acquisition pipeline talks to the network only through [`Transport`],
//! which splits a request into the two steps it treats differently: issuing
//! the GET (retried by the caller) and draining the body (attempted once).

pub mod client;
pub mod tls;

use bytes::Bytes;
use http::Uri;
use qrand_types::ErrorCode;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub use client::HyperTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream connection failed: {0}")]
    ConnectionFailed(String),
    #[error("upstream timeout after {0:?}")]
    Timeout(Duration),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("reading response body failed: {0}")]
    Body(String),
    #[error("tls setup failed: {0}")]
    Tls(String),
}

impl TransportError {
    /// Map to a platform error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            TransportError::ConnectionFailed(_) => ErrorCode::UpstreamUnavailable,
            TransportError::Timeout(_) => ErrorCode::UpstreamTimeout,
            TransportError::Status(_) => ErrorCode::UpstreamStatus,
            TransportError::Body(_) => ErrorCode::BodyReadFailed,
            TransportError::Tls(_) => ErrorCode::Internal,
        }
    }
}

/// A client able to GET a URI and drain the response body.
pub trait Transport: Send + Sync {
    /// A successful response whose body has not been read yet.
    type Response: Send;

    /// Issue the GET. Non-2xx statuses are errors.
    fn get(&self, uri: &Uri) -> impl Future<Output = Result<Self::Response, TransportError>> + Send;

    /// Read the whole body of a response returned by [`Transport::get`].
    fn read_body(
        &self,
        response: Self::Response,
    ) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    type Response = T::Response;

    fn get(&self, uri: &Uri) -> impl Future<Output = Result<Self::Response, TransportError>> + Send {
        (**self).get(uri)
    }

    fn read_body(
        &self,
        response: Self::Response,
    ) -> impl Future<Output = Result<Bytes, TransportError>> + Send {
        (**self).read_body(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Answers every GET with the requested path as the body.
    struct EchoPath {
        gets: AtomicUsize,
    }

    impl Transport for EchoPath {
        type Response = String;

        async fn get(&self, uri: &Uri) -> Result<String, TransportError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            Ok(uri.path().to_string())
        }

        async fn read_body(&self, response: String) -> Result<Bytes, TransportError> {
            Ok(Bytes::from(response))
        }
    }

    #[tokio::test]
    async fn shared_transport_forwards_to_inner() {
        let inner = Arc::new(EchoPath {
            gets: AtomicUsize::new(0),
        });
        let shared = Arc::clone(&inner);
        let uri: Uri = "http://127.0.0.1/API/jsonI.php".parse().unwrap();

        let response = shared.get(&uri).await.unwrap();
        let body = shared.read_body(response).await.unwrap();

        assert_eq!(body, Bytes::from_static(b"/API/jsonI.php"));
        assert_eq!(inner.gets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_codes() {
        assert_eq!(
            TransportError::ConnectionFailed("refused".into()).error_code(),
            ErrorCode::UpstreamUnavailable
        );
        assert_eq!(
            TransportError::Timeout(Duration::from_secs(1)).error_code(),
            ErrorCode::UpstreamTimeout
        );
        assert_eq!(TransportError::Status(503).error_code(), ErrorCode::UpstreamStatus);
    }

    #[test]
    fn status_error_message() {
        assert_eq!(TransportError::Status(502).to_string(), "upstream returned HTTP 502");
    }
}
