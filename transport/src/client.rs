use bytes::Bytes;
use http::{Response, Uri};
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tracing::{debug, error};

use crate::{Transport, TransportError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] backed by a pooled hyper client over rustls.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    timeout: Duration,
}

impl HyperTransport {
    /// Each GET and each body read is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let connector = crate::tls::https_connector()?;
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client, timeout })
    }
}

impl Transport for HyperTransport {
    type Response = Response<Incoming>;

    async fn get(&self, uri: &Uri) -> Result<Response<Incoming>, TransportError> {
        debug!(uri = %uri, tls = crate::tls::is_tls(uri), "requesting entropy packet");

        let response = tokio::time::timeout(self.timeout, self.client.get(uri.clone()))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
            .map_err(|e| {
                error!(error = %e, "upstream request failed");
                TransportError::ConnectionFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn read_body(&self, response: Response<Incoming>) -> Result<Bytes, TransportError> {
        let collected = tokio::time::timeout(self.timeout, response.into_body().collect())
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(collected.to_bytes())
    }
}
