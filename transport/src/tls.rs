use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use tracing::debug;

use crate::TransportError;

/// Build the connector used for the remote service.
///
/// Certificates are verified against the bundled webpki roots. Plain
/// `http://` endpoints are still accepted so local mirrors work.
pub fn https_connector() -> Result<HttpsConnector<HttpConnector>, TransportError> {
    let connector = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
        .map_err(|e| TransportError::Tls(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    debug!("https connector ready (ring provider, webpki roots)");
    Ok(connector)
}

/// Whether a URI will be fetched over TLS.
pub fn is_tls(uri: &http::Uri) -> bool {
    uri.scheme_str() == Some("https")
}
