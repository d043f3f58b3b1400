//! Transport primitives for signed vendor token calls.
//!
//! The module exposes [`VendorTransport`] as the relay's only dependency on
//! an HTTP stack. Implementations execute exactly one GET per call, apply no
//! retry or backoff, and leave timeouts to the underlying client's defaults;
//! a slow or failed vendor call simply produces a slow or failed relay
//! response.

// self
use crate::{_prelude::*, error::TransportError, vendor::VendorCall};

/// Boxed future returned by [`VendorTransport::dispatch`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Raw vendor response captured by a transport implementation.
///
/// The body stays opaque bytes here; JSON interpretation happens in the
/// flows so malformed vendor replies classify separately from transport
/// failures.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status the vendor answered with.
	pub status: u16,
	/// Unparsed response body.
	pub body: Vec<u8>,
}

/// Abstraction over HTTP clients capable of executing one signed token GET.
///
/// Implementations must be `Send + Sync + 'static` so a relay can be shared
/// across handler invocations without additional wrappers, and the returned
/// future must be `Send` for the lifetime of the in-flight call.
pub trait VendorTransport
where
	Self: 'static + Send + Sync,
{
	/// Issues the prepared GET with the call's four authentication headers.
	fn dispatch(&self, call: VendorCall) -> TransportFuture<'_>;
}

#[cfg(feature = "reqwest")]
/// Default [`VendorTransport`] backed by a shared [`ReqwestClient`].
///
/// Token calls should not follow redirects into other hosts, but the vendor
/// token endpoints answer directly, so the stock client configuration is
/// kept as-is.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl VendorTransport for ReqwestHttpClient {
	fn dispatch(&self, call: VendorCall) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut request = client.get(call.url.clone());

			for (name, value) in call.headers() {
				request = request.header(name, value);
			}

			let response = request.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?;

			Ok(RawResponse { status, body: body.to_vec() })
		})
	}
}
