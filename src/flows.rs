//! High-level relay flows that sign and dispatch vendor token calls.

mod grant;
mod refresh;

// self
use crate::{
	_prelude::*,
	error::UpstreamError,
	http::VendorTransport,
	vendor::{VendorCall, VendorReply},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Relay specialized for the crate's default reqwest transport.
pub type ReqwestRelay = Relay<ReqwestHttpClient>;

/// Coordinates signed token exchanges against vendor data centers.
///
/// The relay owns only its transport handle. Every operation receives its
/// credentials from the caller, performs one signed outbound GET, and
/// returns the vendor's reply; no state survives the call (no cache, no
/// locks, no cross-request identity).
pub struct Relay<C>
where
	C: ?Sized + VendorTransport,
{
	/// Transport used for every outbound vendor request.
	pub transport: Arc<C>,
}
impl<C> Relay<C>
where
	C: ?Sized + VendorTransport,
{
	/// Creates a relay around the provided transport.
	pub fn with_transport(transport: impl Into<Arc<C>>) -> Self {
		Self { transport: transport.into() }
	}

	/// Dispatches a prepared call and interprets the body as JSON.
	///
	/// The vendor's transport status is preserved alongside the payload;
	/// classification (passthrough vs. error envelope) is the caller's
	/// concern.
	async fn dispatch(&self, call: VendorCall) -> Result<VendorReply> {
		let raw = self.transport.dispatch(call).await?;
		let mut deserializer = serde_json::Deserializer::from_slice(&raw.body);
		let payload = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| UpstreamError::MalformedJson { source, status: raw.status })?;

		Ok(VendorReply { status: raw.status, payload })
	}
}
#[cfg(feature = "reqwest")]
impl Relay<ReqwestHttpClient> {
	/// Creates a relay with the default reqwest transport.
	pub fn new() -> Self {
		Self::with_transport(ReqwestHttpClient::default())
	}
}
#[cfg(feature = "reqwest")]
impl Default for Relay<ReqwestHttpClient> {
	fn default() -> Self {
		Self::new()
	}
}
impl<C> Clone for Relay<C>
where
	C: ?Sized + VendorTransport,
{
	fn clone(&self) -> Self {
		Self { transport: Arc::clone(&self.transport) }
	}
}
impl<C> Debug for Relay<C>
where
	C: ?Sized + VendorTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Relay").finish_non_exhaustive()
	}
}
