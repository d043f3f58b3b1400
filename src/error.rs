//! Relay-level error types shared across validation, transport, and flows.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical relay error exposed by public APIs.
///
/// Every variant is terminal for the request that raised it; the relay never
/// retries internally (a failed vendor call simply produces a failed relay
/// response).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Client input rejected before any upstream call was attempted.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Transport failure (DNS, TCP, TLS, timeout) while calling the vendor.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The vendor answered, but its reply could not be interpreted.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
}

/// Client-input failures detected at the request boundary.
///
/// These map to HTTP 400 and are never forwarded upstream.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// Request body was not parseable JSON.
	#[error("Invalid JSON in request body")]
	InvalidJson {
		/// Structured parsing failure including the offending path.
		#[source]
		source: JsonPathError,
	},
	/// One or more required fields were absent or empty.
	#[error("Missing required parameters: {} required.", .fields.join(", "))]
	MissingFields {
		/// Names of the missing request fields, in request-schema order.
		fields: Vec<&'static str>,
	},
	/// Client identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::credential::IdentifierError),
	/// Data center base URL failed validation.
	#[error(transparent)]
	DataCenter(#[from] crate::credential::DataCenterError),
}

/// Transport-level failures raised while calling the vendor token endpoint.
///
/// The relay applies no retry or backoff on top of these (the vendor
/// signature embeds the request timestamp, so a replayed attempt would need
/// a fresh signature anyway).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// DNS resolution or connection establishment failed; callers surface
	/// this class as 502.
	#[error("Unable to reach the vendor token endpoint.")]
	Connect {
		/// Transport-specific connection error.
		#[source]
		source: BoxError,
	},
	/// The vendor call exceeded the transport's own deadline.
	#[error("Request to the vendor token endpoint timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Any other transport failure surfaced by the HTTP client.
	#[error("Network error occurred while calling the vendor token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific connection error.
	pub fn connect(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::timeout(e)
		} else if e.is_connect() {
			Self::connect(e)
		} else {
			Self::network(e)
		}
	}
}

/// Failures interpreting the vendor's reply after the transport succeeded.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Vendor token endpoint returned malformed JSON.
	#[error("Vendor token endpoint returned malformed JSON.")]
	MalformedJson {
		/// Structured parsing failure including the offending path.
		#[source]
		source: JsonPathError,
		/// HTTP status the vendor answered with.
		status: u16,
	},
}
