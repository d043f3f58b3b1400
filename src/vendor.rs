//! Fixed wire contract of the vendor token API.
//!
//! Path literals, header names, and string-to-sign fragments here are
//! external protocol constants, not design choices; they must match the
//! vendor byte-for-byte.

// self
use crate::{
	_prelude::*,
	credential::{ClientId, DataCenter, DataCenterError, RefreshToken},
	sign::SignedRequest,
};

/// Header carrying the vendor client identifier.
pub const CLIENT_ID_HEADER: &str = "client_id";
/// Header carrying the uppercase hex HMAC signature.
pub const SIGN_HEADER: &str = "sign";
/// Header carrying the signing timestamp (epoch millis, decimal).
pub const TIMESTAMP_HEADER: &str = "t";
/// Header naming the signature algorithm.
pub const SIGN_METHOD_HEADER: &str = "sign_method";
/// The only signature algorithm the vendor accepts.
pub const SIGN_METHOD: &str = "HMAC-SHA256";
/// Token issuance path with its fixed client-credentials grant selector.
pub const GRANT_PATH: &str = "/v1.0/token?grant_type=1";
/// Prefix of the refresh-exchange path; the refresh token is appended raw.
pub const REFRESH_PATH_PREFIX: &str = "/v1.0/token/";
/// String-to-sign fragment for the issuance operation. The blank lines stand
/// for the empty body hash and header block of the vendor's signing recipe.
pub const GRANT_STRING_TO_SIGN: &str = "GET\n\n\n/v1.0/token?grant_type=1";

/// Builds the string-to-sign fragment for a refresh exchange.
pub fn refresh_string_to_sign(refresh_token: &RefreshToken) -> String {
	format!("GET\n\n\n{REFRESH_PATH_PREFIX}{}", refresh_token.expose())
}

/// Builds the issuance URL under `data_center`.
pub fn grant_url(data_center: &DataCenter) -> Result<Url, DataCenterError> {
	data_center.join(GRANT_PATH)
}

/// Builds the refresh-exchange URL under `data_center`.
pub fn refresh_url(
	data_center: &DataCenter,
	refresh_token: &RefreshToken,
) -> Result<Url, DataCenterError> {
	data_center.join(&format!("{REFRESH_PATH_PREFIX}{}", refresh_token.expose()))
}

/// One fully prepared outbound token call.
#[derive(Clone, Debug)]
pub struct VendorCall {
	/// Absolute vendor URL the transport issues a GET against.
	pub url: Url,
	/// `client_id` header value.
	pub client_id: String,
	/// Signed timestamp + signature pair.
	pub signed: SignedRequest,
}
impl VendorCall {
	/// Assembles a call from its parts.
	pub fn new(url: Url, client_id: &ClientId, signed: SignedRequest) -> Self {
		Self { url, client_id: client_id.as_ref().to_owned(), signed }
	}

	/// Returns the four authentication headers the vendor requires.
	pub fn headers(&self) -> [(&'static str, &str); 4] {
		[
			(CLIENT_ID_HEADER, &self.client_id),
			(SIGN_HEADER, &self.signed.signature),
			(TIMESTAMP_HEADER, &self.signed.timestamp),
			(SIGN_METHOD_HEADER, SIGN_METHOD),
		]
	}
}

/// Vendor transport status plus JSON payload, relayed uninterpreted.
///
/// The vendor signals business-level failure inside the payload (`success`
/// flag) while transport status stays meaningful for refresh exchanges, so
/// both travel together.
#[derive(Clone, Debug, PartialEq)]
pub struct VendorReply {
	/// HTTP status the vendor answered with.
	pub status: u16,
	/// Vendor JSON payload, passed through unchanged.
	pub payload: Value,
}
impl VendorReply {
	/// Whether the vendor's transport status is in the success range.
	pub fn is_transport_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Whether the vendor's embedded `success` flag is set.
	pub fn is_business_success(&self) -> bool {
		self.payload.get("success").and_then(Value::as_bool).unwrap_or(false)
	}

	/// Vendor `result` object, when the payload carries one.
	pub fn result(&self) -> Option<&Value> {
		self.payload.get("result").filter(|value| value.is_object())
	}
}
