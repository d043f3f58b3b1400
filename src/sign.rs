//! Vendor-mandated HMAC-SHA256 request signing.
//!
//! The vendor authenticates each token call with a keyed hash over
//! `client_id + timestamp + string_to_sign`, uppercase hex encoded. The
//! concatenation order and the blank lines embedded in the string-to-sign
//! fragments are part of the vendor's wire contract; any deviation is
//! answered with an auth failure, not a parse error.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, credential::ClientSecret};

type HmacSha256 = Hmac<Sha256>;

/// Signed authentication material for one vendor call.
///
/// Valid only for the exact timestamp it was computed with; a replay under a
/// new timestamp requires a fresh signature.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
	/// Epoch milliseconds rendered as a decimal string; the `t` header.
	pub timestamp: String,
	/// Uppercase hex HMAC-SHA256 signature; the `sign` header.
	pub signature: String,
}
impl Debug for SignedRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignedRequest")
			.field("timestamp", &self.timestamp)
			.field("signature", &"<redacted>")
			.finish()
	}
}

/// Computes the vendor signature for one request.
///
/// `upper(hex(HMAC_SHA256(key = secret, message = client_id + timestamp +
/// string_to_sign)))`. Pure: identical inputs always produce an identical
/// signature.
pub fn sign(
	client_id: &str,
	secret: &ClientSecret,
	timestamp: &str,
	string_to_sign: &str,
) -> String {
	// HMAC-SHA256 accepts any key length per RFC 2104, so new_from_slice
	// never fails here.
	#[allow(clippy::unwrap_used)]
	let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes()).unwrap();

	mac.update(client_id.as_bytes());
	mac.update(timestamp.as_bytes());
	mac.update(string_to_sign.as_bytes());

	hex::encode_upper(mac.finalize().into_bytes())
}

/// Captures the current timestamp and signs `string_to_sign` under it.
///
/// Callers must dispatch the resulting request promptly; the signature's
/// validity window starts at this timestamp.
pub fn signed_now(client_id: &str, secret: &ClientSecret, string_to_sign: &str) -> SignedRequest {
	let timestamp = epoch_millis(OffsetDateTime::now_utc());
	let signature = sign(client_id, secret, &timestamp, string_to_sign);

	SignedRequest { timestamp, signature }
}

fn epoch_millis(moment: OffsetDateTime) -> String {
	(moment.unix_timestamp_nanos() / 1_000_000).to_string()
}
