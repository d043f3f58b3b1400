//! Refresh-token exchange flow.
//!
//! Mirrors the issuance flow with one difference in the signed material: the
//! refresh token rides inside the path, so it is covered by the signature
//! rather than sent as a parameter.

// self
use crate::{
	_prelude::*,
	credential::{CredentialSet, RefreshToken},
	error::ValidationError,
	flows::Relay,
	http::VendorTransport,
	obs::{self, FlowOutcome, FlowSpan, RelayFlow},
	sign,
	vendor::{self, VendorCall, VendorReply},
};

impl<C> Relay<C>
where
	C: ?Sized + VendorTransport,
{
	/// Exchanges a refresh token for a new access token.
	///
	/// The vendor's transport status travels back unchanged in the reply so
	/// callers can preserve it; a non-2xx exchange is a relayed reply here,
	/// not an error.
	pub async fn refresh_token(
		&self,
		credentials: &CredentialSet,
		refresh_token: &RefreshToken,
	) -> Result<VendorReply> {
		const FLOW: RelayFlow = RelayFlow::Refresh;

		let span = FlowSpan::new(FLOW, "refresh_token");

		obs::record_flow_outcome(FLOW, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = vendor::refresh_url(&credentials.data_center, refresh_token)
					.map_err(ValidationError::from)?;
				let signed = sign::signed_now(
					&credentials.client_id,
					&credentials.secret,
					&vendor::refresh_string_to_sign(refresh_token),
				);

				self.dispatch(VendorCall::new(url, &credentials.client_id, signed)).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(FLOW, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(FLOW, FlowOutcome::Failure),
		}

		result
	}
}
