//! Fresh-token issuance flow (`grant_type=1`).

// self
use crate::{
	_prelude::*,
	credential::CredentialSet,
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
	/// Requests a fresh access token for the supplied credentials.
	///
	/// The timestamp is captured immediately before signing and the call is
	/// dispatched without suspending in between, keeping the signature tied
	/// to the moment of issue.
	pub async fn grant_token(&self, credentials: &CredentialSet) -> Result<VendorReply> {
		const FLOW: RelayFlow = RelayFlow::Grant;

		let span = FlowSpan::new(FLOW, "grant_token");

		obs::record_flow_outcome(FLOW, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = vendor::grant_url(&credentials.data_center)
					.map_err(ValidationError::from)?;
				let signed = sign::signed_now(
					&credentials.client_id,
					&credentials.secret,
					vendor::GRANT_STRING_TO_SIGN,
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
