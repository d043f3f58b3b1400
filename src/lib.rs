//! Signed token-exchange relay for IoT cloud token APIs: vendor-mandated HMAC-SHA256 request
//! signing, grant and refresh flows, and a CORS-friendly HTTP surface in one crate built for
//! production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod credential;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
#[cfg(feature = "server")] pub mod serve;
pub mod sign;
pub mod vendor;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by the crate's integration tests; not part of
	//! the stable API surface.

	pub use crate::_prelude::*;

	// self
	use crate::{
		credential::{ClientId, ClientSecret, CredentialSet, DataCenter},
		flows::Relay,
		http::ReqwestHttpClient,
	};

	/// Relay type alias used by reqwest-backed integration tests.
	pub type ReqwestTestRelay = Relay<ReqwestHttpClient>;

	/// Builds a relay backed by a plain reqwest transport for tests.
	pub fn build_reqwest_test_relay() -> ReqwestTestRelay {
		Relay::new()
	}

	/// Constructs a [`CredentialSet`] fixture targeting the provided data center.
	pub fn test_credentials(data_center: &str) -> CredentialSet {
		CredentialSet {
			client_id: ClientId::new("abc").expect("Failed to build test client identifier."),
			secret: ClientSecret::new("shhh"),
			data_center: DataCenter::new(data_center)
				.expect("Failed to parse test data center URL."),
		}
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
