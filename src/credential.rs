//! Typed request material supplied by relay callers.
//!
//! Everything here lives for exactly one request: credentials arrive in the
//! request body, are validated into these types, feed one signature and one
//! outbound call, and are dropped. Nothing is persisted server-side.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{_prelude::*, error::ValidationError};

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when client identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Client identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Client identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Client identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Vendor client identifier, validated on construction.
///
/// The identifier is public material (it travels in the `client_id` header),
/// so unlike [`ClientSecret`] it keeps ordinary `Debug`/`Display` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);
impl ClientId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ClientId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ClientId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ClientId> for String {
	fn from(value: ClientId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientId({})", self.0)
	}
}
impl Display for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ClientId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

macro_rules! def_secret {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		pub struct $name(String);
		impl $name {
			/// Wraps a new secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple($kind).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret! {
	ClientSecret,
	"Redacted vendor client secret; the HMAC signing key, never sent over the wire.",
	"ClientSecret"
}
def_secret! {
	RefreshToken,
	"Redacted refresh token exchanged for a fresh access token; embedded in the signed path.",
	"RefreshToken"
}

/// Validation failures for vendor data-center base URLs.
#[derive(Debug, ThisError)]
pub enum DataCenterError {
	/// The value was not a parseable absolute URL.
	#[error("Data center is not a valid URL.")]
	Invalid {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// URL scheme other than `http`/`https`.
	#[error("Data center scheme `{scheme}` is not supported.")]
	UnsupportedScheme {
		/// Scheme found on the rejected URL.
		scheme: String,
	},
	/// URL without a host component.
	#[error("Data center URL has no host.")]
	MissingHost,
	/// Base URLs must not carry a query or fragment.
	#[error("Data center URL must not contain a query or fragment.")]
	UnexpectedComponents,
	/// Joining an operation path onto the base URL failed.
	#[error("Failed to join the token path onto the data center URL.")]
	Join {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Regional base URL of the vendor API (e.g. the EU vs. US endpoint).
///
/// Plain `http` is accepted alongside `https` so local stub vendors can be
/// targeted; the value is caller-supplied per request and never stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataCenter(Url);
impl DataCenter {
	/// Parses and validates a base URL.
	pub fn new(value: impl AsRef<str>) -> Result<Self, DataCenterError> {
		let url = Url::parse(value.as_ref()).map_err(|source| DataCenterError::Invalid { source })?;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(DataCenterError::UnsupportedScheme { scheme: url.scheme().to_owned() });
		}
		if !url.has_host() {
			return Err(DataCenterError::MissingHost);
		}
		if url.query().is_some() || url.fragment().is_some() {
			return Err(DataCenterError::UnexpectedComponents);
		}

		Ok(Self(url))
	}

	/// Returns the validated base URL.
	pub fn as_url(&self) -> &Url {
		&self.0
	}

	/// Joins an absolute path (optionally carrying a query) onto the base.
	pub(crate) fn join(&self, path_and_query: &str) -> Result<Url, DataCenterError> {
		self.0.join(path_and_query).map_err(|source| DataCenterError::Join { source })
	}
}
impl TryFrom<String> for DataCenter {
	type Error = DataCenterError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<DataCenter> for String {
	fn from(value: DataCenter) -> Self {
		value.0.into()
	}
}
impl Debug for DataCenter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "DataCenter({})", self.0)
	}
}
impl Display for DataCenter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}

/// Caller-supplied credentials for one relay operation; never stored.
#[derive(Clone, Debug)]
pub struct CredentialSet {
	/// Vendor client identifier, sent in the `client_id` header.
	pub client_id: ClientId,
	/// Vendor client secret, used only as the HMAC signing key.
	pub secret: ClientSecret,
	/// Regional vendor base URL the outbound call targets.
	pub data_center: DataCenter,
}

/// Loosely shaped issuance request body, validated into a [`CredentialSet`].
///
/// Fields deserialize as optionals so presence checking happens in one typed
/// validation step instead of relying on runtime shape-checking.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrantRequestBody {
	/// `clientId` field.
	pub client_id: Option<String>,
	/// `secret` field.
	pub secret: Option<String>,
	/// `dataCenter` field.
	pub data_center: Option<String>,
}
impl GrantRequestBody {
	/// Parses raw bytes strictly, reporting syntax errors with their path.
	pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
		parse_body(body)
	}

	/// Checks presence of every required field and builds the typed set.
	///
	/// Empty strings count as absent, so blank credentials fail fast instead
	/// of producing a doomed upstream call.
	pub fn validate(self) -> Result<CredentialSet, ValidationError> {
		let mut missing = Vec::new();
		let client_id = present(self.client_id, "clientId", &mut missing);
		let secret = present(self.secret, "secret", &mut missing);
		let data_center = present(self.data_center, "dataCenter", &mut missing);
		let (Some(client_id), Some(secret), Some(data_center)) = (client_id, secret, data_center)
		else {
			return Err(ValidationError::MissingFields { fields: missing });
		};

		build_credentials(client_id, secret, data_center)
	}
}

/// Refresh-exchange request body; [`GrantRequestBody`] plus `refreshToken`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshRequestBody {
	/// `clientId` field.
	pub client_id: Option<String>,
	/// `secret` field.
	pub secret: Option<String>,
	/// `refreshToken` field.
	pub refresh_token: Option<String>,
	/// `dataCenter` field.
	pub data_center: Option<String>,
}
impl RefreshRequestBody {
	/// Parses raw bytes strictly, reporting syntax errors with their path.
	pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
		parse_body(body)
	}

	/// Checks presence of every required field and builds the typed pair.
	pub fn validate(self) -> Result<(CredentialSet, RefreshToken), ValidationError> {
		let mut missing = Vec::new();
		let client_id = present(self.client_id, "clientId", &mut missing);
		let secret = present(self.secret, "secret", &mut missing);
		let refresh_token = present(self.refresh_token, "refreshToken", &mut missing);
		let data_center = present(self.data_center, "dataCenter", &mut missing);
		let (Some(client_id), Some(secret), Some(refresh_token), Some(data_center)) =
			(client_id, secret, refresh_token, data_center)
		else {
			return Err(ValidationError::MissingFields { fields: missing });
		};
		let credentials = build_credentials(client_id, secret, data_center)?;

		Ok((credentials, RefreshToken::new(refresh_token)))
	}
}

fn parse_body<T>(body: &[u8]) -> Result<T, ValidationError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ValidationError::InvalidJson { source })
}

fn present(
	value: Option<String>,
	field: &'static str,
	missing: &mut Vec<&'static str>,
) -> Option<String> {
	match value {
		Some(value) if !value.is_empty() => Some(value),
		_ => {
			missing.push(field);

			None
		},
	}
}

fn build_credentials(
	client_id: String,
	secret: String,
	data_center: String,
) -> Result<CredentialSet, ValidationError> {
	Ok(CredentialSet {
		client_id: ClientId::new(client_id)?,
		secret: ClientSecret::new(secret),
		data_center: DataCenter::new(data_center)?,
	})
}
