//! HTTP service surface: the relay's two endpoints plus CORS plumbing.
//!
//! Each endpoint accepts `POST` (and answers a `CORS` preflight `OPTIONS`
//! with an empty 200); every other method gets a 405 JSON envelope and never
//! reaches the vendor. Request bodies are validated strictly at this
//! boundary, so an invalid or incomplete body also never produces an
//! outbound call.
//!
//! Response policy: the vendor's transport status is preserved verbatim for
//! both operations; DNS/connection failures map to 502 and every other
//! internal failure to 500. Refresh responses additionally carry a
//! troubleshooting hint table on vendor failure and a non-authoritative
//! `postman_info` block on success.

// crates.io
use axum::{
	Router,
	body::Bytes,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::post,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::{
	_prelude::*,
	credential::{GrantRequestBody, RefreshRequestBody},
	error::{TransportError, ValidationError},
	flows::Relay,
	http::VendorTransport,
	vendor::VendorReply,
};

/// Builds the relay router with CORS and request-tracing middleware.
pub fn router<C>(relay: Relay<C>) -> Router
where
	C: VendorTransport,
{
	let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

	Router::new()
		.route(
			"/api/token",
			post(grant_token::<C>).options(preflight).fallback(method_not_allowed),
		)
		.route(
			"/api/token/refresh",
			post(refresh_token::<C>).options(preflight).fallback(method_not_allowed),
		)
		.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
		.with_state(relay)
}

/// Serves `router` on the bound listener until ctrl-c/SIGTERM.
pub async fn run(listener: TcpListener, router: Router) -> std::io::Result<()> {
	if let Ok(addr) = listener.local_addr() {
		tracing::info!("Relay listening on {addr}");
	}

	axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await
}

/// Initializes the env-filtered tracing subscriber for the server binary.
pub fn init_tracing() {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "token_relay=info,tower_http=debug".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();
}

async fn grant_token<C>(State(relay): State<Relay<C>>, body: Bytes) -> Response
where
	C: VendorTransport,
{
	let credentials = match GrantRequestBody::parse(&body).and_then(GrantRequestBody::validate) {
		Ok(credentials) => credentials,
		Err(err) => return respond(validation_response(&err)),
	};

	match relay.grant_token(&credentials).await {
		Ok(reply) => respond(grant_response(reply)),
		Err(err) => {
			tracing::error!(error = %err, "Grant relay failed.");

			respond(error_response(&err))
		},
	}
}

async fn refresh_token<C>(State(relay): State<Relay<C>>, body: Bytes) -> Response
where
	C: VendorTransport,
{
	let (credentials, refresh_token) =
		match RefreshRequestBody::parse(&body).and_then(RefreshRequestBody::validate) {
			Ok(validated) => validated,
			Err(err) => return respond(validation_response(&err)),
		};

	match relay.refresh_token(&credentials, &refresh_token).await {
		Ok(reply) => respond(refresh_response(reply)),
		Err(err) => {
			tracing::error!(error = %err, "Refresh relay failed.");

			respond(error_response(&err))
		},
	}
}

async fn preflight() -> StatusCode {
	StatusCode::OK
}

async fn method_not_allowed() -> Response {
	respond((
		StatusCode::METHOD_NOT_ALLOWED,
		json!({ "success": false, "msg": "Method not allowed" }),
	))
}

fn respond((status, body): (StatusCode, Value)) -> Response {
	(status, Json(body)).into_response()
}

/// Relays the vendor payload verbatim under the vendor's own status.
fn grant_response(reply: VendorReply) -> (StatusCode, Value) {
	(status_from(reply.status), reply.payload)
}

/// Refresh replies keep the passthrough contract but add caller conveniences.
fn refresh_response(reply: VendorReply) -> (StatusCode, Value) {
	let status = status_from(reply.status);

	if !reply.is_transport_success() {
		return (status, refresh_failure_body(reply.payload));
	}

	let postman_info = postman_info(&reply);
	let mut payload = reply.payload;

	if let (Some(info), Value::Object(map)) = (postman_info, &mut payload) {
		map.insert("postman_info".into(), info);
	}

	(status, payload)
}

fn refresh_failure_body(payload: Value) -> Value {
	let mut body = match payload {
		Value::Object(map) => Value::Object(map),
		other => json!({ "error": other }),
	};

	if let Value::Object(map) = &mut body {
		map.entry("success").or_insert(Value::Bool(false));
		map.entry("msg").or_insert_with(|| "Vendor token endpoint reported a failure.".into());
		map.insert("troubleshooting".into(), troubleshooting_table());
	}

	body
}

/// Canned hints for the vendor statuses callers most often hit.
fn troubleshooting_table() -> Value {
	json!({
		"401": "Signature rejected: check that the client secret matches this clientId and that the system clock is accurate.",
		"403": "Refresh token expired or revoked: request a fresh token via grant_type=1.",
		"404": "Refresh token not recognized: confirm the dataCenter region matches the project that issued it.",
		"500": "Vendor-side failure: retry after a short delay.",
	})
}

fn postman_info(reply: &VendorReply) -> Option<Value> {
	if !reply.is_business_success() {
		return None;
	}

	let result = reply.result()?;
	let mut info = serde_json::Map::new();

	info.insert(
		"note".into(),
		"Non-authoritative mirror of result for API-client environment variables; the vendor payload is canonical."
			.into(),
	);

	for key in ["access_token", "refresh_token", "expire_time"] {
		if let Some(value) = result.get(key) {
			info.insert(key.into(), value.clone());
		}
	}

	Some(Value::Object(info))
}

fn validation_response(err: &ValidationError) -> (StatusCode, Value) {
	(StatusCode::BAD_REQUEST, json!({ "success": false, "msg": err.to_string() }))
}

/// Maps relay errors onto the envelope contract.
///
/// Source chains stay out of the response body: transport errors can embed
/// the target URL, and refresh URLs carry token material.
fn error_response(err: &Error) -> (StatusCode, Value) {
	let (status, kind) = match err {
		Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
		Error::Transport(TransportError::Connect { .. }) =>
			(StatusCode::BAD_GATEWAY, "transport_connect"),
		Error::Transport(TransportError::Timeout { .. }) =>
			(StatusCode::INTERNAL_SERVER_ERROR, "transport_timeout"),
		Error::Transport(TransportError::Network { .. }) =>
			(StatusCode::INTERNAL_SERVER_ERROR, "transport"),
		Error::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "upstream"),
	};

	(status, json!({ "success": false, "msg": err.to_string(), "error": { "kind": kind } }))
}

fn status_from(status: u16) -> StatusCode {
	StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

async fn shutdown_signal() {
	// crates.io
	use tokio::signal;

	let ctrl_c = async {
		signal::ctrl_c().await.expect("Failed to install the ctrl-c handler.");
	};
	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("Failed to install the SIGTERM handler.")
			.recv()
			.await;
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("Received ctrl-c, shutting down."),
		_ = terminate => tracing::info!("Received SIGTERM, shutting down."),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::UpstreamError;

	fn reply(status: u16, payload: Value) -> VendorReply {
		VendorReply { status, payload }
	}

	#[test]
	fn grant_response_passes_payload_and_status_through() {
		let (status, body) = grant_response(reply(
			200,
			json!({ "success": true, "result": { "access_token": "tok1", "expire_time": 7200 } }),
		));

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["result"]["access_token"], "tok1");

		let (status, body) =
			grant_response(reply(200, json!({ "success": false, "msg": "sign invalid" })));

		assert_eq!(status, StatusCode::OK, "Business failures ride inside the payload.");
		assert_eq!(body["msg"], "sign invalid");
	}

	#[test]
	fn refresh_failure_keeps_vendor_msg_and_adds_hints() {
		let (status, body) =
			refresh_response(reply(403, json!({ "success": false, "msg": "token expired" })));

		assert_eq!(status, StatusCode::FORBIDDEN);
		assert_eq!(body["msg"], "token expired");
		assert_eq!(body["success"], false);
		assert!(
			body["troubleshooting"]["403"]
				.as_str()
				.expect("403 hint should be populated.")
				.contains("grant_type=1"),
		);
	}

	#[test]
	fn refresh_failure_wraps_non_object_payloads() {
		let (status, body) = refresh_response(reply(500, json!("boom")));

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body["success"], false);
		assert_eq!(body["error"], "boom");
		assert!(body["troubleshooting"]["500"].is_string());
	}

	#[test]
	fn refresh_success_appends_postman_info() {
		let (status, body) = refresh_response(reply(
			200,
			json!({
				"success": true,
				"result": { "access_token": "a2", "refresh_token": "r2", "expire_time": 7200 },
			}),
		));

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["result"]["access_token"], "a2");
		assert_eq!(body["postman_info"]["access_token"], "a2");
		assert_eq!(body["postman_info"]["expire_time"], 7200);
	}

	#[test]
	fn refresh_success_without_result_stays_untouched() {
		let (_, body) = refresh_response(reply(200, json!({ "success": true })));

		assert!(body.get("postman_info").is_none());
	}

	#[test]
	fn error_response_maps_connect_to_bad_gateway() {
		let err =
			Error::Transport(TransportError::connect(std::io::Error::other("refused")));
		let (status, body) = error_response(&err);

		assert_eq!(status, StatusCode::BAD_GATEWAY);
		assert_eq!(body["success"], false);
		assert_eq!(body["error"]["kind"], "transport_connect");
	}

	#[test]
	fn error_response_maps_upstream_to_internal() {
		let mut deserializer = serde_json::Deserializer::from_str("not json");
		let source = serde_path_to_error::deserialize::<_, Value>(&mut deserializer)
			.expect_err("Fixture should fail to parse.");
		let err = Error::Upstream(UpstreamError::MalformedJson { source, status: 200 });
		let (status, body) = error_response(&err);

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body["error"]["kind"], "upstream");
	}

	#[test]
	fn invalid_vendor_status_falls_back_to_bad_gateway() {
		assert_eq!(status_from(42), StatusCode::BAD_GATEWAY);
	}
}
