// crates.io
use httpmock::prelude::*;
// self
use token_relay::{_preludet::*, credential::RefreshToken};

#[tokio::test]
async fn refresh_token_exchanges_along_the_token_path() {
	let server = MockServer::start_async().await;
	let relay = build_reqwest_test_relay();
	let credentials = test_credentials(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1.0/token/r1")
				.header("client_id", "abc")
				.header("sign_method", "HMAC-SHA256")
				.header_exists("sign")
				.header_exists("t");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"result\":{\"access_token\":\"a2\",\"refresh_token\":\"r2\",\"expire_time\":7200}}",
			);
		})
		.await;
	let reply = relay
		.refresh_token(&credentials, &RefreshToken::new("r1"))
		.await
		.expect("Refresh against the stub vendor should succeed.");

	assert_eq!(reply.status, 200);
	assert!(reply.is_business_success());
	assert_eq!(reply.payload["result"]["refresh_token"], "r2");

	mock.assert_async().await;
}

#[tokio::test]
async fn vendor_failure_status_travels_back_unchanged() {
	let server = MockServer::start_async().await;
	let relay = build_reqwest_test_relay();
	let credentials = test_credentials(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token/r1");
			then.status(403)
				.header("content-type", "application/json")
				.body("{\"success\":false,\"msg\":\"token expired\"}");
		})
		.await;
	let reply = relay
		.refresh_token(&credentials, &RefreshToken::new("r1"))
		.await
		.expect("A vendor-level refresh failure is still a relayed reply.");

	assert_eq!(reply.status, 403);
	assert!(!reply.is_transport_success());
	assert_eq!(reply.payload["msg"], "token expired");

	mock.assert_async().await;
}

#[tokio::test]
async fn each_exchange_is_signed_independently() {
	let server = MockServer::start_async().await;
	let relay = build_reqwest_test_relay();
	let credentials = test_credentials(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token/r1").header_exists("sign");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"result\":{\"access_token\":\"a2\"}}");
		})
		.await;

	relay
		.refresh_token(&credentials, &RefreshToken::new("r1"))
		.await
		.expect("First exchange should succeed.");
	relay
		.refresh_token(&credentials, &RefreshToken::new("r1"))
		.await
		.expect("Second exchange should succeed.");

	mock.assert_calls_async(2).await;
}
