// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use token_relay::{_preludet::*, reqwest, serve};

type HttpClient = reqwest::Client;

async fn spawn_relay() -> String {
	let router = serve::router(build_reqwest_test_relay());
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
		.await
		.expect("Binding an ephemeral port should succeed.");
	let addr = listener.local_addr().expect("Bound listener should expose its address.");

	tokio::spawn(serve::run(listener, router));

	format!("http://{addr}")
}

async fn post_json(client: &HttpClient, url: &str, body: &str) -> reqwest::Response {
	client
		.post(url)
		.header("content-type", "application/json")
		.header("origin", "https://example.com")
		.body(body.to_owned())
		.send()
		.await
		.expect("Request to the relay should complete.")
}

async fn json_body(response: reqwest::Response) -> Value {
	let text = response.text().await.expect("Relay responses should have a readable body.");

	serde_json::from_str(&text).expect("Relay responses should be JSON.")
}

fn grant_body(data_center: &str) -> String {
	json!({ "clientId": "abc", "secret": "shhh", "dataCenter": data_center }).to_string()
}

fn refresh_body(data_center: &str) -> String {
	json!({ "clientId": "abc", "secret": "shhh", "refreshToken": "r1", "dataCenter": data_center })
		.to_string()
}

#[tokio::test]
async fn grant_endpoint_relays_the_vendor_json_verbatim() {
	let vendor = MockServer::start_async().await;
	let mock = vendor
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token").query_param("grant_type", "1");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"result\":{\"access_token\":\"tok1\",\"expire_time\":7200}}",
			);
		})
		.await;
	let base = spawn_relay().await;
	let client = HttpClient::new();
	let response = post_json(&client, &format!("{base}/api/token"), &grant_body(&vendor.base_url())).await;

	assert_eq!(response.status(), 200);
	assert_eq!(
		response
			.headers()
			.get("access-control-allow-origin")
			.expect("CORS header should be set on every response."),
		"*",
	);
	assert_eq!(
		json_body(response).await,
		json!({ "success": true, "result": { "access_token": "tok1", "expire_time": 7200 } }),
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn missing_parameters_are_rejected_without_an_upstream_call() {
	let vendor = MockServer::start_async().await;
	let mock = vendor
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token");
			then.status(200).header("content-type", "application/json").body("{\"success\":true}");
		})
		.await;
	let base = spawn_relay().await;
	let client = HttpClient::new();
	let response = post_json(
		&client,
		&format!("{base}/api/token"),
		&json!({ "clientId": "abc" }).to_string(),
	)
	.await;

	assert_eq!(response.status(), 400);

	let body = json_body(response).await;

	assert_eq!(body["success"], false);
	assert!(
		body["msg"]
			.as_str()
			.expect("Error envelope should carry a msg.")
			.starts_with("Missing required parameters"),
	);

	// Empty strings count as absent.
	let response = post_json(
		&client,
		&format!("{base}/api/token/refresh"),
		&json!({
			"clientId": "abc",
			"secret": "shhh",
			"refreshToken": "",
			"dataCenter": vendor.base_url(),
		})
		.to_string(),
	)
	.await;

	assert_eq!(response.status(), 400);

	let body = json_body(response).await;

	assert!(
		body["msg"]
			.as_str()
			.expect("Error envelope should carry a msg.")
			.contains("refreshToken"),
	);

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn malformed_json_is_rejected_with_400() {
	let base = spawn_relay().await;
	let client = HttpClient::new();

	for path in ["/api/token", "/api/token/refresh"] {
		let response = post_json(&client, &format!("{base}{path}"), "{not json").await;

		assert_eq!(response.status(), 400);

		let body = json_body(response).await;

		assert_eq!(body["success"], false);
		assert_eq!(body["msg"], "Invalid JSON in request body");
	}
}

#[tokio::test]
async fn non_post_methods_get_405() {
	let base = spawn_relay().await;
	let client = HttpClient::new();
	let response = client
		.get(format!("{base}/api/token"))
		.send()
		.await
		.expect("Request to the relay should complete.");

	assert_eq!(response.status(), 405);
	assert_eq!(json_body(response).await["msg"], "Method not allowed");

	let response = client
		.request(reqwest::Method::PUT, format!("{base}/api/token/refresh"))
		.send()
		.await
		.expect("Request to the relay should complete.");

	assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn options_preflight_answers_200_with_an_empty_body() {
	let base = spawn_relay().await;
	let client = HttpClient::new();
	let response = client
		.request(reqwest::Method::OPTIONS, format!("{base}/api/token"))
		.header("origin", "https://example.com")
		.header("access-control-request-method", "POST")
		.send()
		.await
		.expect("Preflight request should complete.");

	assert_eq!(response.status(), 200);
	assert_eq!(
		response
			.headers()
			.get("access-control-allow-origin")
			.expect("Preflight should carry CORS headers."),
		"*",
	);
	assert!(response.text().await.expect("Body should be readable.").is_empty());
}

#[tokio::test]
async fn refresh_vendor_failure_preserves_status_and_adds_hints() {
	let vendor = MockServer::start_async().await;
	let mock = vendor
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token/r1");
			then.status(403)
				.header("content-type", "application/json")
				.body("{\"success\":false,\"msg\":\"token expired\"}");
		})
		.await;
	let base = spawn_relay().await;
	let client = HttpClient::new();
	let response = post_json(
		&client,
		&format!("{base}/api/token/refresh"),
		&refresh_body(&vendor.base_url()),
	)
	.await;

	assert_eq!(response.status(), 403);

	let body = json_body(response).await;

	assert_eq!(body["success"], false);
	assert_eq!(body["msg"], "token expired");
	assert!(body["troubleshooting"]["403"].is_string());

	mock.assert_async().await;
}

#[tokio::test]
async fn refresh_success_appends_postman_info() {
	let vendor = MockServer::start_async().await;
	let mock = vendor
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/token/r1");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"result\":{\"access_token\":\"a2\",\"refresh_token\":\"r2\",\"expire_time\":7200}}",
			);
		})
		.await;
	let base = spawn_relay().await;
	let client = HttpClient::new();
	let response = post_json(
		&client,
		&format!("{base}/api/token/refresh"),
		&refresh_body(&vendor.base_url()),
	)
	.await;

	assert_eq!(response.status(), 200);

	let body = json_body(response).await;

	assert_eq!(body["result"]["access_token"], "a2");
	assert_eq!(body["postman_info"]["access_token"], "a2");
	assert_eq!(body["postman_info"]["refresh_token"], "r2");

	mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_data_center_maps_to_502() {
	let base = spawn_relay().await;
	let client = HttpClient::new();
	let response =
		post_json(&client, &format!("{base}/api/token"), &grant_body("http://127.0.0.1:1")).await;

	assert_eq!(response.status(), 502);

	let body = json_body(response).await;

	assert_eq!(body["success"], false);
	assert_eq!(body["error"]["kind"], "transport_connect");
}
