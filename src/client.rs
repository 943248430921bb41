use std::{fmt::Debug, sync::Arc};

use http::{Method, StatusCode};
use serde::Serialize;
use url::Url;

use crate::{
    config::{Config, Credentials, Environment},
    errors::{ApiError, Error, Result},
    normalize::normalize_keys,
    requests::{
        AddressOptions, CardExpiry, CardOptions, CreateAddressRequest, CreateCardRequest,
        CreateProfileRequest, ProfileOptions, PurchaseRequest, UpdateCardRequest,
    },
    transport::{ApiRequest, HttpTransport, RawResponse, Transport},
    types::Document,
};

const CUSTOMER_VAULT: [&str; 2] = ["customervault", "v1"];
const CARD_PAYMENTS: [&str; 2] = ["cardpayments", "v1"];

/// Blocking client for the customer vault and card payments APIs.
///
/// Each operation is one HTTP round-trip. Successful responses come back as
/// normalized [`Document`]s, failures as [`Error::Api`] keyed by status.
#[derive(Clone)]
pub struct PaymentClient {
    config: Config,
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl Debug for PaymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PaymentClient {
    /// Builds a client over the default HTTP transport. No request is sent.
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }

    /// Builds a client from `NETBANX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Result<Self> {
        let base_url = config.resolve_base_url()?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(PaymentClient {
            config,
            base_url,
            transport: Arc::new(transport),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The host chosen when the client was built.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn environment(&self) -> Environment {
        self.config.environment()
    }

    pub fn credentials(&self) -> Credentials {
        self.config.credentials()
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_present()
    }

    /// Creates a customer profile, optionally with a card and its billing address.
    pub fn create_profile(
        &self,
        merchant_customer_id: impl Into<String>,
        locale: impl Into<String>,
        options: ProfileOptions,
    ) -> Result<Document> {
        let request =
            CreateProfileRequest::new(merchant_customer_id.into(), locale.into(), options);
        self.call(Method::POST, &profiles(&[]), Some(&request))
    }

    pub fn get_profile(&self, id: &str) -> Result<Document> {
        self.call::<()>(Method::GET, &profiles(&[id]), None)
    }

    /// Deletes a profile. Deleting a missing profile fails with `NotFound`.
    pub fn delete_profile(&self, id: &str) -> Result<bool> {
        self.delete(&profiles(&[id]))
    }

    pub fn create_address(
        &self,
        profile_id: &str,
        country: impl Into<String>,
        zip: impl Into<String>,
        options: AddressOptions,
    ) -> Result<Document> {
        let request = CreateAddressRequest::new(country.into(), zip.into(), options);
        self.call(
            Method::POST,
            &profiles(&[profile_id, "addresses"]),
            Some(&request),
        )
    }

    pub fn create_card(
        &self,
        profile_id: &str,
        number: impl Into<String>,
        month: u8,
        year: u16,
        options: CardOptions,
    ) -> Result<Document> {
        let request = CreateCardRequest::new(number.into(), CardExpiry::new(month, year), options);
        self.call(
            Method::POST,
            &profiles(&[profile_id, "cards"]),
            Some(&request),
        )
    }

    pub fn get_card(&self, profile_id: &str, id: &str) -> Result<Document> {
        self.call::<()>(Method::GET, &profiles(&[profile_id, "cards", id]), None)
    }

    pub fn update_card(
        &self,
        profile_id: &str,
        id: &str,
        month: u8,
        year: u16,
        options: CardOptions,
    ) -> Result<Document> {
        let request = UpdateCardRequest::new(CardExpiry::new(month, year), options);
        self.call(
            Method::PUT,
            &profiles(&[profile_id, "cards", id]),
            Some(&request),
        )
    }

    /// Deletes a card. A second delete of the same card fails with `NotFound`.
    pub fn delete_card(&self, profile_id: &str, id: &str) -> Result<bool> {
        self.delete(&profiles(&[profile_id, "cards", id]))
    }

    /// Authorizes and settles `amount` (minor units) against a vaulted card's
    /// payment token, on the configured account.
    pub fn purchase(
        &self,
        amount: u64,
        token: impl Into<String>,
        merchant_ref_num: impl Into<String>,
    ) -> Result<Document> {
        let request = PurchaseRequest::new(amount, token.into(), merchant_ref_num.into());
        let path = [
            &CARD_PAYMENTS[..],
            &["accounts", self.config.account_number.as_str(), "auths"][..],
        ]
        .concat();
        self.call(Method::POST, &path, Some(&request))
    }

    fn call<B: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        body: Option<&B>,
    ) -> Result<Document> {
        let response = self.send(method, path, body)?;
        let body = parse_body(&response)?;
        resolve_result(response.status, body)
    }

    fn delete(&self, path: &[&str]) -> Result<bool> {
        let response = self.send::<()>(Method::DELETE, path, None)?;
        // The success body of a delete is irrelevant; only a failure's body is kept.
        let body = parse_error_body(&response.body);
        resolve_result(response.status, body)?;
        Ok(response.status == StatusCode::OK)
    }

    fn send<B: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        body: Option<&B>,
    ) -> Result<RawResponse> {
        let url = self.url(path)?;
        let body = body.map(serde_json::to_value).transpose()?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Sending {method} {}", url.path());

        let response = self.transport.send(ApiRequest { method, url, body })?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Gateway responded with status {}", response.status);

        Ok(response)
    }

    fn url(&self, path: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }
}

fn profiles<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    [&CUSTOMER_VAULT[..], &["profiles"][..], rest].concat()
}

/// True for the statuses the gateway uses for success, `200..=205`.
pub fn is_success(status: StatusCode) -> bool {
    (200..=205).contains(&status.as_u16())
}

/// Returns `body` unchanged on success, else the typed gateway error.
pub fn resolve_result(status: StatusCode, body: Document) -> Result<Document> {
    if is_success(status) {
        return Ok(body);
    }

    let err = ApiError::from_response(status, body);

    #[cfg(feature = "tracing")]
    tracing::warn!(
        "Gateway request failed: status={}, kind={}, code={}",
        err.status.as_u16(),
        err.kind,
        err.code().unwrap_or_default()
    );

    Err(err.into())
}

/// Parses and normalizes a response body. An empty body is `null`.
///
/// A success status with a non-JSON body is a decode error. A failure status
/// keeps whatever text came back, so the error still carries it.
pub fn parse_body(response: &RawResponse) -> Result<Document> {
    if is_success(response.status) {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::Null);
        }
        Ok(normalize_keys(serde_json::from_slice(&response.body)?))
    } else {
        Ok(parse_error_body(&response.body))
    }
}

fn parse_error_body(body: &[u8]) -> Document {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Document::Null;
    }
    match serde_json::from_slice(body) {
        Ok(value) => normalize_keys(value),
        Err(_) => Document::String(String::from_utf8_lossy(body).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use serde_json::json;

    use super::*;
    use crate::errors::ApiErrorKind;

    /// Records requests and replays canned responses in order.
    #[derive(Default)]
    struct ScriptedTransport {
        requests: Arc<Mutex<Vec<ApiRequest>>>,
        responses: Mutex<VecDeque<RawResponse>>,
    }

    impl ScriptedTransport {
        fn respond(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(RawResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.as_bytes().to_vec(),
            });
            self
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: ApiRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left"))
        }
    }

    fn config() -> Config {
        Config::builder()
            .account_number("1001234567")
            .api_key("devcentre322")
            .api_secret("secret")
            .build()
    }

    fn client(transport: ScriptedTransport) -> (PaymentClient, Arc<Mutex<Vec<ApiRequest>>>) {
        let requests = transport.requests.clone();
        let client = PaymentClient::with_transport(config(), transport).unwrap();
        (client, requests)
    }

    #[test]
    fn test_base_url_from_mode() {
        let sandbox = PaymentClient::new(Config::default()).unwrap();
        assert_eq!(sandbox.base_url().as_str(), "https://api.test.netbanx.com/");
        assert_eq!(sandbox.environment(), Environment::Sandbox);

        let live = PaymentClient::new(Config::builder().sandbox_mode(false).build()).unwrap();
        assert_eq!(live.base_url().as_str(), "https://api.netbanx.com/");
    }

    #[test]
    fn test_credentials() {
        let client = PaymentClient::new(Config::default()).unwrap();
        assert!(!client.has_credentials());

        let client = PaymentClient::new(Config::builder().api_key("k").api_secret("s").build())
            .unwrap();
        assert!(!client.has_credentials());

        let client = PaymentClient::new(config()).unwrap();
        assert!(client.has_credentials());
        assert_eq!(client.credentials().account_number, "1001234567");
    }

    #[test]
    fn test_rejects_non_hierarchical_base_url() {
        let config = Config::builder()
            .base_url(Url::parse("mailto:ops@example.com").unwrap())
            .build();
        let err = PaymentClient::with_transport(config, ScriptedTransport::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_resolve_result_success_range() {
        for code in 200..=205 {
            let status = StatusCode::from_u16(code).unwrap();
            for body in [json!({ "id": "1" }), json!(true), json!(null)] {
                assert_eq!(resolve_result(status, body.clone()).unwrap(), body);
            }
        }
    }

    #[test]
    fn test_resolve_result_failures() {
        let body = json!({ "error": { "code": "5269", "message": "not found" } });
        for (code, kind) in [
            (400, ApiErrorKind::BadRequest),
            (401, ApiErrorKind::Unauthorized),
            (404, ApiErrorKind::NotFound),
            (206, ApiErrorKind::Other(206)),
            (502, ApiErrorKind::ServerError(502)),
        ] {
            let err = resolve_result(StatusCode::from_u16(code).unwrap(), body.clone()).unwrap_err();
            let api = err.as_api().unwrap();
            assert_eq!(api.kind, kind);
            assert_eq!(api.body, body);
        }
    }

    #[test]
    fn test_parse_body() {
        let ok = |body: &str| RawResponse {
            status: StatusCode::OK,
            body: body.as_bytes().to_vec(),
        };
        assert_eq!(parse_body(&ok("")).unwrap(), Document::Null);
        assert_eq!(
            parse_body(&ok(r#"{"card_expiry":{"Month":1}}"#)).unwrap(),
            json!({ "cardExpiry": { "month": 1 } })
        );
        assert!(matches!(parse_body(&ok("<html>")), Err(Error::Decode(_))));

        let failed = RawResponse {
            status: StatusCode::BAD_GATEWAY,
            body: b"<html>bad gateway</html>".to_vec(),
        };
        assert_eq!(parse_body(&failed).unwrap(), json!("<html>bad gateway</html>"));
    }

    #[test]
    fn test_create_profile_request() {
        let (client, requests) = client(ScriptedTransport::default().respond(
            200,
            r#"{"id":"p-1","merchantCustomerId":"123","locale":"en_US","status":"ACTIVE"}"#,
        ));

        let profile = client
            .create_profile(
                "123",
                "en_US",
                ProfileOptions::builder()
                    .first_name("test")
                    .last_name("test")
                    .email("test@test.com")
                    .build(),
            )
            .unwrap();
        assert_eq!(profile["status"], "ACTIVE");

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(
            requests[0].url.as_str(),
            "https://api.test.netbanx.com/customervault/v1/profiles"
        );
        assert_eq!(
            requests[0].body,
            Some(json!({
                "merchantCustomerId": "123",
                "locale": "en_US",
                "firstName": "test",
                "lastName": "test",
                "email": "test@test.com",
                "card": null
            }))
        );
    }

    #[test]
    fn test_card_requests_omit_absent_fields() {
        let (client, requests) = client(
            ScriptedTransport::default()
                .respond(200, r#"{"id":"c-1"}"#)
                .respond(200, r#"{"id":"c-1"}"#),
        );

        client
            .create_card("p-1", "4111111111111111", 12, 2019, CardOptions::default())
            .unwrap();
        client
            .update_card(
                "p-1",
                "c-1",
                6,
                2019,
                CardOptions::builder().holder_name("Johnny Smith").build(),
            )
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(
            requests[0].url.path(),
            "/customervault/v1/profiles/p-1/cards"
        );
        assert_eq!(
            requests[0].body,
            Some(json!({
                "cardNum": "4111111111111111",
                "cardExpiry": { "month": 12, "year": 2019 }
            }))
        );
        assert_eq!(requests[1].method, Method::PUT);
        assert_eq!(
            requests[1].url.path(),
            "/customervault/v1/profiles/p-1/cards/c-1"
        );
        assert_eq!(
            requests[1].body,
            Some(json!({
                "cardExpiry": { "month": 6, "year": 2019 },
                "holderName": "Johnny Smith"
            }))
        );
    }

    #[test]
    fn test_get_requests_have_no_body() {
        let (client, requests) = client(
            ScriptedTransport::default()
                .respond(200, r#"{"id":"p-1"}"#)
                .respond(200, r#"{"id":"c-1"}"#),
        );

        client.get_profile("p-1").unwrap();
        client.get_card("p-1", "c-1").unwrap();

        let requests = requests.lock().unwrap();
        assert!(requests.iter().all(|r| r.method == Method::GET && r.body.is_none()));
        assert_eq!(requests[1].url.path(), "/customervault/v1/profiles/p-1/cards/c-1");
    }

    #[test]
    fn test_path_ids_are_single_segments() {
        let (client, requests) = client(ScriptedTransport::default().respond(200, "{}"));

        client.get_profile("../../cardpayments").unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(
            requests[0].url.path(),
            "/customervault/v1/profiles/..%2F..%2Fcardpayments"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config = Config::builder()
            .base_url(Url::parse("http://localhost:9000/gateway/").unwrap())
            .build();
        let transport = ScriptedTransport::default().respond(200, "{}");
        let requests = transport.requests.clone();
        let client = PaymentClient::with_transport(config, transport).unwrap();

        client.create_address("p-1", "US", "10014", AddressOptions::default()).unwrap();

        assert_eq!(
            requests.lock().unwrap()[0].url.as_str(),
            "http://localhost:9000/gateway/customervault/v1/profiles/p-1/addresses"
        );
    }

    #[test]
    fn test_purchase_uses_account_number() {
        let (client, requests) = client(ScriptedTransport::default().respond(
            200,
            r#"{"id":"a-1","amount":400,"settleWithAuth":true,"status":"COMPLETED"}"#,
        ));

        let result = client.purchase(400, "CIgbMO3P1j7HUiy", "ref-1").unwrap();
        assert_eq!(result["amount"], 400);

        let requests = requests.lock().unwrap();
        assert_eq!(
            requests[0].url.path(),
            "/cardpayments/v1/accounts/1001234567/auths"
        );
        assert_eq!(
            requests[0].body,
            Some(json!({
                "amount": 400,
                "merchantRefNum": "ref-1",
                "settleWithAuth": true,
                "card": { "paymentToken": "CIgbMO3P1j7HUiy" }
            }))
        );
    }

    #[test]
    fn test_delete_twice_fails_not_found() {
        let (client, requests) = client(
            ScriptedTransport::default()
                .respond(200, "")
                .respond(404, r#"{"error":{"code":"5269","message":"The ID(s) specified in the URL do not correspond to the values in the system."}}"#),
        );

        assert!(client.delete_card("p-1", "c-1").unwrap());

        let err = client.delete_card("p-1", "c-1").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.as_api().unwrap().code().as_deref(), Some("5269"));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.method == Method::DELETE));
    }

    #[test]
    fn test_delete_ignores_success_body() {
        let (client, _) = client(
            ScriptedTransport::default()
                .respond(200, "not json")
                .respond(204, ""),
        );

        assert!(client.delete_profile("p-1").unwrap());
        // Only 200 counts as deleted, other success codes do not fail.
        assert!(!client.delete_profile("p-2").unwrap());
    }

    #[test]
    fn test_error_body_is_normalized() {
        let (client, _) = client(
            ScriptedTransport::default()
                .respond(400, r#"{"error":{"code":"5068","field_errors":[{"field":"cardNum","error":"invalid"}]}}"#),
        );

        let err = client
            .create_card("p-1", "4111111111", 12, 2017, CardOptions::default())
            .unwrap_err();
        assert!(err.is_bad_request());
        let api = err.as_api().unwrap();
        assert_eq!(api.field_errors().len(), 1);
        assert!(api.body["error"].get("fieldErrors").is_some());
    }
}
