//! Client for the Developer Portal dashboard: login, wallet, API key and
//! price list retrieval.

use std::error::Error as StdError;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::client::{
    HttpTransport, ReqwestTransport, SmsApiClient, build_reqwest_client, non_empty_body,
};
use crate::domain::{ApiKey, PhoneNumber, PriceRecord, Pricing, RegisteredPhoneNumber, Wallet};
use crate::transport;

const DEFAULT_BASE_URL: &str = "https://developer.telekom.com";
const TOKEN_PATH: &str = "/api/v1/oauth/token";
const WALLET_PATH: &str = "/api/v1/wallet";
const API_KEYS_PATH: &str = "/api/v1/api-keys";
const NUMBERS_PATH: &str = "/api/v1/numbers";
const PRICES_PATH: &str = "/api/v1/prices";

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`DashboardClient`].
pub enum DashboardError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The username/password pair was rejected by the token endpoint.
    #[error("the username and/or password was not accepted by the portal")]
    Login,

    /// A data endpoint rejected the access token.
    #[error("the access token was not accepted by the portal")]
    Token,

    /// Any other non-success HTTP status.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    valid_until: Instant,
}

#[derive(Debug, Clone)]
/// Builder for [`DashboardClient`].
pub struct DashboardClientBuilder {
    username: String,
    password: String,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl DashboardClientBuilder {
    /// Create a builder with the default portal host and no timeout or
    /// user-agent override.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the portal host, e.g. for a test double.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`DashboardClient`].
    pub fn build(self) -> Result<DashboardClient, DashboardError> {
        let client = build_reqwest_client(self.timeout, self.user_agent)
            .map_err(|err| DashboardError::Transport(Box::new(err)))?;
        Ok(DashboardClient {
            username: self.username,
            password: self.password,
            base_url: self.base_url,
            http: Arc::new(ReqwestTransport { client }),
            token: Mutex::new(None),
        })
    }
}

/// Client for the account side of the Developer Portal.
///
/// Logs in with the account credentials via the OAuth password grant and
/// caches the access token until shortly before `expires_in` runs out;
/// every data call reuses the cached token and only logs in again once it
/// has expired.
pub struct DashboardClient {
    username: String,
    password: String,
    base_url: String,
    http: Arc<dyn HttpTransport>,
    token: Mutex<Option<CachedToken>>,
}

impl DashboardClient {
    /// Create a client against the production portal host.
    ///
    /// For more customization, use [`DashboardClient::builder`].
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
            token: Mutex::new(None),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> DashboardClientBuilder {
        DashboardClientBuilder::new(username, password)
    }

    #[cfg(test)]
    pub(crate) fn with_transport(
        username: impl Into<String>,
        password: impl Into<String>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            http,
            token: Mutex::new(None),
        }
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|cached| Instant::now() < cached.valid_until)
            .map(|cached| cached.token.clone())
    }

    fn store_token(&self, token: String, expires_in: u64) {
        let mut guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedToken {
            token,
            valid_until: Instant::now() + Duration::from_secs(expires_in),
        });
    }

    /// The access token for this account, from the cache or freshly issued.
    pub async fn token(&self) -> Result<String, DashboardError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let url = format!("{}{TOKEN_PATH}", self.base_url);
        let params = transport::encode_token_form(&self.username, &self.password);
        let response = self
            .http
            .post_form(&url, Vec::new(), params)
            .await
            .map_err(DashboardError::Transport)?;

        match response.status {
            200 => {
                let grant = transport::decode_token_json(&response.body)
                    .map_err(|err| DashboardError::Parse(Box::new(err)))?;
                self.store_token(grant.access_token.clone(), grant.expires_in);
                Ok(grant.access_token)
            }
            400 | 401 => Err(DashboardError::Login),
            status => Err(http_status_error(status, response.body)),
        }
    }

    async fn get_with_token(&self, path: &str) -> Result<String, DashboardError> {
        let token = self.token().await?;
        let url = format!("{}{path}", self.base_url);
        let headers = vec![("Authorization".to_owned(), format!("Bearer {token}"))];

        let response = self
            .http
            .get(&url, headers)
            .await
            .map_err(DashboardError::Transport)?;

        match response.status {
            200 => Ok(response.body),
            401 => Err(DashboardError::Token),
            status => Err(http_status_error(status, response.body)),
        }
    }

    /// The current state of the account's prepaid wallet.
    pub async fn wallet(&self) -> Result<Wallet, DashboardError> {
        let body = self.get_with_token(WALLET_PATH).await?;
        transport::decode_wallet_json(&body).map_err(|err| DashboardError::Parse(Box::new(err)))
    }

    /// The account's API key for the SMS API.
    pub async fn api_key(&self) -> Result<ApiKey, DashboardError> {
        let body = self.get_with_token(API_KEYS_PATH).await?;
        transport::decode_api_key_json(&body).map_err(|err| DashboardError::Parse(Box::new(err)))
    }

    /// All phone numbers registered on the account, across services and
    /// verification states.
    pub async fn phone_numbers(&self) -> Result<Vec<RegisteredPhoneNumber>, DashboardError> {
        let body = self.get_with_token(NUMBERS_PATH).await?;
        transport::decode_phone_numbers_json(&body)
            .map_err(|err| DashboardError::Parse(Box::new(err)))
    }

    /// The numbers currently usable as the sender line of an SMS: verified
    /// and registered for the SMS service.
    pub async fn phone_numbers_for_sms_sender(&self) -> Result<Vec<PhoneNumber>, DashboardError> {
        let numbers = self.phone_numbers().await?;
        Ok(numbers
            .into_iter()
            .filter(RegisteredPhoneNumber::is_verified_sms_sender)
            .map(|registered| registered.number)
            .collect())
    }

    /// Download the current price list from the portal.
    ///
    /// The endpoint is public, no token is needed.
    pub async fn download_price_list(&self) -> Result<Vec<PriceRecord>, DashboardError> {
        let url = format!("{}{PRICES_PATH}", self.base_url);
        let response = self
            .http
            .get(&url, Vec::new())
            .await
            .map_err(DashboardError::Transport)?;

        match response.status {
            200 => transport::decode_price_list_json(&response.body)
                .map_err(|err| DashboardError::Parse(Box::new(err))),
            status => Err(http_status_error(status, response.body)),
        }
    }

    /// A pricing table built from the current online price list, falling
    /// back to the bundled snapshot when the download fails.
    pub async fn pricing(&self) -> Pricing {
        match self.download_price_list().await {
            Ok(records) => Pricing::new(records),
            Err(err) => {
                warn!(%err, "price list download failed, using bundled snapshot");
                Pricing::bundled()
            }
        }
    }

    /// Fetch the account's API key and build an [`SmsApiClient`] with it.
    pub async fn sms_api_client(&self) -> Result<SmsApiClient, DashboardError> {
        let api_key = self.api_key().await?;
        Ok(SmsApiClient::new(api_key))
    }
}

fn http_status_error(status: u16, body: String) -> DashboardError {
    DashboardError::HttpStatus {
        status,
        body: non_empty_body(body),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::client::testing::{FakeTransport, assert_header, assert_param};
    use crate::domain::{Currency, Iso2};

    use super::*;

    const TOKEN_RESPONSE: &str = r#"{"access_token": "abc.def", "expires_in": 3600}"#;

    fn make_client(transport: FakeTransport) -> DashboardClient {
        DashboardClient::with_transport("user@example.com", "secret", Arc::new(transport))
    }

    #[tokio::test]
    async fn wallet_logs_in_and_uses_bearer_token() {
        let transport = FakeTransport::queued([
            (200, TOKEN_RESPONSE.to_owned()),
            (200, r#"{"balance": 9.99, "currency": "EUR"}"#.to_owned()),
        ]);
        let client = make_client(transport.clone());

        let wallet = client.wallet().await.unwrap();
        assert_eq!(wallet.balance(), dec!(9.99));
        assert_eq!(wallet.currency(), Currency::Euro);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(
            requests[0].url,
            "https://developer.telekom.com/api/v1/oauth/token"
        );
        assert_param(&requests[0].params, "username", "user@example.com");
        assert_param(&requests[0].params, "grant_type", "password");
        assert_eq!(requests[1].method, "GET");
        assert_eq!(requests[1].url, "https://developer.telekom.com/api/v1/wallet");
        assert_header(&requests[1].headers, "Authorization", "Bearer abc.def");
    }

    #[tokio::test]
    async fn token_is_cached_across_calls() {
        let transport = FakeTransport::queued([
            (200, TOKEN_RESPONSE.to_owned()),
            (200, r#"{"balance": 9.99, "currency": "EUR"}"#.to_owned()),
            (200, r#"{"rawApiKey": "key-123"}"#.to_owned()),
        ]);
        let client = make_client(transport.clone());

        client.wallet().await.unwrap();
        let api_key = client.api_key().await.unwrap();
        assert_eq!(api_key.as_str(), "key-123");

        // One login, two data calls.
        let methods: Vec<&str> = transport.requests().iter().map(|r| r.method).collect();
        assert_eq!(methods, ["POST", "GET", "GET"]);
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_login_error() {
        let client = make_client(FakeTransport::single(401, ""));
        let err = client.token().await.unwrap_err();
        assert!(matches!(err, DashboardError::Login));

        let client = make_client(FakeTransport::single(400, ""));
        let err = client.wallet().await.unwrap_err();
        assert!(matches!(err, DashboardError::Login));
    }

    #[tokio::test]
    async fn rejected_token_maps_to_token_error() {
        let transport = FakeTransport::queued([
            (200, TOKEN_RESPONSE.to_owned()),
            (401, String::new()),
        ]);
        let client = make_client(transport);

        let err = client.wallet().await.unwrap_err();
        assert!(matches!(err, DashboardError::Token));
    }

    const NUMBERS_RESPONSE: &str = r#"[
        {"id": "a1", "number": "+491755555555", "status": "VERIFIED", "serviceId": "/service/sms/v1"},
        {"id": "a2", "number": "+491755555556", "status": "PENDING_VERIFICATION", "serviceId": "/service/sms/v1"},
        {"id": "a3", "number": "+491755555557", "status": "VERIFIED", "serviceId": "/service/voice/v1"}
    ]"#;

    #[tokio::test]
    async fn phone_numbers_lists_all_registrations() {
        let transport = FakeTransport::queued([
            (200, TOKEN_RESPONSE.to_owned()),
            (200, NUMBERS_RESPONSE.to_owned()),
        ]);
        let client = make_client(transport.clone());

        let numbers = client.phone_numbers().await.unwrap();
        assert_eq!(numbers.len(), 3);
        assert_eq!(numbers[0].number.number(), "+491755555555");

        let requests = transport.requests();
        assert_eq!(
            requests[1].url,
            "https://developer.telekom.com/api/v1/numbers"
        );
        assert_header(&requests[1].headers, "Authorization", "Bearer abc.def");
    }

    #[tokio::test]
    async fn sms_sender_numbers_are_verified_and_sms_registered() {
        let transport = FakeTransport::queued([
            (200, TOKEN_RESPONSE.to_owned()),
            (200, NUMBERS_RESPONSE.to_owned()),
        ]);
        let client = make_client(transport);

        let senders = client.phone_numbers_for_sms_sender().await.unwrap();
        assert_eq!(senders.len(), 1);
        assert_eq!(senders[0].number(), "+491755555555");
    }

    #[tokio::test]
    async fn price_list_download_needs_no_token() {
        let json = r#"[
            {"country": "Germany", "netPrice": 0.0751, "grossPrice": 0.0894, "vat": 0.19, "currency": "EUR"}
        ]"#;
        let transport = FakeTransport::single(200, json);
        let client = make_client(transport.clone());

        let records = client.download_price_list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country.as_deref(), Some("Germany"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://developer.telekom.com/api/v1/prices");
        assert!(requests[0].headers.is_empty());
    }

    #[tokio::test]
    async fn pricing_falls_back_to_bundled_snapshot() {
        let client = make_client(FakeTransport::single(503, "maintenance"));
        let pricing = client.pricing().await;

        // The bundled snapshot prices every mapped country.
        let de = pricing.price_for(Iso2::new("DE").unwrap()).unwrap();
        assert_eq!(de.net_price(), dec!(0.0751));
    }

    #[tokio::test]
    async fn sms_api_client_is_built_from_fetched_key() {
        let transport = FakeTransport::queued([
            (200, TOKEN_RESPONSE.to_owned()),
            (200, r#"{"rawApiKey": "key-123"}"#.to_owned()),
        ]);
        let client = make_client(transport.clone());

        let _sms = client.sms_api_client().await.unwrap();
        let requests = transport.requests();
        assert_eq!(
            requests[1].url,
            "https://developer.telekom.com/api/v1/api-keys"
        );
    }
}
