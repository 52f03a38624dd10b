//! Client layer: orchestrates transport calls over HTTP and maps status
//! codes and error payloads to error variants.

pub mod dashboard;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{ApiKey, Message, MessageResponse, Sid, ValidationError};
use crate::transport;

const DEFAULT_BASE_URL: &str = "https://api.telekom.com";
const MESSAGES_PATH: &str = "/service/sms/v1/messages";

pub(crate) const USER_AGENT: &str = concat!("dtsms-rust-sdk ", env!("CARGO_PKG_VERSION"));

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub(crate) client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut request = self.client.get(url);
            for (name, value) in &headers {
                request = request.header(name, value);
            }
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut request = self.client.post(url);
            for (name, value) in &headers {
                request = request.header(name, value);
            }
            let response = request.form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

pub(crate) fn build_reqwest_client(
    timeout: Option<Duration>,
    user_agent: Option<String>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder =
        reqwest::Client::builder().user_agent(user_agent.unwrap_or_else(|| USER_AGENT.to_owned()));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsApiClient`].
pub enum SmsApiError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The API key was rejected (HTTP 401).
    #[error("the API key was not accepted by the SMS API")]
    NotAuthorized,

    /// No message with this sid exists on the account (HTTP 404).
    #[error("no message found for sid {sid}")]
    MessageNotFound {
        /// The sid the status query asked for.
        sid: Sid,
    },

    /// The sender is not verified for the account (HTTP 422).
    #[error("sender {sender} is not verified for this account")]
    SenderNotVerified { sender: String },

    /// The account's wallet cannot cover the message (HTTP 422).
    #[error("not enough money on the wallet")]
    InsufficientWalletBalance,

    /// The API sells no route to the recipient's network (HTTP 422).
    #[error("no route to deliver SMS to {recipient}")]
    NoRouteToRecipient { recipient: String },

    /// HTTP 415, which indicates the client has become incompatible with
    /// the API.
    #[error("the API rejected the request media type")]
    UnsupportedMediaType,

    /// The API reported an internal error (HTTP 500).
    #[error("internal SMS API error")]
    Server,

    /// A 422 with an error message this client has no specific mapping for.
    #[error("API error: {message}")]
    Api { message: String },

    /// Any other non-success HTTP status.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonResponse {
    message: String,
}

const NOT_VERIFIED_PREFIX: &str = "Number: ";
const NOT_VERIFIED_SUFFIX: &str = " cannot be used because is not verified";
const NO_WALLET_MONEY: &str = "Not enough money on the wallet";
const NO_ROUTING_PREFIX: &str = "No routing available for sms from:";

#[derive(Debug, Clone)]
/// Builder for [`SmsApiClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct SmsApiClientBuilder {
    api_key: ApiKey,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SmsApiClientBuilder {
    /// Create a builder with the default base URL and no timeout or
    /// user-agent override.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API host, e.g. for a test double.
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

    /// Build an [`SmsApiClient`].
    pub fn build(self) -> Result<SmsApiClient, SmsApiError> {
        let client = build_reqwest_client(self.timeout, self.user_agent)
            .map_err(|err| SmsApiError::Transport(Box::new(err)))?;
        Ok(SmsApiClient {
            api_key: self.api_key,
            base_url: self.base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Client for the SMS API: send messages, query their status.
///
/// Authenticates every request with the account's API key in the
/// `X-API-Key` header.
pub struct SmsApiClient {
    api_key: ApiKey,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl SmsApiClient {
    /// Create a client against the production API host.
    ///
    /// For more customization, use [`SmsApiClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> SmsApiClientBuilder {
        SmsApiClientBuilder::new(api_key)
    }

    #[cfg(test)]
    pub(crate) fn with_transport(api_key: ApiKey, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http,
        }
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![(ApiKey::FIELD.to_owned(), self.api_key.as_str().to_owned())]
    }

    /// Send a message.
    ///
    /// Errors:
    /// - [`SmsApiError::NotAuthorized`] when the API key is rejected,
    /// - [`SmsApiError::SenderNotVerified`],
    ///   [`SmsApiError::InsufficientWalletBalance`] and
    ///   [`SmsApiError::NoRouteToRecipient`] for the known 422 rejections,
    /// - [`SmsApiError::UnsupportedMediaType`] and [`SmsApiError::Server`]
    ///   for 415 and 500.
    pub async fn send(&self, message: &Message) -> Result<MessageResponse, SmsApiError> {
        let url = format!("{}{MESSAGES_PATH}", self.base_url);
        let params = transport::encode_message_form(message);

        let response = self
            .http
            .post_form(&url, self.auth_headers(), params)
            .await
            .map_err(SmsApiError::Transport)?;

        match response.status {
            200 => transport::decode_message_json_response(&response.body)
                .map_err(|err| SmsApiError::Parse(Box::new(err))),
            401 => Err(SmsApiError::NotAuthorized),
            415 => Err(SmsApiError::UnsupportedMediaType),
            422 => Err(map_unprocessable(message, response.body)),
            500 => Err(SmsApiError::Server),
            status => Err(http_status_error(status, response.body)),
        }
    }

    /// Query the current status of a previously sent message.
    pub async fn status(&self, sid: &Sid) -> Result<MessageResponse, SmsApiError> {
        let url = format!("{}{MESSAGES_PATH}/{}", self.base_url, sid.as_str());

        let response = self
            .http
            .get(&url, self.auth_headers())
            .await
            .map_err(SmsApiError::Transport)?;

        match response.status {
            200 => transport::decode_message_json_response(&response.body)
                .map_err(|err| SmsApiError::Parse(Box::new(err))),
            401 => Err(SmsApiError::NotAuthorized),
            404 => Err(SmsApiError::MessageNotFound { sid: sid.clone() }),
            500 => Err(SmsApiError::Server),
            status => Err(http_status_error(status, response.body)),
        }
    }
}

/// Map the known 422 payload message patterns to their specific variants.
fn map_unprocessable(message: &Message, body: String) -> SmsApiError {
    let Ok(parsed) = serde_json::from_str::<ErrorJsonResponse>(&body) else {
        return http_status_error(422, body);
    };

    if parsed.message.starts_with(NOT_VERIFIED_PREFIX)
        && parsed.message.ends_with(NOT_VERIFIED_SUFFIX)
    {
        SmsApiError::SenderNotVerified {
            sender: message.sender().as_str().to_owned(),
        }
    } else if parsed.message == NO_WALLET_MONEY {
        SmsApiError::InsufficientWalletBalance
    } else if parsed.message.starts_with(NO_ROUTING_PREFIX) {
        SmsApiError::NoRouteToRecipient {
            recipient: message.recipient().number().to_owned(),
        }
    } else {
        SmsApiError::Api {
            message: parsed.message,
        }
    }
}

pub(crate) fn non_empty_body(body: String) -> Option<String> {
    if body.trim().is_empty() { None } else { Some(body) }
}

fn http_status_error(status: u16, body: String) -> SmsApiError {
    SmsApiError::HttpStatus {
        status,
        body: non_empty_body(body),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::error::Error as StdError;
    use std::sync::{Arc, Mutex};

    use super::{BoxFuture, HttpResponse, HttpTransport};

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub(crate) method: &'static str,
        pub(crate) url: String,
        pub(crate) headers: Vec<(String, String)>,
        pub(crate) params: Vec<(String, String)>,
    }

    /// In-memory [`HttpTransport`] that replays queued responses and
    /// records every request it sees.
    #[derive(Debug, Clone)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        responses: VecDeque<HttpResponse>,
        requests: Vec<RecordedRequest>,
    }

    impl FakeTransport {
        pub(crate) fn single(status: u16, body: impl Into<String>) -> Self {
            Self::queued([(status, body.into())])
        }

        pub(crate) fn queued(responses: impl IntoIterator<Item = (u16, String)>) -> Self {
            let responses = responses
                .into_iter()
                .map(|(status, body)| HttpResponse { status, body })
                .collect();
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    responses,
                    requests: Vec::new(),
                })),
            }
        }

        pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
            self.state.lock().unwrap().requests.clone()
        }

        fn record(
            &self,
            method: &'static str,
            url: &str,
            headers: Vec<(String, String)>,
            params: Vec<(String, String)>,
        ) -> HttpResponse {
            let mut state = self.state.lock().unwrap();
            state.requests.push(RecordedRequest {
                method,
                url: url.to_owned(),
                headers,
                params,
            });
            state.responses.pop_front().expect("no queued response")
        }
    }

    impl HttpTransport for FakeTransport {
        fn get<'a>(
            &'a self,
            url: &'a str,
            headers: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move { Ok(self.record("GET", url, headers, Vec::new())) })
        }

        fn post_form<'a>(
            &'a self,
            url: &'a str,
            headers: Vec<(String, String)>,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move { Ok(self.record("POST", url, headers, params)) })
        }
    }

    pub(crate) fn assert_header(headers: &[(String, String)], name: &str, value: &str) {
        assert!(
            headers.iter().any(|(n, v)| n == name && v == value),
            "missing header {name}={value}; got: {headers:?}"
        );
    }

    pub(crate) fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }
}
