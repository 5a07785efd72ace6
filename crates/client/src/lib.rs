//! SDKWA HTTP Client
//!
//! A native Rust client for the SDKWA messaging API, covering both the
//! WhatsApp and the Telegram transports.
//!
//! # Quick Start
//!
//! ```no_run
//! use sdkwa_client::{SdkwaClient, SdkwaConfig};
//! use sdkwa_client::sending::SendMessageRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sdkwa_client::Error> {
//!     let client = SdkwaClient::new(SdkwaConfig::new("1101000001", "api-token"))?;
//!
//!     let state = client.get_state_instance().await?;
//!     println!("Instance state: {}", state.state_instance);
//!
//!     let sent = client
//!         .send_message(&SendMessageRequest::new("79001234567@c.us", "Hello"))
//!         .await?;
//!     println!("Sent message {}", sent.id_message);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Transports
//!
//! Every endpoint is addressed as `{api_host}/{messenger}/{id_instance}/{method}`.
//! The configured messenger (WhatsApp by default) is used unless a call goes
//! through [`SdkwaClient::with_messenger`]:
//!
//! ```no_run
//! # async fn example(client: sdkwa_client::SdkwaClient) -> Result<(), sdkwa_client::Error> {
//! use sdkwa_client::Messenger;
//!
//! let telegram = client.with_messenger(Messenger::Telegram);
//! telegram.send_confirmation_code(79001234567).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Credentials can be read from the environment (`SDKWA_ID_INSTANCE`,
//! `SDKWA_API_TOKEN`, `SDKWA_API_HOST`, `SDKWA_USER_ID`,
//! `SDKWA_USER_TOKEN`):
//!
//! ```no_run
//! let client = sdkwa_client::SdkwaClient::from_env().unwrap();
//! ```
//!
//! Or configured through the builder:
//!
//! ```no_run
//! use sdkwa_client::{SdkwaClientBuilder, SdkwaConfig};
//! use std::time::Duration;
//!
//! let config = SdkwaConfig::new("1101000001", "api-token")
//!     .with_timeout(Duration::from_secs(10));
//! let client = SdkwaClientBuilder::new(config).build().unwrap();
//! ```

pub mod account;
pub mod chats;
pub mod config;
pub mod contacts;
mod error;
pub mod groups;
pub mod instances;
pub mod journals;
pub mod poller;
pub mod profile;
pub mod queue;
pub mod receiving;
pub mod sending;
pub mod telegram;

#[cfg(test)]
mod mock;

pub use config::{Messenger, SdkwaConfig, UserConfig};
pub use error::Error;
pub use instances::UserClient;
pub use poller::NotificationPoller;

// Re-export the notification model so callers don't need a direct `sdkwa_webhook` dependency.
pub use sdkwa_webhook::{Notification, ReceivedNotification, WebhookDispatcher, WebhookType};

use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// `User-Agent` sent with every request.
pub(crate) const USER_AGENT: &str = concat!("sdkwa-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP client for one SDKWA instance.
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Clone)]
pub struct SdkwaClient {
    client: Client,
    api_host: String,
    id_instance: String,
    api_token: String,
    user_id: Option<String>,
    user_token: Option<String>,
    messenger: Messenger,
}

impl std::fmt::Debug for SdkwaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkwaClient")
            .field("api_host", &self.api_host)
            .field("id_instance", &self.id_instance)
            .field("api_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("messenger", &self.messenger)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring an [`SdkwaClient`].
#[derive(Debug)]
pub struct SdkwaClientBuilder {
    config: SdkwaConfig,
    client: Option<Client>,
}

impl SdkwaClientBuilder {
    /// Create a new builder from a configuration.
    pub fn new(config: SdkwaConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Use a custom reqwest Client.
    ///
    /// The configured timeout and TLS settings are ignored in that case.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> Result<SdkwaClient, Error> {
        let config = self.config.validate()?;

        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(config.timeout)
                .user_agent(USER_AGENT)
                .danger_accept_invalid_certs(config.accept_invalid_certs)
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(SdkwaClient {
            client,
            api_host: config.api_host,
            id_instance: config.id_instance,
            api_token: config.api_token_instance,
            user_id: config.user_id,
            user_token: config.user_token,
            messenger: config.messenger,
        })
    }
}

impl SdkwaClient {
    /// Create a client with default HTTP settings.
    pub fn new(config: SdkwaConfig) -> Result<Self, Error> {
        SdkwaClientBuilder::new(config).build()
    }

    /// Create a client from `SDKWA_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(SdkwaConfig::from_env()?)
    }

    /// Create a builder for advanced configuration.
    pub fn builder(config: SdkwaConfig) -> SdkwaClientBuilder {
        SdkwaClientBuilder::new(config)
    }

    /// A client for the same instance that targets another messenger.
    #[must_use]
    pub fn with_messenger(&self, messenger: Messenger) -> Self {
        Self {
            messenger,
            ..self.clone()
        }
    }

    /// The API host, without a trailing slash.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// The instance id.
    pub fn id_instance(&self) -> &str {
        &self.id_instance
    }

    /// The messenger this client targets.
    pub fn messenger(&self) -> Messenger {
        self.messenger
    }

    /// Build the endpoint URL for an API method.
    fn url(&self, method: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_host,
            self.messenger,
            self.id_instance,
            method.trim_start_matches('/')
        )
    }

    /// Add authorization and identification headers.
    fn add_auth(&self, req: RequestBuilder) -> RequestBuilder {
        let mut req = req
            .bearer_auth(&self.api_token)
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        if let Some(user_id) = &self.user_id {
            req = req.header("x-user-id", user_id);
        }
        if let Some(user_token) = &self.user_token {
            req = req.header("x-user-token", user_token);
        }
        req
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    pub(crate) async fn get<T: DeserializeOwned>(&self, method: &str) -> Result<T, Error> {
        let req = self.client.get(self.url(method));
        decode(&self.send(method, req).await?)
    }

    pub(crate) async fn get_with_query<T, Q>(&self, method: &str, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.client.get(self.url(method)).query(query);
        decode(&self.send(method, req).await?)
    }

    pub(crate) async fn post<T, B>(&self, method: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        decode(&self.post_raw(method, body).await?)
    }

    /// POST a JSON body and return the undecoded response body.
    pub(crate) async fn post_raw<B>(&self, method: &str, body: &B) -> Result<Bytes, Error>
    where
        B: Serialize + ?Sized,
    {
        let req = self.client.post(self.url(method)).json(body);
        self.send(method, req).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        method: &str,
        form: Form,
    ) -> Result<T, Error> {
        let req = self.client.post(self.url(method)).multipart(form);
        decode(&self.send(method, req).await?)
    }

    pub(crate) async fn post_octet_stream<T: DeserializeOwned>(
        &self,
        method: &str,
        data: Vec<u8>,
    ) -> Result<T, Error> {
        let req = self
            .client
            .post(self.url(method))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data);
        decode(&self.send(method, req).await?)
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, method: &str) -> Result<T, Error> {
        let req = self.client.delete(self.url(method));
        decode(&self.send(method, req).await?)
    }

    #[instrument(skip(self, req), fields(messenger = %self.messenger, id_instance = %self.id_instance))]
    async fn send(&self, method: &str, req: RequestBuilder) -> Result<Bytes, Error> {
        execute(self.add_auth(req)).await
    }
}

/// Send a request and return the body of a successful response.
pub(crate) async fn execute(req: RequestBuilder) -> Result<Bytes, Error> {
    let response = req
        .send()
        .await
        .map_err(|e| Error::Connection(e.to_string()))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Connection(e.to_string()))?;

    if !status.is_success() {
        debug!(status = status.as_u16(), "SDKWA API returned an error");
        return Err(Error::from_response(status, &body));
    }

    debug!(status = status.as_u16(), bytes = body.len(), "SDKWA API call succeeded");
    Ok(body)
}

/// Decode a JSON response body. An empty body decodes as `null`.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| Error::Deserialization(e.to_string()))
}

/// Reject empty or whitespace-only string parameters.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
