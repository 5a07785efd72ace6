//! Account-level instance management.
//!
//! These endpoints live outside the per-instance URL space and authenticate
//! with user credentials instead of an instance token.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::{Error, SdkwaConfig, USER_AGENT, UserConfig, decode, execute};

/// Tariff and billing period for creating or extending an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOrder {
    pub tariff: String,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
}

impl InstanceOrder {
    /// Create an order for `tariff` over `period`.
    pub fn new(tariff: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            tariff: tariff.into(),
            period: period.into(),
            payment_type: None,
        }
    }

    /// Set the payment type.
    #[must_use]
    pub fn with_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_type = Some(payment_type.into());
        self
    }

    fn validate(&self) -> Result<(), Error> {
        crate::require_non_empty("tariff", &self.tariff)?;
        crate::require_non_empty("period", &self.period)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtendRequest<'a> {
    id_instance: u64,
    #[serde(flatten)]
    order: &'a InstanceOrder,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceIdRequest {
    id_instance: u64,
}

/// Client for the instance management API.
#[derive(Clone)]
pub struct UserClient {
    client: Client,
    api_host: String,
    user_id: String,
    user_token: String,
}

impl std::fmt::Debug for UserClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserClient")
            .field("api_host", &self.api_host)
            .field("user_id", &self.user_id)
            .field("user_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl UserClient {
    /// Create a client from user credentials.
    pub fn new(config: UserConfig) -> Result<Self, Error> {
        let config = config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_host: config.api_host,
            user_id: config.user_id,
            user_token: config.user_token,
        })
    }

    /// Create a client from the user credentials of an instance
    /// configuration.
    pub fn from_config(config: &SdkwaConfig) -> Result<Self, Error> {
        Self::new(UserConfig::try_from(config)?)
    }

    /// List the user's instances.
    ///
    /// The response is returned as sent by the provider.
    pub async fn list_instances(&self) -> Result<Value, Error> {
        self.call("instances/list", None::<&()>).await
    }

    /// Order a new instance.
    pub async fn create_instance(&self, order: &InstanceOrder) -> Result<Value, Error> {
        order.validate()?;
        self.call("instance/createByOrder", Some(order)).await
    }

    /// Extend the paid period of an instance.
    pub async fn extend_instance(
        &self,
        id_instance: u64,
        order: &InstanceOrder,
    ) -> Result<Value, Error> {
        order.validate()?;
        self.call(
            "instance/extendByOrder",
            Some(&ExtendRequest { id_instance, order }),
        )
        .await
    }

    /// Delete an instance.
    pub async fn delete_instance(&self, id_instance: u64) -> Result<Value, Error> {
        self.call("instance/delete", Some(&InstanceIdRequest { id_instance }))
            .await
    }

    /// Restore a deleted instance.
    pub async fn restore_instance(&self, id_instance: u64) -> Result<Value, Error> {
        self.call("instance/restore", Some(&InstanceIdRequest { id_instance }))
            .await
    }

    #[instrument(skip(self, body), fields(user_id = %self.user_id))]
    async fn call<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/api/v1/instance/user/{path}", self.api_host);
        let mut req = self
            .client
            .post(&url)
            .header("x-user-id", &self.user_id)
            .header("x-user-token", &self.user_token);
        req = match body {
            Some(body) => req.json(body),
            None => req.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };
        decode(&execute(req).await?)
    }
}
