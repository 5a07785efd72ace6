//! Account settings, authorization state, and phone-number linking.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, SdkwaClient, require_non_empty};

/// Instance settings as returned by `getSettings` and accepted by
/// `setSettings`.
///
/// Only fields that are set are sent; fields the provider adds later are
/// kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_account: Option<String>,
    /// URL the provider pushes webhook notifications to. Empty disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Value of the `Authorization` header sent with webhook notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_send_messages_milliseconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_send_messages_max_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark_incoming_messages_readed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark_incoming_messages_readed_on_reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing_webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing_message_webhook: Option<String>,
    #[serde(
        default,
        rename = "outgoingAPIMessageWebhook",
        skip_serializing_if = "Option::is_none"
    )]
    pub outgoing_api_message_webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_instance_webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_online_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_instance: Option<String>,
    #[serde(default, rename = "sendFromUTC", skip_serializing_if = "Option::is_none")]
    pub send_from_utc: Option<String>,
    #[serde(default, rename = "sendToUTC", skip_serializing_if = "Option::is_none")]
    pub send_to_utc: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acknowledgement of a settings update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSettingsResponse {
    pub save_settings: bool,
}

/// Authorization state of the instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateInstanceResponse {
    /// `authorized`, `notAuthorized`, `blocked`, `sleepMode`, `starting`, ...
    pub state_instance: String,
}

impl StateInstanceResponse {
    /// Returns `true` once the instance is linked to an account.
    pub fn is_authorized(&self) -> bool {
        self.state_instance == "authorized"
    }
}

/// Acknowledgement of a reboot request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebootResponse {
    pub is_reboot: bool,
}

/// Acknowledgement of a logout request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub is_logout: bool,
}

/// QR code for linking the instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QrCodeResponse {
    /// `qrCode` (base64 PNG in `message`), `alreadyLogged`, or `error`.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Result of requesting an authorization code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorizationCodeResponse {
    pub status: bool,
    pub code: String,
}

/// Delivery channel for a registration code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationMethod {
    #[default]
    Sms,
    Voice,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneNumberRequest {
    phone_number: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationCodeRequest {
    phone_number: u64,
    method: RegistrationMethod,
}

#[derive(Serialize)]
struct CodeRequest<'a> {
    code: &'a str,
}

impl SdkwaClient {
    /// Get the current instance settings.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: sdkwa_client::SdkwaClient) -> Result<(), sdkwa_client::Error> {
    /// let settings = client.get_settings().await?;
    /// println!("Webhook URL: {:?}", settings.webhook_url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_settings(&self) -> Result<AccountSettings, Error> {
        self.get("getSettings").await
    }

    /// Update instance settings. Only the fields that are set are changed.
    pub async fn set_settings(
        &self,
        settings: &AccountSettings,
    ) -> Result<SetSettingsResponse, Error> {
        self.post("setSettings", settings).await
    }

    /// Get the authorization state of the instance.
    pub async fn get_state_instance(&self) -> Result<StateInstanceResponse, Error> {
        self.get("getStateInstance").await
    }

    /// Get the phone warming status.
    pub async fn get_warming_phone_status(&self) -> Result<Value, Error> {
        self.get("getWarmingPhoneStatus").await
    }

    /// Reboot the instance.
    pub async fn reboot(&self) -> Result<RebootResponse, Error> {
        self.get("reboot").await
    }

    /// Log the instance out of its account.
    pub async fn logout(&self) -> Result<LogoutResponse, Error> {
        self.get("logout").await
    }

    /// Get a QR code for linking the instance.
    pub async fn get_qr(&self) -> Result<QrCodeResponse, Error> {
        self.get("qr").await
    }

    /// Get a code for linking the instance by phone number instead of QR.
    pub async fn get_authorization_code(
        &self,
        phone_number: u64,
    ) -> Result<AuthorizationCodeResponse, Error> {
        self.post("getAuthorizationCode", &PhoneNumberRequest { phone_number })
            .await
    }

    /// Request a registration code by SMS or voice call.
    pub async fn request_registration_code(
        &self,
        phone_number: u64,
        method: RegistrationMethod,
    ) -> Result<Value, Error> {
        self.post(
            "requestRegistrationCode",
            &RegistrationCodeRequest {
                phone_number,
                method,
            },
        )
        .await
    }

    /// Submit the registration code received by SMS or call.
    pub async fn send_registration_code(&self, code: &str) -> Result<Value, Error> {
        require_non_empty("code", code)?;
        self.post("sendRegistrationCode", &CodeRequest { code }).await
    }
}
