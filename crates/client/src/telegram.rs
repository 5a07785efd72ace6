//! Telegram-only operations.
//!
//! These are normally called on a client targeting [`Messenger::Telegram`]:
//!
//! ```no_run
//! # async fn example(client: sdkwa_client::SdkwaClient) -> Result<(), sdkwa_client::Error> {
//! use sdkwa_client::Messenger;
//!
//! let telegram = client.with_messenger(Messenger::Telegram);
//! telegram.send_confirmation_code(79001234567).await?;
//! telegram.sign_in_with_confirmation_code("12345").await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Messenger::Telegram`]: crate::Messenger::Telegram

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{Error, Messenger, SdkwaClient, require_non_empty};

/// Telegram application registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    pub title: String,
    pub short_name: String,
    pub url: String,
    pub description: String,
}

impl CreateAppRequest {
    /// Create an app registration request.
    pub fn new(
        title: impl Into<String>,
        short_name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            short_name: short_name.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneNumberRequest {
    phone_number: u64,
}

#[derive(Serialize)]
struct CodeRequest<'a> {
    code: &'a str,
}

impl SdkwaClient {
    /// Register a Telegram app for the instance.
    pub async fn create_app(&self, request: &CreateAppRequest) -> Result<Value, Error> {
        require_non_empty("title", &request.title)?;
        require_non_empty("shortName", &request.short_name)?;
        self.check_telegram_target("createApp");
        self.post("createApp", request).await
    }

    /// Ask Telegram to send a login code to `phone_number`.
    pub async fn send_confirmation_code(&self, phone_number: u64) -> Result<Value, Error> {
        self.check_telegram_target("sendConfirmationCode");
        self.post("sendConfirmationCode", &PhoneNumberRequest { phone_number })
            .await
    }

    /// Finish sign-in with the code sent to the phone.
    pub async fn sign_in_with_confirmation_code(&self, code: &str) -> Result<Value, Error> {
        require_non_empty("code", code)?;
        self.check_telegram_target("signInWithConfirmationCode");
        self.post("signInWithConfirmationCode", &CodeRequest { code })
            .await
    }

    fn check_telegram_target(&self, method: &str) {
        if self.messenger() != Messenger::Telegram {
            debug!(
                method,
                messenger = %self.messenger(),
                "calling a Telegram method on a non-Telegram client"
            );
        }
    }
}
