//! Contacts, chats, and avatar lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, SdkwaClient, require_non_empty};

/// Entry of the contact list or the chat list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `user` or `group`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether a phone number has a WhatsApp account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckWhatsappResponse {
    pub exists_whatsapp: bool,
}

/// Avatar URL of a contact or group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    #[serde(default)]
    pub exists_whatsapp: Option<bool>,
    /// Empty when the contact has no avatar or hides it.
    #[serde(default)]
    pub url_avatar: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatIdRequest<'a> {
    pub chat_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneNumberRequest {
    phone_number: u64,
}

impl SdkwaClient {
    /// List the instance's contacts.
    pub async fn get_contacts(&self) -> Result<Vec<ContactEntry>, Error> {
        self.get("getContacts").await
    }

    /// List the instance's chats.
    pub async fn get_chats(&self) -> Result<Vec<ContactEntry>, Error> {
        self.get("getChats").await
    }

    /// Get profile details of a contact.
    pub async fn get_contact_info(&self, chat_id: &str) -> Result<Value, Error> {
        require_non_empty("chatId", chat_id)?;
        self.post("getContactInfo", &ChatIdRequest { chat_id }).await
    }

    /// Check whether a phone number has a WhatsApp account.
    pub async fn check_whatsapp(&self, phone_number: u64) -> Result<CheckWhatsappResponse, Error> {
        self.post("checkWhatsapp", &PhoneNumberRequest { phone_number })
            .await
    }

    /// Fetch the avatar of a contact or group.
    pub async fn get_avatar(&self, chat_id: &str) -> Result<AvatarResponse, Error> {
        require_non_empty("chatId", chat_id)?;
        self.post("getAvatar", &ChatIdRequest { chat_id }).await
    }
}
