//! Read marks, archiving, and message deletion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contacts::ChatIdRequest;
use crate::{Error, SdkwaClient, require_non_empty};

/// Acknowledgement of a read mark.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadChatResponse {
    pub set_read: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatMessageRequest<'a> {
    chat_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_message: Option<&'a str>,
}

impl SdkwaClient {
    /// Mark messages in a chat as read.
    ///
    /// With `id_message` only that message is marked, otherwise the whole
    /// chat.
    pub async fn read_chat(
        &self,
        chat_id: &str,
        id_message: Option<&str>,
    ) -> Result<ReadChatResponse, Error> {
        require_non_empty("chatId", chat_id)?;
        self.post(
            "readChat",
            &ChatMessageRequest {
                chat_id,
                id_message,
            },
        )
        .await
    }

    /// Archive a chat.
    pub async fn archive_chat(&self, chat_id: &str) -> Result<Value, Error> {
        require_non_empty("chatId", chat_id)?;
        self.post("archiveChat", &ChatIdRequest { chat_id }).await
    }

    /// Move a chat out of the archive.
    pub async fn unarchive_chat(&self, chat_id: &str) -> Result<Value, Error> {
        require_non_empty("chatId", chat_id)?;
        self.post("unarchiveChat", &ChatIdRequest { chat_id }).await
    }

    /// Delete a message for everyone in the chat.
    pub async fn delete_message(&self, chat_id: &str, id_message: &str) -> Result<Value, Error> {
        require_non_empty("chatId", chat_id)?;
        require_non_empty("idMessage", id_message)?;
        self.post(
            "deleteMessage",
            &ChatMessageRequest {
                chat_id,
                id_message: Some(id_message),
            },
        )
        .await
    }
}
