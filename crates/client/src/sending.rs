//! Sending messages, contacts, locations, and files.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::contacts::ChatIdRequest;
use crate::{Error, SdkwaClient, require_non_empty};

/// Identifier of a message accepted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub id_message: String,
}

/// Text message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_chat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<bool>,
}

impl SendMessageRequest {
    /// Create a text message for `chat_id`.
    pub fn new(chat_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message: message.into(),
            quoted_message_id: None,
            archive_chat: None,
            link_preview: None,
        }
    }

    /// Send as a reply to another message.
    #[must_use]
    pub fn quoting(mut self, id_message: impl Into<String>) -> Self {
        self.quoted_message_id = Some(id_message.into());
        self
    }

    /// Archive the chat after sending.
    #[must_use]
    pub fn archive_chat(mut self, archive: bool) -> Self {
        self.archive_chat = Some(archive);
        self
    }

    /// Enable or disable the link preview.
    #[must_use]
    pub fn link_preview(mut self, preview: bool) -> Self {
        self.link_preview = Some(preview);
        self
    }
}

/// Contact card. At least one of the name fields or `company` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone_contact: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Contact {
    fn validate(&self) -> Result<(), Error> {
        let named = [
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.company,
        ]
        .into_iter()
        .flatten()
        .any(|v| !v.trim().is_empty());
        if !named {
            return Err(Error::Validation(
                "contact needs at least one of firstName, middleName, lastName or company".into(),
            ));
        }
        Ok(())
    }
}

/// Contact card to send to a chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendContactRequest {
    pub chat_id: String,
    pub contact: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
}

impl SendContactRequest {
    /// Create a contact card message for `chat_id`.
    pub fn new(chat_id: impl Into<String>, contact: Contact) -> Self {
        Self {
            chat_id: chat_id.into(),
            contact,
            quoted_message_id: None,
        }
    }
}

/// File hosted at a public URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFileByUrlRequest {
    pub chat_id: String,
    pub url_file: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_chat: Option<bool>,
}

impl SendFileByUrlRequest {
    /// Create a message that sends the file at `url`.
    pub fn new(
        chat_id: impl Into<String>,
        url_file: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            url_file: url_file.into(),
            file_name: file_name.into(),
            caption: None,
            quoted_message_id: None,
            archive_chat: None,
        }
    }

    /// Set the caption shown under the file.
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// File uploaded in the request body (`multipart/form-data`).
#[derive(Clone, PartialEq)]
pub struct SendFileByUploadRequest {
    pub chat_id: String,
    pub file: Vec<u8>,
    pub file_name: String,
    pub caption: Option<String>,
    pub quoted_message_id: Option<String>,
}

impl std::fmt::Debug for SendFileByUploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendFileByUploadRequest")
            .field("chat_id", &self.chat_id)
            .field("file", &format_args!("<{} bytes>", self.file.len()))
            .field("file_name", &self.file_name)
            .field("caption", &self.caption)
            .field("quoted_message_id", &self.quoted_message_id)
            .finish()
    }
}

impl SendFileByUploadRequest {
    /// Create a message that uploads `file` as `file_name`.
    pub fn new(chat_id: impl Into<String>, file: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            file,
            file_name: file_name.into(),
            caption: None,
            quoted_message_id: None,
        }
    }

    /// Set the caption shown under the file.
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Location to send to a chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLocationRequest {
    pub chat_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message_id: Option<String>,
}

impl SendLocationRequest {
    /// Create a location message for `chat_id`.
    pub fn new(chat_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            chat_id: chat_id.into(),
            latitude,
            longitude,
            name_location: None,
            address: None,
            quoted_message_id: None,
        }
    }

    /// Set the place name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name_location = Some(name.into());
        self
    }

    /// Set the street address.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    fn validate(&self) -> Result<(), Error> {
        require_non_empty("chatId", &self.chat_id)?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Validation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Validation(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Location of a file uploaded with `uploadFile`, usable with `sendFileByUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileResponse {
    pub url_file: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatHistoryRequest<'a> {
    chat_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
}

impl SdkwaClient {
    /// Send a text message.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: sdkwa_client::SdkwaClient) -> Result<(), sdkwa_client::Error> {
    /// use sdkwa_client::sending::SendMessageRequest;
    ///
    /// let request = SendMessageRequest::new("79001234567@c.us", "Hello").link_preview(false);
    /// let sent = client.send_message(&request).await?;
    /// println!("Sent {}", sent.id_message);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, Error> {
        require_non_empty("chatId", &request.chat_id)?;
        require_non_empty("message", &request.message)?;
        self.post("sendMessage", request).await
    }

    /// Send a contact card.
    pub async fn send_contact(
        &self,
        request: &SendContactRequest,
    ) -> Result<SendMessageResponse, Error> {
        require_non_empty("chatId", &request.chat_id)?;
        request.contact.validate()?;
        self.post("sendContact", request).await
    }

    /// Send a file by uploading its bytes.
    pub async fn send_file_by_upload(
        &self,
        request: SendFileByUploadRequest,
    ) -> Result<SendMessageResponse, Error> {
        require_non_empty("chatId", &request.chat_id)?;
        require_non_empty("fileName", &request.file_name)?;
        if request.file.is_empty() {
            return Err(Error::Validation("file cannot be empty".into()));
        }

        debug!(
            file_name = %request.file_name,
            bytes = request.file.len(),
            "uploading file"
        );

        let part = Part::bytes(request.file).file_name(request.file_name.clone());
        let mut form = Form::new()
            .text("chatId", request.chat_id)
            .text("fileName", request.file_name)
            .part("file", part);
        if let Some(caption) = request.caption {
            form = form.text("caption", caption);
        }
        if let Some(quoted) = request.quoted_message_id {
            form = form.text("quotedMessageId", quoted);
        }

        self.post_multipart("sendFileByUpload", form).await
    }

    /// Send a file hosted at a URL.
    pub async fn send_file_by_url(
        &self,
        request: &SendFileByUrlRequest,
    ) -> Result<SendMessageResponse, Error> {
        require_non_empty("chatId", &request.chat_id)?;
        require_non_empty("urlFile", &request.url_file)?;
        require_non_empty("fileName", &request.file_name)?;
        self.post("sendFileByUrl", request).await
    }

    /// Send a location pin.
    pub async fn send_location(
        &self,
        request: &SendLocationRequest,
    ) -> Result<SendMessageResponse, Error> {
        request.validate()?;
        self.post("sendLocation", request).await
    }

    /// Upload a file to provider storage for later sending by URL.
    pub async fn upload_file(&self, file: Vec<u8>) -> Result<UploadFileResponse, Error> {
        if file.is_empty() {
            return Err(Error::Validation("file cannot be empty".into()));
        }
        self.post_octet_stream("uploadFile", file).await
    }

    /// Get the message history of a chat, newest first.
    pub async fn get_chat_history(
        &self,
        chat_id: &str,
        count: Option<u32>,
    ) -> Result<Vec<Value>, Error> {
        require_non_empty("chatId", chat_id)?;
        self.post("getChatHistory", &ChatHistoryRequest { chat_id, count })
            .await
    }

    /// Download the file attached to a message.
    pub async fn download_file(&self, chat_id: &str, id_message: &str) -> Result<Vec<u8>, Error> {
        require_non_empty("chatId", chat_id)?;
        require_non_empty("idMessage", id_message)?;
        let body = self
            .post_raw(
                &format!("downloadFile/{id_message}"),
                &ChatIdRequest { chat_id },
            )
            .await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mock::{MockServer, test_client};

    #[test]
    fn send_message_request_omits_unset_options() {
        let request = SendMessageRequest::new("79001234567@c.us", "Hello");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"chatId": "79001234567@c.us", "message": "Hello"})
        );

        let request = request.quoting("BAE5").archive_chat(true).link_preview(false);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["quotedMessageId"], "BAE5");
        assert_eq!(value["archiveChat"], true);
        assert_eq!(value["linkPreview"], false);
    }

    #[test]
    fn contact_requires_a_name_or_company() {
        let contact = Contact {
            phone_contact: 79_001_234_567,
            ..Contact::default()
        };
        assert!(matches!(contact.validate(), Err(Error::Validation(_))));

        let contact = Contact {
            phone_contact: 79_001_234_567,
            company: Some("ACME".into()),
            ..Contact::default()
        };
        assert!(contact.validate().is_ok());
    }

    #[test]
    fn location_bounds() {
        assert!(SendLocationRequest::new("c", 55.75, 37.61).validate().is_ok());
        assert!(SendLocationRequest::new("c", 91.0, 0.0).validate().is_err());
        assert!(SendLocationRequest::new("c", 0.0, -180.5).validate().is_err());
        assert!(SendLocationRequest::new("", 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn upload_request_debug_hides_bytes() {
        let request = SendFileByUploadRequest::new("c", vec![1, 2, 3], "a.bin");
        assert!(format!("{request:?}").contains("<3 bytes>"));
    }

    #[tokio::test]
    async fn send_message_success() {
        let server = MockServer::start().await;
        let client = test_client(&server.base_url);
        let handle = tokio::spawn(server.respond_once(200, r#"{"idMessage":"BAE5F4886AD4FBD5"}"#));

        let sent = client
            .send_message(&SendMessageRequest::new("79001234567@c.us", "Hello"))
            .await
            .unwrap();
        let request = handle.await.unwrap();

        assert_eq!(sent.id_message, "BAE5F4886AD4FBD5");
        assert_eq!(request.path, "/whatsapp/1101/sendMessage");
        assert_eq!(
            request.json(),
            json!({"chatId": "79001234567@c.us", "message": "Hello"})
        );
    }

    #[tokio::test]
    async fn send_message_validates_before_sending() {
        let client = test_client("http://localhost:1");

        let err = client
            .send_message(&SendMessageRequest::new("", "Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("chatId")));

        let err = client
            .send_message(&SendMessageRequest::new("79001234567@c.us", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("message")));
    }

    #[tokio::test]
    async fn send_file_by_upload_uses_multipart() {
        let server = MockServer::start().await;
        let client = test_client(&server.base_url);
        let handle = tokio::spawn(server.respond_once(200, r#"{"idMessage":"F1"}"#));

        let request = SendFileByUploadRequest::new("79001234567@c.us", b"hello".to_vec(), "hello.txt")
            .caption("greeting");
        let sent = client.send_file_by_upload(request).await.unwrap();
        let captured = handle.await.unwrap();

        assert_eq!(sent.id_message, "F1");
        assert_eq!(captured.path, "/whatsapp/1101/sendFileByUpload");
        assert!(
            captured
                .header("content-type")
                .is_some_and(|ct| ct.starts_with("multipart/form-data"))
        );
        let body = captured.body_text();
        assert!(body.contains("name=\"chatId\""));
        assert!(body.contains("filename=\"hello.txt\""));
        assert!(body.contains("greeting"));
    }

    #[tokio::test]
    async fn send_file_by_url_rejects_missing_file_name() {
        let client = test_client("http://localhost:1");
        let err = client
            .send_file_by_url(&SendFileByUrlRequest::new("c@c.us", "https://x/y.png", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("fileName")));
    }

    #[tokio::test]
    async fn upload_file_sends_octet_stream() {
        let server = MockServer::start().await;
        let client = test_client(&server.base_url);
        let handle = tokio::spawn(
            server.respond_once(200, r#"{"urlFile":"https://media.sdkwa.pro/f/abc"}"#),
        );

        let uploaded = client.upload_file(vec![0xde, 0xad, 0xbe, 0xef]).await.unwrap();
        let request = handle.await.unwrap();

        assert_eq!(uploaded.url_file, "https://media.sdkwa.pro/f/abc");
        assert_eq!(
            request.header("content-type"),
            Some("application/octet-stream")
        );
        assert_eq!(request.body, [0xde, 0xad, 0xbe, 0xef]);
    }

    #[tokio::test]
    async fn get_chat_history_omits_count_when_unset() {
        let server = MockServer::start().await;
        let client = test_client(&server.base_url);
        let handle = tokio::spawn(server.respond_once(200, r#"[{"idMessage":"a"}]"#));

        let history = client.get_chat_history("c@c.us", None).await.unwrap();
        let request = handle.await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(request.json(), json!({"chatId": "c@c.us"}));
    }

    #[tokio::test]
    async fn download_file_returns_raw_bytes() {
        let server = MockServer::start().await;
        let client = test_client(&server.base_url);
        let handle = tokio::spawn(server.respond_with(
            200,
            "application/octet-stream",
            vec![0x89, b'P', b'N', b'G'],
        ));

        let bytes = client.download_file("c@c.us", "BAE5").await.unwrap();
        let request = handle.await.unwrap();

        assert_eq!(bytes, [0x89, b'P', b'N', b'G']);
        assert_eq!(request.path, "/whatsapp/1101/downloadFile/BAE5");
        assert_eq!(request.json(), json!({"chatId": "c@c.us"}));
    }
}
