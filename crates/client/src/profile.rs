//! Account profile: picture, display name, and about text.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, SdkwaClient, require_non_empty};

/// Result of setting a profile picture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPictureResponse {
    #[serde(default)]
    pub url_avatar: Option<String>,
    #[serde(default)]
    pub set_profile_picture: Option<bool>,
    #[serde(default)]
    pub set_group_picture: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct StatusRequest<'a> {
    status: &'a str,
}

/// Build the `file` part of a picture upload.
pub(crate) fn picture_part(file: Vec<u8>) -> Result<Part, Error> {
    if file.is_empty() {
        return Err(Error::Validation("file cannot be empty".into()));
    }
    Ok(Part::bytes(file).file_name("picture.jpg"))
}

impl SdkwaClient {
    /// Upload a new profile picture (JPEG).
    pub async fn set_profile_picture(&self, file: Vec<u8>) -> Result<SetPictureResponse, Error> {
        let form = Form::new().part("file", picture_part(file)?);
        self.post_multipart("setProfilePicture", form).await
    }

    /// Set the account display name.
    pub async fn set_profile_name(&self, name: &str) -> Result<Value, Error> {
        require_non_empty("name", name)?;
        self.post("setProfileName", &NameRequest { name }).await
    }

    /// Set the account status text.
    pub async fn set_profile_status(&self, status: &str) -> Result<Value, Error> {
        require_non_empty("status", status)?;
        self.post("setProfileStatus", &StatusRequest { status })
            .await
    }
}
