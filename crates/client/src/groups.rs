use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::profile::{SetPictureResponse, picture_part};
use crate::{Error, SdkwaClient, require_non_empty};

/// Response from creating a group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupResponse {
    /// Whether the group was created.
    #[serde(default)]
    pub created: Option<bool>,
    /// Chat id of the new group (`...@g.us`).
    pub chat_id: String,
    /// Invitation link for the group.
    #[serde(default)]
    pub group_invite_link: Option<String>,
}

/// A group member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupParticipant {
    /// Member chat id.
    pub id: String,
    /// Whether the member is an admin.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the member created the group.
    #[serde(default)]
    pub is_super_admin: bool,
}

/// Detailed information about a group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupData {
    /// Group chat id.
    pub group_id: Option<String>,
    /// Owner chat id.
    #[serde(default)]
    pub owner: Option<String>,
    /// Group subject.
    #[serde(default, alias = "groupName")]
    pub subject: Option<String>,
    /// Creation time as a Unix timestamp.
    #[serde(default)]
    pub creation: Option<i64>,
    /// Group members.
    #[serde(default)]
    pub participants: Vec<GroupParticipant>,
    /// Invitation link for the group.
    #[serde(default)]
    pub group_invite_link: Option<String>,
    /// Fields not covered above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupRequest<'a> {
    group_name: &'a str,
    chat_ids: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupNameRequest<'a> {
    group_id: &'a str,
    group_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupRequest<'a> {
    group_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantRequest<'a> {
    group_id: &'a str,
    participant_chat_id: &'a str,
}

impl SdkwaClient {
    /// Create a group with the given members.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: sdkwa_client::SdkwaClient) -> Result<(), sdkwa_client::Error> {
    /// let members = vec!["79001234567@c.us".to_string()];
    /// let group = client.create_group("Release team", &members).await?;
    /// println!("Created {}", group.chat_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_group(
        &self,
        group_name: &str,
        chat_ids: &[String],
    ) -> Result<CreateGroupResponse, Error> {
        require_non_empty("groupName", group_name)?;
        if chat_ids.is_empty() {
            return Err(Error::Validation(
                "a group needs at least one participant".into(),
            ));
        }
        for chat_id in chat_ids {
            require_non_empty("chatIds", chat_id)?;
        }
        self.post(
            "createGroup",
            &CreateGroupRequest {
                group_name,
                chat_ids,
            },
        )
        .await
    }

    /// Rename a group.
    pub async fn update_group_name(&self, group_id: &str, group_name: &str) -> Result<Value, Error> {
        require_non_empty("groupId", group_id)?;
        require_non_empty("groupName", group_name)?;
        self.post(
            "updateGroupName",
            &GroupNameRequest {
                group_id,
                group_name,
            },
        )
        .await
    }

    /// Get group metadata and members.
    pub async fn get_group_data(&self, group_id: &str) -> Result<GroupData, Error> {
        require_non_empty("groupId", group_id)?;
        self.post("getGroupData", &GroupRequest { group_id }).await
    }

    /// Add a participant to a group.
    pub async fn add_group_participant(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> Result<Value, Error> {
        self.participant_call("addGroupParticipant", group_id, participant_chat_id)
            .await
    }

    /// Remove a participant from a group.
    pub async fn remove_group_participant(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> Result<Value, Error> {
        self.participant_call("removeGroupParticipant", group_id, participant_chat_id)
            .await
    }

    /// Grant admin rights to a member.
    pub async fn set_group_admin(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> Result<Value, Error> {
        self.participant_call("setGroupAdmin", group_id, participant_chat_id)
            .await
    }

    /// Revoke admin rights from a member.
    pub async fn remove_admin(
        &self,
        group_id: &str,
        participant_chat_id: &str,
    ) -> Result<Value, Error> {
        self.participant_call("removeAdmin", group_id, participant_chat_id)
            .await
    }

    /// Leave a group.
    pub async fn leave_group(&self, group_id: &str) -> Result<Value, Error> {
        require_non_empty("groupId", group_id)?;
        self.post("leaveGroup", &GroupRequest { group_id }).await
    }

    /// Upload a new group picture (JPEG).
    pub async fn set_group_picture(
        &self,
        group_id: &str,
        file: Vec<u8>,
    ) -> Result<SetPictureResponse, Error> {
        require_non_empty("groupId", group_id)?;
        let form = Form::new()
            .text("groupId", group_id.to_owned())
            .part("file", picture_part(file)?);
        self.post_multipart("setGroupPicture", form).await
    }

    async fn participant_call(
        &self,
        method: &str,
        group_id: &str,
        participant_chat_id: &str,
    ) -> Result<Value, Error> {
        require_non_empty("groupId", group_id)?;
        require_non_empty("participantChatId", participant_chat_id)?;
        self.post(
            method,
            &ParticipantRequest {
                group_id,
                participant_chat_id,
            },
        )
        .await
    }
}
