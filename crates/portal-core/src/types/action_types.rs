//! Action tags attached to the results of write operations
//!
//! Route actions answer with a JSON body carrying an `actionType` tag. Loaders
//! and screens use the tag to decide what to refetch and which notification
//! to show. The tag vocabulary is closed; wire strings keep the exact spelling
//! used by the form submissions, separators included.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tag identifying which write operation produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "rename")]
    Rename,
    #[serde(rename = "save")]
    Save,
    #[serde(rename = "save_metadata")]
    SaveMetadata,
    #[serde(rename = "create_asset")]
    CreateAsset,
    #[serde(rename = "create_asset_visualize")]
    CreateAssetVisualize,
    #[serde(rename = "publish")]
    Publish,
    #[serde(rename = "publish_visualize")]
    PublishVisualize,
    #[serde(rename = "create_chat")]
    CreateChat,
    #[serde(rename = "duplicate")]
    Duplicate,
    #[serde(rename = "send_message")]
    SendMessage,
    #[serde(rename = "upload")]
    Upload,
    #[serde(rename = "upload-file")]
    UploadFile,
    #[serde(rename = "generate")]
    Generate,
    #[serde(rename = "start-workflow")]
    StartWorkflow,
    #[serde(rename = "suggestion")]
    Suggestion,
    #[serde(rename = "switch_role")]
    SwitchRole,
    #[serde(rename = "add_uc")]
    AddUseCase,
}

impl ActionType {
    /// Every tag in the vocabulary
    pub const ALL: [ActionType; 18] = [
        ActionType::Delete,
        ActionType::Rename,
        ActionType::Save,
        ActionType::SaveMetadata,
        ActionType::CreateAsset,
        ActionType::CreateAssetVisualize,
        ActionType::Publish,
        ActionType::PublishVisualize,
        ActionType::CreateChat,
        ActionType::Duplicate,
        ActionType::SendMessage,
        ActionType::Upload,
        ActionType::UploadFile,
        ActionType::Generate,
        ActionType::StartWorkflow,
        ActionType::Suggestion,
        ActionType::SwitchRole,
        ActionType::AddUseCase,
    ];

    /// Wire representation of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Delete => "delete",
            ActionType::Rename => "rename",
            ActionType::Save => "save",
            ActionType::SaveMetadata => "save_metadata",
            ActionType::CreateAsset => "create_asset",
            ActionType::CreateAssetVisualize => "create_asset_visualize",
            ActionType::Publish => "publish",
            ActionType::PublishVisualize => "publish_visualize",
            ActionType::CreateChat => "create_chat",
            ActionType::Duplicate => "duplicate",
            ActionType::SendMessage => "send_message",
            ActionType::Upload => "upload",
            ActionType::UploadFile => "upload-file",
            ActionType::Generate => "generate",
            ActionType::StartWorkflow => "start-workflow",
            ActionType::Suggestion => "suggestion",
            ActionType::SwitchRole => "switch_role",
            ActionType::AddUseCase => "add_uc",
        }
    }

    /// Look up a tag, returning `None` for anything outside the vocabulary
    pub fn from_tag(tag: &str) -> Option<ActionType> {
        Self::ALL.iter().copied().find(|action| action.as_str() == tag)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| Error::unknown_action_type(s))
    }
}

/// Screen family whose route handler dispatches a subset of the tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionDomain {
    Asset,
    Chat,
    Content,
    ContentChat,
    Dataset,
    Template,
    Operator,
    User,
}

impl std::fmt::Display for ActionDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionDomain::Asset => write!(f, "asset"),
            ActionDomain::Chat => write!(f, "chat"),
            ActionDomain::Content => write!(f, "content"),
            ActionDomain::ContentChat => write!(f, "content-chat"),
            ActionDomain::Dataset => write!(f, "dataset"),
            ActionDomain::Template => write!(f, "template"),
            ActionDomain::Operator => write!(f, "operator"),
            ActionDomain::User => write!(f, "user"),
        }
    }
}

impl FromStr for ActionDomain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asset" => Ok(ActionDomain::Asset),
            "chat" => Ok(ActionDomain::Chat),
            "content" => Ok(ActionDomain::Content),
            "content-chat" => Ok(ActionDomain::ContentChat),
            "dataset" => Ok(ActionDomain::Dataset),
            "template" => Ok(ActionDomain::Template),
            "operator" => Ok(ActionDomain::Operator),
            "user" => Ok(ActionDomain::User),
            other => Err(Error::unknown_domain(other)),
        }
    }
}

impl ActionDomain {
    /// Every route domain
    pub const ALL: [ActionDomain; 8] = [
        ActionDomain::Asset,
        ActionDomain::Chat,
        ActionDomain::Content,
        ActionDomain::ContentChat,
        ActionDomain::Dataset,
        ActionDomain::Template,
        ActionDomain::Operator,
        ActionDomain::User,
    ];

    /// Tags accepted by this domain's route handler
    pub fn actions(&self) -> &'static [ActionType] {
        use ActionType::*;

        match self {
            ActionDomain::Asset => &[Delete, Upload],
            ActionDomain::Chat => &[Delete],
            ActionDomain::Content => &[
                Delete,
                Rename,
                Save,
                CreateAsset,
                Publish,
                CreateAssetVisualize,
                PublishVisualize,
                CreateChat,
                Duplicate,
                SaveMetadata,
            ],
            ActionDomain::ContentChat => &[SendMessage],
            ActionDomain::Dataset => &[Delete, Save, UploadFile],
            ActionDomain::Template => &[Delete, Generate, Save],
            ActionDomain::Operator => &[Generate, Rename, Save, StartWorkflow, Suggestion],
            ActionDomain::User => &[Delete, SwitchRole, AddUseCase],
        }
    }

    /// Check whether the domain handles a tag
    pub fn accepts(&self, action: ActionType) -> bool {
        self.actions().contains(&action)
    }

    /// Resolve a submitted `_action` intent for this domain
    ///
    /// Unknown tags and tags belonging to another domain are both rejected
    /// with [`Error::InvalidActionType`], matching the 400 response route
    /// actions return for an unexpected intent.
    pub fn parse_intent(&self, intent: &str) -> Result<ActionType> {
        ActionType::from_tag(intent)
            .filter(|action| self.accepts(*action))
            .ok_or_else(|| Error::invalid_action_type(self.to_string(), intent))
    }
}

/// Body returned by a route action
///
/// `action_type` stays a raw string so results carrying a tag outside the
/// vocabulary still deserialize. `status` may be missing or `null`: handlers
/// forward an upstream flag that is not always set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    /// Whether the action succeeded, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,

    /// Payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Tag of the action that produced this result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

impl ActionOutcome {
    /// Successful outcome tagged with an action
    pub fn success(action: ActionType, data: Option<serde_json::Value>) -> Self {
        Self {
            status: Some(true),
            data,
            error: None,
            action_type: Some(action.as_str().to_string()),
        }
    }

    /// Failed outcome tagged with an action
    pub fn failure(action: ActionType, error: impl Into<String>) -> Self {
        Self {
            status: Some(false),
            data: None,
            error: Some(error.into()),
            action_type: Some(action.as_str().to_string()),
        }
    }

    /// Parse an outcome from a JSON body
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Whether the action reported success; an unreported status is not one
    pub fn is_success(&self) -> bool {
        self.status == Some(true)
    }

    /// Resolved tag, `None` when absent or outside the vocabulary
    pub fn action(&self) -> Option<ActionType> {
        self.action_type.as_deref().and_then(ActionType::from_tag)
    }
}
