use serde::{Deserialize, Serialize};

/// A saved user profile as the backend serves it from `/getProfile`.
///
/// Every field is optional: profiles are created with only a name and filled
/// in over time, and the backend emits `null` for anything unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub job_levels: Option<Vec<String>>,
    #[serde(default)]
    pub locations: Option<Vec<String>>,
    #[serde(rename = "profileName", default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    #[serde(rename = "profileid", default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<i64>,
}

/// A resume file handed to the engine by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeAttachment {
    pub content: bytes::Bytes,
    pub filename: String,
    pub content_type: String,
}
