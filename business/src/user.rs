//! User records as the directory knows them.
//!
//! Records are values: edits never mutate a record in place, they produce a
//! new one via [`UserRecord::patched`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Avatar used for new drafts when the form leaves the field untouched.
pub const DEFAULT_AVATAR_URL: &str = "https://reqres.in/img/faces/3-image.jpg";

const PROVISIONAL_PREFIX: &str = "local-";

/// Identity of a user record.
///
/// The remote API sends numeric ids for stored users and string ids for freshly
/// created ones; both normalize to the same string form. Records the server
/// created without echoing an id get a provisional `local-<uuid>` id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId")]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

impl From<WireId> for UserId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => Self(n.to_string()),
            WireId::Text(s) => Self(s),
        }
    }
}

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fabricate a unique local id for a record the server did not identify.
    pub fn provisional() -> Self {
        Self(format!("{PROVISIONAL_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A user as listed by the remote directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
}

impl UserRecord {
    /// A copy of this record with every field present in `patch` replaced.
    pub fn patched(&self, patch: &UserPatch) -> Self {
        Self {
            id: self.id.clone(),
            first_name: patch
                .first_name
                .clone()
                .unwrap_or_else(|| self.first_name.clone()),
            last_name: patch
                .last_name
                .clone()
                .unwrap_or_else(|| self.last_name.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            avatar_url: patch
                .avatar_url
                .clone()
                .unwrap_or_else(|| self.avatar_url.clone()),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            avatar_url: DEFAULT_AVATAR_URL.to_owned(),
        }
    }
}

impl UserDraft {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = avatar_url.into();
        self
    }

    pub fn into_record(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            avatar_url: self.avatar_url,
        }
    }
}

/// Partial update: only `Some` fields are sent and applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, rename = "avatar", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.avatar_url.is_none()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn avatar_url(mut self, value: impl Into<String>) -> Self {
        self.avatar_url = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn janet() -> UserRecord {
        UserRecord {
            id: UserId::from(2),
            first_name: "Janet".to_owned(),
            last_name: "Weaver".to_owned(),
            email: "janet.weaver@reqres.in".to_owned(),
            avatar_url: "https://reqres.in/img/faces/2-image.jpg".to_owned(),
        }
    }

    #[test]
    fn test_user_id_accepts_number_and_string() {
        let numeric: UserId = serde_json::from_str("7").unwrap();
        let text: UserId = serde_json::from_str("\"842\"").unwrap();

        assert_eq!(numeric, UserId::from(7));
        assert_eq!(text.as_str(), "842");
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"7\"");
    }

    #[test]
    fn test_provisional_ids_are_unique_and_marked() {
        let a = UserId::provisional();
        let b = UserId::provisional();

        assert_ne!(a, b);
        assert!(a.is_provisional());
        assert!(!UserId::from(3).is_provisional());
    }

    #[test]
    fn test_record_reads_reqres_shape() {
        let record: UserRecord = serde_json::from_value(serde_json::json!({
            "id": 2,
            "email": "janet.weaver@reqres.in",
            "first_name": "Janet",
            "last_name": "Weaver",
            "avatar": "https://reqres.in/img/faces/2-image.jpg"
        }))
        .unwrap();

        assert_eq!(record, janet());
    }

    #[test]
    fn test_patched_merges_and_preserves() {
        let original = janet();
        let patch = UserPatch::default().first_name("Jan").email("jan@example.com");

        let updated = original.patched(&patch);

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.first_name, "Jan");
        assert_eq!(updated.email, "jan@example.com");
        assert_eq!(updated.last_name, original.last_name);
        assert_eq!(updated.avatar_url, original.avatar_url);
        assert_eq!(original.first_name, "Janet", "original is untouched");
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let original = janet();
        assert!(UserPatch::default().is_empty());
        assert_eq!(original.patched(&UserPatch::default()), original);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = UserPatch::default().last_name("Holt").avatar_url("https://x.test/a.png");
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "last_name": "Holt", "avatar": "https://x.test/a.png" })
        );
    }

    #[test]
    fn test_draft_defaults_avatar() {
        let draft = UserDraft::new("Eve", "Holt", "eve.holt@reqres.in");
        assert_eq!(draft.avatar_url, DEFAULT_AVATAR_URL);

        let record = draft.into_record(UserId::from(9));
        assert_eq!(record.full_name(), "Eve Holt");
    }
}
