use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A member record. A member only exists inside its owning family;
/// `family_id` is the owning [`Family`](super::Family)'s numeric identity.
///
/// `sort_order` controls display sequence within the family and is assigned
/// and maintained by the backend; the store never reorders members locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub family_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub wedding_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a member under an existing family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberInput {
    pub family_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub wedding_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
    pub sort_order: i32,
}

/// Partial update for a member. Same patch semantics as
/// [`FamilyUpdate`](super::FamilyUpdate): outer `Option` marks presence,
/// inner `Option` on nullable columns expresses an explicit clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Option<String>>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub wedding_date: Option<Option<NaiveDate>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub photo_path: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub sort_order: Option<i32>,
}
