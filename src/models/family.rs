use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Member;

/// A family record as returned by the directory backend.
///
/// `family_id` is the human-facing code printed in the directory book. It is
/// maintained by whoever keeps the directory and is not guaranteed unique at
/// this layer; reconciling duplicates is an import-time concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: i64,
    pub family_id: String,
    pub name: String,
    pub mailing_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a family. Identity and timestamps are assigned by
/// the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyInput {
    pub family_id: String,
    pub name: String,
    pub mailing_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a family.
///
/// The outer `Option` marks whether a field is part of the patch. For
/// nullable columns the inner `Option` carries the new value, with
/// `Some(None)` clearing it; fields left `None` are untouched server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyUpdate {
    pub family_id: Option<String>,
    pub name: Option<String>,
    pub mailing_name: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub photo_path: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

/// A family plus its members, ordered by their backend-maintained
/// `sort_order`. Only the deep single-family fetch produces this shape; it
/// is always replaced wholesale, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyWithMembers {
    #[serde(flatten)]
    pub family: Family,
    pub members: Vec<Member>,
}

/// Sort key for the family list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    UpdatedAt,
}

/// Sort direction for the family list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}
