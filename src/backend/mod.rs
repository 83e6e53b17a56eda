//! The persistence boundary consumed by the stores.
//!
//! The backend is the sole source of truth for directory data. The stores
//! issue opaque request/response calls through these traits and treat their
//! own caches as projections to be refetched, never as authority. A concrete
//! implementation (SQLite, a remote service, an in-memory double for tests)
//! lives outside this crate.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{
    Family, FamilyInput, FamilyUpdate, FamilyWithMembers, Member, MemberInput, MemberUpdate,
    Settings, SettingsUpdate,
};

mod error;

pub use error::BackendError;

/// Logical category for managed photo storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoCategory {
    Families,
    Members,
}

impl PhotoCategory {
    /// Subdirectory name under the managed photo root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PhotoCategory::Families => "families",
            PhotoCategory::Members => "members",
        }
    }
}

/// Rectangular crop region in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Family, member, and photo operations.
///
/// `update_*` calls carry partial payloads; only present fields change
/// server-side. Photo references returned by the save/crop operations are
/// file names relative to the category directory, mirroring what the record
/// fields store.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    async fn list_families(&self) -> Result<Vec<Family>, BackendError>;

    /// Fetch one family deep, members ordered by their `sort_order`.
    async fn get_family(&self, id: i64) -> Result<FamilyWithMembers, BackendError>;

    async fn create_family(&self, family: FamilyInput) -> Result<i64, BackendError>;

    async fn update_family(&self, id: i64, update: FamilyUpdate) -> Result<(), BackendError>;

    /// Delete a family and, with it, every member it owns.
    async fn delete_family(&self, id: i64) -> Result<(), BackendError>;

    async fn get_member(&self, id: i64) -> Result<Member, BackendError>;

    async fn create_member(&self, member: MemberInput) -> Result<i64, BackendError>;

    async fn update_member(&self, id: i64, update: MemberUpdate) -> Result<(), BackendError>;

    async fn delete_member(&self, id: i64) -> Result<(), BackendError>;

    /// Import a photo into managed storage and attach it to the family.
    /// Returns the stored reference.
    async fn save_family_photo(
        &self,
        family_id: i64,
        source_path: &Path,
    ) -> Result<String, BackendError>;

    /// Delete a stored photo by its reference.
    async fn delete_photo(&self, photo_path: &str) -> Result<(), BackendError>;

    /// Resolve the storage directory for a photo category.
    async fn photos_dir(&self, category: PhotoCategory) -> Result<PathBuf, BackendError>;

    /// Derive a member photo from a region of the family photo and attach it
    /// to the member. The family photo itself is untouched.
    async fn crop_family_photo(
        &self,
        family_id: i64,
        member_id: i64,
        region: CropRegion,
    ) -> Result<String, BackendError>;
}

/// Settings persistence and logo management.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Load the persisted settings, sparse if older files miss fields, or
    /// `None` if nothing was ever saved.
    async fn get_settings(&self) -> Result<Option<SettingsUpdate>, BackendError>;

    /// Persist the full aggregate, replacing whatever was stored.
    async fn save_settings(&self, settings: Settings) -> Result<(), BackendError>;

    /// Import a logo into managed storage, returning the stored reference.
    async fn save_church_logo(&self, source_path: &Path) -> Result<String, BackendError>;
}
