//! The directory store: cached families, the open family detail, and every
//! family-, member-, and photo-scoped mutation.
//!
//! The backend is the sole source of truth. After any write the store
//! refetches whatever cached projection that write may have touched instead
//! of patching it locally, so server-assigned fields (ids, timestamps,
//! member ordering) are always authoritative in the cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::backend::{CropRegion, DirectoryBackend, PhotoCategory};
use crate::models::{
    Family, FamilyInput, FamilyUpdate, FamilyWithMembers, Member, MemberInput, MemberUpdate,
    SortDirection, SortField,
};
use crate::utils::{cmp_ignore_case, contains_ignore_case};

/// Cache and consistency layer for the family directory.
///
/// One instance lives for the process and is handed to whoever renders
/// directory data. `loading` and `error` are per-store, not per-operation:
/// operations issued concurrently race on them last-write-wins, which is
/// accepted for a single local user.
pub struct DirectoryStore {
    backend: Arc<dyn DirectoryBackend>,
    families: Vec<Family>,
    current_family: Option<FamilyWithMembers>,
    loading: bool,
    error: Option<String>,
    search_query: String,
    sort_field: SortField,
    sort_direction: SortDirection,
}

impl DirectoryStore {
    pub fn new(backend: Arc<dyn DirectoryBackend>) -> Self {
        Self {
            backend,
            families: Vec::new(),
            current_family: None,
            loading: false,
            error: None,
            search_query: String::new(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }

    // =========================================================================
    // State Access
    // =========================================================================

    /// The cached family list, in last-fetch order. Display order comes from
    /// [`filtered_families`](Self::filtered_families).
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// The currently open family detail, if any.
    pub fn current_family(&self) -> Option<&FamilyWithMembers> {
        self.current_family.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last operation failure, as a display string.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        self.sort_field = field;
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    /// The family list filtered by the search query and sorted by the
    /// current sort parameters. Recomputed on every read from the current
    /// base state; never cached, never mutates the cache.
    pub fn filtered_families(&self) -> Vec<&Family> {
        filter_and_sort(
            &self.families,
            &self.search_query,
            self.sort_field,
            self.sort_direction,
        )
    }

    // =========================================================================
    // Family Operations
    // =========================================================================

    /// Replace the cached family list wholesale. Failures are recorded in
    /// `error` and the previous list stays in place. Never touches the open
    /// detail.
    pub async fn fetch_families(&mut self) {
        self.begin();
        match self.backend.list_families().await {
            Ok(families) => {
                debug!(count = families.len(), "Fetched family list");
                self.families = families;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
    }

    /// Replace the open family detail wholesale. A failed fetch clears the
    /// detail: a stale aggregate must never be left on display.
    pub async fn fetch_family(&mut self, id: i64) {
        self.begin();
        match self.backend.get_family(id).await {
            Ok(detail) => self.current_family = Some(detail),
            Err(e) => {
                warn!(family_id = id, error = %e, "Failed to fetch family detail");
                self.error = Some(e.to_string());
                self.current_family = None;
            }
        }
        self.loading = false;
    }

    /// Create a family and refetch the list, so server-assigned fields are
    /// authoritative in the cache. Returns the new identity.
    pub async fn create_family(&mut self, family: FamilyInput) -> Result<i64> {
        self.begin();
        let result = self.create_family_inner(family).await;
        self.finish(&result);
        result
    }

    async fn create_family_inner(&mut self, family: FamilyInput) -> Result<i64> {
        let id = self.backend.create_family(family).await?;
        self.fetch_families().await;
        Ok(id)
    }

    /// Apply a partial update, refetch the list, and refetch the open detail
    /// if it is the updated family.
    pub async fn update_family(&mut self, id: i64, update: FamilyUpdate) -> Result<()> {
        self.begin();
        let result = self.update_family_inner(id, update).await;
        self.finish(&result);
        result
    }

    async fn update_family_inner(&mut self, id: i64, update: FamilyUpdate) -> Result<()> {
        self.backend.update_family(id, update).await?;
        self.fetch_families().await;
        if self.is_current(id) {
            self.fetch_family(id).await;
        }
        Ok(())
    }

    /// Delete a family and refetch the list. If the deleted family was open,
    /// the detail is cleared without a fetch; there is nothing left to load.
    pub async fn delete_family(&mut self, id: i64) -> Result<()> {
        self.begin();
        let result = self.delete_family_inner(id).await;
        self.finish(&result);
        result
    }

    async fn delete_family_inner(&mut self, id: i64) -> Result<()> {
        self.backend.delete_family(id).await?;
        self.fetch_families().await;
        if self.is_current(id) {
            self.current_family = None;
        }
        Ok(())
    }

    // =========================================================================
    // Member Operations
    // =========================================================================

    /// Create a member, refreshing the open detail if the member joins it.
    pub async fn create_member(&mut self, member: MemberInput) -> Result<i64> {
        self.begin();
        let result = self.create_member_inner(member).await;
        self.finish(&result);
        result
    }

    async fn create_member_inner(&mut self, member: MemberInput) -> Result<i64> {
        let family_id = member.family_id;
        let id = self.backend.create_member(member).await?;
        if self.is_current(family_id) {
            self.fetch_family(family_id).await;
        }
        Ok(id)
    }

    /// Apply a partial update to a member, then refresh whatever detail is
    /// open. A member id alone does not identify its family, so the store
    /// refreshes conservatively rather than risk showing stale members.
    pub async fn update_member(&mut self, id: i64, update: MemberUpdate) -> Result<()> {
        self.begin();
        let result = self.update_member_inner(id, update).await;
        self.finish(&result);
        result
    }

    async fn update_member_inner(&mut self, id: i64, update: MemberUpdate) -> Result<()> {
        self.backend.update_member(id, update).await?;
        self.refresh_open_detail().await;
        Ok(())
    }

    /// Delete a member, then refresh whatever detail is open.
    pub async fn delete_member(&mut self, id: i64) -> Result<()> {
        self.begin();
        let result = self.delete_member_inner(id).await;
        self.finish(&result);
        result
    }

    async fn delete_member_inner(&mut self, id: i64) -> Result<()> {
        self.backend.delete_member(id).await?;
        self.refresh_open_detail().await;
        Ok(())
    }

    /// Fetch a single member without touching the cache. Editing flows use
    /// this to load one record while the open detail stays put.
    pub async fn get_member(&self, id: i64) -> Result<Member> {
        Ok(self.backend.get_member(id).await?)
    }

    // =========================================================================
    // Photo Operations
    // =========================================================================

    /// Import a photo into managed storage for a family. Refreshes the open
    /// detail (if it matches) and the list, since thumbnails show in both.
    pub async fn save_family_photo(
        &mut self,
        family_id: i64,
        source_path: &Path,
    ) -> Result<String> {
        self.begin();
        let result = self.save_family_photo_inner(family_id, source_path).await;
        self.finish(&result);
        result
    }

    async fn save_family_photo_inner(
        &mut self,
        family_id: i64,
        source_path: &Path,
    ) -> Result<String> {
        let photo_path = self.backend.save_family_photo(family_id, source_path).await?;
        if self.is_current(family_id) {
            self.fetch_family(family_id).await;
        }
        self.fetch_families().await;
        Ok(photo_path)
    }

    /// Remove a family's photo: delete the stored file, then clear the
    /// record's reference with an explicitly nulled update. The file
    /// deletion is best effort; the reference-clearing update is attempted
    /// regardless, so the record never keeps pointing at a deleted file. If
    /// that update fails after a successful deletion, the stored file is
    /// orphaned; the store does not compensate.
    pub async fn remove_family_photo(&mut self, family_id: i64) -> Result<()> {
        self.begin();
        let result = self.remove_family_photo_inner(family_id).await;
        self.finish(&result);
        result
    }

    async fn remove_family_photo_inner(&mut self, family_id: i64) -> Result<()> {
        let photo_path = self
            .current_family
            .as_ref()
            .and_then(|detail| detail.family.photo_path.clone());
        if let Some(photo_path) = photo_path {
            if let Err(e) = self.backend.delete_photo(&photo_path).await {
                warn!(family_id, error = %e, "Stored photo deletion failed, clearing reference anyway");
            }
        }

        let update = FamilyUpdate {
            photo_path: Some(None),
            ..FamilyUpdate::default()
        };
        self.backend.update_family(family_id, update).await?;

        if self.is_current(family_id) {
            self.fetch_family(family_id).await;
        }
        self.fetch_families().await;
        Ok(())
    }

    /// Resolve the managed storage directory for family photos. Read-only;
    /// no cache interaction.
    pub async fn photos_dir(&self) -> Result<PathBuf> {
        Ok(self.backend.photos_dir(PhotoCategory::Families).await?)
    }

    /// Derive a member photo from a region of the family photo. The family's
    /// own photo is untouched; the open detail is refreshed if it matches.
    pub async fn crop_family_photo_to_member(
        &mut self,
        family_id: i64,
        member_id: i64,
        region: CropRegion,
    ) -> Result<String> {
        self.begin();
        let result = self
            .crop_family_photo_to_member_inner(family_id, member_id, region)
            .await;
        self.finish(&result);
        result
    }

    async fn crop_family_photo_to_member_inner(
        &mut self,
        family_id: i64,
        member_id: i64,
        region: CropRegion,
    ) -> Result<String> {
        let photo_path = self
            .backend
            .crop_family_photo(family_id, member_id, region)
            .await?;
        if self.is_current(family_id) {
            self.fetch_family(family_id).await;
        }
        Ok(photo_path)
    }

    // =========================================================================
    // Envelope Helpers
    // =========================================================================

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: &Result<T>) {
        if let Err(e) = result {
            self.error = Some(e.to_string());
        }
        self.loading = false;
    }

    fn is_current(&self, family_id: i64) -> bool {
        self.current_family
            .as_ref()
            .is_some_and(|detail| detail.family.id == family_id)
    }

    async fn refresh_open_detail(&mut self) {
        if let Some(family_id) = self.current_family.as_ref().map(|detail| detail.family.id) {
            self.fetch_family(family_id).await;
        }
    }
}

/// Stateless projection behind [`DirectoryStore::filtered_families`]:
/// filter by `query`, then stable-sort by the requested key.
fn filter_and_sort<'a>(
    families: &'a [Family],
    query: &str,
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a Family> {
    let mut result: Vec<&Family> = families.iter().collect();

    if !query.is_empty() {
        let query = query.to_lowercase();
        result.retain(|family| family_matches(family, &query));
    }

    result.sort_by(|a, b| {
        let cmp = match field {
            SortField::Name => cmp_ignore_case(&a.name, &b.name),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });

    result
}

/// Check if a family matches the search query.
/// Query should already be lowercased.
fn family_matches(family: &Family, query: &str) -> bool {
    contains_ignore_case(&family.name, query)
        || contains_ignore_case(&family.family_id, query)
        || family
            .address
            .as_ref()
            .map(|s| contains_ignore_case(s, query))
            .unwrap_or(false)
        || family
            .email
            .as_ref()
            .map(|s| contains_ignore_case(s, query))
            .unwrap_or(false)
}

// ============================================================================
// Tests
// ============================================================================
