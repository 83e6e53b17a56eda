//! Shared test doubles for the store integration tests.
//!
//! `MemoryBackend` implements both boundary traits over plain vectors,
//! records every call in order, and can inject a failure for a named
//! operation, so cascade and envelope behavior is observable as distinct
//! backend traffic.

// Allow dead code: each test binary uses its own slice of the helpers
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parishbook::theme::{ColorScheme, SchemeSource, SchemeSubscription, ThemeSink};
use parishbook::{
    BackendError, CropRegion, DirectoryBackend, Family, FamilyInput, FamilyUpdate,
    FamilyWithMembers, Member, MemberInput, MemberUpdate, PhotoCategory, Settings,
    SettingsBackend, SettingsUpdate,
};

// ============================================================================
// MemoryBackend
// ============================================================================

#[derive(Default)]
struct State {
    families: Vec<Family>,
    members: Vec<Member>,
    stored_settings: Option<SettingsUpdate>,
    saved_settings: Vec<Settings>,
    deleted_photos: Vec<String>,
    next_id: i64,
}

pub struct MemoryBackend {
    state: Mutex<State>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        })
    }

    pub fn with_families(families: Vec<Family>) -> Arc<Self> {
        let backend = Self::new();
        {
            let mut state = backend.state.lock().unwrap();
            state.next_id = families.iter().map(|f| f.id).max().unwrap_or(0) + 1;
            state.families = families;
        }
        backend
    }

    pub fn add_member(&self, member: Member) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(member.id + 1);
        state.members.push(member);
    }

    pub fn set_stored_settings(&self, stored: SettingsUpdate) {
        self.state.lock().unwrap().stored_settings = Some(stored);
    }

    /// Make the named operation fail until cleared.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Ordered log of every boundary call, like `"get_family:7"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Count calls to `name`, with or without an argument suffix.
    pub fn count_calls(&self, name: &str) -> usize {
        let prefix = format!("{name}:");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| *c == name || c.starts_with(&prefix))
            .count()
    }

    pub fn family_snapshot(&self, id: i64) -> Option<Family> {
        self.state
            .lock()
            .unwrap()
            .families
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    pub fn member_snapshot(&self, id: i64) -> Option<Member> {
        self.state
            .lock()
            .unwrap()
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    pub fn deleted_photos(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted_photos.clone()
    }

    pub fn saved_settings(&self) -> Vec<Settings> {
        self.state.lock().unwrap().saved_settings.clone()
    }

    fn call(&self, name: &'static str, entry: String) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(entry);
        if self.failing.lock().unwrap().contains(name) {
            return Err(BackendError::Storage(format!("injected failure in {name}")));
        }
        Ok(())
    }
}

fn apply_family_update(family: &mut Family, update: FamilyUpdate) {
    if let Some(v) = update.family_id {
        family.family_id = v;
    }
    if let Some(v) = update.name {
        family.name = v;
    }
    if let Some(v) = update.mailing_name {
        family.mailing_name = v;
    }
    if let Some(v) = update.address {
        family.address = v;
    }
    if let Some(v) = update.city {
        family.city = v;
    }
    if let Some(v) = update.state {
        family.state = v;
    }
    if let Some(v) = update.zip {
        family.zip = v;
    }
    if let Some(v) = update.phone {
        family.phone = v;
    }
    if let Some(v) = update.email {
        family.email = v;
    }
    if let Some(v) = update.photo_path {
        family.photo_path = v;
    }
    if let Some(v) = update.notes {
        family.notes = v;
    }
    family.updated_at = Utc::now();
}

fn apply_member_update(member: &mut Member, update: MemberUpdate) {
    if let Some(v) = update.first_name {
        member.first_name = v;
    }
    if let Some(v) = update.last_name {
        member.last_name = v;
    }
    if let Some(v) = update.role {
        member.role = v;
    }
    if let Some(v) = update.birth_date {
        member.birth_date = v;
    }
    if let Some(v) = update.wedding_date {
        member.wedding_date = v;
    }
    if let Some(v) = update.phone {
        member.phone = v;
    }
    if let Some(v) = update.email {
        member.email = v;
    }
    if let Some(v) = update.photo_path {
        member.photo_path = v;
    }
    if let Some(v) = update.notes {
        member.notes = v;
    }
    if let Some(v) = update.sort_order {
        member.sort_order = v;
    }
    member.updated_at = Utc::now();
}

fn sparse(settings: &Settings) -> SettingsUpdate {
    SettingsUpdate {
        church_name: Some(settings.church_name.clone()),
        church_logo_path: Some(settings.church_logo_path.clone()),
        theme: Some(settings.theme),
        default_layout: Some(settings.default_layout),
        page_size: Some(settings.page_size),
        include_photos: Some(settings.include_photos),
        include_contact_info: Some(settings.include_contact_info),
        include_address: Some(settings.include_address),
    }
}

#[async_trait]
impl DirectoryBackend for MemoryBackend {
    async fn list_families(&self) -> Result<Vec<Family>, BackendError> {
        self.call("list_families", "list_families".to_string())?;
        Ok(self.state.lock().unwrap().families.clone())
    }

    async fn get_family(&self, id: i64) -> Result<FamilyWithMembers, BackendError> {
        self.call("get_family", format!("get_family:{id}"))?;
        let state = self.state.lock().unwrap();
        let family = state
            .families
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("family {id}")))?;
        let mut members: Vec<Member> = state
            .members
            .iter()
            .filter(|m| m.family_id == id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.sort_order);
        Ok(FamilyWithMembers { family, members })
    }

    async fn create_family(&self, family: FamilyInput) -> Result<i64, BackendError> {
        self.call("create_family", "create_family".to_string())?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let now = Utc::now();
        state.families.push(Family {
            id,
            family_id: family.family_id,
            name: family.name,
            mailing_name: family.mailing_name,
            address: family.address,
            city: family.city,
            state: family.state,
            zip: family.zip,
            phone: family.phone,
            email: family.email,
            photo_path: family.photo_path,
            notes: family.notes,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_family(&self, id: i64, update: FamilyUpdate) -> Result<(), BackendError> {
        self.call("update_family", format!("update_family:{id}"))?;
        let mut state = self.state.lock().unwrap();
        let family = state
            .families
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("family {id}")))?;
        apply_family_update(family, update);
        Ok(())
    }

    async fn delete_family(&self, id: i64) -> Result<(), BackendError> {
        self.call("delete_family", format!("delete_family:{id}"))?;
        let mut state = self.state.lock().unwrap();
        state.families.retain(|f| f.id != id);
        state.members.retain(|m| m.family_id != id);
        Ok(())
    }

    async fn get_member(&self, id: i64) -> Result<Member, BackendError> {
        self.call("get_member", format!("get_member:{id}"))?;
        self.state
            .lock()
            .unwrap()
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("member {id}")))
    }

    async fn create_member(&self, member: MemberInput) -> Result<i64, BackendError> {
        self.call("create_member", "create_member".to_string())?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let now = Utc::now();
        state.members.push(Member {
            id,
            family_id: member.family_id,
            first_name: member.first_name,
            last_name: member.last_name,
            role: member.role,
            birth_date: member.birth_date,
            wedding_date: member.wedding_date,
            phone: member.phone,
            email: member.email,
            photo_path: member.photo_path,
            notes: member.notes,
            sort_order: member.sort_order,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_member(&self, id: i64, update: MemberUpdate) -> Result<(), BackendError> {
        self.call("update_member", format!("update_member:{id}"))?;
        let mut state = self.state.lock().unwrap();
        let member = state
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("member {id}")))?;
        apply_member_update(member, update);
        Ok(())
    }

    async fn delete_member(&self, id: i64) -> Result<(), BackendError> {
        self.call("delete_member", format!("delete_member:{id}"))?;
        self.state.lock().unwrap().members.retain(|m| m.id != id);
        Ok(())
    }

    async fn save_family_photo(
        &self,
        family_id: i64,
        _source_path: &Path,
    ) -> Result<String, BackendError> {
        self.call("save_family_photo", format!("save_family_photo:{family_id}"))?;
        let mut state = self.state.lock().unwrap();
        let family = state
            .families
            .iter_mut()
            .find(|f| f.id == family_id)
            .ok_or_else(|| BackendError::NotFound(format!("family {family_id}")))?;
        let photo_path = format!("family_{family_id}.jpg");
        family.photo_path = Some(photo_path.clone());
        family.updated_at = Utc::now();
        Ok(photo_path)
    }

    async fn delete_photo(&self, photo_path: &str) -> Result<(), BackendError> {
        self.call("delete_photo", format!("delete_photo:{photo_path}"))?;
        self.state
            .lock()
            .unwrap()
            .deleted_photos
            .push(photo_path.to_string());
        Ok(())
    }

    async fn photos_dir(&self, category: PhotoCategory) -> Result<PathBuf, BackendError> {
        self.call("photos_dir", format!("photos_dir:{}", category.dir_name()))?;
        Ok(PathBuf::from("/managed/photos").join(category.dir_name()))
    }

    async fn crop_family_photo(
        &self,
        family_id: i64,
        member_id: i64,
        _region: CropRegion,
    ) -> Result<String, BackendError> {
        self.call(
            "crop_family_photo",
            format!("crop_family_photo:{family_id}:{member_id}"),
        )?;
        let mut state = self.state.lock().unwrap();
        let has_photo = state
            .families
            .iter()
            .find(|f| f.id == family_id)
            .ok_or_else(|| BackendError::NotFound(format!("family {family_id}")))?
            .photo_path
            .is_some();
        if !has_photo {
            return Err(BackendError::Photo(format!(
                "family {family_id} has no photo"
            )));
        }
        let member = state
            .members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| BackendError::NotFound(format!("member {member_id}")))?;
        let photo_path = format!("member_{member_id}.jpg");
        member.photo_path = Some(photo_path.clone());
        member.updated_at = Utc::now();
        Ok(photo_path)
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn get_settings(&self) -> Result<Option<SettingsUpdate>, BackendError> {
        self.call("get_settings", "get_settings".to_string())?;
        Ok(self.state.lock().unwrap().stored_settings.clone())
    }

    async fn save_settings(&self, settings: Settings) -> Result<(), BackendError> {
        self.call("save_settings", "save_settings".to_string())?;
        let mut state = self.state.lock().unwrap();
        state.stored_settings = Some(sparse(&settings));
        state.saved_settings.push(settings);
        Ok(())
    }

    async fn save_church_logo(&self, _source_path: &Path) -> Result<String, BackendError> {
        self.call("save_church_logo", "save_church_logo".to_string())?;
        Ok("logo.jpg".to_string())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn family(id: i64, name: &str) -> Family {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Family {
        id,
        family_id: format!("F{id:03}"),
        name: name.to_string(),
        mailing_name: None,
        address: None,
        city: None,
        state: None,
        zip: None,
        phone: None,
        email: None,
        photo_path: None,
        notes: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn member(id: i64, family_id: i64, first_name: &str, sort_order: i32) -> Member {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Member {
        id,
        family_id,
        first_name: first_name.to_string(),
        last_name: "Alvarez".to_string(),
        role: None,
        birth_date: None,
        wedding_date: None,
        phone: None,
        email: None,
        photo_path: None,
        notes: None,
        sort_order,
        created_at: created,
        updated_at: created,
    }
}

// ============================================================================
// Theme doubles
// ============================================================================

pub struct TestSchemeSource {
    scheme: Mutex<ColorScheme>,
    listeners: Arc<Mutex<Vec<Box<dyn Fn() + Send + Sync>>>>,
}

impl TestSchemeSource {
    pub fn new(scheme: ColorScheme) -> Arc<Self> {
        Arc::new(Self {
            scheme: Mutex::new(scheme),
            listeners: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn set_scheme(&self, scheme: ColorScheme) {
        *self.scheme.lock().unwrap() = scheme;
    }

    /// Fire every registered listener, as the platform would on a
    /// preference change.
    pub fn notify(&self) {
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.iter() {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl SchemeSource for TestSchemeSource {
    fn current(&self) -> ColorScheme {
        *self.scheme.lock().unwrap()
    }

    fn subscribe(&self, listener: Box<dyn Fn() + Send + Sync>) -> SchemeSubscription {
        let listeners = Arc::clone(&self.listeners);
        listeners.lock().unwrap().push(listener);
        SchemeSubscription::new(move || {
            listeners.lock().unwrap().clear();
        })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    applied: Mutex<Vec<ColorScheme>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn applied(&self) -> Vec<ColorScheme> {
        self.applied.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<ColorScheme> {
        self.applied.lock().unwrap().last().copied()
    }
}

impl ThemeSink for RecordingSink {
    fn apply(&self, scheme: ColorScheme) {
        self.applied.lock().unwrap().push(scheme);
    }
}
