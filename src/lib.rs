//! parishbook - the data-management core for a church family directory.
//!
//! This crate is the client-side cache and consistency layer between an
//! external persistence backend and anything that displays directory data:
//!
//! - [`DirectoryStore`]: the cached family collection, the open
//!   family-with-members aggregate, derived search/sort views, and every
//!   family-, member-, and photo-scoped mutation with its cascading
//!   refreshes.
//! - [`PreferencesStore`]: the singleton settings aggregate with
//!   merge-on-load defaulting, full-object persistence, and theme
//!   materialization.
//! - [`backend`]: the traits a concrete persistence layer implements.
//!
//! The backend is the sole source of truth. The stores hold read-mostly
//! projections that are refetched, not patched, after every write, so
//! consumers never observe a cache that disagrees with a mutation they were
//! told succeeded.

pub mod backend;
pub mod config;
pub mod models;
pub mod store;
pub mod theme;
pub mod utils;

pub use backend::{BackendError, CropRegion, DirectoryBackend, PhotoCategory, SettingsBackend};
pub use config::Config;
pub use models::{
    Family, FamilyInput, FamilyUpdate, FamilyWithMembers, Member, MemberInput, MemberUpdate,
    PageSize, ReportLayout, Settings, SettingsUpdate, SortDirection, SortField,
};
pub use store::{DirectoryStore, PreferencesStore};
pub use theme::{ColorScheme, SchemeSource, SchemeSubscription, Theme, ThemeController, ThemeSink};
