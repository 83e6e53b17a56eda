//! Data models for directory entities.
//!
//! This module contains the data structures shared by the stores and the
//! persistence boundary:
//!
//! - `Family`, `Member`: the two related directory entities, with their
//!   creation (`*Input`) and partial-update (`*Update`) payloads
//! - `FamilyWithMembers`: the only shape that carries members
//! - `Settings`, `SettingsUpdate`: the singleton preferences aggregate and
//!   its sparse form
//! - `SortField`, `SortDirection`: parameters of the derived family view

pub mod family;
pub mod member;
pub mod settings;

pub use family::{Family, FamilyInput, FamilyUpdate, FamilyWithMembers, SortDirection, SortField};
pub use member::{Member, MemberInput, MemberUpdate};
pub use settings::{PageSize, ReportLayout, Settings, SettingsUpdate};
