use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Layout used when generating the printed directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLayout {
    #[default]
    Grid,
    List,
}

/// Page size used when generating the printed directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

/// The singleton settings aggregate. There is exactly one instance,
/// addressed implicitly; consumers always see every field populated because
/// loaded values are overlaid onto [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub church_name: String,
    pub church_logo_path: Option<String>,
    pub theme: Theme,
    pub default_layout: ReportLayout,
    pub page_size: PageSize,
    pub include_photos: bool,
    pub include_contact_info: bool,
    pub include_address: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            church_name: "Our Church".to_string(),
            church_logo_path: None,
            theme: Theme::System,
            default_layout: ReportLayout::Grid,
            page_size: PageSize::Letter,
            include_photos: true,
            include_contact_info: true,
            include_address: true,
        }
    }
}

/// Sparse settings: both the shape the backend may have persisted (older
/// files can miss fields added later) and the partial payload accepted by
/// `PreferencesStore::save_settings`. Fields left `None` are untouched by a
/// merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub church_name: Option<String>,
    pub church_logo_path: Option<Option<String>>,
    pub theme: Option<Theme>,
    pub default_layout: Option<ReportLayout>,
    pub page_size: Option<PageSize>,
    pub include_photos: Option<bool>,
    pub include_contact_info: Option<bool>,
    pub include_address: Option<bool>,
}

impl Settings {
    /// Overlay a sparse update onto this aggregate. Present fields win;
    /// absent fields keep their current value.
    pub fn merged(mut self, update: SettingsUpdate) -> Settings {
        if let Some(v) = update.church_name {
            self.church_name = v;
        }
        if let Some(v) = update.church_logo_path {
            self.church_logo_path = v;
        }
        if let Some(v) = update.theme {
            self.theme = v;
        }
        if let Some(v) = update.default_layout {
            self.default_layout = v;
        }
        if let Some(v) = update.page_size {
            self.page_size = v;
        }
        if let Some(v) = update.include_photos {
            self.include_photos = v;
        }
        if let Some(v) = update.include_contact_info {
            self.include_contact_info = v;
        }
        if let Some(v) = update.include_address {
            self.include_address = v;
        }
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
