//! The preferences store: the singleton settings aggregate and the theme
//! side effect it drives.
//!
//! Settings are always complete in memory. Whatever the backend has
//! persisted is overlaid onto the hardcoded defaults at load time, and a
//! save always writes the full merged aggregate back, never a sparse
//! payload.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::backend::SettingsBackend;
use crate::models::{Settings, SettingsUpdate};
use crate::theme::{SchemeSource, ThemeController, ThemeSink};

pub struct PreferencesStore {
    backend: Arc<dyn SettingsBackend>,
    theme: ThemeController,
    settings: Settings,
    loading: bool,
    error: Option<String>,
}

impl PreferencesStore {
    pub fn new(
        backend: Arc<dyn SettingsBackend>,
        scheme_source: Arc<dyn SchemeSource>,
        theme_sink: Arc<dyn ThemeSink>,
    ) -> Self {
        Self {
            backend,
            theme: ThemeController::new(scheme_source, theme_sink),
            settings: Settings::default(),
            loading: false,
            error: None,
        }
    }

    /// The current aggregate. Never partially populated.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last operation failure, as a display string.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Load persisted settings, overlaying them onto the defaults, then
    /// materialize the resulting theme. An absent stored object leaves the
    /// defaults in place; a failure is recorded and the theme untouched.
    pub async fn fetch_settings(&mut self) {
        self.begin();
        match self.backend.get_settings().await {
            Ok(stored) => {
                if let Some(stored) = stored {
                    self.settings = Settings::default().merged(stored);
                } else {
                    debug!("No stored settings, keeping defaults");
                }
                self.theme.materialize(self.settings.theme);
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
    }

    /// Merge `update` onto the current settings and persist the full merged
    /// aggregate. In-memory state is adopted only after persistence
    /// succeeds; the theme is materialized afterwards.
    pub async fn save_settings(&mut self, update: SettingsUpdate) -> Result<()> {
        self.begin();
        let result = self.save_settings_inner(update).await;
        self.finish(&result);
        result
    }

    async fn save_settings_inner(&mut self, update: SettingsUpdate) -> Result<()> {
        let merged = self.settings.clone().merged(update);
        self.backend.save_settings(merged.clone()).await?;
        self.settings = merged;
        self.theme.materialize(self.settings.theme);
        Ok(())
    }

    /// Import a logo into managed storage, then persist the full aggregate
    /// carrying its reference. A compound operation, not a field update:
    /// the whole settings object is saved, not just the logo field.
    pub async fn set_church_logo(&mut self, source_path: &Path) -> Result<String> {
        self.begin();
        let result = self.set_church_logo_inner(source_path).await;
        self.finish(&result);
        result
    }

    async fn set_church_logo_inner(&mut self, source_path: &Path) -> Result<String> {
        let stored = self.backend.save_church_logo(source_path).await?;
        let update = SettingsUpdate {
            church_logo_path: Some(Some(stored.clone())),
            ..SettingsUpdate::default()
        };
        self.save_settings_inner(update).await?;
        Ok(stored)
    }

    /// Reset the in-memory aggregate to the hardcoded defaults. Nothing is
    /// persisted; callers save explicitly to commit.
    pub fn reset_to_defaults(&mut self) {
        self.settings = Settings::default();
    }

    /// Materialize the current theme and start following platform
    /// preference changes. The platform subscription is registered once;
    /// its listener only takes effect while the selector is `system`.
    pub fn init_theme(&mut self) {
        self.theme.materialize(self.settings.theme);
        self.theme.watch_platform();
    }

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
}
