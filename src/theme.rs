//! Theme selection and materialization.
//!
//! The stored selector ([`Theme`]) is part of the settings aggregate;
//! turning it into a concrete [`ColorScheme`] happens at materialization
//! time. `light` and `dark` map directly; `system` is resolved by a live
//! read of the platform preference, and is re-resolved whenever the
//! platform preference changes while the selector is still `system`.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stored theme selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::System => write!(f, "system"),
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Concrete presentation scheme after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Live view of the platform's color-scheme preference.
pub trait SchemeSource: Send + Sync {
    /// Read the current platform preference.
    fn current(&self) -> ColorScheme;

    /// Register a listener for preference changes. The returned handle
    /// cancels the registration when dropped.
    fn subscribe(&self, listener: Box<dyn Fn() + Send + Sync>) -> SchemeSubscription;
}

/// Where resolved schemes land: window chrome, a stylesheet root, whatever
/// the embedding presentation layer provides.
pub trait ThemeSink: Send + Sync {
    fn apply(&self, scheme: ColorScheme);
}

/// Cancellation handle for a [`SchemeSource`] registration. Dropping it
/// cancels the registration.
pub struct SchemeSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SchemeSubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for SchemeSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Applies theme selections to a [`ThemeSink`], resolving `system` against
/// a [`SchemeSource`].
///
/// The last materialized selector is mirrored behind a mutex because the
/// platform source notifies from outside the store's call path; the
/// listener must see the selector current at notification time, not at
/// registration time.
pub struct ThemeController {
    source: Arc<dyn SchemeSource>,
    sink: Arc<dyn ThemeSink>,
    selector: Arc<Mutex<Theme>>,
    subscription: Option<SchemeSubscription>,
}

impl ThemeController {
    pub fn new(source: Arc<dyn SchemeSource>, sink: Arc<dyn ThemeSink>) -> Self {
        Self {
            source,
            sink,
            selector: Arc::new(Mutex::new(Theme::System)),
            subscription: None,
        }
    }

    /// Resolve `theme` and push the concrete scheme to the sink.
    pub fn materialize(&self, theme: Theme) {
        if let Ok(mut selector) = self.selector.lock() {
            *selector = theme;
        }
        let scheme = self.resolve(theme);
        debug!(%theme, ?scheme, "Applying theme");
        self.sink.apply(scheme);
    }

    fn resolve(&self, theme: Theme) -> ColorScheme {
        match theme {
            Theme::Light => ColorScheme::Light,
            Theme::Dark => ColorScheme::Dark,
            Theme::System => self.source.current(),
        }
    }

    /// Follow platform preference changes. Registered at most once; the
    /// listener re-applies only while the stored selector is `system`.
    pub fn watch_platform(&mut self) {
        if self.subscription.is_some() {
            return;
        }

        let source = Arc::clone(&self.source);
        let sink = Arc::clone(&self.sink);
        let selector = Arc::clone(&self.selector);
        self.subscription = Some(self.source.subscribe(Box::new(move || {
            let following = selector
                .lock()
                .map(|selector| *selector == Theme::System)
                .unwrap_or(false);
            if following {
                sink.apply(source.current());
            }
        })));
    }
}

// ============================================================================
// Tests
// ============================================================================
