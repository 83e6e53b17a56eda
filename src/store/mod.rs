//! The stores mediating between the persistence boundary and consumers.
//!
//! Each store exclusively owns its in-memory cache and follows the same
//! operation envelope: `loading` set for the duration, `error` cleared on
//! entry and capturing any failure as a display string. Fetch-style
//! operations swallow failures (consumers observe state); mutation-style
//! operations record and re-raise them so a caller driving a form can stay
//! put and show the message.

pub mod directory;
pub mod preferences;

pub use directory::DirectoryStore;
pub use preferences::PreferencesStore;
