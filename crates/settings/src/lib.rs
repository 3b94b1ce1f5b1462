pub mod preferences;

pub use preferences::{LayoutPreferences, Preferences, PreferencesError, PreferencesStore};
