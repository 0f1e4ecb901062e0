pub mod app;
pub mod logging;
pub mod prompt;
pub mod settings;
pub mod view;

pub use app::{Session, build_registry};
pub use settings::{Overrides, Settings, SettingsError};
