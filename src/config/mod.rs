//! Configuration: path resolution and user settings

pub mod accounts;
pub mod paths;
pub mod settings;

pub use accounts::AccountsSettings;
pub use paths::Paths;
pub use settings::Settings;
