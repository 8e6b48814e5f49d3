//! Council
//!
//! Application shell around the headless council crates: configuration,
//! the command runner that connects the controller to the collaborator,
//! and the `council` CLI.

pub mod config;
pub mod runner;

pub use config::{ApiConfig, ConfigError, CouncilConfig, ViewportConfig};
pub use runner::CommandRunner;

pub use council_client::{ClientError, CouncilClient, HttpClient};
pub use council_layout::{compute_layout, LayoutValues};
pub use council_types as types;
pub use council_ui::{AppCommand, AppEvent, CouncilApp, SessionDefaults};
