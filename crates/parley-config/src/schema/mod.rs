//! Configuration schema types for Parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod assistant;
mod backend;
mod system;

pub use assistant::*;
pub use backend::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Every option has a default; a config file only needs the values it
/// wants to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParleyConfig {
    pub backend: BackendConfig,
    pub assistant: AssistantConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}
