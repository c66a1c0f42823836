//! Database location configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    String::from(".sprintdeck/sprintdeck.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file. `:memory:` for throwaway state.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
