//! Report worker configuration.

use serde::{Deserialize, Serialize};

/// Bounded capacity of the report job queue.
const fn default_queue_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(WorkerConfig::default().queue_capacity, 64);
    }
}
