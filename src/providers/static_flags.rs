//! In-memory flag gate.
//!
//! Used when no flag service is configured, and as the test double for
//! flag-dependent behaviour. Unknown flags answer the caller's default.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::traits::FlagGate;

/// [`FlagGate`] answering from a fixed, mutable table.
#[derive(Debug, Default)]
pub struct StaticFlags {
    flags: RwLock<HashMap<String, bool>>,
}

impl StaticFlags {
    /// Create a gate with no flags set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate with `flag` preset to `enabled`.
    pub fn with_flag(flag: impl Into<String>, enabled: bool) -> Self {
        let gate = Self::new();
        gate.set(flag, enabled);
        gate
    }

    /// Set (or overwrite) a flag value.
    pub fn set(&self, flag: impl Into<String>, enabled: bool) {
        let mut flags = self.flags.write().unwrap_or_else(|e| e.into_inner());
        flags.insert(flag.into(), enabled);
    }

    /// Remove a flag so that lookups fall back to the default.
    pub fn clear(&self, flag: &str) {
        let mut flags = self.flags.write().unwrap_or_else(|e| e.into_inner());
        flags.remove(flag);
    }
}

#[async_trait]
impl FlagGate for StaticFlags {
    fn name(&self) -> &str {
        "static"
    }

    async fn get_boolean_flag(&self, flag: &str, default: bool) -> bool {
        let flags = self.flags.read().unwrap_or_else(|e| e.into_inner());
        flags.get(flag).copied().unwrap_or(default)
    }
}
