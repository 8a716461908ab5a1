//! Lock clause templates.
//!
//! Most dialects lock with a clause appended to the query
//! (`FOR UPDATE`, `FOR SHARE`, `WITH LOCK`); SQL Server and its
//! relatives attach table hints to each locked table instead
//! (`WITH (UPDLOCK, HOLDLOCK, ROWLOCK)`).

use tracing::debug;

use crate::capability::{Capability, CapabilitySet};
use crate::strategy::{LockMode, LockTimeout, RowLockStrategy};

/// Where lock requests are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStyle {
    /// A clause after the query.
    Clause,
    /// A hint after each table reference.
    TableHint,
}

/// Lock-acquisition templates of a dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockConfig {
    /// Clause or table hint.
    pub style: LockStyle,
    /// Exclusive lock clause, e.g. `" FOR UPDATE"`.
    pub for_update: &'static str,
    /// Shared lock clause, e.g. `" FOR SHARE"`.
    pub for_share: &'static str,
    /// Keyword introducing lock targets, e.g. `" OF "`.
    pub of: &'static str,
    /// No-wait modifier.
    pub nowait: &'static str,
    /// Skip-locked modifier.
    pub skip_locked: &'static str,
    /// Wait modifier; `{}` is replaced by seconds.
    pub wait: &'static str,
    /// Target naming for exclusive locks.
    pub write_row_lock_strategy: RowLockStrategy,
    /// Target naming for shared locks.
    pub read_row_lock_strategy: RowLockStrategy,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            style: LockStyle::Clause,
            for_update: " FOR UPDATE",
            for_share: " FOR UPDATE",
            of: " OF ",
            nowait: " NOWAIT",
            skip_locked: " SKIP LOCKED",
            wait: " WAIT {}",
            write_row_lock_strategy: RowLockStrategy::None,
            read_row_lock_strategy: RowLockStrategy::None,
        }
    }
}

/// The modifier actually applied after degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    NoWait,
    SkipLocked,
    Wait(u32),
}

impl LockConfig {
    /// Returns the row-lock strategy for a mode.
    #[must_use]
    pub const fn row_lock_strategy(&self, mode: LockMode) -> RowLockStrategy {
        if mode.is_read() {
            self.read_row_lock_strategy
        } else {
            self.write_row_lock_strategy
        }
    }

    fn modifier(mode: LockMode, timeout: LockTimeout, capabilities: CapabilitySet) -> Modifier {
        let wanted = match mode {
            LockMode::UpgradeNoWait | LockMode::ForceIncrement => LockTimeout::NoWait,
            LockMode::UpgradeSkipLocked => LockTimeout::SkipLocked,
            _ => timeout,
        };
        let (modifier, capability) = match wanted {
            LockTimeout::WaitForever => return Modifier::None,
            LockTimeout::NoWait => (Modifier::NoWait, Capability::NoWait),
            LockTimeout::SkipLocked => (Modifier::SkipLocked, Capability::SkipLocked),
            LockTimeout::Millis(_) => (
                Modifier::Wait(wanted.seconds().unwrap_or_default()),
                Capability::Wait,
            ),
        };
        if capabilities.contains(capability) {
            modifier
        } else {
            debug!(
                capability = capability.as_str(),
                mode = mode.as_str(),
                "lock modifier not supported, falling back to a blocking lock"
            );
            Modifier::None
        }
    }

    fn modifier_text(&self, modifier: Modifier) -> String {
        match modifier {
            Modifier::None => String::new(),
            Modifier::NoWait => self.nowait.to_string(),
            Modifier::SkipLocked => self.skip_locked.to_string(),
            Modifier::Wait(seconds) => self.wait.replace("{}", &seconds.to_string()),
        }
    }

    /// Renders the lock clause for a mode and timeout policy.
    ///
    /// Unsupported modifiers degrade to the plain blocking lock. Table-hint
    /// dialects return an empty string; use [`Self::lock_hint`].
    #[must_use]
    pub fn lock_string(
        &self,
        mode: LockMode,
        timeout: LockTimeout,
        capabilities: CapabilitySet,
    ) -> String {
        self.lock_string_of(mode, timeout, &[], capabilities)
    }

    /// Renders the lock clause naming lock targets.
    ///
    /// Targets are table aliases or qualified columns, depending on the
    /// dialect's row-lock strategy. They are ignored when the dialect does
    /// not support alias locks, which locks every table in the query.
    #[must_use]
    pub fn lock_string_of(
        &self,
        mode: LockMode,
        timeout: LockTimeout,
        targets: &[String],
        capabilities: CapabilitySet,
    ) -> String {
        if mode == LockMode::None || self.style == LockStyle::TableHint {
            return String::new();
        }
        let mut clause = String::from(if mode.is_read() {
            self.for_share
        } else {
            self.for_update
        });
        let named = !targets.is_empty()
            && capabilities.contains(Capability::AliasLocks)
            && self.row_lock_strategy(mode) != RowLockStrategy::None;
        if named {
            clause.push_str(self.of);
            clause.push_str(&targets.join(", "));
        }
        let modifier = Self::modifier(mode, timeout, capabilities);
        clause.push_str(&self.modifier_text(modifier));
        clause
    }

    /// Renders the table hint for table-hint dialects, e.g.
    /// `" WITH (UPDLOCK, HOLDLOCK, ROWLOCK)"`.
    #[must_use]
    pub fn lock_hint(
        &self,
        mode: LockMode,
        timeout: LockTimeout,
        capabilities: CapabilitySet,
    ) -> Option<String> {
        if mode == LockMode::None || self.style != LockStyle::TableHint {
            return None;
        }
        let modifier = Self::modifier(mode, timeout, capabilities);
        let mut hints: Vec<&str> = if mode.is_read() {
            vec!["HOLDLOCK", "ROWLOCK"]
        } else {
            vec!["UPDLOCK", "HOLDLOCK", "ROWLOCK"]
        };
        match modifier {
            Modifier::NoWait => hints.push("NOWAIT"),
            Modifier::SkipLocked => {
                hints.retain(|hint| *hint != "HOLDLOCK");
                hints.push("READPAST");
            }
            Modifier::None | Modifier::Wait(_) => {}
        }
        Some(format!(" WITH ({})", hints.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_modifiers() -> CapabilitySet {
        CapabilitySet::of(&[
            Capability::NoWait,
            Capability::SkipLocked,
            Capability::Wait,
            Capability::AliasLocks,
        ])
    }

    #[test]
    fn test_lock_string_modifiers() {
        let config = LockConfig::default();
        let caps = all_modifiers();
        assert_eq!(
            config.lock_string(LockMode::Write, LockTimeout::WaitForever, caps),
            " FOR UPDATE"
        );
        assert_eq!(
            config.lock_string(LockMode::Write, LockTimeout::NoWait, caps),
            " FOR UPDATE NOWAIT"
        );
        assert_eq!(
            config.lock_string(LockMode::Write, LockTimeout::SkipLocked, caps),
            " FOR UPDATE SKIP LOCKED"
        );
        assert_eq!(
            config.lock_string(LockMode::Write, LockTimeout::Millis(1500), caps),
            " FOR UPDATE WAIT 2"
        );
        assert_eq!(
            config.lock_string(LockMode::UpgradeNoWait, LockTimeout::WaitForever, caps),
            " FOR UPDATE NOWAIT"
        );
        assert_eq!(config.lock_string(LockMode::None, LockTimeout::NoWait, caps), "");
    }

    #[test]
    fn test_lock_string_degrades() {
        let config = LockConfig::default();
        let caps = CapabilitySet::EMPTY;
        assert_eq!(
            config.lock_string(LockMode::UpgradeSkipLocked, LockTimeout::WaitForever, caps),
            " FOR UPDATE"
        );
        assert_eq!(
            config.lock_string(LockMode::Write, LockTimeout::Millis(10), caps),
            " FOR UPDATE"
        );
    }

    #[test]
    fn test_lock_targets() {
        let config = LockConfig {
            write_row_lock_strategy: RowLockStrategy::Table,
            ..LockConfig::default()
        };
        let targets = vec![String::from("o"), String::from("c")];
        assert_eq!(
            config.lock_string_of(LockMode::Write, LockTimeout::NoWait, &targets, all_modifiers()),
            " FOR UPDATE OF o, c NOWAIT"
        );
        assert_eq!(
            config.lock_string_of(
                LockMode::Write,
                LockTimeout::WaitForever,
                &targets,
                CapabilitySet::EMPTY
            ),
            " FOR UPDATE"
        );
    }

    #[test]
    fn test_table_hints() {
        let config = LockConfig {
            style: LockStyle::TableHint,
            ..LockConfig::default()
        };
        let caps = all_modifiers();
        assert_eq!(config.lock_string(LockMode::Write, LockTimeout::NoWait, caps), "");
        assert_eq!(
            config.lock_hint(LockMode::Write, LockTimeout::WaitForever, caps),
            Some(String::from(" WITH (UPDLOCK, HOLDLOCK, ROWLOCK)"))
        );
        assert_eq!(
            config.lock_hint(LockMode::UpgradeSkipLocked, LockTimeout::WaitForever, caps),
            Some(String::from(" WITH (UPDLOCK, ROWLOCK, READPAST)"))
        );
        assert_eq!(
            config.lock_hint(LockMode::Read, LockTimeout::NoWait, caps),
            Some(String::from(" WITH (HOLDLOCK, ROWLOCK, NOWAIT)"))
        );
    }
}
