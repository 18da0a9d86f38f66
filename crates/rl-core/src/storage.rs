//! Two-scope preference storage
//!
//! Hosts implement [`PreferenceStore`] over whatever persistence they have
//! (`sessionStorage`/`localStorage` in the browser, a JSON file in the CLI).
//! Values are stored as decimal strings, matching what the browser storage
//! API hands back.
//!
//! Reads never fail from the caller's point of view: a missing key, a storage
//! error and a malformed value all come back as `None`. Writes return a
//! `Result` so callers can decide how to degrade.

use std::collections::HashMap;

use crate::error::StorageError;
use crate::types::{Scope, ScopeMask};

// =============================================================================
// Keys
// =============================================================================

/// Fully-qualified storage keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Session scope
    pub view_count: String,
    /// Session scope
    pub first_view_at: String,
    /// Session scope
    pub last_view_at: String,
    /// Written to both scopes
    pub block_until: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            view_count: format!("{prefix}view_count"),
            first_view_at: format!("{prefix}first_view_at"),
            last_view_at: format!("{prefix}last_view_at"),
            block_until: format!("{prefix}block_until"),
        }
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Key/value persistence over a session scope and a durable scope.
///
/// The two scopes are independent; nothing here makes a write to both atomic.
pub trait PreferenceStore {
    /// Read the raw stored string.
    fn read_raw(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the raw stored string.
    fn write_raw(&mut self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError>;

    /// Read an integer, treating errors and malformed values as absent.
    fn read_scoped(&self, scope: Scope, key: &str) -> Option<i64> {
        let raw = match self.read_raw(scope, key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("read {scope}/{key} failed: {e}");
                return None;
            }
        };

        let parsed = parse_stored_int(&raw);
        if parsed.is_none() {
            log::warn!("ignoring malformed value for {scope}/{key}: {raw:?}");
        }
        parsed
    }

    /// Write an integer.
    fn write_scoped(&mut self, scope: Scope, key: &str, value: i64) -> Result<(), StorageError> {
        self.write_raw(scope, key, &value.to_string())
    }

    /// Write the same integer to every scope in `scopes`.
    ///
    /// Every scope is attempted even if an earlier one fails. Returns the set
    /// of scopes whose write failed.
    fn write_scopes(&mut self, scopes: ScopeMask, key: &str, value: i64) -> ScopeMask {
        let mut failed = ScopeMask::empty();
        for scope in scopes.scopes() {
            if let Err(e) = self.write_scoped(scope, key, value) {
                log::warn!("write {scope}/{key} failed: {e}");
                failed |= scope.mask();
            }
        }
        failed
    }
}

/// Parse a stored integer the way the browser's `parseInt(value, 10)` does:
/// surrounding whitespace and an optional sign are accepted, and parsing stops
/// at the first non-digit. A value with no leading digits is `None`.
pub fn parse_stored_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Both scopes held in process memory.
///
/// Used by tests and by the replay tool. Writes can be denied per scope to
/// exercise the degraded paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<(Scope, String), String>,
    denied: ScopeMask,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes to `scopes` fail with [`StorageError::Denied`].
    pub fn deny_writes(&mut self, scopes: ScopeMask) {
        self.denied |= scopes;
    }

    pub fn allow_writes(&mut self, scopes: ScopeMask) {
        self.denied.remove(scopes);
    }

    /// Store a raw string, bypassing write denial.
    pub fn insert_raw(&mut self, scope: Scope, key: &str, value: &str) {
        self.entries.insert((scope, key.to_string()), value.to_string());
    }

    pub fn get_raw(&self, scope: Scope, key: &str) -> Option<&str> {
        self.entries
            .get(&(scope, key.to_string()))
            .map(|s| s.as_str())
    }

    /// Drop every key in `scope`, as a browser does with session storage when
    /// the tab closes.
    pub fn clear_scope(&mut self, scope: Scope) {
        self.entries.retain(|(s, _), _| *s != scope);
    }

    /// All entries in `scope`, sorted by key.
    pub fn entries(&self, scope: Scope) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .entries
            .iter()
            .filter(|((s, _), _)| *s == scope)
            .map(|((_, k), v)| (k.clone(), v.clone()))
            .collect();
        out.sort();
        out
    }
}

impl PreferenceStore for MemoryStore {
    fn read_raw(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get_raw(scope, key).map(|s| s.to_string()))
    }

    fn write_raw(&mut self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        if self.denied.contains(scope.mask()) {
            return Err(StorageError::Denied {
                scope,
                key: key.to_string(),
            });
        }
        self.insert_raw(scope, key, value);
        Ok(())
    }
}
