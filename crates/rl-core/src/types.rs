//! Core type definitions for the reel limiter
//!
//! These types cross module boundaries and are what the host bindings
//! translate into JS objects or CLI output.

// =============================================================================
// Time
// =============================================================================

/// Milliseconds since the Unix epoch, or a duration in milliseconds.
///
/// Signed so that differences between timestamps can go negative. Values read
/// back from storage are untrusted; arithmetic on them saturates.
pub type Millis = i64;

// =============================================================================
// Storage Scopes
// =============================================================================

/// A single storage scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Cleared when the tab/browser session ends (`sessionStorage`)
    Session,
    /// Survives restarts and is shared by every tab (`localStorage`)
    Durable,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Durable => "durable",
        }
    }

    pub fn mask(self) -> ScopeMask {
        match self {
            Self::Session => ScopeMask::SESSION,
            Self::Durable => ScopeMask::DURABLE,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Set of storage scopes, used for multi-scope writes.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ScopeMask: u8 {
        const SESSION = 1 << 0;
        const DURABLE = 1 << 1;
        /// Both scopes
        const ALL = Self::SESSION.bits() | Self::DURABLE.bits();
    }
}

impl ScopeMask {
    /// Scopes in write order. Session first so the tab-local copy lands even
    /// if the durable write is later denied.
    pub fn scopes(self) -> impl Iterator<Item = Scope> {
        [Scope::Session, Scope::Durable]
            .into_iter()
            .filter(move |scope| self.contains(scope.mask()))
    }
}

// =============================================================================
// Controller State
// =============================================================================

/// Externally meaningful limiter state. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterState {
    /// Free to view; views are being counted
    Counting,
    /// Throttled until the given instant
    Blocked { until: Millis },
}

/// Result of handling one location change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new view was counted
    Counted { count: u32, max: u32 },
    /// The limit was exceeded and a cooldown was engaged
    BlockEngaged { until: Millis },
    /// Already blocked; the view was not counted
    StillBlocked { until: Millis },
    /// Navigated away from in-scope content
    LeftScope,
}

/// Snapshot of everything a presenter needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterStatus {
    /// Views counted in the current session
    pub count: u32,
    /// Configured maximum views per session
    pub max: u32,
    /// Whether a cooldown is currently active
    pub blocked: bool,
    /// End of the active cooldown, or 0
    pub blocked_until: Millis,
    /// Time left in the active cooldown, or 0
    pub remaining_ms: Millis,
    /// Time since the first view of the session, or 0
    pub elapsed_ms: Millis,
}
