use chrono::{DateTime, Utc};

/// Time source for "now" defaults on freshly allocated entities.
///
/// Injected into blank-instance factories rather than read from ambient
/// global state, so tests construct a frozen clock instead of mutating a
/// process-wide mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clock {
    /// Reads the wall clock on every call.
    Live,
    /// Always returns the fixed instant until changed.
    Frozen(DateTime<Utc>),
}

impl Clock {
    pub fn live() -> Self {
        Self::Live
    }

    pub fn frozen(at: DateTime<Utc>) -> Self {
        Self::Frozen(at)
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::Live => Utc::now(),
            Self::Frozen(at) => *at,
        }
    }

    pub fn freeze(&mut self, at: DateTime<Utc>) {
        *self = Self::Frozen(at);
    }

    pub fn thaw(&mut self) {
        *self = Self::Live;
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen(_))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::Live
    }
}
