//! Generation counters used to recognise stale asynchronous results.
//!
//! Requests are never cancelled on the wire. Each one is stamped with the
//! generation current when it was issued, and its result is only applied if
//! no newer request has been issued since.

use std::fmt;

use serde::Serialize;

/// Hands out strictly increasing generations and remembers the newest one.
#[derive(Debug, Default)]
pub struct GenerationTracker {
    active: u64,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the active generation, superseding everything issued before.
    pub fn next(&mut self) -> u64 {
        self.active += 1;
        self.active
    }

    pub fn current(&self) -> u64 {
        self.active
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.active
    }
}

macro_rules! generation_token {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(u64);

        impl $name {
            pub(crate) fn mint(tracker: &mut GenerationTracker) -> Self {
                Self(tracker.next())
            }

            pub(crate) fn is_current(self, tracker: &GenerationTracker) -> bool {
                tracker.is_current(self.0)
            }

            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

generation_token!(
    /// Identity of one issued search request.
    QueryToken,
    "query"
);
generation_token!(
    /// Identity of one issued detail fetch.
    DetailToken,
    "detail"
);
generation_token!(
    /// Identity of one visibility-observer subscription.
    ObserverId,
    "observer"
);
