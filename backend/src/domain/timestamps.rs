//! Creation and modification timestamps carried by every entity.

use chrono::{DateTime, TimeDelta, Utc};

/// `created_at`/`updated_at` pair.
///
/// `updated_at` never moves backwards and advances on every [`touch`],
/// even when the clock reports the same instant twice.
///
/// [`touch`]: Timestamps::touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Stamp a freshly created entity.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a stored pair. `updated_at` is raised to `created_at` if it
    /// was recorded earlier.
    pub fn restore(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    /// Instant the entity was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Instant of the latest modification.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record a modification observed at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::microseconds(1)
        };
    }
}
