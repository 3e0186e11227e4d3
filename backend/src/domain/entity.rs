//! Behaviour shared by every stored entity.

use std::fmt;

use chrono::{DateTime, Utc};

use super::Timestamps;
use super::validation::ValidationError;

/// A persisted domain entity with a stable id and timestamps.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identifier type addressing the entity.
    type Id: Clone + Eq + fmt::Display + Send + Sync + 'static;

    /// Lower-case entity name used in messages.
    const KIND: &'static str;

    /// Stable identifier.
    fn entity_id(&self) -> &Self::Id;

    /// Creation and last-change times.
    fn timestamps(&self) -> &Timestamps;

    /// Record a successful modification.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// A partial update applied through an entity's validated setters.
///
/// Callers apply a patch to a copy and keep the copy only when every field
/// validates, so a failing patch never leaves a half-updated entity behind.
pub trait Patch<E: Entity>: fmt::Debug + Send + Sync {
    /// Apply every present field through the validated setters.
    fn apply_to(&self, entity: &mut E) -> Result<(), ValidationError>;

    /// Whether the patch would change nothing.
    fn is_empty(&self) -> bool;
}

/// Apply `patch` to a copy of `entity`, returning the validated result.
pub fn patched<E, P>(entity: &E, patch: &P, now: DateTime<Utc>) -> Result<E, ValidationError>
where
    E: Entity,
    P: Patch<E> + ?Sized,
{
    let mut next = entity.clone();
    patch.apply_to(&mut next)?;
    next.touch(now);
    Ok(next)
}
