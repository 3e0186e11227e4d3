//! Insertion-ordered, mutex-guarded row store shared by the in-memory
//! repositories.
//!
//! Every write holds the table lock across its uniqueness check and the
//! mutation itself, so two racing inserts can never both pass the check.
//! [`Rows`] exposes the held lock so a store can span several tables.

use std::sync::{Mutex, MutexGuard};

use crate::domain::Entity;
use crate::domain::ports::PersistenceError;

use super::not_found;

/// Returns the violated constraint name when `existing` and `candidate`
/// may not coexist.
pub(crate) type UniqueRule<E> = fn(existing: &E, candidate: &E) -> Option<&'static str>;

/// Rule for tables without secondary unique indexes.
pub(crate) fn unconstrained<E>(_existing: &E, _candidate: &E) -> Option<&'static str> {
    None
}

pub(crate) struct MemoryTable<E: Entity> {
    rows: Mutex<Vec<E>>,
    unique: UniqueRule<E>,
}

impl<E: Entity> MemoryTable<E> {
    pub(crate) fn new(unique: UniqueRule<E>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            unique,
        }
    }

    /// Hold the table lock for a multi-step write.
    ///
    /// Callers that lock several tables must take them in the order the
    /// store declares them.
    pub(crate) fn lock(&self) -> Result<Rows<'_, E>, PersistenceError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| PersistenceError::query(format!("{} table lock poisoned", E::KIND)))?;
        Ok(Rows {
            rows,
            unique: self.unique,
        })
    }

    pub(crate) fn insert(&self, row: &E) -> Result<(), PersistenceError> {
        self.lock()?.insert(row)
    }

    pub(crate) fn get(&self, id: &E::Id) -> Result<Option<E>, PersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }

    pub(crate) fn find(
        &self,
        predicate: impl Fn(&E) -> bool,
    ) -> Result<Option<E>, PersistenceError> {
        Ok(self.lock()?.rows.iter().find(|row| predicate(row)).cloned())
    }

    pub(crate) fn filter(
        &self,
        predicate: impl Fn(&E) -> bool,
    ) -> Result<Vec<E>, PersistenceError> {
        Ok(self
            .lock()?
            .rows
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    pub(crate) fn all(&self) -> Result<Vec<E>, PersistenceError> {
        Ok(self.lock()?.rows.clone())
    }

    pub(crate) fn replace_with(
        &self,
        id: &E::Id,
        next: impl FnOnce(&E) -> Result<E, PersistenceError>,
    ) -> Result<E, PersistenceError> {
        self.lock()?.replace_with(id, next)
    }

    pub(crate) fn remove(&self, id: &E::Id) -> Result<(), PersistenceError> {
        self.lock()?.remove(id)
    }
}

/// Locked view of a table's rows.
pub(crate) struct Rows<'a, E: Entity> {
    rows: MutexGuard<'a, Vec<E>>,
    unique: UniqueRule<E>,
}

impl<E: Entity> Rows<'_, E> {
    fn violation<'a>(
        &self,
        mut others: impl Iterator<Item = &'a E>,
        candidate: &E,
    ) -> Option<&'static str>
    where
        E: 'a,
    {
        others.find_map(|existing| (self.unique)(existing, candidate))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.iter()
    }

    pub(crate) fn get(&self, id: &E::Id) -> Option<&E> {
        self.rows.iter().find(|row| row.entity_id() == id)
    }

    pub(crate) fn contains(&self, id: &E::Id) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn insert(&mut self, row: &E) -> Result<(), PersistenceError> {
        if self.contains(row.entity_id()) {
            return Err(PersistenceError::duplicate(format!("{}.id", E::KIND)));
        }
        if let Some(constraint) = self.violation(self.rows.iter(), row) {
            return Err(PersistenceError::duplicate(constraint));
        }
        self.rows.push(row.clone());
        Ok(())
    }

    /// Replace the row `id` with the value `next` derives from it.
    ///
    /// Nothing is written when `next` fails or the result violates a
    /// uniqueness rule against any other row.
    pub(crate) fn replace_with(
        &mut self,
        id: &E::Id,
        next: impl FnOnce(&E) -> Result<E, PersistenceError>,
    ) -> Result<E, PersistenceError> {
        let current = self.get(id).ok_or_else(|| not_found::<E>(id))?;
        let candidate = next(current)?;
        let others = self.rows.iter().filter(|row| row.entity_id() != id);
        if let Some(constraint) = self.violation(others, &candidate) {
            return Err(PersistenceError::duplicate(constraint));
        }
        if let Some(slot) = self.rows.iter_mut().find(|row| row.entity_id() == id) {
            *slot = candidate.clone();
        }
        Ok(candidate)
    }

    pub(crate) fn remove(&mut self, id: &E::Id) -> Result<(), PersistenceError> {
        if self.remove_where(|row| row.entity_id() == id) == 0 {
            return Err(not_found::<E>(id));
        }
        Ok(())
    }

    /// Drop every matching row, returning how many went.
    pub(crate) fn remove_where(&mut self, predicate: impl Fn(&E) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !predicate(row));
        before - self.rows.len()
    }

    /// Mutate every row in place. Uniqueness rules are not rechecked.
    pub(crate) fn for_each_mut(&mut self, mut visit: impl FnMut(&mut E)) {
        self.rows.iter_mut().for_each(|row| visit(row));
    }
}
