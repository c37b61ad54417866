//! In-process store: a lock-guarded ordered map per entity type.

use crate::error::AppError;
use crate::store::{Entity, Store};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

pub struct MemoryStore<E> {
    rows: RwLock<BTreeMap<i64, E>>,
    /// Next id handed out to a record saved without one. Always above every stored id.
    next_id: AtomicI64,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        MemoryStore {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Called with the write lock held, so the id and the insert are one step.
    fn assign_id(&self, entity: &mut E) -> Result<i64, AppError> {
        match entity.id() {
            Some(id) => {
                let next = id.checked_add(1).ok_or_else(|| {
                    AppError::Validation(format!("{} id {} leaves no room for generated ids", E::KIND, id))
                })?;
                self.next_id.fetch_max(next, Ordering::SeqCst);
                Ok(id)
            }
            None => {
                let id = self
                    .next_id
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
                    .map_err(|_| AppError::Storage(format!("{} id space exhausted", E::KIND)))?;
                entity.set_id(id);
                Ok(id)
            }
        }
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Storage("memory store lock poisoned".into())
}

#[async_trait]
impl<E: Entity> Store<E> for MemoryStore<E> {
    async fn find_all(&self) -> Result<Vec<E>, AppError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<E, AppError> {
        let rows = self.rows.read().map_err(poisoned)?;
        rows.get(&id).cloned().ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    async fn find_by(&self, filter: &E::Filter) -> Result<Vec<E>, AppError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.values().filter(|e| e.matches(filter)).cloned().collect())
    }

    async fn save(&self, mut entity: E) -> Result<E, AppError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let id = self.assign_id(&mut entity)?;
        rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        Ok(rows.remove(&id).is_some())
    }
}
