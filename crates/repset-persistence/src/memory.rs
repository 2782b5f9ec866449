//! In-memory store, for tests and demos.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use repset_model::{Routine, RoutineSession};

use crate::error::{PersistenceError, Result};
use crate::store::{WorkoutStore, merge_routine};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    routines: Arc<RwLock<Vec<Routine>>>,
    sessions: Arc<RwLock<Vec<RoutineSession>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routines(routines: Vec<Routine>) -> Self {
        Self {
            routines: Arc::new(RwLock::new(routines)),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with [`PersistenceError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::Acquire) {
            Err(PersistenceError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WorkoutStore for MemoryStore {
    async fn get_routines(&self) -> Result<Vec<Routine>> {
        self.check_available()?;
        Ok(self.routines.read().await.clone())
    }

    async fn save_routines(&self, routines: &[Routine]) -> Result<()> {
        self.check_available()?;
        *self.routines.write().await = routines.to_vec();
        Ok(())
    }

    async fn upsert_routine(&self, routine: Routine) -> Result<()> {
        self.check_available()?;
        merge_routine(&mut *self.routines.write().await, routine);
        Ok(())
    }

    async fn get_routine_sessions(&self) -> Result<Vec<RoutineSession>> {
        self.check_available()?;
        Ok(self.sessions.read().await.clone())
    }

    async fn save_routine_session(&self, session: &RoutineSession) -> Result<()> {
        self.check_available()?;
        self.sessions.write().await.push(session.clone());
        Ok(())
    }
}
