use async_trait::async_trait;

use repset_model::{Routine, RoutineSession};

use crate::error::Result;

/// Persistence service used by authoring and the session engine.
///
/// Routines are read and written as a whole list; a routine document is
/// never partially overwritten. Session summaries are append-only.
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    async fn get_routines(&self) -> Result<Vec<Routine>>;

    /// Replace the stored routine list.
    async fn save_routines(&self, routines: &[Routine]) -> Result<()>;

    /// Insert or replace a routine by id and write the whole list back.
    ///
    /// Backends that allow concurrent writers override this to hold their
    /// write lock across the read and the write.
    async fn upsert_routine(&self, routine: Routine) -> Result<()> {
        let mut routines = self.get_routines().await?;
        merge_routine(&mut routines, routine);
        self.save_routines(&routines).await
    }

    async fn get_routine_sessions(&self) -> Result<Vec<RoutineSession>>;

    /// Append a finished session summary.
    async fn save_routine_session(&self, session: &RoutineSession) -> Result<()>;
}

/// Look up one routine by id.
pub async fn find_routine(store: &dyn WorkoutStore, id: &str) -> Result<Option<Routine>> {
    let routines = store.get_routines().await?;
    Ok(routines.into_iter().find(|routine| routine.id == id))
}

/// Insert or replace a routine by id, then write the whole list back.
pub async fn upsert_routine(store: &dyn WorkoutStore, routine: Routine) -> Result<()> {
    store.upsert_routine(routine).await
}

/// Replace the routine with the same id, or append it.
pub(crate) fn merge_routine(routines: &mut Vec<Routine>, routine: Routine) {
    match routines.iter_mut().find(|existing| existing.id == routine.id) {
        Some(existing) => *existing = routine,
        None => routines.push(routine),
    }
}
