//! JSON file store.
//!
//! Keeps `routines.json` and `sessions.json` side by side in a data
//! directory. Every write replaces the whole document atomically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use repset_model::{Routine, RoutineSession};

use crate::error::Result;
use crate::io::{read_document_async, write_document_async};
use crate::store::{WorkoutStore, merge_routine};

const ROUTINES_FILENAME: &str = "routines.json";
const SESSIONS_FILENAME: &str = "sessions.json";

#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn routines_path(&self) -> PathBuf {
        self.root.join(ROUTINES_FILENAME)
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.root.join(SESSIONS_FILENAME)
    }
}

#[async_trait]
impl WorkoutStore for JsonFileStore {
    async fn get_routines(&self) -> Result<Vec<Routine>> {
        read_document_async(self.routines_path()).await
    }

    async fn save_routines(&self, routines: &[Routine]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        write_document_async(self.routines_path(), routines.to_vec()).await?;
        tracing::info!(count = routines.len(), root = %self.root.display(), "saved routines");
        Ok(())
    }

    async fn upsert_routine(&self, routine: Routine) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut routines: Vec<Routine> = read_document_async(self.routines_path()).await?;
        let id = routine.id.clone();
        merge_routine(&mut routines, routine);
        write_document_async(self.routines_path(), routines).await?;
        tracing::info!(routine_id = %id, root = %self.root.display(), "saved routine");
        Ok(())
    }

    async fn get_routine_sessions(&self) -> Result<Vec<RoutineSession>> {
        read_document_async(self.sessions_path()).await
    }

    async fn save_routine_session(&self, session: &RoutineSession) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut sessions: Vec<RoutineSession> = read_document_async(self.sessions_path()).await?;
        sessions.push(session.clone());
        write_document_async(self.sessions_path(), sessions).await?;
        tracing::info!(session_id = %session.id, routine_id = %session.routine_id, "saved session");
        Ok(())
    }
}
