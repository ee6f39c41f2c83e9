use std::sync::Arc;

use axum::extract::FromRef;
use storage::{Database, kv::KeyValueStore, services::submission_guard::SubmissionGuard};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub submissions: Arc<dyn KeyValueStore>,
}

impl AppState {
    pub fn new(db: Database, submissions: Arc<dyn KeyValueStore>) -> Self {
        Self { db, submissions }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

/// Submission history shared by every client, scoped per request
#[derive(Clone)]
pub struct SubmissionStore(pub Arc<dyn KeyValueStore>);

impl SubmissionStore {
    pub fn guard_for(&self, client_id: &str) -> SubmissionGuard {
        SubmissionGuard::scoped(self.0.clone(), client_id)
    }
}

impl FromRef<AppState> for SubmissionStore {
    fn from_ref(state: &AppState) -> Self {
        Self(state.submissions.clone())
    }
}
