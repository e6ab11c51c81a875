// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    evaluator::{Evaluator, SubmissionGate},
    notify::ProgressNotifier,
    problems::ProblemRegistry,
    remote::{RemoteError, RemoteExecutor},
    sandbox::Sandbox,
    store::{ProgressStore, SqliteProgressStore},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub registry: Arc<ProblemRegistry>,
    pub store: Arc<dyn ProgressStore>,
    pub evaluator: Arc<Evaluator>,
    pub gate: SubmissionGate,
    pub notifier: ProgressNotifier,
    pub remote: RemoteExecutor,
}

impl AppState {
    /// Wires the collaborators around one pool and one sandbox.
    pub fn new(
        pool: SqlitePool,
        config: Config,
        registry: ProblemRegistry,
        sandbox: Arc<dyn Sandbox>,
    ) -> Result<Self, RemoteError> {
        let store: Arc<dyn ProgressStore> = Arc::new(SqliteProgressStore::new(pool.clone()));
        let notifier = ProgressNotifier::new();
        let evaluator = Arc::new(Evaluator::new(sandbox, Arc::clone(&store), notifier.clone()));
        let remote = RemoteExecutor::from_config(&config)?;

        Ok(Self {
            pool,
            config,
            registry: Arc::new(registry),
            store,
            evaluator,
            gate: SubmissionGate::new(),
            notifier,
            remote,
        })
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<ProblemRegistry> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.registry)
    }
}
