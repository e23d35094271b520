//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::config::ConfigLoader;
use crate::error::{PayrollError, PayrollResult};
use crate::storage::PayrollStore;

/// Shared application state.
///
/// Holds the configuration and the store. Two locks sit beside them: the
/// busy flag that allows only one payroll save at a time, and the workspace
/// lock that orders edits of the stored formula, roster and period.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn PayrollStore>,
    save_in_flight: Arc<Mutex<()>>,
    workspace: Arc<Mutex<()>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, store: Arc<dyn PayrollStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            save_in_flight: Arc::new(Mutex::new(())),
            workspace: Arc::new(Mutex::new(())),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a shared handle to the store.
    pub fn store(&self) -> Arc<dyn PayrollStore> {
        Arc::clone(&self.store)
    }

    /// Marks a payroll save as running.
    ///
    /// Fails with [`PayrollError::SaveInProgress`] while another save holds
    /// the guard.
    pub fn begin_save(&self) -> PayrollResult<MutexGuard<'_, ()>> {
        self.save_in_flight
            .try_lock()
            .map_err(|_| PayrollError::SaveInProgress)
    }

    /// Waits for exclusive access to the stored workspace.
    ///
    /// Hold the guard across load, edit and save so concurrent edits apply
    /// one after another.
    pub async fn lock_workspace(&self) -> MutexGuard<'_, ()> {
        self.workspace.lock().await
    }
}
