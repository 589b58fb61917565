//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CategoryService, DirectoryService, RuleSetService};
use crate::config::Settings;
use crate::infrastructure::store::JsonFileStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, RecordStore};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Record store shared by all services
    pub store: Arc<dyn RecordStore>,

    pub categories: CategoryService,
    pub rule_sets: RuleSetService,
    pub directory: DirectoryService,
}

impl ServiceContainer {
    /// Create a new service container backed by the configured JSON file.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(JsonFileStore::new(settings.data_file.clone(), fs));
        Self::with_store(settings, store)
    }

    /// Create a service container with a custom store (for testing).
    pub fn with_store(settings: Settings, store: Arc<dyn RecordStore>) -> Self {
        let settings = Arc::new(settings);

        Self {
            categories: CategoryService::new(Arc::clone(&store)),
            rule_sets: RuleSetService::new(Arc::clone(&store)),
            directory: DirectoryService::new(Arc::clone(&store)),
            settings,
            store,
        }
    }
}
