pub mod ask;
pub mod capabilities;
pub mod classify;
pub mod knowledge;
pub mod onboard;
pub mod usage;

use chorus_config::AppConfig;
use chorus_memory::FileStore;

/// Store key of the knowledge index snapshot.
pub const KNOWLEDGE_KEY: &str = "knowledge";

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// File store for knowledge and memory snapshots.
pub fn snapshot_store(config: &AppConfig) -> FileStore {
    match &config.knowledge.snapshot_dir {
        Some(dir) => FileStore::new(dir.clone()),
        None => FileStore::new(FileStore::default_dir()),
    }
}
