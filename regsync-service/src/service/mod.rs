pub mod exclusion_watcher;
pub mod metrics;
