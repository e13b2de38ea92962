//! Filesystem watching and live solution reloads

pub mod watcher;

pub use watcher::{FileWatcher, WatchEvent, WatcherService, is_solution_file, should_ignore_path};
