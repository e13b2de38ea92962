//! Filesystem watcher implementation

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use solgraph_indexer::{LoadOptions, load_solution};
use solgraph_server::ServerState;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info, warn};

/// Directories whose contents never affect the dependency graph.
const IGNORED_DIRECTORIES: [&str; 5] = ["bin", "obj", ".git", ".vs", "node_modules"];

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Created(path) | WatchEvent::Modified(path) | WatchEvent::Removed(path) => path,
        }
    }

    fn into_path(self) -> PathBuf {
        match self {
            WatchEvent::Created(path) | WatchEvent::Modified(path) | WatchEvent::Removed(path) => path,
        }
    }
}

/// File system watcher for a solution directory
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::UnboundedReceiver<WatchEvent>,
    watched_paths: HashSet<PathBuf>,
    root_path: PathBuf,
}

impl FileWatcher {
    pub fn new(root_path: impl AsRef<Path>) -> Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let root = root_path.clone();
        let watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            match res {
                Ok(event) => {
                    debug!("File system event: {:?}", event);
                    Self::handle_notify_event(event, &root, &event_tx);
                }
                Err(e) => {
                    error!("File system watch error: {}", e);
                }
            }
        })?;

        Ok(Self {
            watcher,
            event_rx,
            watched_paths: HashSet::new(),
            root_path,
        })
    }

    fn handle_notify_event(event: notify::Event, root: &Path, event_tx: &mpsc::UnboundedSender<WatchEvent>) {
        let make: fn(PathBuf) -> WatchEvent = match event.kind {
            notify::EventKind::Create(_) => WatchEvent::Created,
            notify::EventKind::Modify(_) => WatchEvent::Modified,
            notify::EventKind::Remove(_) => WatchEvent::Removed,
            _ => return,
        };

        for path in event.paths {
            if should_ignore_path(root, &path) {
                continue;
            }
            if let Err(e) = event_tx.send(make(path)) {
                warn!("Failed to forward watch event: {}", e);
            }
        }
    }

    pub fn watch_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Watching directory: {:?}", path);

        self.watcher.watch(path, RecursiveMode::Recursive)?;
        self.watched_paths.insert(path.to_path_buf());
        Ok(())
    }

    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Stopping watch for: {:?}", path);

        self.watcher.unwatch(path)?;
        self.watched_paths.remove(path);
        Ok(())
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn event_receiver(&mut self) -> &mut mpsc::UnboundedReceiver<WatchEvent> {
        &mut self.event_rx
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched_paths.contains(path)
    }
}

/// Reloads the solution whenever its manifest or a project file changes,
/// and publishes the new report to the server state.
pub struct WatcherService {
    watcher: Arc<RwLock<FileWatcher>>,
    solution_path: PathBuf,
    options: LoadOptions,
    debounce: Duration,
    state: Arc<ServerState>,
}

impl WatcherService {
    pub fn new(solution_path: impl AsRef<Path>, options: LoadOptions, state: Arc<ServerState>) -> Result<Self> {
        let solution_path = solution_path.as_ref().to_path_buf();
        let root = match solution_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            watcher: Arc::new(RwLock::new(FileWatcher::new(root)?)),
            solution_path,
            options,
            debounce: DEFAULT_DEBOUNCE,
            state,
        })
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching the solution directory
    pub async fn start_watching(&self) -> Result<()> {
        let mut watcher = self.watcher.write().await;
        let root_path = watcher.root_path().to_path_buf();
        watcher.watch_directory(&root_path)?;

        info!("Started watching solution directory: {:?}", root_path);
        Ok(())
    }

    /// Reload after each debounced batch of relevant changes. Runs until
    /// the watcher shuts down.
    pub async fn process_events(&self) -> Result<()> {
        let mut watcher = self.watcher.write().await;
        let event_rx = watcher.event_receiver();

        while let Some(changed) = next_batch(event_rx, self.debounce).await {
            info!("{} solution files changed, reloading", changed.len());
            self.reload().await;
        }

        Ok(())
    }

    /// Load the solution again and publish it. On failure the previous
    /// report stays in place; returns whether a new report was published.
    pub async fn reload(&self) -> bool {
        let solution = match load_solution(&self.solution_path, &self.options).await {
            Ok(solution) => solution,
            Err(e) => {
                warn!("Reload failed, keeping previous report: {:#}", e);
                return false;
            }
        };

        match self.state.publish(solution.report()).await {
            Ok(()) => {
                info!(
                    "Reloaded {}: {} levels, {} problems",
                    solution.name(),
                    solution.level_count(),
                    solution.problems().len()
                );
                true
            }
            Err(e) => {
                error!("Failed to publish report: {}", e);
                false
            }
        }
    }
}

/// Wait for a relevant event, then keep collecting until no event arrives
/// for `debounce`. `None` once the channel is closed and drained.
async fn next_batch(event_rx: &mut mpsc::UnboundedReceiver<WatchEvent>, debounce: Duration) -> Option<Vec<PathBuf>> {
    let mut batch = Vec::new();
    loop {
        let event = if batch.is_empty() {
            event_rx.recv().await?
        } else {
            match tokio::time::timeout(debounce, event_rx.recv()).await {
                Ok(Some(event)) => event,
                Ok(None) | Err(_) => return Some(batch),
            }
        };

        if is_solution_file(event.path()) {
            debug!("Relevant change: {:?}", event);
            batch.push(event.into_path());
        }
    }
}

/// `.sln` manifests and MSBuild project files (`.csproj`, `.vbproj`, ...).
pub fn is_solution_file(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            ext == "sln" || (ext.len() > 4 && ext.ends_with("proj"))
        }
        None => false,
    }
}

/// Build output and tool directories below `root` are ignored.
pub fn should_ignore_path(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| IGNORED_DIRECTORIES.contains(&name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{00000000-0000-0000-0000-000000000001}\"
EndProject
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Core\", \"Core\\Core.csproj\", \"{00000000-0000-0000-0000-000000000002}\"
EndProject
";

    const APP_WITH_CORE: &str =
        "<Project><ItemGroup><ProjectReference Include=\"..\\Core\\Core.csproj\" /></ItemGroup></Project>";
    const EMPTY_PROJECT: &str = "<Project />";

    async fn setup() -> (TempDir, Arc<ServerState>, WatcherService) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("App")).unwrap();
        fs::create_dir_all(root.join("Core")).unwrap();
        fs::write(root.join("Demo.sln"), MANIFEST).unwrap();
        fs::write(root.join("App/App.csproj"), APP_WITH_CORE).unwrap();
        fs::write(root.join("Core/Core.csproj"), EMPTY_PROJECT).unwrap();

        let path = root.join("Demo.sln");
        let solution = load_solution(&path, &LoadOptions::default()).await.unwrap();
        let state = Arc::new(ServerState::new(solution.report()));
        let service = WatcherService::new(&path, LoadOptions::default(), Arc::clone(&state)).unwrap();
        (temp_dir, state, service)
    }

    #[tokio::test]
    async fn test_file_watcher_creation() {
        let temp_dir = TempDir::new().unwrap();
        let mut watcher = FileWatcher::new(temp_dir.path()).unwrap();
        watcher.watch_directory(temp_dir.path()).unwrap();
        assert!(watcher.is_watching(temp_dir.path()));

        watcher.unwatch(temp_dir.path()).unwrap();
        assert!(!watcher.is_watching(temp_dir.path()));
    }

    #[tokio::test]
    async fn test_reload_publishes_new_report() {
        let (temp_dir, state, service) = setup().await;
        assert_eq!(state.report.read().await.levels.len(), 2);

        let mut updates = state.updates_tx.subscribe();
        fs::write(temp_dir.path().join("App/App.csproj"), EMPTY_PROJECT).unwrap();

        assert!(service.reload().await);
        let report = state.report.read().await.clone();
        assert!(report.levels.is_empty());
        assert_eq!(report.orphans, vec!["App", "Core"]);

        let message = updates.recv().await.unwrap();
        assert!(message.contains("\"report_updated\""));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_report() {
        let (temp_dir, state, service) = setup().await;
        let before = state.report.read().await.clone();

        fs::remove_file(temp_dir.path().join("Demo.sln")).unwrap();

        assert!(!service.reload().await);
        assert_eq!(*state.report.read().await, before);
    }

    #[tokio::test]
    async fn test_next_batch_coalesces_relevant_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(WatchEvent::Modified(PathBuf::from("/repo/App/Program.cs"))).unwrap();
        tx.send(WatchEvent::Modified(PathBuf::from("/repo/App/App.csproj"))).unwrap();
        tx.send(WatchEvent::Created(PathBuf::from("/repo/Lib/Lib.fsproj"))).unwrap();
        tx.send(WatchEvent::Removed(PathBuf::from("/repo/notes.txt"))).unwrap();

        let batch = next_batch(&mut rx, Duration::from_millis(20)).await.unwrap();
        assert_eq!(
            batch,
            vec![PathBuf::from("/repo/App/App.csproj"), PathBuf::from("/repo/Lib/Lib.fsproj")]
        );

        tx.send(WatchEvent::Modified(PathBuf::from("/repo/Demo.sln"))).unwrap();
        drop(tx);
        let batch = next_batch(&mut rx, Duration::from_millis(20)).await.unwrap();
        assert_eq!(batch, vec![PathBuf::from("/repo/Demo.sln")]);
        assert_eq!(next_batch(&mut rx, Duration::from_millis(20)).await, None);
    }

    #[test]
    fn test_is_solution_file() {
        assert!(is_solution_file(Path::new("Demo.sln")));
        assert!(is_solution_file(Path::new("App.csproj")));
        assert!(is_solution_file(Path::new("Lib.VBPROJ")));
        assert!(is_solution_file(Path::new("Native.vcxproj")));
        assert!(!is_solution_file(Path::new("Program.cs")));
        assert!(!is_solution_file(Path::new("proj")));
        assert!(!is_solution_file(Path::new("Directory.Build.props")));
    }

    #[test]
    fn test_should_ignore_path() {
        let root = Path::new("/repo");
        assert!(should_ignore_path(root, Path::new("/repo/App/bin/Debug/App.csproj")));
        assert!(should_ignore_path(root, Path::new("/repo/App/obj/project.assets.json")));
        assert!(should_ignore_path(root, Path::new("/repo/.vs/config")));
        assert!(!should_ignore_path(root, Path::new("/repo/App/App.csproj")));

        // Only components below the root count.
        assert!(!should_ignore_path(Path::new("/home/bin/repo"), Path::new("/home/bin/repo/App.csproj")));
    }
}
