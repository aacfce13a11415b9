/* src/watch/watcher.rs */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::worker::process_events;
use super::{ReloadEvent, Result, WatchConfig};
use crate::config::{LoadReport, Registry};

/// Re-applies a config document to a registry whenever it changes.
///
/// Must be created inside a Tokio runtime. Dropping the watcher stops it.
pub struct ConfigWatcher {
	_internal_watcher: RecommendedWatcher,
	task_handle: JoinHandle<()>,
	event_tx: broadcast::Sender<ReloadEvent>,
	registry: Arc<Registry>,
	path: PathBuf,
}

impl ConfigWatcher {
	/// Starts watching `path` and, when configured, applies it once right away.
	#[must_use = "ConfigWatcher must be kept alive"]
	pub fn new(path: impl AsRef<Path>, registry: Arc<Registry>, config: WatchConfig) -> Result<Self> {
		let path = resolve(path.as_ref())?;

		if config.load_on_start {
			let report = registry.load_file(&path)?;
			log::info!(
				"loaded {} ({} updated)",
				path.display(),
				report.updated.len()
			);
		}

		let (raw_tx, raw_rx) = mpsc::channel(100);
		let mut internal_watcher =
			notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
				let _ = raw_tx.blocking_send(res);
			})?;

		// Watch the directory so replace-by-rename saves are seen.
		let parent = path.parent().map(Path::to_path_buf).unwrap_or_else(|| path.clone());
		internal_watcher.watch(&parent, RecursiveMode::NonRecursive)?;

		let (event_tx, _) = broadcast::channel(100);
		let tx_clone = event_tx.clone();
		let worker_registry = Arc::clone(&registry);
		let worker_path = path.clone();

		let task_handle = tokio::spawn(async move {
			process_events(raw_rx, tx_clone, worker_registry, config, worker_path).await;
		});

		log::debug!("watching {}", path.display());
		Ok(Self {
			_internal_watcher: internal_watcher,
			task_handle,
			event_tx,
			registry,
			path,
		})
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
		self.event_tx.subscribe()
	}

	/// The watched file, with its directory canonicalized.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Applies the document immediately, outside the debounce cycle.
	pub fn reload(&self) -> Result<LoadReport> {
		Ok(self.registry.load_file(&self.path)?)
	}

	pub fn stop(&self) {
		self.task_handle.abort();
	}
}

impl Drop for ConfigWatcher {
	fn drop(&mut self) {
		self.task_handle.abort();
	}
}

/// Canonicalizes the parent directory, which must exist. The file itself
/// may be missing until it is first written.
fn resolve(path: &Path) -> Result<PathBuf> {
	let parent = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
		_ => PathBuf::from("."),
	};
	let file_name = path.file_name().ok_or_else(|| {
		std::io::Error::new(
			std::io::ErrorKind::InvalidInput,
			format!("not a file path: {:?}", path),
		)
	})?;
	Ok(std::fs::canonicalize(parent)?.join(file_name))
}
