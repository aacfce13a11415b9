/* src/watch/worker.rs */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};

use super::{ReloadEvent, WatchConfig};
use crate::config::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
	Write,
	Remove,
}

struct DebounceState {
	last_seen: Instant,
	change: Change,
}

pub(crate) async fn process_events(
	mut raw_rx: mpsc::Receiver<notify::Result<notify::Event>>,
	tx: broadcast::Sender<ReloadEvent>,
	registry: Arc<Registry>,
	config: WatchConfig,
	path: PathBuf,
) {
	let mut pending: Option<DebounceState> = None;

	let tick_rate = if config.debounce < Duration::from_millis(50) {
		config.debounce.max(Duration::from_millis(1))
	} else {
		config.debounce / 5
	};

	let mut interval = tokio::time::interval(tick_rate);

	loop {
		tokio::select! {
			maybe_event = raw_rx.recv() => {
				match maybe_event {
					Some(Ok(event)) => handle_raw_event(event, &mut pending, &path),
					Some(Err(e)) => log::error!("notify error: {:?}", e),
					None => break,
				}
			}
			_ = interval.tick() => {
				if let Some(state) = pending.take_if(|state| state.last_seen.elapsed() >= config.debounce) {
					flush(state.change, &tx, &registry, &path).await;
				}
			}
		}
	}
}

fn handle_raw_event(event: notify::Event, pending: &mut Option<DebounceState>, path: &Path) {
	use notify::EventKind as NK;
	let change = match event.kind {
		NK::Create(_) | NK::Modify(_) => Change::Write,
		NK::Remove(_) => Change::Remove,
		_ => return,
	};

	if !event.paths.iter().any(|p| p.file_name() == path.file_name()) {
		return;
	}

	// The latest change decides: a rewrite after a removal is a reload.
	*pending = Some(DebounceState {
		last_seen: Instant::now(),
		change,
	});
}

async fn flush(
	change: Change,
	tx: &broadcast::Sender<ReloadEvent>,
	registry: &Arc<Registry>,
	path: &Path,
) {
	let event = match change {
		Change::Remove if !path.exists() => {
			log::warn!("config {} removed, keeping current values", path.display());
			ReloadEvent::Removed { path: path.to_path_buf() }
		}
		_ => {
			let registry = Arc::clone(registry);
			let target = path.to_path_buf();
			let outcome = tokio::task::spawn_blocking(move || registry.load_file(&target)).await;
			match outcome {
				Ok(Ok(report)) => {
					log::info!(
						"reloaded {}: {} updated, {} failed",
						path.display(),
						report.updated.len(),
						report.failed.len()
					);
					ReloadEvent::Applied {
						path: path.to_path_buf(),
						report,
					}
				}
				Ok(Err(e)) => {
					log::error!("reload of {} failed: {}", path.display(), e);
					ReloadEvent::Failed {
						path: path.to_path_buf(),
						error: e.to_string(),
					}
				}
				Err(e) => {
					log::error!("reload task for {} failed: {}", path.display(), e);
					ReloadEvent::Failed {
						path: path.to_path_buf(),
						error: e.to_string(),
					}
				}
			}
		}
	};
	let _ = tx.send(event);
}
