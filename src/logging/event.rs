/* src/logging/event.rs */

use std::borrow::Cow;
use std::cell::Cell;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
	static THREAD_ID: Cell<u64> = const { Cell::new(0) };
}

/// Milliseconds since the logging clock started (first use in the process).
pub fn elapsed_ms() -> u64 {
	let start = PROCESS_START.get_or_init(Instant::now);
	u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Small, stable numeric id of the calling thread.
pub fn current_thread_id() -> u64 {
	THREAD_ID.with(|id| {
		if id.get() == 0 {
			id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
		}
		id.get()
	})
}

/// One log record.
#[derive(Debug, Clone)]
pub struct LogEvent {
	file: Cow<'static, str>,
	line: u32,
	elapsed: u64,
	thread_id: u64,
	task_id: u64,
	thread_name: String,
	time: SystemTime,
	message: String,
}

impl LogEvent {
	/// Creates an event stamped with the current time and calling thread.
	pub fn new(file: impl Into<Cow<'static, str>>, line: u32, message: impl Into<String>) -> Self {
		let current = std::thread::current();
		Self {
			file: file.into(),
			line,
			elapsed: elapsed_ms(),
			thread_id: current_thread_id(),
			task_id: 0,
			thread_name: current.name().unwrap_or_default().to_string(),
			time: SystemTime::now(),
			message: message.into(),
		}
	}

	pub fn with_task_id(mut self, task_id: u64) -> Self {
		self.task_id = task_id;
		self
	}

	pub fn with_time(mut self, time: SystemTime) -> Self {
		self.time = time;
		self
	}

	pub fn with_thread(mut self, thread_id: u64, thread_name: impl Into<String>) -> Self {
		self.thread_id = thread_id;
		self.thread_name = thread_name.into();
		self
	}

	pub fn file(&self) -> &str {
		&self.file
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	/// Milliseconds since the logging clock started.
	pub fn elapsed(&self) -> u64 {
		self.elapsed
	}

	pub fn thread_id(&self) -> u64 {
		self.thread_id
	}

	pub fn task_id(&self) -> u64 {
		self.task_id
	}

	pub fn thread_name(&self) -> &str {
		&self.thread_name
	}

	pub fn time(&self) -> SystemTime {
		self.time
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_thread_ids_are_stable_and_distinct() {
		let here = current_thread_id();
		assert_eq!(here, current_thread_id());
		let there = std::thread::spawn(current_thread_id).join().unwrap();
		assert_ne!(here, there);
	}

	#[test]
	fn test_event_captures_thread_name() {
		let event = std::thread::Builder::new()
			.name("worker-7".into())
			.spawn(|| LogEvent::new("a.rs", 1, "x"))
			.unwrap()
			.join()
			.unwrap();
		assert_eq!(event.thread_name(), "worker-7");
		assert_eq!(event.task_id(), 0);
		assert_eq!(event.with_task_id(9).task_id(), 9);
	}
}
