/* src/logging/appender/file.rs */

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;

use super::{AppenderCore, LogAppender};
use crate::logging::LogError;
use crate::logging::define::AppenderKind;

#[derive(Debug)]
struct FileState {
	file: Option<File>,
	opened_on: NaiveDate,
}

/// Appends records to a file.
///
/// The file is reopened by [`reopen`](FileAppender::reopen) and
/// automatically on the first write after the local date changes, so an
/// external tool can rotate it.
#[derive(Debug)]
pub struct FileAppender {
	core: AppenderCore,
	path: PathBuf,
	state: Mutex<FileState>,
}

fn open(path: &Path) -> io::Result<File> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}
	OpenOptions::new().create(true).append(true).open(path)
}

impl FileAppender {
	/// Opens `path` for appending, creating missing parent directories.
	pub fn new(path: impl Into<PathBuf>) -> Result<Self, LogError> {
		let path = path.into();
		let file = open(&path)?;
		Ok(Self {
			core: AppenderCore::new(),
			path,
			state: Mutex::new(FileState {
				file: Some(file),
				opened_on: Local::now().date_naive(),
			}),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Closes and reopens the file.
	pub fn reopen(&self) -> Result<(), LogError> {
		{
			let mut state = self.state.lock();
			self.reopen_locked(&mut state)?;
		}
		self.report_reopen();
		Ok(())
	}

	/// Must not log: a record routed back to this appender would wait on
	/// the state lock the caller holds.
	fn reopen_locked(&self, state: &mut FileState) -> io::Result<()> {
		if let Some(mut old) = state.file.take() {
			old.flush()?;
		}
		state.file = Some(open(&self.path)?);
		state.opened_on = Local::now().date_naive();
		Ok(())
	}

	fn report_reopen(&self) {
		log::debug!("reopened log file {}", self.path.display());
	}
}

impl LogAppender for FileAppender {
	fn core(&self) -> &AppenderCore {
		&self.core
	}

	fn write(&self, text: &str) -> io::Result<()> {
		let reopened = {
			let mut state = self.state.lock();
			let stale = state.file.is_none() || state.opened_on != Local::now().date_naive();
			if stale {
				self.reopen_locked(&mut state)?;
			}
			match state.file.as_mut() {
				Some(file) => file.write_all(text.as_bytes())?,
				None => return Err(io::Error::other("log file is not open")),
			}
			stale
		};

		if reopened {
			self.report_reopen();
		}
		Ok(())
	}

	fn kind(&self) -> AppenderKind {
		AppenderKind::File {
			file: self.path.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::logging::{LogEvent, LogFormatter, LogLevel};
	use std::sync::Arc;

	#[test]
	fn test_appends_and_creates_parents() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested/logs/app.log");
		let appender = FileAppender::new(&path).unwrap();
		appender.set_formatter(Arc::new(LogFormatter::new("%m%n"))).unwrap();

		appender
			.log("root", LogLevel::Info, &LogEvent::new("a.rs", 1, "one"))
			.unwrap();
		appender
			.log("root", LogLevel::Info, &LogEvent::new("a.rs", 2, "two"))
			.unwrap();

		assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
	}

	#[test]
	fn test_reopen_follows_rotation() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("app.log");
		let rotated = dir.path().join("app.log.1");
		let appender = FileAppender::new(&path).unwrap();
		appender.set_formatter(Arc::new(LogFormatter::new("%m%n"))).unwrap();

		appender.write("before\n").unwrap();
		fs::rename(&path, &rotated).unwrap();
		appender.reopen().unwrap();
		appender.write("after\n").unwrap();

		assert_eq!(fs::read_to_string(&rotated).unwrap(), "before\n");
		assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
	}

	#[test]
	fn test_kind_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("x.log");
		let appender = FileAppender::new(&path).unwrap();
		assert_eq!(appender.kind(), AppenderKind::File { file: path });
	}
}
