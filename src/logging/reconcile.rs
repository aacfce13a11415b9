/* src/logging/reconcile.rs */

//!
//! Drives live loggers toward the declarative `logs` config value.
//!
//! [`plan`] diffs two definition sets without touching anything;
//! [`reconcile`] carries the plan out against a [`LoggerManager`]. Each
//! definition is applied on its own, so one bad entry never blocks the rest
//! of the batch.

use std::sync::Arc;

use super::appender::{FileAppender, LogAppender, StdoutAppender};
use super::define::{AppenderKind, LogAppenderDefine, LogDefine, LogDefines};
use super::{LogError, LogFormatter, LogLevel, LoggerManager};
use crate::config::{ConfigError, ConfigVar, Registry};

/// Config key holding the logger definitions.
pub const LOGS_KEY: &str = "logs";

/// One step of a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
	/// Create or rebuild the logger from its definition.
	Apply(&'a LogDefine),
	/// Deactivate the logger: level off, no appenders.
	Disable(&'a str),
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
	pub applied: Vec<String>,
	pub disabled: Vec<String>,
	pub failed: Vec<(String, LogError)>,
}

impl ReconcileReport {
	pub fn is_noop(&self) -> bool {
		self.applied.is_empty() && self.disabled.is_empty() && self.failed.is_empty()
	}
}

/// Computes the actions that turn `old` into `new`.
///
/// Definitions that are new or differ in any field are applied; names that
/// disappeared are disabled; unchanged definitions produce nothing.
pub fn plan<'a>(old: &'a LogDefines, new: &'a LogDefines) -> Vec<Action<'a>> {
	let mut actions: Vec<Action<'a>> = new
		.iter()
		.filter(|define| old.get(&define.name) != Some(*define))
		.map(Action::Apply)
		.collect();

	actions.extend(
		old.iter()
			.filter(|define| !new.contains(&define.name))
			.map(|define| Action::Disable(define.name.as_str())),
	);
	actions
}

/// Applies the difference between `old` and `new` to `manager`.
pub fn reconcile(old: &LogDefines, new: &LogDefines, manager: &LoggerManager) -> ReconcileReport {
	let mut report = ReconcileReport::default();

	for action in plan(old, new) {
		match action {
			Action::Apply(define) => match apply(define, manager) {
				Ok(()) => {
					log::info!("logger {} configured", define.name);
					report.applied.push(define.name.clone());
				}
				Err(e) => {
					log::error!("logger {} not configured: {}", define.name, e);
					report.failed.push((define.name.clone(), e));
				}
			},
			Action::Disable(name) => {
				let logger = manager.get(name);
				logger.set_level(LogLevel::Off);
				logger.clear_appenders();
				log::info!("logger {} disabled", name);
				report.disabled.push(name.to_string());
			}
		}
	}
	report
}

/// Rebuilds one logger. Everything fallible runs before the logger is
/// touched, so a failed definition leaves the logger as it was.
fn apply(define: &LogDefine, manager: &LoggerManager) -> Result<(), LogError> {
	let formatter = compile(define.formatter.as_deref())?;
	let appenders = define
		.appenders
		.iter()
		.map(build_appender)
		.collect::<Result<Vec<_>, _>>()?;

	let logger = manager.get(&define.name);
	if let Some(formatter) = formatter {
		logger.set_formatter(formatter)?;
	}
	logger.set_level(define.level.unwrap_or_default());
	logger.clear_appenders();
	for appender in appenders {
		logger.add_appender(appender);
	}
	Ok(())
}

fn compile(pattern: Option<&str>) -> Result<Option<Arc<LogFormatter>>, LogError> {
	match pattern.filter(|p| !p.is_empty()) {
		Some(pattern) => Ok(Some(Arc::new(LogFormatter::parse(pattern)?))),
		None => Ok(None),
	}
}

/// Constructs the appender described by `define`.
pub fn build_appender(define: &LogAppenderDefine) -> Result<Arc<dyn LogAppender>, LogError> {
	let formatter = compile(define.formatter.as_deref())?;

	let appender: Arc<dyn LogAppender> = match &define.kind {
		AppenderKind::Stdout => Arc::new(StdoutAppender::new()),
		AppenderKind::File { file } => Arc::new(FileAppender::new(file.clone())?),
	};

	if let Some(level) = define.level {
		appender.set_level(level);
	}
	if let Some(formatter) = formatter {
		appender.set_formatter(formatter)?;
	}
	Ok(appender)
}

/// Keeps a [`LoggerManager`] in step with the `logs` config variable.
#[derive(Debug)]
pub struct LogConfigBinding {
	var: Arc<ConfigVar<LogDefines>>,
	listener: u64,
}

impl LogConfigBinding {
	pub fn var(&self) -> &Arc<ConfigVar<LogDefines>> {
		&self.var
	}

	pub fn listener_id(&self) -> u64 {
		self.listener
	}

	/// Stops following the variable. Loggers keep their current state.
	pub fn unbind(self) -> bool {
		self.var.del_listener(self.listener)
	}
}

/// Registers (or finds) the `logs` variable in `registry`, applies its
/// current value to `manager` and reconciles on every later change.
pub fn bind_log_config(
	registry: &Registry,
	manager: Arc<LoggerManager>,
) -> Result<LogConfigBinding, ConfigError> {
	let var = registry.lookup_or_create(LOGS_KEY, LogDefines::new(), "logger definitions")?;

	let listener_manager = Arc::clone(&manager);
	let listener = var.add_listener_with(
		|current| {
			if !current.is_empty() {
				reconcile(&LogDefines::new(), current, &manager);
			}
		},
		move |old: &LogDefines, new: &LogDefines| {
			reconcile(old, new, &listener_manager);
		},
	);
	Ok(LogConfigBinding { var, listener })
}
