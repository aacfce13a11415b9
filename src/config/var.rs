/* src/config/var.rs */

//!
//! Typed, observable config variables.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::convert::{Convert, ConvertError, Value};

/// Change callback, invoked with `(old, new)`.
pub type Listener<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

/// Listener ids are unique across every variable in the process.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Bounds every config value type must satisfy.
pub trait ConfigValue: Convert + Clone + PartialEq + Send + Sync + 'static {}

impl<T> ConfigValue for T where T: Convert + Clone + PartialEq + Send + Sync + 'static {}

/// Type-erased view of a config variable, as stored in the registry.
pub trait ConfigVarBase: Send + Sync + 'static {
	/// Lowercase-normalized name.
	fn name(&self) -> &str;

	fn description(&self) -> &str;

	/// Name of the value type, used in type-mismatch reports.
	fn type_name(&self) -> &'static str;

	/// Renders the current value as text.
	fn to_text(&self) -> Result<String, ConvertError>;

	/// Parses `text` and stores the result. Returns whether the value changed.
	///
	/// On failure the current value is left untouched.
	fn from_text(&self, text: &str) -> Result<bool, ConvertError>;

	/// Renders the current value as a document node.
	fn to_node(&self) -> Result<Value, ConvertError>;

	/// Converts `node` and stores the result. Returns whether the value changed.
	fn from_node(&self, node: &Value) -> Result<bool, ConvertError>;

	/// Upcast used for typed retrieval.
	fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A named config value of type `T` with change listeners.
///
/// Value transitions are linearized: `set_value` compares, snapshots the
/// listeners, dispatches `(old, new)` in listener-id order and only then
/// commits. While listeners run, readers still observe the old value.
///
/// A listener must not call `set_value` on the variable it observes; the
/// transition lock is not re-entrant.
pub struct ConfigVar<T> {
	name: String,
	description: String,
	value: RwLock<T>,
	listeners: RwLock<BTreeMap<u64, Listener<T>>>,
	transition: Mutex<()>,
}

impl<T: ConfigValue> ConfigVar<T> {
	/// Creates a standalone variable. The name is lowercased.
	pub fn new(name: impl Into<String>, default: T, description: impl Into<String>) -> Self {
		Self {
			name: name.into().to_ascii_lowercase(),
			description: description.into(),
			value: RwLock::new(default),
			listeners: RwLock::new(BTreeMap::new()),
			transition: Mutex::new(()),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	/// Returns a copy of the current value.
	pub fn value(&self) -> T {
		self.value.read().clone()
	}

	/// Runs `f` against the current value without cloning it.
	pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.read())
	}

	/// Stores `value`, notifying listeners when it differs from the current one.
	///
	/// Returns `false` (and notifies nobody) when the value is unchanged.
	pub fn set_value(&self, value: T) -> bool {
		let _transition = self.transition.lock();

		let old = {
			let current = self.value.read();
			if *current == value {
				return false;
			}
			current.clone()
		};

		let listeners: Vec<Listener<T>> = self.listeners.read().values().cloned().collect();
		for listener in &listeners {
			listener(&old, &value);
		}

		*self.value.write() = value;
		true
	}

	/// Registers a change listener and returns its id.
	pub fn add_listener<F>(&self, listener: F) -> u64
	where
		F: Fn(&T, &T) + Send + Sync + 'static,
	{
		let id = NEXT_LISTENER_ID.fetch_add(1, Ordering::SeqCst);
		self.listeners.write().insert(id, Arc::new(listener));
		id
	}

	/// Runs `init` against the current value and registers `listener`, with
	/// no value transition able to land in between. Every later change
	/// reaches `listener`.
	///
	/// `init` must not call `set_value` on this variable.
	pub fn add_listener_with<I, F>(&self, init: I, listener: F) -> u64
	where
		I: FnOnce(&T),
		F: Fn(&T, &T) + Send + Sync + 'static,
	{
		let _transition = self.transition.lock();
		init(&self.value());
		self.add_listener(listener)
	}

	/// Removes a listener. Returns whether it was registered.
	pub fn del_listener(&self, id: u64) -> bool {
		self.listeners.write().remove(&id).is_some()
	}

	pub fn get_listener(&self, id: u64) -> Option<Listener<T>> {
		self.listeners.read().get(&id).cloned()
	}

	pub fn clear_listeners(&self) {
		self.listeners.write().clear();
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.read().len()
	}

	fn report<R>(&self, action: &str, result: Result<R, ConvertError>) -> Result<R, ConvertError> {
		if let Err(e) = &result {
			log::error!(
				"config {}: cannot {} {}: {}",
				self.name,
				action,
				std::any::type_name::<T>(),
				e
			);
		}
		result
	}
}

impl<T: ConfigValue> ConfigVarBase for ConfigVar<T> {
	fn name(&self) -> &str {
		&self.name
	}

	fn description(&self) -> &str {
		&self.description
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}

	fn to_text(&self) -> Result<String, ConvertError> {
		let result = self.value.read().to_text();
		self.report("render", result)
	}

	fn from_text(&self, text: &str) -> Result<bool, ConvertError> {
		let value = self.report("parse text into", T::from_text(text))?;
		Ok(self.set_value(value))
	}

	fn to_node(&self) -> Result<Value, ConvertError> {
		let result = self.value.read().to_node();
		self.report("render", result)
	}

	fn from_node(&self, node: &Value) -> Result<bool, ConvertError> {
		let value = self.report("convert node into", T::from_node(node))?;
		Ok(self.set_value(value))
	}

	fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

impl<T: fmt::Debug> fmt::Debug for ConfigVar<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConfigVar")
			.field("name", &self.name)
			.field("description", &self.description)
			.field("value", &*self.value.read())
			.field("listeners", &self.listeners.read().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::AtomicUsize;

	#[test]
	fn test_set_value_notifies_only_on_change() {
		let port = ConfigVar::new("system.port", 8080i32, "system port");
		let seen = Arc::new(Mutex::new(Vec::new()));

		let sink = seen.clone();
		port.add_listener(move |old: &i32, new: &i32| sink.lock().push((*old, *new)));

		assert!(!port.set_value(8080));
		assert!(seen.lock().is_empty());

		assert!(port.set_value(3306));
		assert!(!port.set_value(3306));
		assert_eq!(*seen.lock(), vec![(8080, 3306)]);
		assert_eq!(port.value(), 3306);
	}

	#[test]
	fn test_listeners_run_in_id_order_before_commit() {
		let var = Arc::new(ConfigVar::new("order", 0u8, ""));
		let order = Arc::new(Mutex::new(Vec::new()));

		for tag in ["first", "second", "third"] {
			let order = order.clone();
			let observed = Arc::downgrade(&var);
			var.add_listener(move |_, _| {
				// The stored value is still the old one while listeners run.
				let current = observed.upgrade().map(|v| v.value());
				order.lock().push((tag, current));
			});
		}

		var.set_value(7);
		assert_eq!(
			*order.lock(),
			vec![("first", Some(0)), ("second", Some(0)), ("third", Some(0))]
		);
	}

	#[test]
	fn test_del_and_clear_listeners() {
		let var = ConfigVar::new("name", String::from("a"), "");
		let calls = Arc::new(AtomicUsize::new(0));

		let c1 = calls.clone();
		let first = var.add_listener(move |_, _| {
			c1.fetch_add(1, Ordering::SeqCst);
		});
		let c2 = calls.clone();
		let second = var.add_listener(move |_, _| {
			c2.fetch_add(10, Ordering::SeqCst);
		});
		assert!(second > first);
		assert!(var.get_listener(first).is_some());

		assert!(var.del_listener(first));
		assert!(!var.del_listener(first));
		var.set_value("b".into());
		assert_eq!(calls.load(Ordering::SeqCst), 10);

		var.clear_listeners();
		var.set_value("c".into());
		assert_eq!(calls.load(Ordering::SeqCst), 10);
		assert_eq!(var.listener_count(), 0);
	}

	#[test]
	fn test_failed_conversion_keeps_value() {
		let var = ConfigVar::new("retries", 3u32, "");
		assert!(ConfigVarBase::from_text(&var, "many").is_err());
		assert_eq!(var.value(), 3);
		assert!(ConfigVarBase::from_text(&var, "5").unwrap());
		assert_eq!(ConfigVarBase::to_text(&var).unwrap(), "5");
	}

	#[test]
	fn test_name_is_lowercased() {
		let var = ConfigVar::new("System.Port", 1u16, "");
		assert_eq!(var.name(), "system.port");
	}

	#[test]
	fn test_add_listener_with_misses_no_concurrent_change() {
		let var = Arc::new(ConfigVar::new("bound", 0i32, ""));
		let seen = Arc::new(Mutex::new(Vec::new()));
		let (started_tx, started_rx) = std::sync::mpsc::channel();

		let writer = {
			let var = var.clone();
			std::thread::spawn(move || {
				started_rx.recv().unwrap();
				var.set_value(5)
			})
		};

		let sink = seen.clone();
		let mut initial = None;
		var.add_listener_with(
			|current| {
				initial = Some(*current);
				started_tx.send(()).unwrap();
				// Give the writer time to reach the transition lock.
				std::thread::sleep(std::time::Duration::from_millis(100));
			},
			move |old: &i32, new: &i32| sink.lock().push((*old, *new)),
		);

		assert!(writer.join().unwrap());
		assert_eq!(initial, Some(0));
		assert_eq!(*seen.lock(), vec![(0, 5)]);
	}

	#[test]
	fn test_adding_listener_during_dispatch_does_not_deadlock() {
		let var = Arc::new(ConfigVar::new("dyn", 0i64, ""));
		let handle = Arc::downgrade(&var);
		var.add_listener(move |_, _| {
			if let Some(var) = handle.upgrade() {
				var.add_listener(|_, _| {});
			}
		});

		var.set_value(1);
		assert_eq!(var.listener_count(), 2);
	}
}
