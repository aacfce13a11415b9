/* src/config/registry.rs */

//!
//! Process-wide, name-indexed store of config variables.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use super::var::{ConfigValue, ConfigVar, ConfigVarBase};
use super::ConfigError;

type VarMap = HashMap<String, Arc<dyn ConfigVarBase>>;

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// Returns true when `name` is non-empty and only uses `[a-z0-9._]`.
pub fn is_valid_name(name: &str) -> bool {
	!name.is_empty()
		&& name
			.bytes()
			.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'_')
}

/// Case-folds a name the way the registry stores it.
pub fn normalize_name(name: &str) -> String {
	name.to_ascii_lowercase()
}

/// Name-indexed store of config variables.
///
/// Reads are wait-free snapshots of the map (RCU via `ArcSwap`). Creation is
/// serialized by a mutex so a name is registered at most once, with exactly
/// one type.
pub struct Registry {
	vars: ArcSwap<VarMap>,
	create: Mutex<()>,
}

impl Registry {
	/// Creates an empty registry, independent of the global one.
	pub fn new() -> Self {
		Self {
			vars: ArcSwap::from_pointee(HashMap::new()),
			create: Mutex::new(()),
		}
	}

	/// The process-wide registry, created on first use.
	pub fn global() -> &'static Arc<Registry> {
		GLOBAL.get_or_init(|| Arc::new(Registry::new()))
	}

	/// Returns the variable registered under `name`, creating it with
	/// `default` when absent.
	///
	/// Fails with [`ConfigError::TypeMismatch`] when the name is registered
	/// with another type, and with [`ConfigError::InvalidName`] when a new
	/// name does not match `[a-z0-9._]+` after lowercasing.
	pub fn lookup_or_create<T: ConfigValue>(
		&self,
		name: &str,
		default: T,
		description: &str,
	) -> Result<Arc<ConfigVar<T>>, ConfigError> {
		let name = normalize_name(name);
		let _create = self.create.lock();

		if let Some(existing) = self.vars.load().get(&name).cloned() {
			log::debug!("config {} already registered", name);
			return downcast(&name, existing);
		}

		if !is_valid_name(&name) {
			log::error!("refusing to register config with invalid name {:?}", name);
			return Err(ConfigError::InvalidName { name });
		}

		let var = Arc::new(ConfigVar::new(name.clone(), default, description));
		let erased: Arc<dyn ConfigVarBase> = var.clone();
		self.vars.rcu(|map| {
			let mut next = (**map).clone();
			next.insert(name.clone(), Arc::clone(&erased));
			next
		});

		Ok(var)
	}

	/// Typed lookup without creation.
	///
	/// Returns `None` when the name is unknown or registered with another type.
	pub fn lookup<T: ConfigValue>(&self, name: &str) -> Option<Arc<ConfigVar<T>>> {
		let name = normalize_name(name);
		let existing = self.vars.load().get(&name).cloned()?;
		downcast(&name, existing).ok()
	}

	/// Untyped lookup.
	pub fn lookup_base(&self, name: &str) -> Option<Arc<dyn ConfigVarBase>> {
		self.vars.load().get(&normalize_name(name)).cloned()
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.vars.load().keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.vars.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.vars.load().is_empty()
	}

	/// Calls `f` for every registered variable, in name order.
	pub fn visit(&self, mut f: impl FnMut(&dyn ConfigVarBase)) {
		let snapshot = self.vars.load_full();
		let mut vars: Vec<&Arc<dyn ConfigVarBase>> = snapshot.values().collect();
		vars.sort_by(|a, b| a.name().cmp(b.name()));
		for var in vars {
			f(var.as_ref());
		}
	}

	/// Drops every registered variable. Handles held by callers stay valid
	/// but are no longer reachable through the registry.
	pub fn clear(&self) {
		let _create = self.create.lock();
		self.vars.store(Arc::new(HashMap::new()));
	}
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

fn downcast<T: ConfigValue>(
	name: &str,
	existing: Arc<dyn ConfigVarBase>,
) -> Result<Arc<ConfigVar<T>>, ConfigError> {
	let actual = existing.type_name();
	existing.as_any().downcast::<ConfigVar<T>>().map_err(|_| {
		let expected = std::any::type_name::<T>();
		log::error!(
			"config {} exists with type {} but was requested as {}",
			name,
			actual,
			expected
		);
		ConfigError::TypeMismatch {
			name: name.to_string(),
			expected,
			actual,
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_name_validation() {
		assert!(is_valid_name("system.port"));
		assert!(is_valid_name("logs"));
		assert!(is_valid_name("a_b.c9"));
		assert!(!is_valid_name(""));
		assert!(!is_valid_name("System.port"));
		assert!(!is_valid_name("system-port"));
		assert!(!is_valid_name("**/*//"));
	}

	#[test]
	fn test_lookup_or_create_returns_same_variable() {
		let registry = Registry::new();
		let a = registry.lookup_or_create("system.port", 8080i32, "port").unwrap();
		let b = registry.lookup_or_create("SYSTEM.PORT", 1i32, "ignored").unwrap();
		assert!(Arc::ptr_eq(&a, &b));
		assert_eq!(b.value(), 8080);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_type_mismatch_leaves_original() {
		let registry = Registry::new();
		let port = registry.lookup_or_create("system.port", 8080i32, "port").unwrap();

		let err = registry
			.lookup_or_create("system.port", String::from("x"), "")
			.unwrap_err();
		assert!(matches!(err, ConfigError::TypeMismatch { .. }));
		assert!(registry.lookup::<String>("system.port").is_none());

		let again = registry.lookup::<i32>("system.port").unwrap();
		assert!(Arc::ptr_eq(&port, &again));
		assert_eq!(again.value(), 8080);
	}

	#[test]
	fn test_invalid_name_is_rejected() {
		let registry = Registry::new();
		let err = registry.lookup_or_create("bad name", 1u8, "").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidName { .. }));
		assert!(registry.is_empty());
	}

	#[test]
	fn test_lookup_base_and_visit() {
		let registry = Registry::new();
		registry.lookup_or_create("b.value", 2u8, "second").unwrap();
		registry.lookup_or_create("a.value", vec![1u8], "first").unwrap();

		let base = registry.lookup_base("A.Value").unwrap();
		assert_eq!(base.description(), "first");
		assert!(registry.lookup_base("missing").is_none());

		let mut seen = Vec::new();
		registry.visit(|var| seen.push(var.name().to_string()));
		assert_eq!(seen, vec!["a.value", "b.value"]);
		assert_eq!(registry.names(), seen);
	}

	#[test]
	fn test_clear_resets_registry() {
		let registry = Registry::new();
		registry.lookup_or_create("x", 1i32, "").unwrap();
		registry.clear();
		assert!(registry.lookup_base("x").is_none());
		// The name is free again, even for another type.
		registry.lookup_or_create("x", String::new(), "").unwrap();
	}

	#[test]
	fn test_concurrent_creation_registers_once() {
		let registry = Arc::new(Registry::new());
		let handles: Vec<_> = (0..8)
			.map(|i| {
				let registry = registry.clone();
				std::thread::spawn(move || registry.lookup_or_create("shared.counter", i, "").unwrap())
			})
			.collect();

		let vars: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		for var in &vars[1..] {
			assert!(Arc::ptr_eq(&vars[0], var));
		}
		assert_eq!(registry.len(), 1);
	}
}
