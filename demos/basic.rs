/* demos/basic.rs */

use livelog::config::Registry;
use livelog::logging::{self, LoggerManager};
use livelog::watch::{ConfigWatcher, WatchConfig};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

const CONFIG: &str = r#"
system:
  port: 8080
  name: livelog-demo
logs:
  - name: system
    level: INFO
    formatter: "%d{%H:%M:%S}%T[%p]%T[%c]%T%m%n"
    appenders:
      - type: StdoutLogAppender
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// 0. Prepare a real file
	let config_path = "example_config.yaml";
	fs::write(config_path, CONFIG)?;
	println!("Created {}", config_path);

	// 1. Registry, logging and the `log` facade
	let registry = Arc::new(Registry::new());
	let manager = Arc::new(LoggerManager::new());
	logging::install(manager.clone())?;
	let _binding = logging::bind_log_config(&registry, manager.clone())?;

	// 2. Typed variables with listeners
	let port = registry.lookup_or_create("system.port", 80u16, "listening port")?;
	let name = registry.lookup_or_create("system.name", String::from("unnamed"), "service name")?;
	let system = manager.get("system");
	let listener_logger = system.clone();
	port.add_listener(move |old, new| {
		livelog::log_info!(listener_logger, "port changed from {} to {}", old, new);
	});

	// 3. Initial load and watch
	let watcher = ConfigWatcher::new(config_path, registry.clone(), WatchConfig::default())?;
	livelog::log_info!(system, "{} listening on {}", name.value(), port.value());
	println!("Current logging setup:\n{}", manager.to_text()?);

	println!(
		"Watching for changes on {}... (Edit the file to see updates)",
		watcher.path().display()
	);
	println!("Waiting 20 seconds...");

	for _ in 0..10 {
		tokio::time::sleep(Duration::from_secs(2)).await;
		log::info!(target: "system", "still serving {} on {}", name.value(), port.value());
	}

	// Cleanup
	drop(watcher);
	fs::remove_file(config_path)?;
	println!("Done.");
	Ok(())
}
