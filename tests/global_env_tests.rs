//! Tests for the process-wide global environment.
//!
//! Every test binary is its own process, so this file owns the global
//! environment. Everything runs in a single test so no other test can
//! initialise it first.

use resource_env::config::{Config, EngineConfig};
use resource_env::global::is_initialised;
use resource_env::resources::none;
use resource_env::{global_env, initialise, initialise_with};
use std::fs;
use tempfile::TempDir;

#[test]
fn global_environment_built_once() {
    let temp = TempDir::new().unwrap();
    let env_dir = temp.path().join("environment.d");
    fs::create_dir_all(&env_dir).unwrap();
    fs::write(
        env_dir.join("net.yaml"),
        r#"{"resource_registry": {"MyType": "OS::Heat::None"}}"#,
    )
    .unwrap();
    fs::write(env_dir.join("bad.yaml"), "{{{").unwrap();

    let config = Config {
        engine: EngineConfig {
            environment_dir: env_dir.clone(),
            plugin_dirs: vec![temp.path().join("plugins")],
        },
    };

    assert!(!is_initialised());
    let first = initialise_with(&config);
    assert!(is_initialised());

    assert!(!first.is_user_env());
    assert_eq!(first.get_class("MyType", None), Ok(none::CLASS));

    // Later files are not picked up: the environment is never rebuilt.
    fs::write(
        env_dir.join("late.yaml"),
        r#"{"resource_registry": {"LateType": "OS::Heat::None"}}"#,
    )
    .unwrap();

    let second = global_env();
    let third = initialise();
    let other_config = Config::default();
    let fourth = initialise_with(&other_config);

    assert!(std::ptr::eq(first, second));
    assert!(std::ptr::eq(first, third));
    assert!(std::ptr::eq(first, fourth));
    assert!(!second.registry().contains("LateType"));
}
