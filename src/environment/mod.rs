//! The resource environment: resource registry plus environment parameters.

pub mod format;
pub mod registry;

pub use registry::{Resolved, ResourceInfo, ResourceRegistry};

use crate::error::RegistryError;
use crate::resources::ResourceClass;
use format::{PARAMETERS, RESOURCE_REGISTRY};
use serde_json::{Map, Value, json};
use tracing::warn;

/// A resource environment.
///
/// The global environment is a base layer (`user_env == false`) built from
/// plugin modules and operator environment files. User environments are
/// overlays supplied with a single deployment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    registry: ResourceRegistry,
    params: Map<String, Value>,
    user_env: bool,
}

impl Environment {
    pub fn new(user_env: bool) -> Self {
        Self {
            registry: ResourceRegistry::new(),
            params: Map::new(),
            user_env,
        }
    }

    /// Create an environment and load `body` into it.
    pub fn from_body(body: &Value, user_env: bool) -> Self {
        let mut env = Self::new(user_env);
        env.load(body);
        env
    }

    /// Register a resource implementation under `name`.
    pub fn register_class(&mut self, name: &str, class: ResourceClass) {
        self.registry.register_class(name, class);
    }

    /// Merge a parsed, defaulted environment body.
    pub fn load(&mut self, body: &Value) {
        match body.get(RESOURCE_REGISTRY) {
            Some(Value::Object(section)) => self.registry.load(section),
            None | Some(Value::Null) => {}
            Some(_) => warn!("Ignoring {}: not a mapping", RESOURCE_REGISTRY),
        }

        match body.get(PARAMETERS) {
            Some(Value::Object(params)) => {
                for (name, value) in params {
                    self.params.insert(name.clone(), value.clone());
                }
            }
            None | Some(Value::Null) => {}
            Some(_) => warn!("Ignoring {}: not a mapping", PARAMETERS),
        }
    }

    pub fn resolve(&self, type_name: &str, resource_name: Option<&str>) -> Result<Resolved<'_>, RegistryError> {
        self.registry.resolve(type_name, resource_name)
    }

    /// Implementation class for a resource type.
    pub fn get_class(&self, type_name: &str, resource_name: Option<&str>) -> Result<ResourceClass, RegistryError> {
        self.registry.get_class(type_name, resource_name)
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn is_user_env(&self) -> bool {
        self.user_env
    }

    /// The environment's file-sourced data in environment file form.
    pub fn user_env_as_dict(&self) -> Value {
        json!({
            PARAMETERS: Value::Object(self.params.clone()),
            RESOURCE_REGISTRY: self.registry.as_value(),
        })
    }
}
