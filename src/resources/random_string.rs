//! `OS::Heat::RandomString`: a resource that records the length of the
//! string it stands for, from its `length` property.

use super::{PluginModule, Resource, ResourceClass, ResourceMapping};
use serde_json::Value;

pub const RESOURCE_TYPE: &str = "OS::Heat::RandomString";

/// Length used when the `length` property is absent or not a number.
pub const DEFAULT_LENGTH: u64 = 32;

pub const CLASS: ResourceClass = ResourceClass::new("RandomString", create);

#[derive(Debug)]
pub struct RandomString {
    name: String,
    resource_type: String,
    properties: Value,
    length: u64,
}

impl RandomString {
    pub fn new(name: &str, resource_type: &str, properties: &Value) -> Self {
        let length = properties
            .get("length")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_LENGTH);
        Self {
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            properties: properties.clone(),
            length,
        }
    }

    /// Number of characters the generated value will have.
    pub fn length(&self) -> u64 {
        self.length
    }
}

impl Resource for RandomString {
    fn name(&self) -> &str {
        &self.name
    }

    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn properties(&self) -> &Value {
        &self.properties
    }
}

fn create(name: &str, resource_type: &str, properties: &Value) -> Box<dyn Resource> {
    Box::new(RandomString::new(name, resource_type, properties))
}

struct RandomStringModule;

impl PluginModule for RandomStringModule {
    fn name(&self) -> &str {
        "engine.resources.random_string"
    }

    fn resource_mapping(&self) -> Option<anyhow::Result<ResourceMapping>> {
        Some(Ok(vec![(RESOURCE_TYPE.to_string(), CLASS)]))
    }
}

pub(crate) fn load() -> Box<dyn PluginModule> {
    Box::new(RandomStringModule)
}
