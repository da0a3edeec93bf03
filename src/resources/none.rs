//! `OS::Heat::None`: a placeholder resource that does nothing.
//!
//! Useful for disabling a resource in a template via an environment alias
//! (`My::Type: OS::Heat::None`) without editing the template itself.

use super::{BasicResource, PluginModule, Resource, ResourceClass, ResourceMapping};
use serde_json::Value;

pub const RESOURCE_TYPE: &str = "OS::Heat::None";

pub const CLASS: ResourceClass = ResourceClass::new("NoneResource", create);

fn create(name: &str, resource_type: &str, properties: &Value) -> Box<dyn Resource> {
    Box::new(BasicResource::new(name, resource_type, properties))
}

struct NoneModule;

impl PluginModule for NoneModule {
    fn name(&self) -> &str {
        "engine.resources.none"
    }

    fn resource_mapping(&self) -> Option<anyhow::Result<ResourceMapping>> {
        Some(Ok(vec![(RESOURCE_TYPE.to_string(), CLASS)]))
    }
}

pub(crate) fn load() -> Box<dyn PluginModule> {
    Box::new(NoneModule)
}
