//! Resource type registry.
//!
//! Maps resource type names to what they resolve to: a class registered by a
//! plugin module, an alias for another type, or a provider template.
//! Overrides can also be scoped to a single resource name through the
//! `resources` key of a `resource_registry` section.

use crate::error::RegistryError;
use crate::resources::ResourceClass;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Key of the per-resource override block inside a `resource_registry` section.
pub const RESOURCES_KEY: &str = "resources";

const TEMPLATE_SUFFIXES: [&str; 2] = [".yaml", ".template"];

/// Most alias hops a lookup follows. Wildcard aliases can produce a new
/// name on every hop, so repetition alone does not end a chain.
pub const MAX_ALIAS_DEPTH: usize = 64;

/// What a registry key maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceInfo {
    /// Implementation registered from code.
    Class(ResourceClass),
    /// Another resource type name. A wildcard key may map to a wildcard target.
    Alias(String),
    /// Path or URL of a provider template.
    Template(String),
}

impl ResourceInfo {
    /// Interpret an environment file target: templates are recognised by
    /// their file extension, anything else names another type.
    pub fn from_target(target: &str) -> Self {
        if TEMPLATE_SUFFIXES.iter().any(|s| target.ends_with(s)) {
            ResourceInfo::Template(target.to_string())
        } else {
            ResourceInfo::Alias(target.to_string())
        }
    }
}

impl fmt::Display for ResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceInfo::Class(class) => write!(f, "class {}", class),
            ResourceInfo::Alias(target) => write!(f, "{}", target),
            ResourceInfo::Template(path) => write!(f, "template {}", path),
        }
    }
}

/// Final target of a resource type lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    Class(ResourceClass),
    Template(&'a str),
}

/// Registry of resource types.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    types: BTreeMap<String, ResourceInfo>,
    resources: BTreeMap<String, BTreeMap<String, ResourceInfo>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation class. The last registration for a name wins.
    pub fn register_class(&mut self, name: &str, class: ResourceClass) {
        self.register(name, ResourceInfo::Class(class));
    }

    /// Register any kind of entry under a type name.
    pub fn register(&mut self, name: &str, info: ResourceInfo) {
        match self.types.get(name) {
            Some(old) if *old == info => {}
            Some(old) => info!("Changing {} from {} to {}", name, old, info),
            None => debug!("Registered {} as {}", name, info),
        }
        self.types.insert(name.to_string(), info);
    }

    /// Register an entry that applies only to resources called `resource_name`.
    pub fn register_for_resource(&mut self, resource_name: &str, type_name: &str, info: ResourceInfo) {
        debug!(resource = resource_name, "Registered {} as {}", type_name, info);
        self.resources
            .entry(resource_name.to_string())
            .or_default()
            .insert(type_name.to_string(), info);
    }

    /// Remove a type entry.
    pub fn remove(&mut self, name: &str) -> Option<ResourceInfo> {
        let removed = self.types.remove(name);
        if let Some(ref old) = removed {
            warn!("Removing {} ({}) from the resource registry", name, old);
        }
        removed
    }

    /// Remove an entry scoped to `resource_name`.
    pub fn remove_for_resource(&mut self, resource_name: &str, type_name: &str) -> Option<ResourceInfo> {
        let overrides = self.resources.get_mut(resource_name)?;
        let removed = overrides.remove(type_name);
        if overrides.is_empty() {
            self.resources.remove(resource_name);
        }
        if let Some(ref old) = removed {
            warn!(resource = resource_name, "Removing {} ({}) from the resource registry", type_name, old);
        }
        removed
    }

    /// Merge a `resource_registry` section.
    ///
    /// String targets add an alias or template, `null` removes the entry.
    /// Other values are skipped.
    pub fn load(&mut self, section: &Map<String, Value>) {
        for (key, value) in section {
            if key == RESOURCES_KEY {
                self.load_resources(value);
                continue;
            }
            match value {
                Value::String(target) => self.register(key, ResourceInfo::from_target(target)),
                Value::Null => {
                    self.remove(key);
                }
                other => warn!("Ignoring resource_registry entry {}: unsupported value {}", key, other),
            }
        }
    }

    fn load_resources(&mut self, value: &Value) {
        let Some(resources) = value.as_object() else {
            warn!("Ignoring resource_registry.{}: not a mapping", RESOURCES_KEY);
            return;
        };
        for (resource_name, overrides) in resources {
            let Some(overrides) = overrides.as_object() else {
                warn!(resource = %resource_name, "Ignoring resource overrides: not a mapping");
                continue;
            };
            for (type_name, target) in overrides {
                match target {
                    Value::String(target) => self.register_for_resource(
                        resource_name,
                        type_name,
                        ResourceInfo::from_target(target),
                    ),
                    Value::Null => {
                        self.remove_for_resource(resource_name, type_name);
                    }
                    other => warn!(
                        resource = %resource_name,
                        "Ignoring override for {}: unsupported value {}", type_name, other
                    ),
                }
            }
        }
    }

    /// Entry registered under exactly `name`.
    pub fn get(&self, name: &str) -> Option<&ResourceInfo> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of type entries, not counting per-resource overrides.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.resources.is_empty()
    }

    /// Type entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceInfo)> {
        self.types.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// Per-resource overrides in resource name order.
    pub fn resource_overrides(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, ResourceInfo>)> {
        self.resources.iter().map(|(name, overrides)| (name.as_str(), overrides))
    }

    /// Follow a type name to the class or template it ends up at.
    ///
    /// Overrides for `resource_name` apply to the type as written; aliases
    /// are then followed through the global entries, exact names before
    /// wildcards.
    pub fn resolve(&self, type_name: &str, resource_name: Option<&str>) -> Result<Resolved<'_>, RegistryError> {
        let scoped = resource_name
            .and_then(|name| self.resources.get(name))
            .and_then(|overrides| overrides.get(type_name));
        let mut found = match scoped {
            Some(info) => (info, None),
            None => self
                .lookup(type_name)
                .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))?,
        };
        let mut chain = vec![type_name.to_string()];

        loop {
            let target = match found.0 {
                ResourceInfo::Class(class) => return Ok(Resolved::Class(*class)),
                ResourceInfo::Template(path) => return Ok(Resolved::Template(path)),
                ResourceInfo::Alias(target) => match (target.strip_suffix('*'), found.1.as_deref()) {
                    (Some(prefix), Some(suffix)) => format!("{}{}", prefix, suffix),
                    _ => target.clone(),
                },
            };

            if chain.contains(&target) {
                chain.push(target);
                return Err(RegistryError::AliasCycle(chain));
            }
            if chain.len() > MAX_ALIAS_DEPTH {
                chain.push(target);
                return Err(RegistryError::AliasDepth(chain));
            }
            found = self
                .lookup(&target)
                .ok_or_else(|| RegistryError::UnknownType(target.clone()))?;
            chain.push(target);
        }
    }

    /// Resolve to a class, failing for template targets.
    pub fn get_class(&self, type_name: &str, resource_name: Option<&str>) -> Result<ResourceClass, RegistryError> {
        match self.resolve(type_name, resource_name)? {
            Resolved::Class(class) => Ok(class),
            Resolved::Template(path) => Err(RegistryError::NotAClass {
                type_name: type_name.to_string(),
                template: path.to_string(),
            }),
        }
    }

    /// Exact entry, else the wildcard entry with the longest matching prefix
    /// together with the part of `name` the wildcard matched.
    fn lookup(&self, name: &str) -> Option<(&ResourceInfo, Option<String>)> {
        if let Some(info) = self.types.get(name) {
            return Some((info, None));
        }
        self.types
            .iter()
            .filter_map(|(key, info)| {
                let prefix = key.strip_suffix('*')?;
                let suffix = name.strip_prefix(prefix)?;
                Some((prefix.len(), info, suffix))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, info, suffix)| (info, Some(suffix.to_string())))
    }

    /// The file-sourced entries in environment file form. Classes come from
    /// code and are left out.
    pub fn as_value(&self) -> Value {
        let mut section = Map::new();
        for (name, info) in &self.types {
            if let Some(target) = target_value(info) {
                section.insert(name.clone(), target);
            }
        }

        let mut resources = Map::new();
        for (resource_name, overrides) in &self.resources {
            let entries: Map<String, Value> = overrides
                .iter()
                .filter_map(|(name, info)| Some((name.clone(), target_value(info)?)))
                .collect();
            if !entries.is_empty() {
                resources.insert(resource_name.clone(), Value::Object(entries));
            }
        }
        if !resources.is_empty() {
            section.insert(RESOURCES_KEY.to_string(), Value::Object(resources));
        }

        Value::Object(section)
    }
}

fn target_value(info: &ResourceInfo) -> Option<Value> {
    match info {
        ResourceInfo::Class(_) => None,
        ResourceInfo::Alias(target) | ResourceInfo::Template(target) => Some(Value::String(target.clone())),
    }
}
