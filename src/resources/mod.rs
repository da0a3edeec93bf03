//! Resource classes and the plugin modules that contribute them.
//!
//! A plugin module is anything implementing [`PluginModule`]. Modules are
//! registered at link time with [`plugin_module!`](crate::plugin_module) under
//! a package namespace; [`discovery`] turns a package into a list of loaded
//! modules and [`collector`] registers their resource mappings into an
//! [`Environment`](crate::environment::Environment).

pub mod collector;
pub mod discovery;
pub mod none;
pub mod random_string;

pub use collector::{CollectReport, collect};
pub use discovery::{BuiltinModules, ModuleSource, Subpackage, create_subpackage};

use serde_json::Value;
use std::fmt;

/// Package the built-in resource modules are registered under.
pub const BUILTIN_PACKAGE: &str = "engine.resources";

/// A constructed resource.
pub trait Resource: fmt::Debug + Send + Sync {
    /// Name of the resource in its template.
    fn name(&self) -> &str;

    /// Resource type name the resource was created as.
    fn resource_type(&self) -> &str;

    /// Properties the resource was created with.
    fn properties(&self) -> &Value;
}

/// Constructor for a resource implementation: `(name, resource_type, properties)`.
pub type ResourceFactory = fn(&str, &str, &Value) -> Box<dyn Resource>;

/// Handle to a resource implementation.
///
/// Two classes are equal when they name the same implementation.
#[derive(Clone, Copy)]
pub struct ResourceClass {
    name: &'static str,
    factory: ResourceFactory,
}

impl ResourceClass {
    pub const fn new(name: &'static str, factory: ResourceFactory) -> Self {
        Self { name, factory }
    }

    /// Implementation name, e.g. `NoneResource`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Construct a resource of this class.
    pub fn create(&self, name: &str, resource_type: &str, properties: &Value) -> Box<dyn Resource> {
        (self.factory)(name, resource_type, properties)
    }
}

impl PartialEq for ResourceClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceClass {}

impl fmt::Debug for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceClass").field(&self.name).finish()
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered `(resource type name, class)` pairs offered by a module.
pub type ResourceMapping = Vec<(String, ResourceClass)>;

/// A loaded plugin module.
///
/// Modules that only hold helpers keep the default [`resource_mapping`],
/// which reports that the module has nothing to contribute.
///
/// [`resource_mapping`]: PluginModule::resource_mapping
pub trait PluginModule: Send + Sync {
    /// Identifies the module in logs.
    fn name(&self) -> &str;

    /// The module's resource types, or `None` if it provides none.
    fn resource_mapping(&self) -> Option<anyhow::Result<ResourceMapping>> {
        None
    }
}

/// Link-time registration of a plugin module.
pub struct ModuleRegistration {
    /// Package namespace, e.g. [`BUILTIN_PACKAGE`].
    pub package: &'static str,
    /// Module name within the package.
    pub name: &'static str,
    /// Loads the module.
    pub load: fn() -> Box<dyn PluginModule>,
}

inventory::collect!(ModuleRegistration);

/// Modules shipped with the crate.
static BUILTINS: &[ModuleRegistration] = &[
    ModuleRegistration {
        package: BUILTIN_PACKAGE,
        name: "none",
        load: none::load,
    },
    ModuleRegistration {
        package: BUILTIN_PACKAGE,
        name: "random_string",
        load: random_string::load,
    },
];

/// All module registrations in `package`, sorted by module name.
///
/// A name registered more than once keeps its first registration, built-ins
/// ahead of link-time ones.
pub fn registrations(package: &str) -> Vec<&'static ModuleRegistration> {
    let mut regs: Vec<&'static ModuleRegistration> = Vec::new();
    for reg in BUILTINS.iter().chain(inventory::iter::<ModuleRegistration>) {
        if reg.package == package && !regs.iter().any(|r| r.name == reg.name) {
            regs.push(reg);
        }
    }
    regs.sort_by_key(|reg| reg.name);
    regs
}

/// Find a module registered as `name` in `package`.
pub fn find_registration(package: &str, name: &str) -> Option<&'static ModuleRegistration> {
    registrations(package).into_iter().find(|reg| reg.name == name)
}

/// Register a plugin module under a package namespace.
///
/// ```ignore
/// resource_env::plugin_module!("engine.plugins", "docker", load_docker);
/// ```
#[macro_export]
macro_rules! plugin_module {
    ($package:expr, $name:expr, $load:path) => {
        $crate::inventory::submit! {
            $crate::resources::ModuleRegistration {
                package: $package,
                name: $name,
                load: $load,
            }
        }
    };
}

/// Resource that keeps its name, type and properties and nothing else.
///
/// Shared by the built-in classes that carry no state of their own.
#[derive(Debug, Clone)]
pub struct BasicResource {
    name: String,
    resource_type: String,
    properties: Value,
}

impl BasicResource {
    pub fn new(name: &str, resource_type: &str, properties: &Value) -> Self {
        Self {
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            properties: properties.clone(),
        }
    }
}

impl Resource for BasicResource {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_basic(name: &str, resource_type: &str, properties: &Value) -> Box<dyn Resource> {
        Box::new(BasicResource::new(name, resource_type, properties))
    }

    #[test]
    fn test_class_creates_resource() {
        let class = ResourceClass::new("BasicResource", make_basic);
        let res = class.create("server", "Test::Basic", &json!({"a": 1}));
        assert_eq!(res.name(), "server");
        assert_eq!(res.resource_type(), "Test::Basic");
        assert_eq!(res.properties(), &json!({"a": 1}));
    }

    #[test]
    fn test_class_equality_by_name() {
        let a = ResourceClass::new("Same", make_basic);
        let b = ResourceClass::new("Same", make_basic);
        let c = ResourceClass::new("Other", make_basic);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "Same");
    }

    #[test]
    fn test_builtin_registrations_sorted() {
        let names: Vec<_> = registrations(BUILTIN_PACKAGE)
            .iter()
            .map(|reg| reg.name)
            .collect();
        assert_eq!(names, vec!["none", "random_string"]);
    }

    #[test]
    fn test_unknown_package_has_no_registrations() {
        assert!(registrations("no.such.package").is_empty());
    }
}
