//! Registration of plugin module resource mappings.
//!
//! Plugin code is outside the engine's control, so every call to a module's
//! `resource_mapping` is an error boundary: an error or panic there costs
//! that module its registrations and nothing else.

use super::{PluginModule, ResourceMapping};
use crate::environment::Environment;
use crate::error::{PluginError, PluginFailure};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Outcome of a collection pass.
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Modules examined.
    pub modules: usize,
    /// Modules that exposed a resource mapping, whether or not it succeeded.
    pub providers: usize,
    /// `(name, class)` pairs registered.
    pub registered: usize,
    /// Modules whose mapping failed.
    pub failures: Vec<PluginError>,
}

impl CollectReport {
    /// Fold another pass into this one.
    pub fn extend(&mut self, other: CollectReport) {
        self.modules += other.modules;
        self.providers += other.providers;
        self.registered += other.registered;
        self.failures.extend(other.failures);
    }
}

/// Register the resource mappings of `modules`, in order, into `env`.
pub fn collect<I, M>(env: &mut Environment, modules: I) -> CollectReport
where
    I: IntoIterator<Item = M>,
    M: AsRef<dyn PluginModule>,
{
    let mut report = CollectReport::default();

    for module in modules {
        let module = module.as_ref();
        report.modules += 1;

        let mapping = match module_resources(module) {
            Ok(Some(mapping)) => mapping,
            Ok(None) => continue,
            Err(err) => {
                report.providers += 1;
                error!(module = module.name(), error = %err.failure, "Failed to load resources from {}", module.name());
                report.failures.push(err);
                continue;
            }
        };

        report.providers += 1;
        debug!(module = module.name(), count = mapping.len(), "Registering module resources");
        for (name, class) in mapping {
            env.register_class(&name, class);
            report.registered += 1;
        }
    }

    report
}

/// Call a module's mapping function, converting errors and panics into a
/// [`PluginError`]. `Ok(None)` means the module has no resources.
fn module_resources(module: &dyn PluginModule) -> Result<Option<ResourceMapping>, PluginError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| module.resource_mapping()));

    let failure = match outcome {
        Ok(None) => return Ok(None),
        Ok(Some(Ok(mapping))) => return Ok(Some(mapping)),
        Ok(Some(Err(err))) => PluginFailure::Error(err),
        Err(payload) => PluginFailure::Panic(panic_message(payload.as_ref())),
    };

    Err(PluginError {
        module: module.name().to_string(),
        failure,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
