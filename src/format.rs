//! Output formatting for the CLI: markdown and JSON.

use crate::environment::{Environment, Resolved, ResourceInfo};
use crate::error::LoadError;
use crate::loader::LoadReport;
use serde_json::{Value, json};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
}

fn info_kind(info: &ResourceInfo) -> &'static str {
    match info {
        ResourceInfo::Class(_) => "class",
        ResourceInfo::Alias(_) => "alias",
        ResourceInfo::Template(_) => "template",
    }
}

fn info_target(info: &ResourceInfo) -> String {
    match info {
        ResourceInfo::Class(class) => class.name().to_string(),
        ResourceInfo::Alias(target) | ResourceInfo::Template(target) => target.clone(),
    }
}

/// Registered resource types as JSON.
pub fn format_registry_json(env: &Environment) -> Value {
    let types: Vec<Value> = env
        .registry()
        .iter()
        .map(|(name, info)| json!({"name": name, "kind": info_kind(info), "target": info_target(info)}))
        .collect();

    let resources: Vec<Value> = env
        .registry()
        .resource_overrides()
        .flat_map(|(resource, overrides)| {
            overrides.iter().map(move |(name, info)| {
                json!({
                    "resource": resource,
                    "name": name,
                    "kind": info_kind(info),
                    "target": info_target(info),
                })
            })
        })
        .collect();

    json!({"types": types, "resources": resources})
}

/// Registered resource types as a markdown table.
pub fn format_registry_markdown(env: &Environment) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Resource types ({})\n\n", env.registry().len()));
    md.push_str("| type | kind | target |\n|---|---|---|\n");
    for (name, info) in env.registry().iter() {
        md.push_str(&format!(
            "| `{}` | {} | `{}` |\n",
            name,
            info_kind(info),
            info_target(info)
        ));
    }

    let mut overrides = env.registry().resource_overrides().peekable();
    if overrides.peek().is_some() {
        md.push_str("\n## Resource overrides\n\n");
        for (resource, entries) in overrides {
            for (name, info) in entries {
                md.push_str(&format!("- **{}**: `{}` -> `{}`\n", resource, name, info_target(info)));
            }
        }
    }

    md
}

/// Result of resolving a type as JSON.
pub fn format_resolved_json(type_name: &str, resolved: &Resolved<'_>) -> Value {
    match resolved {
        Resolved::Class(class) => json!({"type": type_name, "class": class.name()}),
        Resolved::Template(path) => json!({"type": type_name, "template": path}),
    }
}

pub fn format_resolved_markdown(type_name: &str, resolved: &Resolved<'_>) -> String {
    match resolved {
        Resolved::Class(class) => format!("`{}` -> class `{}`\n", type_name, class.name()),
        Resolved::Template(path) => format!("`{}` -> template `{}`\n", type_name, path),
    }
}

fn failure_kind(err: &LoadError) -> &'static str {
    match err {
        LoadError::ListDir { .. } => "directory",
        LoadError::Read { .. } => "read",
        LoadError::Parse { .. } => "parse",
    }
}

/// Directory check result as JSON.
pub fn format_load_report_json(report: &LoadReport) -> Value {
    let loaded: Vec<String> = report
        .loaded
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let failures: Vec<Value> = report
        .failures
        .iter()
        .map(|err| {
            json!({
                "kind": failure_kind(err),
                "file": err.file_name(),
                "error": err.to_string(),
            })
        })
        .collect();
    json!({"loaded": loaded, "failures": failures})
}

pub fn format_load_report_markdown(report: &LoadReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Loaded ({})\n", report.loaded.len()));
    for path in &report.loaded {
        md.push_str(&format!("- {}\n", path.display()));
    }

    if !report.failures.is_empty() {
        md.push_str(&format!("\n## Failed ({})\n", report.failures.len()));
        for err in &report.failures {
            md.push_str(&format!("- [{}] {}\n", failure_kind(err), err));
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::none;

    fn sample_env() -> Environment {
        let mut env = Environment::new(false);
        env.register_class(none::RESOURCE_TYPE, none::CLASS);
        env.load(&json!({
            "parameters": {},
            "resource_registry": {
                "MyType": "OS::Heat::None",
                "resources": {"db": {"MyType": "db.yaml"}}
            }
        }));
        env
    }

    #[test]
    fn test_registry_json() {
        let value = format_registry_json(&sample_env());
        assert_eq!(
            value["types"],
            json!([
                {"name": "MyType", "kind": "alias", "target": "OS::Heat::None"},
                {"name": "OS::Heat::None", "kind": "class", "target": "NoneResource"}
            ])
        );
        assert_eq!(
            value["resources"],
            json!([{"resource": "db", "name": "MyType", "kind": "template", "target": "db.yaml"}])
        );
    }

    #[test]
    fn test_registry_markdown() {
        let md = format_registry_markdown(&sample_env());
        assert!(md.starts_with("# Resource types (2)"));
        assert!(md.contains("| `OS::Heat::None` | class | `NoneResource` |"));
        assert!(md.contains("- **db**: `MyType` -> `db.yaml`"));
    }

    #[test]
    fn test_resolved_output() {
        let resolved = Resolved::Class(none::CLASS);
        assert_eq!(
            format_resolved_json("MyType", &resolved),
            json!({"type": "MyType", "class": "NoneResource"})
        );
        assert_eq!(
            format_resolved_markdown("MyType", &Resolved::Template("x.yaml")),
            "`MyType` -> template `x.yaml`\n"
        );
    }
}
