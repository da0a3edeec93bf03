//! resource-env
//!
//! Builds the global resource environment the way the engine does at
//! startup and inspects it.

use anyhow::Result;
use clap::Parser;
use resource_env::cli::{CheckArgs, Cli, Command, FormatArg, ResolveArgs};
use resource_env::config::{CONFIG_PATH_VAR, Config, ConfigLoader};
use resource_env::environment::Environment;
use resource_env::format::{
    OutputFormat, format_load_report_json, format_load_report_markdown, format_registry_json,
    format_registry_markdown, format_resolved_json, format_resolved_markdown,
};
use resource_env::logging::{self, LogOutput};
use resource_env::{initialise_with, load_directory};
use std::process::ExitCode;
use tracing::debug;

fn output_format(arg: FormatArg) -> OutputFormat {
    match arg {
        FormatArg::Json => OutputFormat::Json,
        FormatArg::Markdown => OutputFormat::Markdown,
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(config_path) = &cli.config {
        // SAFETY: called at program startup before any other threads are spawned
        unsafe {
            std::env::set_var(CONFIG_PATH_VAR, config_path);
        }
    }
    let mut loader = ConfigLoader::load()?;
    if let Some(path) = loader.config_path() {
        debug!(path = %path.display(), "Using configuration file");
    }

    let config = loader.config_mut();
    if let Some(dir) = &cli.environment_dir {
        config.engine.environment_dir = dir.clone();
    }
    if !cli.plugin_dirs.is_empty() {
        config.engine.plugin_dirs = cli.plugin_dirs.clone();
    }

    Ok(loader.into_config())
}

fn list(env: &Environment, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&format_registry_json(env))?),
        OutputFormat::Markdown => print!("{}", format_registry_markdown(env)),
    }
    Ok(())
}

fn resolve(env: &Environment, args: &ResolveArgs, format: OutputFormat) -> Result<ExitCode> {
    let resolved = match env.resolve(&args.resource_type, args.resource.as_deref()) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("{}", err);
            return Ok(ExitCode::FAILURE);
        }
    };
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&format_resolved_json(&args.resource_type, &resolved))?
        ),
        OutputFormat::Markdown => print!("{}", format_resolved_markdown(&args.resource_type, &resolved)),
    }
    Ok(ExitCode::SUCCESS)
}

fn show(env: &Environment) -> Result<()> {
    print!("{}", serde_yaml::to_string(&env.user_env_as_dict())?);
    Ok(())
}

fn check(args: &CheckArgs, config: &Config, format: OutputFormat) -> Result<ExitCode> {
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.engine.environment_dir.clone());
    let mut scratch = Environment::new(false);
    let report = load_directory(&dir, &mut scratch);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&format_load_report_json(&report))?),
        OutputFormat::Markdown => print!("{}", format_load_report_markdown(&report)),
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init(&LogOutput::parse(&cli.log), cli.verbose)?;

    let config = load_config(&cli)?;
    let format = output_format(cli.format);

    match cli.command.as_ref().unwrap_or(&Command::List) {
        Command::List => {
            list(initialise_with(&config), format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve(args) => resolve(initialise_with(&config), args, format),
        Command::Show => {
            show(initialise_with(&config))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(args) => check(args, &config, format),
    }
}
