use crate::config::{load_route_config, RouteConfig};
use crate::dispatcher::Dispatcher;
use crate::request::RouteRequest;
use crate::router::RouteTable;
use crate::registry::HookRegistry;
use crate::runtime_config::RuntimeConfig;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for svcrouter
///
/// Inspects route configurations and resolves requests against them. Hooks named
/// by `methodFilter` are replaced with logging no-ops, so `resolve` shows the
/// arguments as bound before any application hook would run.
#[derive(Parser, Debug)]
#[command(name = "svcrouter")]
#[command(about = "Request-to-handler resolution tool", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a route configuration and report every problem
    Check {
        /// Route configuration file (YAML, TOML or JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Resolve and invoke a request against a route configuration
    Resolve {
        /// Route configuration file (YAML, TOML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// HTTP verb
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request target, e.g. `/user-profile/edit-name/42`
        path: String,
    },
    /// Print the compiled alias table and regex routes
    Routes {
        /// Route configuration file (YAML, TOML or JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn load_with_overrides(path: &Path) -> Result<RouteConfig> {
    let mut config = load_route_config(path)?;
    RuntimeConfig::from_env().apply(&mut config.settings);
    Ok(config)
}

/// Stand-in hooks for every `methodFilter` the configuration references.
///
/// Real hooks are registered in code, so the CLI installs a no-op that only logs
/// the call and leaves the bound arguments untouched.
fn logging_hooks(config: &RouteConfig) -> HookRegistry {
    let mut hooks = HookRegistry::new();
    for name in config.hook_names() {
        let hook_name = name.to_string();
        hooks.register(name, move |_handler, args| {
            info!(hook = %hook_name, args_count = args.len(), "Post-bind hook skipped by CLI");
            Ok(())
        });
    }
    hooks
}

/// Parse the process arguments and run the selected command, writing to stdout
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &mut out)
}

/// Run one command, writing its output to `out`
pub fn execute<W: Write>(command: &Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Check { config } => {
            let route_config = load_with_overrides(config)?;
            for name in route_config.hook_names() {
                writeln!(
                    out,
                    "⚠️  hook '{name}' must be registered by the application (no-op under the CLI)"
                )?;
            }
            match route_config.validate() {
                Ok(()) => {
                    writeln!(out, "✅ {} is valid", config.display())?;
                    info!(config = %config.display(), "Route configuration valid");
                    Ok(())
                }
                Err(errors) => {
                    for err in &errors {
                        writeln!(out, "❌ {err}")?;
                    }
                    bail!(
                        "{} configuration problem(s) in {}",
                        errors.len(),
                        config.display()
                    )
                }
            }
        }
        Commands::Resolve {
            config,
            method,
            path,
        } => {
            let route_config = load_with_overrides(config)?;
            let verb = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method '{method}'"))?;
            let hooks = logging_hooks(&route_config);
            let dispatcher = Dispatcher::builder(route_config)
                .hooks(hooks)
                .build()
                .context("Failed to build dispatcher")?;

            let request = RouteRequest::new(verb, path);
            let target = dispatcher.resolve(&request)?;
            let resolution = json!({
                "handler": target.handler_name,
                "method": target.method,
                "arguments": target.arguments,
                "is_failure": target.is_failure,
                "failure": target.failure,
                "status": target.status,
                "source": target.source.to_string(),
            });
            let response = dispatcher.invoke(target)?;

            let report = json!({
                "resolution": resolution,
                "response": response,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            Ok(())
        }
        Commands::Routes { config } => {
            let route_config = load_with_overrides(config)?;
            let table = RouteTable::build(&route_config, &logging_hooks(&route_config))
                .context("Failed to compile route table")?;
            table.dump_routes(out)?;
            Ok(())
        }
    }
}
