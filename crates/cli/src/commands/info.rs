//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{LoggingConfig, Severity, SinkType};

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Debug, Serialize)]
struct ConfigInfo {
    min_level: Severity,
    bindings: Vec<BindingInfo>,
}

/// One binding in dispatch order
#[derive(Debug, Serialize)]
struct BindingInfo {
    name: String,
    sink_type: SinkType,
    min_level: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let info = build_config_info(&config)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

/// Resolve levels without opening any sink
fn build_config_info(config: &LoggingConfig) -> Result<ConfigInfo> {
    let min_level = config.min_level.resolve()?;

    let mut bindings = Vec::with_capacity(config.sinks.len() + 1);
    if config.default_console {
        bindings.push(BindingInfo {
            name: "console".to_string(),
            sink_type: SinkType::Console,
            min_level: config.console_min_level.parse()?,
            path: None,
        });
    }
    for sink in &config.sinks {
        bindings.push(BindingInfo {
            name: sink.name.clone(),
            sink_type: sink.sink_type,
            min_level: sink.min_level.parse()?,
            path: sink.params.get("path").cloned(),
        });
    }

    Ok(ConfigInfo {
        min_level,
        bindings,
    })
}

fn print_config_info(info: &ConfigInfo) {
    println!("logfan configuration\n");
    println!("   Global min level: {}", info.min_level);

    println!("\n   Bindings ({})", info.bindings.len());
    for (i, binding) in info.bindings.iter().enumerate() {
        let is_last = i == info.bindings.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let effective = binding.min_level.max(info.min_level);
        print!(
            "   {} {} ({:?}) >= {} (effective {})",
            prefix, binding.name, binding.sink_type, binding.min_level, effective
        );
        match &binding.path {
            Some(path) => println!(" -> {}", path),
            None => println!(),
        }
    }

    println!();
}
