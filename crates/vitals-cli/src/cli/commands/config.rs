//! `vitals config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    if config.password.is_some() {
        config.password = Some("****".to_string());
    }

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&config)?);
        }
        OutputFormat::Csv | OutputFormat::Pretty => {
            println!("{}", "Current Configuration:".bold());
            println!();

            let unset = || "(not set)".dimmed().to_string();
            println!("  {} {}", "source:".bold(), format!("{:?}", config.source).to_lowercase());
            println!(
                "  {} {}",
                "jolokia_url:".bold(),
                config.jolokia_url.clone().unwrap_or_else(unset)
            );
            println!("  {} {}", "username:".bold(), config.username.clone().unwrap_or_else(unset));
            println!("  {} {}", "password:".bold(), config.password.clone().unwrap_or_else(unset));
            println!("  {} {}", "period_ms:".bold(), config.period_ms);
            println!("  {} {}", "initial_delay_ms:".bold(), config.initial_delay_ms);
            println!("  {} {}", "workers:".bold(), config.workers);
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
            let samplers: Vec<_> = config.samplers.iter().map(ToString::to_string).collect();
            println!("  {} {}", "samplers:".bold(), samplers.join(","));
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if key == "password" { "****" } else { value };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());

    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
