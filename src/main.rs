// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use commands::{RenderOptions, VendorOptions};
use debcook::Config;
use tracing_subscriber::EnvFilter;

/// Exit status for failures the operator resolves by hand: an unsupported
/// trait combination or a missing template parameter
const EXIT_NEEDS_OPERATOR: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load(cli.config.as_deref())?;

    let result = dispatch(command, &config);
    if let Err(e) = &result
        && e
            .downcast_ref::<debcook::Error>()
            .is_some_and(debcook::Error::is_operator_facing)
    {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_NEEDS_OPERATOR);
    }
    result
}

fn dispatch(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Detect { paths, json } => commands::cmd_detect(config, &paths, json),

        Commands::Select {
            path,
            traits,
            recipes,
        } => commands::cmd_select(config, path.as_deref(), traits.as_deref(), &recipes),

        Commands::Render {
            path,
            crate_name,
            version,
            host_triple,
            multiarch,
            destdir,
            traits,
            set,
            recipes,
            output,
        } => {
            let options = RenderOptions {
                crate_name,
                version,
                host_triple,
                multiarch,
                destdir,
                traits,
                assignments: set,
                recipes,
                output,
            };
            commands::cmd_render(config, &path, &options)
        }

        Commands::Recipes { recipes, templates } => {
            commands::cmd_recipes(config, &recipes, templates)
        }

        Commands::Vendor {
            path,
            vendor_dir,
            output_dir,
            target,
            version,
        } => {
            let options = VendorOptions {
                vendor_dir,
                output_dir,
                target,
                version,
            };
            commands::cmd_vendor(config, &path, &options)
        }
    }
}
