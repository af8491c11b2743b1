// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: extra recipe files
fn recipes_arg() -> Arg {
    Arg::new("recipes")
        .long("recipes")
        .value_name("FILE")
        .action(ArgAction::Append)
        .help("Additional recipe files")
}

/// Common argument: comma-separated trait list
fn traits_arg() -> Arg {
    Arg::new("traits")
        .short('t')
        .long("traits")
        .value_name("LIST")
        .help("Comma-separated traits instead of detecting them")
}

fn build_cli() -> Command {
    Command::new("debcook")
        .version(env!("CARGO_PKG_VERSION"))
        .author("debcook Contributors")
        .about("Detect, select and render Debian packaging recipes for Rust projects")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file (default: ./debcook.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("detect")
                .about("Report the packaging traits of one or more project trees")
                .arg(
                    Arg::new("paths")
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Project roots"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print JSON instead of text"),
                ),
        )
        .subcommand(
            Command::new("select")
                .about("Show the recipe fragments selected for a project or trait list")
                .arg(Arg::new("path").help("Project root to detect traits from"))
                .arg(traits_arg())
                .arg(recipes_arg()),
        )
        .subcommand(
            Command::new("render")
                .about("Render debian/rules for a project")
                .arg(Arg::new("path").required(true).help("Project root"))
                .arg(Arg::new("crate_name").long("crate-name").help("Crate name"))
                .arg(Arg::new("version").long("version").help("Upstream version"))
                .arg(Arg::new("host_triple").long("host-triple").help("Rust host triple"))
                .arg(Arg::new("multiarch").long("multiarch").help("Debian multiarch tuple"))
                .arg(Arg::new("destdir").long("destdir").help("Install path"))
                .arg(traits_arg())
                .arg(
                    Arg::new("set")
                        .long("set")
                        .value_name("KEY=VALUE")
                        .action(ArgAction::Append)
                        .help("Extra template parameter, repeatable"),
                )
                .arg(recipes_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write to this file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("recipes")
                .about("List the recipe fragment catalogue")
                .arg(recipes_arg())
                .arg(
                    Arg::new("templates")
                        .long("templates")
                        .action(ArgAction::SetTrue)
                        .help("Print each fragment's template"),
                ),
        )
        .subcommand(
            Command::new("vendor")
                .about("Create the vendor bundle for a package version")
                .arg(Arg::new("path").required(true).help("Project root (must contain Cargo.lock)"))
                .arg(Arg::new("vendor_dir").long("vendor-dir").help("Output of `cargo vendor`"))
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .default_value("..")
                        .help("Directory the bundle is written to"),
                )
                .arg(Arg::new("target").long("target").help("Target triple to filter for"))
                .arg(Arg::new("version").long("version").help("Override the package version")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("debcook.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
