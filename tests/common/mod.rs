// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a file below `root`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A project tree built from `(path, content)` pairs.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn project_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        write(dir.path(), rel, content);
    }
    dir
}

pub fn package_manifest(name: &str, version: &str) -> String {
    format!("[package]\nname = \"{}\"\nversion = \"{}\"\nedition = \"2021\"\n", name, version)
}

/// Plain single-binary crate with no traits.
pub fn plain_binary() -> TempDir {
    project_tree(&[
        ("Cargo.toml", package_manifest("hello", "1.2.3").as_str()),
        ("Cargo.lock", "version = 3\n"),
        ("src/main.rs", "fn main() {}\n"),
    ])
}

/// Workspace whose root package is the agent binary.
pub fn keylime_workspace() -> TempDir {
    let root = format!(
        "{}\n[workspace]\nmembers = [\"keylime\", \"keylime-ima-emulator\"]\n",
        package_manifest("keylime_agent", "0.3.1")
    );
    project_tree(&[
        ("Cargo.toml", root.as_str()),
        ("Cargo.lock", "version = 3\n"),
        ("src/main.rs", "fn main() {}\n"),
        ("keylime/Cargo.toml", package_manifest("keylime", "0.3.1").as_str()),
        ("keylime/src/lib.rs", ""),
        (
            "keylime-ima-emulator/Cargo.toml",
            package_manifest("keylime-ima-emulator", "0.3.1").as_str(),
        ),
        ("keylime-ima-emulator/src/main.rs", "fn main() {}\n"),
    ])
}

/// Crate producing a `cdylib`.
pub fn cramjam_library() -> TempDir {
    let manifest = format!(
        "{}\n[lib]\nname = \"cramjam\"\ncrate-type = [\"cdylib\"]\n",
        package_manifest("cramjam", "2.8.3")
    );
    project_tree(&[
        ("Cargo.toml", manifest.as_str()),
        ("Cargo.lock", "version = 3\n"),
        ("src/lib.rs", ""),
    ])
}

/// Workspace with a shared library member and a web frontend.
pub fn workspace_library_with_frontend() -> TempDir {
    let lib = format!(
        "{}\n[lib]\ncrate-type = [\"cdylib\", \"rlib\"]\n",
        package_manifest("dashboard-core", "1.0.0")
    );
    project_tree(&[
        (
            "Cargo.toml",
            "[workspace]\nmembers = [\"core\", \"server\"]\n\n[workspace.package]\nversion = \"1.0.0\"\n",
        ),
        ("core/Cargo.toml", lib.as_str()),
        ("core/src/lib.rs", ""),
        ("server/Cargo.toml", package_manifest("dashboard-server", "1.0.0").as_str()),
        ("server/src/main.rs", "fn main() {}\n"),
        ("web/package.json", "{\"name\": \"dashboard\"}\n"),
        ("web/src/index.js", ""),
    ])
}

/// Add a locked registry package to a lockfile body.
pub fn locked(name: &str, version: &str, checksum: &str) -> String {
    format!(
        "[[package]]\nname = \"{}\"\nversion = \"{}\"\nsource = \"registry+https://github.com/rust-lang/crates.io-index\"\nchecksum = \"{}\"\n\n",
        name, version, checksum
    )
}

/// Lay out a crate as `cargo vendor` would.
pub fn vendored_crate(vendor_dir: &Path, dir: &str, name: &str, version: &str, checksum: &str) {
    write(vendor_dir, &format!("{}/Cargo.toml", dir), &package_manifest(name, version));
    write(vendor_dir, &format!("{}/src/lib.rs", dir), "pub fn f() {}\n");
    write(
        vendor_dir,
        &format!("{}/.cargo-checksum.json", dir),
        &format!("{{\"files\":{{}},\"package\":\"{}\"}}", checksum),
    );
}
