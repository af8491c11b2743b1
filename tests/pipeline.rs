// tests/pipeline.rs

//! Detect, select and render against project trees on disk.

mod common;

use common::*;
use debcook::project::DEFAULT_SKIP_DIRS;
use debcook::recipe::render_template;
use debcook::{
    render_rules, select, Error, Parameters, Registry, Trait, TraitDetector, TraitSet,
};
use std::path::PathBuf;

const HOST: &str = "x86_64-unknown-linux-gnu";
const MULTIARCH: &str = "x86_64-linux-gnu";

fn skip_dirs() -> Vec<String> {
    DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect()
}

fn host_params(name: &str, version: &str) -> Parameters {
    Parameters::for_crate(name, version).with_host(HOST, MULTIARCH)
}

// =============================================================================
// Detection
// =============================================================================

#[test]
fn test_plain_binary_renders_default_recipe() {
    let dir = plain_binary();
    let detection = TraitDetector::new()
        .detect_path(dir.path(), &skip_dirs())
        .unwrap();
    assert!(detection.traits.is_empty());
    assert_eq!(detection.name, "hello");
    assert_eq!(detection.version, "1.2.3");
    assert!(detection.has_lockfile);

    let registry = Registry::builtin();
    let selection = select(&registry, &detection.traits).unwrap();
    assert_eq!(selection.ids(), vec!["cargo-binary"]);

    let rules = render_rules(&selection, &host_params("hello", "1.2.3")).unwrap();
    assert!(rules.starts_with("#!/usr/bin/make -f\n"));
    assert!(rules.contains("--target x86_64-unknown-linux-gnu --root debian/hello/usr"));
    assert!(rules.contains("export DEB_CARGO_CRATE = hello_1.2.3"));
    assert!(rules.contains("dh $@ --buildsystem=cargo"));
}

#[test]
fn test_detection_is_idempotent_on_disk() {
    let dir = workspace_library_with_frontend();
    let detector = TraitDetector::new();
    let first = detector.detect_path(dir.path(), &skip_dirs()).unwrap();
    let second = detector.detect_path(dir.path(), &skip_dirs()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_skip_dirs_hide_build_output() {
    let dir = plain_binary();
    write(dir.path(), "node_modules/left-pad/package.json", "{}");
    write(dir.path(), "target/release/build/out/package.json", "{}");

    let detection = TraitDetector::new()
        .detect_path(dir.path(), &skip_dirs())
        .unwrap();
    assert!(!detection.traits.contains(Trait::BundlesWebAssets));
}

#[test]
fn test_cargo_vendor_output_is_not_project_source() {
    let dir = plain_binary();
    let vendor = dir.path().join("vendor");
    vendored_crate(&vendor, "ring", "ring", "0.17.8", "c1");
    write(&vendor, "ring/crypto/curve25519/curve25519.c", "int x;\n");
    vendored_crate(&vendor, "tree-sitter-rust", "tree-sitter-rust", "0.21.2", "c2");
    write(&vendor, "tree-sitter-rust/package.json", "{\"name\": \"tree-sitter-rust\"}\n");
    write(&vendor, "tree-sitter-rust/src/parser.c", "int y;\n");

    let detection = TraitDetector::new()
        .detect_path(dir.path(), &skip_dirs())
        .unwrap();
    assert!(detection.traits.is_empty(), "{:?}", detection.evidence);
    assert!(!detection.suggested.contains_key("NATIVE_VENDOR_DIR"));
    assert!(!detection.suggested.contains_key("ASSET_DIR"));

    let registry = Registry::builtin();
    let selection = select(&registry, &detection.traits).unwrap();
    let mut params = host_params("hello", "1.2.3");
    params.extend_defaults(&detection.suggested);
    let rules = render_rules(&selection, &params).unwrap();
    assert!(!rules.contains("rm -rf vendor"));
    assert!(!rules.contains("npm"));
}

#[test]
fn test_detect_batch_preserves_input_order() {
    let plain = plain_binary();
    let ws = keylime_workspace();
    let missing = tempfile::tempdir().unwrap();
    let roots: Vec<PathBuf> = vec![
        ws.path().to_path_buf(),
        missing.path().join("nope"),
        plain.path().to_path_buf(),
    ];

    let results = TraitDetector::new().detect_batch(&roots, &skip_dirs());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, roots[0]);
    assert_eq!(results[0].1.as_ref().unwrap().name, "keylime_agent");
    assert!(matches!(results[1].1, Err(Error::NotAProject(_))));
    assert_eq!(results[2].1.as_ref().unwrap().name, "hello");
}

// =============================================================================
// Selection and rendering
// =============================================================================

#[test]
fn test_workspace_installs_named_binary() {
    let dir = keylime_workspace();
    let detection = TraitDetector::new()
        .detect_path(dir.path(), &skip_dirs())
        .unwrap();
    assert_eq!(detection.traits, TraitSet::from([Trait::IsWorkspace]));

    let registry = Registry::builtin();
    let selection = select(&registry, &detection.traits).unwrap();
    assert!(selection.ids().contains(&"workspace-binary"));
    assert!(!selection.ids().contains(&"cargo-binary"));

    let rules = render_rules(&selection, &host_params("keylime_agent", "0.3.1")).unwrap();
    let install = rules
        .lines()
        .find(|l| l.contains("install -D"))
        .unwrap();
    assert!(install.contains("usr/bin/keylime_agent"));
    assert!(install.contains("target/x86_64-unknown-linux-gnu/release/keylime_agent"));
    assert!(rules.contains("cargo build --release --offline --locked --workspace"));
}

#[test]
fn test_shared_library_installs_into_multiarch_dir() {
    let dir = cramjam_library();
    let detection = TraitDetector::new()
        .detect_path(dir.path(), &skip_dirs())
        .unwrap();
    assert_eq!(
        detection.traits,
        TraitSet::from([Trait::ProducesSharedLibrary])
    );

    let registry = Registry::builtin();
    let selection = select(&registry, &detection.traits).unwrap();
    let rules = render_rules(&selection, &host_params("cramjam", "2.8.3")).unwrap();
    assert!(rules.contains("debian/cramjam/usr/lib/x86_64-linux-gnu/libcramjam.so"));
}

#[test]
fn test_workspace_library_with_web_assets_is_unsupported() {
    let dir = workspace_library_with_frontend();
    let detection = TraitDetector::new()
        .detect_path(dir.path(), &skip_dirs())
        .unwrap();
    assert_eq!(
        detection.traits,
        TraitSet::from([
            Trait::IsWorkspace,
            Trait::ProducesSharedLibrary,
            Trait::BundlesWebAssets,
        ])
    );

    let registry = Registry::builtin();
    match select(&registry, &detection.traits) {
        Err(Error::UnsupportedCombination { traits, .. }) => {
            assert!(traits.contains("is-workspace"));
            assert!(traits.contains("produces-shared-library"));
            assert!(traits.contains("bundles-web-assets"));
        }
        other => panic!("expected UnsupportedCombination, got {:?}", other.map(|s| s.ids().len())),
    }
}

#[test]
fn test_missing_host_triple_is_reported() {
    let registry = Registry::builtin();
    let selection = select(&registry, &TraitSet::new()).unwrap();

    // No with_host: DEB_HOST_RUST_TYPE is never supplied
    let params = Parameters::for_crate("hello", "1.2.3");
    let err = render_rules(&selection, &params).unwrap_err();
    match err {
        Error::MissingParameter {
            fragment,
            placeholder,
        } => {
            assert_eq!(fragment, "cargo-binary");
            assert_eq!(placeholder, "DEB_HOST_RUST_TYPE");
        }
        other => panic!("expected MissingParameter, got {}", other),
    }
}

#[test]
fn test_detected_suggestions_fill_parameters() {
    let manifest = format!(
        "{}\n[dependencies]\npyo3 = {{ version = \"0.22\", features = [\"extension-module\"] }}\n\n[lib]\ncrate-type = [\"cdylib\"]\n",
        package_manifest("fast-codec", "0.4.0")
    );
    let dir = project_tree(&[
        ("Cargo.toml", manifest.as_str()),
        ("src/lib.rs", ""),
        (
            "pyproject.toml",
            "[build-system]\nrequires = [\"maturin>=1.0\"]\nbuild-backend = \"maturin\"\n",
        ),
    ]);

    let detection = TraitDetector::new()
        .detect_path(dir.path(), &skip_dirs())
        .unwrap();
    assert!(detection.traits.contains(Trait::HostsLanguageExtension));
    assert!(detection.traits.contains(Trait::UsesAlternateBuildSystem));

    let registry = Registry::builtin();
    let selection = select(&registry, &detection.traits).unwrap();

    let mut params = host_params(&detection.name, &detection.version);
    params.extend_defaults(&detection.suggested);
    let rules = render_rules(&selection, &params).unwrap();

    assert!(rules.contains("export PYBUILD_NAME = fast_codec"));
    assert!(rules.contains("dh $@ --buildsystem=pybuild"));
    assert!(rules.contains("dist-packages/fast_codec/fast_codec.so"));
    assert!(!rules.contains("--buildsystem=cargo"));
}

#[test]
fn test_recipe_file_extends_catalogue() {
    let dir = project_tree(&[(
        "wasm.toml",
        "[[fragment]]\n\
         id = \"web-assets\"\n\
         key = [\"bundles-web-assets\"]\n\
         target = \"build\"\n\
         kind = \"binary\"\n\
         template = \"override_dh_auto_build:\\n\\ttrunk build --release --offline\\n\"\n",
    )]);

    let registry = Registry::with_files(&[dir.path().join("wasm.toml")]).unwrap();
    assert_eq!(registry.len(), Registry::builtin().len());
    let traits = TraitSet::from([Trait::BundlesWebAssets]);
    let selection = select(&registry, &traits).unwrap();

    let rules = render_rules(&selection, &host_params("site", "1.0.0")).unwrap();
    assert!(rules.contains("trunk build --release --offline"));
    assert!(!rules.contains("npm ci"));
}

#[test]
fn test_escaped_percent_renders_literally() {
    let out = render_template(
        "inline",
        "%%.o: %%.c\n\t$(CC) -o %(CRATE)s\n",
        &host_params("zlib", "1.3"),
    )
    .unwrap();
    assert_eq!(out, "%.o: %.c\n\t$(CC) -o zlib\n");
}
