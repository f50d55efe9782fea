use chrono::Utc;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Fallback when `[package.metadata] plugin_api_version` is missing or unreadable
const DEFAULT_API_VERSION: &str = "20250727";

fn read_plugin_api_version(cargo_toml: &Path) -> String {
    std::fs::read_to_string(cargo_toml)
        .ok()
        .and_then(|content| content.parse::<toml::Table>().ok())
        .and_then(|table| {
            table
                .get("package")?
                .get("metadata")?
                .get("plugin_api_version")?
                .as_integer()
        })
        .map(|v| v.to_string())
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string())
}

fn read_git_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo");
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("version.rs");
    let cargo_toml_path = Path::new(&manifest_dir).join("Cargo.toml");

    let plugin_api_version = read_plugin_api_version(&cargo_toml_path);
    let build_time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let git_hash = read_git_hash();

    let mut f = File::create(&dest_path).expect("create version.rs");
    #[allow(clippy::uninlined_format_args)]
    writeln!(
        &mut f,
        r###"pub const PLUGIN_API_VERSION: &str = "{}";
pub const BUILD_TIME: &str = "{}";
pub const GIT_HASH: &str = "{}";"###,
        plugin_api_version, build_time, git_hash
    )
    .expect("write version.rs");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
