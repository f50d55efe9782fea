//! Build metadata and the plugin API version the host was compiled with.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Fallback used when the generated version string is not numeric
const FALLBACK_API_VERSION: u32 = 20250727;

/// Plugin API version (`YYYYMMDD`) of this host
pub fn get_api_version() -> u32 {
    PLUGIN_API_VERSION.parse().unwrap_or(FALLBACK_API_VERSION)
}

/// Major part of an API version; plugins are compatible within one major
pub fn major_version(api_version: u32) -> u32 {
    api_version / 10000
}

/// Whether a plugin built against `plugin_api_version` may run on this host
pub fn is_api_compatible(host_api_version: u32, plugin_api_version: u32) -> bool {
    major_version(host_api_version) == major_version(plugin_api_version)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}
