//! Build metadata and the plugin API version.
//! The generated version.rs from the build script is the single source of truth.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Fallback used when the manifest carries no parsable API version
const DEFAULT_API_VERSION: u32 = 20250727;

/// Host plugin API version (`YYYYMMDD`)
pub fn get_api_version() -> u32 {
    PLUGIN_API_VERSION.parse().unwrap_or(DEFAULT_API_VERSION)
}

/// Major part of an API version: the year
pub fn major_version(api_version: u32) -> u32 {
    api_version / 10000
}

/// Two API versions are compatible when their years match
pub fn is_api_compatible(host: u32, plugin: u32) -> bool {
    major_version(host) == major_version(plugin)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Long version text for `--version`
pub fn long_version() -> String {
    format!(
        "{} (plugin api {}, built {}, commit {})",
        env!("CARGO_PKG_VERSION"),
        get_api_version(),
        build_time(),
        git_hash()
    )
}
