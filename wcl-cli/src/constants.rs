// ABOUTME: Centralized constants for the wcl CLI application
// ABOUTME: Contains config file locations and output defaults

/// Configuration file locations
pub mod config {
    /// Project-specific config file in the working directory
    pub const PROJECT_FILE: &str = "wcl.toml";

    /// Directory under the XDG or home config root
    pub const APP_DIR: &str = "wcl";

    /// File name inside the app config directory
    pub const USER_FILE: &str = "config.toml";
}

/// Output defaults
pub mod output {
    /// Directory generated sources are written to when none is configured
    pub const DEFAULT_OUTPUT_DIR: &str = "src/types";
}
