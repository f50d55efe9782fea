//! Command line arguments
//!
//! Command line values take precedence over the configuration file, which
//! takes precedence over built-in defaults.

use crate::host::api::HostConfig;
use crate::plugin::api::{CycleDetection, DiscoveryConfig, PluginManagerConfig};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "plughost")]
#[command(about = "Plugin host: discovers, orders and starts plugins")]
#[command(version)]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Plugin directory override
    #[arg(short = 'p', long = "plugin-dir", value_name = "DIR")]
    pub plugin_dir: Option<PathBuf>,

    /// Plugin module file extension (without the dot)
    #[arg(long = "plugin-extension", value_name = "EXT")]
    pub plugin_extension: Option<String>,

    /// Plugins to exclude from activation*
    #[arg(long = "exclude-plugin", value_name = "NAMES", action = ArgAction::Append)]
    pub exclude_plugin: Vec<String>,

    /// How far dependency cycle detection looks
    #[arg(long = "cycle-detection", value_name = "MODE")]
    pub cycle_detection: Option<CycleDetection>,

    /// Deliver per-plugin initialized events inline
    #[arg(long = "synchronous-plugin-events")]
    pub synchronous_plugin_events: bool,

    /// Skip builtin plugins
    #[arg(long = "no-builtins")]
    pub no_builtins: bool,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<String>,

    /// Increase verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Command to run once the host is ready, with its arguments
    #[arg(value_name = "COMMAND", num_args = 1.., trailing_var_arg = true)]
    pub command: Vec<String>,
}

/// Effective settings after merging arguments over configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub plugin_manager: PluginManagerConfig,
    pub synchronous_plugin_events: bool,
    pub log_level: String,
    pub log_format: Option<String>,
    pub log_file: Option<String>,
    /// `None` means decide from the terminal
    pub color: Option<bool>,
}

impl Args {
    /// Split comma-separated values, trim them and drop duplicates
    pub fn split_list(values: &[String]) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        for value in values.iter().flat_map(|v| v.split(',')) {
            let value = value.trim();
            if !value.is_empty() && !result.iter().any(|r| r == value) {
                result.push(value.to_string());
            }
        }
        result
    }

    pub fn verbosity(&self) -> i8 {
        self.verbose.min(i8::MAX as u8) as i8 - self.quiet.min(i8::MAX as u8) as i8
    }

    pub fn settings(&self, config: HostConfig) -> Settings {
        let defaults = DiscoveryConfig::default();
        let discovery = DiscoveryConfig {
            search_path: self
                .plugin_dir
                .clone()
                .or(config.plugin_dir)
                .or(defaults.search_path),
            extension: self
                .plugin_extension
                .clone()
                .or(config.plugin_extension)
                .unwrap_or(defaults.extension),
            include_builtins: !self.no_builtins,
        };

        let mut excluded = config.exclude_plugin;
        excluded.extend(self.exclude_plugin.iter().cloned());

        let base_level = self
            .log_level
            .clone()
            .or(config.log.level.clone())
            .unwrap_or_else(|| "info".to_string());
        let log_level = crate::core::logging::level_for_verbosity(&base_level, self.verbosity());

        let log_file = match &self.log_file {
            Some(file) => Some(file.clone()),
            None => config
                .log
                .file_path()
                .map(|path| path.to_string_lossy().to_string()),
        }
        .filter(|file| file != "-" && !file.eq_ignore_ascii_case("none"));

        let color = if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            config.log.color
        };

        Settings {
            plugin_manager: PluginManagerConfig {
                discovery,
                excluded_plugins: Self::split_list(&excluded),
                cycle_detection: self.cycle_detection.unwrap_or(config.cycle_detection),
            },
            synchronous_plugin_events: self.synchronous_plugin_events
                || config.synchronous_plugin_events,
            log_level: log_level.to_string(),
            log_format: self.log_format.clone().or(config.log.format),
            log_file,
            color,
        }
    }
}
