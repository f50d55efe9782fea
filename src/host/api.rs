//! Public API for the host subsystems

pub use crate::host::commands::{CommandEntry, CommandHandler, CommandRegistry};
pub use crate::host::config::{default_config_path, ConfigError, HostConfig, LogConfig};
pub use crate::host::context::HostContext;
pub use crate::host::driver::{Host, StartupStage, StartupSummary};
pub use crate::host::registry::{
    Client, ClientRegistry, FilterFn, FilterRegistry, NamedRegistry, Source, SourceRegistry,
};
pub use crate::host::wrappers::{ClientWorkWrapper, SourceWorkWrapper, WorkWrapper};
