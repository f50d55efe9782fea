//! Command Registry

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub type CommandHandler = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

#[derive(Clone)]
pub struct CommandEntry {
    pub name: String,
    pub description: String,
    handler: CommandHandler,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Commands contributed by plugins, dispatched by name
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: RwLock<Vec<CommandEntry>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command; names are case-insensitive and first wins
    pub fn register<F>(&self, name: &str, description: &str, handler: F) -> bool
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        let mut commands = self.commands.write().unwrap_or_else(PoisonError::into_inner);
        if commands.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
            log::warn!("Command '{}' is already registered", name);
            return false;
        }
        commands.push(CommandEntry {
            name: name.to_string(),
            description: description.to_string(),
            handler: Arc::new(handler),
        });
        log::debug!("Registered command '{}'", name);
        true
    }

    /// Run the named command; `None` if no such command exists
    pub fn dispatch(&self, name: &str, args: &[String]) -> Option<String> {
        let handler = self
            .commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.handler.clone())?;
        // lock released; handlers may read the registry
        Some(handler(args))
    }

    pub fn entries(&self) -> Vec<CommandEntry> {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|c| c.name).collect()
    }

    pub fn count(&self) -> usize {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
