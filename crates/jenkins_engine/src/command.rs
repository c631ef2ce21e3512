use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use jenkins_logging::jenkins_trace;

use crate::sync::lock;

pub type CommandHandler = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Wraps an async closure as a `CommandHandler`.
pub fn command_handler<F, Fut>(f: F) -> CommandHandler
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("no command registered under {0}")]
    UnknownCommand(String),
}

/// Handle returned by a `CommandHost`. Disposing twice is a no-op.
pub trait CommandRegistration: Send {
    fn dispose(&mut self);
}

/// Where commands get registered and executed (the host UI's command palette).
#[async_trait::async_trait]
pub trait CommandHost: Send + Sync {
    fn register(&self, id: &str, handler: CommandHandler) -> Box<dyn CommandRegistration>;

    async fn execute(&self, id: &str) -> Result<(), CommandError>;
}

#[derive(Default)]
struct TableInner {
    next_token: u64,
    entries: BTreeMap<String, (u64, CommandHandler)>,
}

/// In-process `CommandHost` backed by a map of id to handler.
#[derive(Clone, Default)]
pub struct CommandTable {
    inner: Arc<Mutex<TableInner>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        lock(&self.inner).entries.contains_key(id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<String> {
        lock(&self.inner).entries.keys().cloned().collect()
    }
}

struct TableRegistration {
    table: Weak<Mutex<TableInner>>,
    id: String,
    token: u64,
    disposed: bool,
}

impl CommandRegistration for TableRegistration {
    fn dispose(&mut self) {
        if std::mem::replace(&mut self.disposed, true) {
            return;
        }
        let Some(table) = self.table.upgrade() else {
            return;
        };
        let mut inner = lock(&table);
        // A newer registration under the same id must survive.
        if inner.entries.get(&self.id).map(|(token, _)| *token) == Some(self.token) {
            inner.entries.remove(&self.id);
            jenkins_trace!("Command {} unregistered", self.id);
        }
    }
}

#[async_trait::async_trait]
impl CommandHost for CommandTable {
    fn register(&self, id: &str, handler: CommandHandler) -> Box<dyn CommandRegistration> {
        let mut inner = lock(&self.inner);
        inner.next_token += 1;
        let token = inner.next_token;
        inner.entries.insert(id.to_string(), (token, handler));
        jenkins_trace!("Command {} registered", id);
        Box::new(TableRegistration {
            table: Arc::downgrade(&self.inner),
            id: id.to_string(),
            token,
            disposed: false,
        })
    }

    async fn execute(&self, id: &str) -> Result<(), CommandError> {
        let handler = lock(&self.inner)
            .entries
            .get(id)
            .map(|(_, handler)| handler.clone())
            .ok_or_else(|| CommandError::UnknownCommand(id.to_string()))?;
        handler().await;
        Ok(())
    }
}

/// Owns a set of registrations and releases them on removal, replacement or drop.
pub struct CommandRegistry {
    host: Arc<dyn CommandHost>,
    commands: BTreeMap<String, Box<dyn CommandRegistration>>,
}

impl CommandRegistry {
    pub fn new(host: Arc<dyn CommandHost>) -> Self {
        Self {
            host,
            commands: BTreeMap::new(),
        }
    }

    /// Registers `handler` under `id`, disposing any previous registration first.
    pub fn add(&mut self, id: impl Into<String>, handler: CommandHandler) {
        let id = id.into();
        self.remove(&id);
        let registration = self.host.register(&id, handler);
        self.commands.insert(id, registration);
    }

    pub fn remove(&mut self, id: &str) {
        if let Some(mut registration) = self.commands.remove(id) {
            registration.dispose();
        }
    }

    pub fn dispose_all(&mut self) {
        for (_, mut registration) in std::mem::take(&mut self.commands) {
            registration.dispose();
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Drop for CommandRegistry {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
