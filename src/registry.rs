use crate::command_handlers::Context;
use anyhow::Result;
use thiserror::Error;

pub type HandlerFn = fn(&Context<'_>) -> Result<()>;

/// A handler function together with the identifier and doc text it was declared with.
#[derive(Clone, Copy)]
pub struct Handler {
    pub ident: &'static str,
    pub doc: &'static str,
    pub run: HandlerFn,
}

impl Handler {
    pub const fn new(ident: &'static str, doc: &'static str, run: HandlerFn) -> Self {
        Self { ident, doc, run }
    }

    /// Command name derived from the handler identifier (`foo_bar` -> `foo-bar`).
    pub fn command_name(&self) -> String {
        derive_command_name(self.ident)
    }

    /// First non-empty line of the doc text.
    pub fn summary(&self) -> String {
        self.doc
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler").field("ident", &self.ident).finish_non_exhaustive()
    }
}

pub fn derive_command_name(ident: &str) -> String {
    ident.replace('_', "-")
}

/// Declares a documented handler and a `HANDLER` constant describing it.
///
/// ```ignore
/// command! {
///     /// Remove build output.
///     pub fn clean(ctx: &Context) -> Result<()> { ... }
/// }
/// ```
macro_rules! command {
    (
        $(#[doc = $doc:literal])+
        pub fn $name:ident($ctx:ident: &Context) -> Result<()> $body:block
    ) => {
        $(#[doc = $doc])+
        pub fn $name($ctx: &$crate::command_handlers::Context<'_>) -> Result<()> $body

        pub const HANDLER: $crate::registry::Handler =
            $crate::registry::Handler::new(stringify!($name), concat!($($doc, "\n"),+), $name);
    };
}
pub(crate) use command;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("register needs a handler or an explicit command name")]
    NothingToRegister,
    #[error("command '{0}' was registered without a handler")]
    MissingHandler(String),
    #[error("command name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub description: String,
    pub handler: Handler,
}

/// Immutable, ordered command table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&Handler> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.handler)
    }

    /// (name, description) pairs in registration order.
    pub fn describe(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.description.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<Entry>,
}

impl RegistryBuilder {
    /// Registers under the name derived from the handler identifier.
    pub fn register(&mut self, handler: Handler) -> Handler {
        self.insert(handler.command_name(), handler)
    }

    /// Registers under an explicit name; the identifier is ignored.
    pub fn register_as(&mut self, name: &str, handler: Handler) -> Result<Handler, RegistryError> {
        self.register_with(Some(name), Some(handler))
    }

    /// General form: an explicit name, a handler, or both.
    pub fn register_with(
        &mut self,
        name: Option<&str>,
        handler: Option<Handler>,
    ) -> Result<Handler, RegistryError> {
        match (name, handler) {
            (None, None) => Err(RegistryError::NothingToRegister),
            (Some(n), None) => Err(RegistryError::MissingHandler(n.to_string())),
            (Some(n), Some(_)) if n.trim().is_empty() => Err(RegistryError::EmptyName),
            (Some(n), Some(h)) => Ok(self.insert(n.to_string(), h)),
            (None, Some(h)) => Ok(self.register(h)),
        }
    }

    pub fn build(self) -> Registry {
        Registry { entries: self.entries }
    }

    // Duplicate names replace the earlier handler in place.
    fn insert(&mut self, name: String, handler: Handler) -> Handler {
        let entry = Entry { description: handler.summary(), name, handler };
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            tracing::debug!(command = %entry.name, "replacing previously registered handler");
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
        handler
    }
}
