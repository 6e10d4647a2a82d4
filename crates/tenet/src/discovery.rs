//! Loading controllers and schemas found by an external loader.
//!
//! Tenet never walks the filesystem or loads modules itself. A loader
//! resolves its own sources into [`Discovered`] values; the router only
//! registers and compiles what it is handed, once every source has
//! finished.

use crate::compiler::ApiRouter;
use crate::sink::RouteSink;
use futures_util::future::try_join_all;
use std::fmt;
use tenet_core::{BoxFuture, TenetError, TenetResult};
use tenet_registry::{Controller, ControllerKey, Registry};
use tenet_schema::SchemaDescriptor;
use tracing::{info, warn};

/// A controller a loader found, with the function that declares it.
#[derive(Clone, Copy)]
pub struct ControllerSource {
    name: &'static str,
    register: fn(&mut Registry) -> ControllerKey,
}

impl ControllerSource {
    /// A source declaring controller `C` through its [`Controller`] impl.
    #[must_use]
    pub fn of<C: Controller>() -> Self {
        Self {
            name: std::any::type_name::<C>(),
            register: Registry::register_controller::<C>,
        }
    }

    /// A source with an explicit declaration function.
    #[must_use]
    pub const fn new(name: &'static str, register: fn(&mut Registry) -> ControllerKey) -> Self {
        Self { name, register }
    }

    /// Name the controller was found under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declares the controller in `registry`.
    pub fn register(&self, registry: &mut Registry) -> ControllerKey {
        (self.register)(registry)
    }
}

impl fmt::Debug for ControllerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One value produced by a loader.
#[derive(Debug, Clone)]
pub enum Discovered {
    /// A schema to file as a shared definition.
    Schema(SchemaDescriptor),
    /// A route-bearing controller.
    Controller(ControllerSource),
    /// Something that is neither, e.g. a module without the expected export.
    Unrecognized {
        /// Where it was found.
        source: String,
    },
}

/// An asynchronous source of discovered values.
pub trait DiscoverySource: Send + Sync {
    /// Resolves every value this source provides.
    fn discover(&self) -> BoxFuture<'_, TenetResult<Vec<Discovered>>>;
}

/// A source that already holds its values.
impl DiscoverySource for Vec<Discovered> {
    fn discover(&self) -> BoxFuture<'_, TenetResult<Vec<Discovered>>> {
        let items = self.clone();
        Box::pin(async move { Ok(items) })
    }
}

impl<S: RouteSink> ApiRouter<S> {
    /// Waits for every source, then loads what they found.
    ///
    /// Nothing is registered or compiled until all sources have resolved.
    ///
    /// # Errors
    ///
    /// Fails if any source fails, or as [`load_discovered`](Self::load_discovered).
    pub async fn discover(
        &mut self,
        registry: &mut Registry,
        sources: &[&dyn DiscoverySource],
    ) -> TenetResult<()> {
        let found = try_join_all(sources.iter().map(|source| source.discover())).await?;
        self.load_discovered(registry, found.into_iter().flatten())
    }

    /// Registers and compiles discovered values in order.
    ///
    /// Schemas become definitions, controllers are declared and compiled,
    /// anything unrecognized is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns a declaration error for a schema without an id or a
    /// controller that fails to compile.
    pub fn load_discovered<I>(&mut self, registry: &mut Registry, items: I) -> TenetResult<()>
    where
        I: IntoIterator<Item = Discovered>,
    {
        for item in items {
            match item {
                Discovered::Schema(schema) => {
                    registry
                        .register_definition(&schema)
                        .map_err(|e| TenetError::declaration(e.to_string()))?;
                    self.add_definition(&schema)?;
                }
                Discovered::Controller(source) => {
                    let key = source.register(registry);
                    info!(controller = key.name(), "controller added");
                    self.load_controller(registry, key)?;
                }
                Discovered::Unrecognized { source } => {
                    warn!(source = %source, "no controller or schema exported; skipping");
                }
            }
        }
        Ok(())
    }
}
