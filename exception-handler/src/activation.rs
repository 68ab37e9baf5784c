//! Opt-in registration of the exception handling dispatcher.
//!
//! Hosts build one [`HandlerRegistry`] at startup, call [`configure`] with
//! their settings, and wrap every `App` with [`HandlerRegistry::middleware`].
//! At most one dispatcher is ever registered; a dispatcher the host supplies
//! itself is never replaced.

use std::sync::Arc;

use tracing::info;

use crate::config::ExceptionHandlingSettings;
use crate::dispatch::{Dispatcher, FailureDispatcher};
use crate::middleware::ExceptionHandling;

/// Outcome of [`configure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Registration {
    /// Exception handling is disabled; nothing was registered.
    Disabled,
    /// The default dispatcher was registered.
    Registered,
    /// A dispatcher was already present and was kept.
    AlreadyPresent,
}

/// Holder for the single active dispatcher.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    dispatcher: Option<Arc<dyn FailureDispatcher>>,
}

impl HandlerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with a host-supplied dispatcher.
    #[must_use]
    pub fn with_dispatcher(dispatcher: Arc<dyn FailureDispatcher>) -> Self {
        Self {
            dispatcher: Some(dispatcher),
        }
    }

    /// Register `dispatcher` unless one is already present.
    ///
    /// Returns `false` when an existing dispatcher was kept.
    pub fn register_if_absent(&mut self, dispatcher: Arc<dyn FailureDispatcher>) -> bool {
        if self.dispatcher.is_some() {
            return false;
        }
        self.dispatcher = Some(dispatcher);
        true
    }

    /// The registered dispatcher, if any.
    #[must_use]
    pub fn dispatcher(&self) -> Option<&Arc<dyn FailureDispatcher>> {
        self.dispatcher.as_ref()
    }

    /// Middleware to wrap around an `App`; inert when nothing is registered.
    #[must_use]
    pub fn middleware(&self) -> ExceptionHandling {
        self.dispatcher
            .clone()
            .map_or_else(ExceptionHandling::inert, ExceptionHandling::new)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("registered", &self.dispatcher.is_some())
            .finish()
    }
}

/// Register the default dispatcher when `settings` enable it.
///
/// # Examples
/// ```
/// use exception_handler::{ExceptionHandlingSettings, HandlerRegistry, Registration, configure};
///
/// let mut registry = HandlerRegistry::new();
/// let outcome = configure(&ExceptionHandlingSettings { enabled: false }, &mut registry);
/// assert_eq!(outcome, Registration::Disabled);
/// assert!(registry.dispatcher().is_none());
/// ```
pub fn configure(
    settings: &ExceptionHandlingSettings,
    registry: &mut HandlerRegistry,
) -> Registration {
    configure_with(settings, registry, Dispatcher::default)
}

/// Like [`configure`], building the dispatcher with `make` only when it will
/// actually be registered.
pub fn configure_with<F>(
    settings: &ExceptionHandlingSettings,
    registry: &mut HandlerRegistry,
    make: F,
) -> Registration
where
    F: FnOnce() -> Dispatcher,
{
    if !settings.is_enabled() {
        return Registration::Disabled;
    }
    if registry.dispatcher().is_some() {
        info!("exception handling dispatcher already present; keeping it");
        return Registration::AlreadyPresent;
    }
    let dispatcher: Arc<dyn FailureDispatcher> = Arc::new(make());
    registry.register_if_absent(dispatcher);
    info!("exception handling registered");
    Registration::Registered
}
