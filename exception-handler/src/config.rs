//! Exception handling configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Settings controlling whether failures are intercepted.
///
/// Loaded from `EXCEPTION_HANDLING_*` environment variables, the
/// `--enabled` flag, or a configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXCEPTION_HANDLING")]
pub struct ExceptionHandlingSettings {
    /// Enable the interception of request-handling failures.
    #[ortho_config(default = false)]
    pub enabled: bool,
}

impl ExceptionHandlingSettings {
    /// Whether exception handling should be registered.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}
