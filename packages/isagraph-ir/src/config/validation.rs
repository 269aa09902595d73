//! Configuration validation
//!
//! Code that accepts a configuration depends on `Validatable`, not on the
//! concrete section types.

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use isagraph_ir::config::Validatable;
///
/// fn build<C: Validatable>(config: C) -> Result<(), ConfigError> {
///     config.validate()?;
///     Ok(())
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Section name for error messages
    fn config_name(&self) -> &'static str {
        "config"
    }
}
