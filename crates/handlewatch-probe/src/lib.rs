//! handlewatch-probe: Platform probe modules.
//!
//! Each module answers one question for one platform: is this handle taken,
//! free, or suspended? Modules share the [`ProbeModule`] trait so the scan
//! coordinator can fan them out without knowing which platforms exist.

pub mod context;
pub mod error;
pub mod http;
pub mod module;
pub mod modules;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_server;

pub use context::{deadline_after, ProbeContext};
pub use error::ProbeError;
pub use module::ProbeModule;
pub use registry::{build_modules, ProbeSettings, MODULE_NAMES};
