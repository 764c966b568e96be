//! Runtime feature-toggle registry.
//!
//! Named boolean capabilities ("flags") are declared once at process start,
//! resolved through a layered chain of sources, and queried at high frequency
//! through a thread-safe [`ToggleManager`].
//!
//! # Components
//!
//! - [`FlagDef`] - static metadata for one flag
//! - [`FlagRegistry`] - the immutable catalog of known flags, built at startup
//! - [`StateResolver`] - merges override, license, config and default sources
//!   into a single effective boolean per flag
//! - [`ToggleManager`] - the runtime facade: lock-free [`is_enabled`] reads,
//!   serialized [`set_override`] writes, point-in-time [`snapshot`]s
//! - [`StaticStates`] - the startup configuration layer (name to bool)
//!
//! [`is_enabled`]: ToggleManager::is_enabled
//! [`set_override`]: ToggleManager::set_override
//! [`snapshot`]: ToggleManager::snapshot
//!
//! # Phases
//!
//! Registration and runtime querying are distinct phases with different
//! concurrency contracts: the registry is populated and the first resolver
//! pass runs before the manager is shared with application code. After that
//! the registry never changes; only runtime overrides do.
//!
//! ```
//! use pennant::{FlagDef, FlagRegistry, Stage, StaticStates, ToggleManager};
//!
//! let registry = FlagRegistry::from_defs([
//! 	FlagDef::new("caching", Stage::Stable).description("Query caching"),
//! ])?;
//! let manager = ToggleManager::builder(registry)
//! 	.with_static(StaticStates::from_enabled(["caching"]))
//! 	.build();
//!
//! assert!(manager.is_enabled("caching"));
//! # Ok::<(), pennant::FlagError>(())
//! ```

pub mod config;
pub mod def;
pub mod error;
pub mod manager;
pub mod registry;
mod resolver;

pub use config::StaticStates;
pub use def::{FlagDef, Stage};
pub use error::{FlagError, Result};
pub use manager::{ToggleManager, ToggleManagerBuilder};
pub use registry::FlagRegistry;
pub use resolver::StateResolver;
