//! Generated typed accessor layer.
//!
//! For every flag in `assets/flags.toml` the build script generates a
//! zero-argument `is_*_enabled` accessor on [`FeatureToggles`], each a pure
//! forwarding call to [`ToggleManager::is_enabled`] with the flag's literal
//! name, plus [`manifest_flags`] for seeding the registry from the same
//! manifest. Because every accessor's literal matches a manifest entry, a
//! caller going through this layer can never hit the manager's unknown-name
//! path.
//!
//! This crate carries no decision logic; the manager is constructed by the
//! host and injected.
//!
//! ```
//! use std::sync::Arc;
//!
//! use pennant::{FlagRegistry, ToggleManager};
//! use pennant_toggles::{FeatureToggles, manifest_flags};
//!
//! let registry = FlagRegistry::from_defs(manifest_flags())?;
//! let manager = Arc::new(ToggleManager::builder(registry).build());
//! let toggles = FeatureToggles::new(manager);
//!
//! assert!(!toggles.is_caching_enabled());
//! # Ok::<(), pennant::FlagError>(())
//! ```
//!
//! [`ToggleManager::is_enabled`]: pennant::ToggleManager::is_enabled

use std::sync::Arc;

use pennant::ToggleManager;

/// Typed facade over an injected [`ToggleManager`].
pub struct FeatureToggles {
	manager: Arc<ToggleManager>,
}

impl FeatureToggles {
	pub fn new(manager: Arc<ToggleManager>) -> Self {
		Self { manager }
	}

	/// The underlying manager, for administrative callers.
	pub fn manager(&self) -> &ToggleManager {
		&self.manager
	}
}

include!(concat!(env!("OUT_DIR"), "/toggles_gen.rs"));
