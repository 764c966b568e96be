//! Layered state resolution.
//!
//! The [`StateResolver`] computes the effective boolean for a flag by
//! walking an ordered chain of sources and taking the first one that
//! provides a value.
//!
//! # Resolution order
//!
//! 1. License gate: an `enterprise` flag in an unlicensed process is
//!    always off, whatever configuration or overrides say.
//! 2. Runtime override (set via [`ToggleManager::set_override`]), unless
//!    the flag's stage forbids overriding.
//! 3. Static configuration supplied at process start.
//! 4. `default_enabled` from the descriptor.
//!
//! Each source contributes a complete boolean or nothing; this is a strict
//! override chain, not a merge. An override discarded by the license gate
//! or by a locked stage is reported as a no-op via `tracing::warn!` rather
//! than applied, so a non-overridable flag can never be destabilized
//! silently.
//!
//! [`ToggleManager::set_override`]: crate::ToggleManager::set_override

use rustc_hash::FxHashMap;

use crate::config::StaticStates;
use crate::def::FlagDef;
use crate::registry::FlagRegistry;


/// Resolves effective flag states through a layered hierarchy.
///
/// The resolver is stateless and borrows its sources; it is created per
/// resolution pass. Resolution is idempotent: identical inputs always
/// produce an identical state map.
#[derive(Default)]
pub struct StateResolver<'a> {
	overrides: Option<&'a FxHashMap<Box<str>, bool>>,
	statics: Option<&'a StaticStates>,
	licensed: bool,
}

impl<'a> StateResolver<'a> {
	/// Creates a resolver with no sources configured and no license.
	///
	/// Until sources are added, every non-enterprise flag resolves to its
	/// `default_enabled` and every enterprise flag to `false`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds the runtime override layer.
	pub fn with_overrides(mut self, overrides: &'a FxHashMap<Box<str>, bool>) -> Self {
		self.overrides = Some(overrides);
		self
	}

	/// Adds the static configuration layer.
	pub fn with_static(mut self, statics: &'a StaticStates) -> Self {
		self.statics = Some(statics);
		self
	}

	/// Marks the process as licensed, letting `enterprise` flags resolve
	/// through the normal chain.
	pub fn licensed(mut self, licensed: bool) -> Self {
		self.licensed = licensed;
		self
	}

	/// Resolves the effective state for one descriptor.
	pub fn resolve(&self, def: &FlagDef) -> bool {
		let pending = self
			.overrides
			.and_then(|overrides| overrides.get(&*def.name).copied());

		if def.enterprise && !self.licensed {
			if pending.is_some() {
				tracing::warn!(
					flag = &*def.name,
					"override ignored: flag requires a licensed build"
				);
			}
			return false;
		}

		if let Some(value) = pending {
			if def.stage.allows_override() {
				return value;
			}
			tracing::warn!(
				flag = &*def.name,
				stage = %def.stage,
				"override ignored: stage does not permit runtime overrides"
			);
		}

		if let Some(statics) = self.statics
			&& let Some(value) = statics.get(&def.name)
		{
			return value;
		}

		def.default_enabled
	}

	/// Resolves every flag in the registry.
	///
	/// The returned map contains exactly one entry per registered name;
	/// flags no source mentions fall back to their default.
	pub fn resolve_all(&self, registry: &FlagRegistry) -> FxHashMap<Box<str>, bool> {
		registry
			.all()
			.iter()
			.map(|def| (def.name.clone(), self.resolve(def)))
			.collect()
	}
}
