//! The runtime toggle manager.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::config::StaticStates;
use crate::error::{FlagError, Result};
use crate::registry::FlagRegistry;
use crate::resolver::StateResolver;

type StateMap = FxHashMap<Box<str>, bool>;

/// Builds a [`ToggleManager`], running the first resolver pass.
pub struct ToggleManagerBuilder {
	registry: FlagRegistry,
	statics: StaticStates,
	licensed: bool,
}

impl ToggleManagerBuilder {
	/// Supplies the static configuration layer.
	pub fn with_static(mut self, statics: StaticStates) -> Self {
		self.statics = statics;
		self
	}

	/// Marks the process as licensed so `enterprise` flags resolve through
	/// the normal chain instead of being forced off.
	pub fn licensed(mut self, licensed: bool) -> Self {
		self.licensed = licensed;
		self
	}

	pub fn build(self) -> ToggleManager {
		let states = StateResolver::new()
			.with_static(&self.statics)
			.licensed(self.licensed)
			.resolve_all(&self.registry);
		ToggleManager {
			registry: self.registry,
			statics: self.statics,
			licensed: self.licensed,
			overrides: Mutex::new(FxHashMap::default()),
			states: ArcSwap::from_pointee(states),
		}
	}
}

/// The process-wide query facade for feature flags.
///
/// Owns the registry and the effective state map; no other component reads
/// or writes either directly. Construct one explicitly and hand it (behind
/// an [`Arc`]) to the components that need flag checks.
///
/// # Concurrency
///
/// [`is_enabled`] is a lock-free load of the current state map and never
/// blocks on other reads. [`set_override`] and [`clear_override`] serialize
/// on a writer mutex, recompute the map, and atomically republish it, so a
/// concurrent reader observes either the old or the new map and overrides
/// to the same flag apply last-writer-wins with no lost updates.
///
/// [`is_enabled`]: ToggleManager::is_enabled
/// [`set_override`]: ToggleManager::set_override
/// [`clear_override`]: ToggleManager::clear_override
pub struct ToggleManager {
	registry: FlagRegistry,
	statics: StaticStates,
	licensed: bool,
	/// Writer-side source of truth for runtime overrides. The effective
	/// state map is recomputed from scratch under this lock on every
	/// mutation, which keeps publication order identical to override order.
	overrides: Mutex<StateMap>,
	states: ArcSwap<StateMap>,
}

impl ToggleManager {
	pub fn builder(registry: FlagRegistry) -> ToggleManagerBuilder {
		ToggleManagerBuilder {
			registry,
			statics: StaticStates::new(),
			licensed: false,
		}
	}

	/// The current effective state for `name`.
	///
	/// Querying a name absent from the registry is a bug in the caller (a
	/// typo, or a flag removed from the manifest while a call site
	/// survived). In debug builds this panics via `debug_assert!`; in
	/// release builds it logs at error level and returns `false`. Use
	/// [`try_is_enabled`] to handle the condition explicitly.
	///
	/// [`try_is_enabled`]: ToggleManager::try_is_enabled
	#[inline]
	pub fn is_enabled(&self, name: &str) -> bool {
		match self.states.load().get(name) {
			Some(&value) => value,
			None => {
				tracing::error!(flag = name, "unknown flag queried, returning false");
				debug_assert!(false, "unknown flag queried: '{name}'");
				false
			}
		}
	}

	/// Like [`is_enabled`](ToggleManager::is_enabled), but surfaces an
	/// unregistered name as [`FlagError::UnknownFlag`].
	pub fn try_is_enabled(&self, name: &str) -> Result<bool> {
		self.states
			.load()
			.get(name)
			.copied()
			.ok_or_else(|| FlagError::UnknownFlag(name.to_string()))
	}

	/// Applies a runtime override for `name`.
	///
	/// Fails with [`FlagError::UnknownFlag`] if the name is not registered
	/// and [`FlagError::FlagLocked`] if the flag's stage forbids runtime
	/// overrides; in both cases the effective state is untouched. An
	/// override against an unlicensed `enterprise` flag is accepted but
	/// discarded by the resolver as a logged no-op, so the flag stays off.
	pub fn set_override(&self, name: &str, value: bool) -> Result<()> {
		let def = self
			.registry
			.lookup(name)
			.ok_or_else(|| FlagError::UnknownFlag(name.to_string()))?;
		if !def.stage.allows_override() {
			return Err(FlagError::FlagLocked {
				name: name.to_string(),
				stage: def.stage,
			});
		}

		let mut overrides = self.overrides.lock();
		overrides.insert(def.name.clone(), value);
		self.republish(&overrides);
		tracing::debug!(flag = name, value, "runtime override applied");
		Ok(())
	}

	/// Removes a runtime override so `name` falls back to configuration or
	/// its default.
	///
	/// Fails with [`FlagError::UnknownFlag`] for an unregistered name; a
	/// flag with no override in place is an accepted no-op.
	pub fn clear_override(&self, name: &str) -> Result<()> {
		if !self.registry.contains(name) {
			return Err(FlagError::UnknownFlag(name.to_string()));
		}

		let mut overrides = self.overrides.lock();
		if overrides.remove(name).is_some() {
			self.republish(&overrides);
			tracing::debug!(flag = name, "runtime override cleared");
		}
		Ok(())
	}

	/// A point-in-time, independently owned copy of the effective state
	/// map, sorted by name for stable diffing.
	pub fn snapshot(&self) -> BTreeMap<Box<str>, bool> {
		self.states
			.load()
			.iter()
			.map(|(name, &value)| (name.clone(), value))
			.collect()
	}

	/// The flag catalog, for administrative enumeration.
	pub fn registry(&self) -> &FlagRegistry {
		&self.registry
	}

	/// Recomputes the effective state map and swaps it in. Caller holds the
	/// override lock, so publication order matches override order.
	fn republish(&self, overrides: &StateMap) {
		let states = StateResolver::new()
			.with_overrides(overrides)
			.with_static(&self.statics)
			.licensed(self.licensed)
			.resolve_all(&self.registry);
		self.states.store(Arc::new(states));
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::def::{FlagDef, Stage};

	fn manager() -> ToggleManager {
		let registry = FlagRegistry::from_defs([
			FlagDef::new("caching", Stage::Stable).description("Caching"),
			FlagDef::new("teamsync", Stage::Stable).default_enabled(true),
			FlagDef::new("legacyFeature", Stage::Deprecated).default_enabled(true),
			FlagDef::new("enterprise.plugins", Stage::Stable)
				.default_enabled(true)
				.enterprise(true),
		])
		.unwrap();
		ToggleManager::builder(registry).build()
	}

	#[test]
	fn defaults_apply_without_config_or_overrides() {
		let m = manager();
		assert!(!m.is_enabled("caching"));
		assert!(m.is_enabled("teamsync"));
		assert!(m.is_enabled("legacyFeature"));
	}

	#[test]
	fn static_config_seeds_initial_state() {
		let registry =
			FlagRegistry::from_defs([FlagDef::new("caching", Stage::Stable)]).unwrap();
		let m = ToggleManager::builder(registry)
			.with_static(StaticStates::from_enabled(["caching"]))
			.build();
		assert!(m.is_enabled("caching"));
	}

	#[test]
	fn override_round_trip() {
		let m = manager();
		assert!(!m.is_enabled("caching"));

		m.set_override("caching", true).unwrap();
		assert!(m.is_enabled("caching"));

		let snapshot = m.snapshot();
		assert_eq!(snapshot.get("caching"), Some(&true));
		assert_eq!(snapshot.get("teamsync"), Some(&true));

		m.set_override("caching", false).unwrap();
		assert!(!m.is_enabled("caching"));
	}

	#[test]
	fn clear_override_restores_lower_layers() {
		let registry =
			FlagRegistry::from_defs([FlagDef::new("caching", Stage::Stable)]).unwrap();
		let m = ToggleManager::builder(registry)
			.with_static(StaticStates::from_pairs([("caching", true)]))
			.build();

		m.set_override("caching", false).unwrap();
		assert!(!m.is_enabled("caching"));

		m.clear_override("caching").unwrap();
		assert!(m.is_enabled("caching"));

		// Clearing again is an accepted no-op.
		m.clear_override("caching").unwrap();
		assert!(m.is_enabled("caching"));
	}

	#[test]
	fn locked_flag_rejects_override_and_keeps_state() {
		let m = manager();
		let err = m.set_override("legacyFeature", false).unwrap_err();
		assert_eq!(
			err,
			FlagError::FlagLocked {
				name: "legacyFeature".into(),
				stage: Stage::Deprecated,
			}
		);
		assert!(m.is_enabled("legacyFeature"));
	}

	#[test]
	fn unknown_flag_is_surfaced() {
		let m = manager();
		assert_eq!(
			m.try_is_enabled("cachng"),
			Err(FlagError::UnknownFlag("cachng".into()))
		);
		assert_eq!(
			m.set_override("cachng", true),
			Err(FlagError::UnknownFlag("cachng".into()))
		);
		assert_eq!(
			m.clear_override("cachng"),
			Err(FlagError::UnknownFlag("cachng".into()))
		);
	}

	#[test]
	#[cfg(debug_assertions)]
	#[should_panic(expected = "unknown flag queried")]
	fn unknown_flag_read_panics_in_debug_builds() {
		manager().is_enabled("cachng");
	}

	#[test]
	fn unlicensed_enterprise_flag_stays_off() {
		let m = manager();
		assert!(!m.is_enabled("enterprise.plugins"));

		// Accepted, but discarded by the license gate.
		m.set_override("enterprise.plugins", true).unwrap();
		assert!(!m.is_enabled("enterprise.plugins"));
	}

	#[test]
	fn licensed_enterprise_flag_resolves_normally() {
		let registry = FlagRegistry::from_defs([
			FlagDef::new("enterprise.plugins", Stage::Stable)
				.default_enabled(true)
				.enterprise(true),
		])
		.unwrap();
		let m = ToggleManager::builder(registry).licensed(true).build();
		assert!(m.is_enabled("enterprise.plugins"));

		m.set_override("enterprise.plugins", false).unwrap();
		assert!(!m.is_enabled("enterprise.plugins"));
	}

	#[test]
	fn snapshot_is_complete_and_detached() {
		let m = manager();
		let before = m.snapshot();
		assert_eq!(before.len(), m.registry().len());

		m.set_override("caching", true).unwrap();

		// The copy taken earlier is unaffected by later overrides.
		assert_eq!(before.get("caching"), Some(&false));
		assert_eq!(m.snapshot().get("caching"), Some(&true));
	}

	#[test]
	fn concurrent_readers_never_observe_a_partial_map() {
		use std::thread;

		let m = std::sync::Arc::new(manager());
		let flag_count = m.registry().len();

		let mut handles = Vec::new();
		for _ in 0..4 {
			let m = m.clone();
			handles.push(thread::spawn(move || {
				for i in 0..5_000 {
					// Reads must complete without blocking on the writer and
					// must always see a fully populated map.
					let _ = m.is_enabled("caching");
					if i % 512 == 0 {
						assert_eq!(m.snapshot().len(), flag_count);
					}
				}
			}));
		}

		let writer = {
			let m = m.clone();
			thread::spawn(move || {
				for i in 0..1_000 {
					m.set_override("caching", i % 2 == 0).unwrap();
				}
			})
		};

		for handle in handles {
			handle.join().unwrap();
		}
		writer.join().unwrap();

		// 999 is the last write, so the override chain ends disabled.
		assert!(!m.is_enabled("caching"));
	}
}
