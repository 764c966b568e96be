//! The immutable flag catalog.

use rustc_hash::FxHashMap;

use crate::def::{FlagDef, name_problem};
use crate::error::{FlagError, Result};

/// Incremental registry construction.
///
/// A rejected descriptor leaves everything previously registered intact, so
/// a caller that chooses to continue past a [`FlagError::DuplicateFlag`]
/// keeps the first definition. [`FlagRegistry::from_defs`] is the common
/// path and stops at the first error instead.
#[derive(Default)]
pub struct FlagRegistryBuilder {
	defs: Vec<FlagDef>,
	by_name: FxHashMap<Box<str>, usize>,
}

impl FlagRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a descriptor.
	///
	/// Fails with [`FlagError::InvalidDescriptor`] for a malformed name and
	/// [`FlagError::DuplicateFlag`] when the name is already registered; in
	/// the duplicate case the first definition is retained.
	pub fn register(&mut self, def: FlagDef) -> Result<()> {
		if let Some(reason) = name_problem(&def.name) {
			return Err(FlagError::InvalidDescriptor {
				name: def.name.into_string(),
				reason,
			});
		}
		if self.by_name.contains_key(&def.name) {
			return Err(FlagError::DuplicateFlag(def.name.into_string()));
		}
		self.by_name.insert(def.name.clone(), self.defs.len());
		self.defs.push(def);
		Ok(())
	}

	/// Finalizes the registry, fixing the enumeration order.
	pub fn build(mut self) -> FlagRegistry {
		self.defs.sort_by(|a, b| a.name.cmp(&b.name));
		self.by_name.clear();
		for (idx, def) in self.defs.iter().enumerate() {
			self.by_name.insert(def.name.clone(), idx);
		}
		FlagRegistry {
			defs: self.defs,
			by_name: self.by_name,
		}
	}
}

/// The set of known flag descriptors, built once at startup.
///
/// Construction validates every descriptor and fails fast on the first
/// malformed or duplicate name. After construction the registry is
/// read-only; lookups never mutate and absence is signaled through `None`
/// rather than an error, since exploratory absence checks are legitimate.
/// The [`ToggleManager`] is the component that treats absence as a caller
/// bug.
///
/// [`ToggleManager`]: crate::ToggleManager
#[derive(Debug)]
pub struct FlagRegistry {
	/// Descriptors sorted by name. Enumeration order is deterministic so
	/// administrative listings and snapshot diffs are stable.
	defs: Vec<FlagDef>,
	by_name: FxHashMap<Box<str>, usize>,
}

impl FlagRegistry {
	/// Builds a registry from a sequence of descriptors, stopping at the
	/// first invalid or duplicate one.
	pub fn from_defs<I>(defs: I) -> Result<Self>
	where
		I: IntoIterator<Item = FlagDef>,
	{
		let mut builder = FlagRegistryBuilder::new();
		for def in defs {
			builder.register(def)?;
		}
		Ok(builder.build())
	}

	pub fn builder() -> FlagRegistryBuilder {
		FlagRegistryBuilder::new()
	}

	/// Looks up a descriptor by name.
	#[inline]
	pub fn lookup(&self, name: &str) -> Option<&FlagDef> {
		self.by_name.get(name).map(|&idx| &self.defs[idx])
	}

	#[inline]
	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// All descriptors, sorted by name.
	pub fn all(&self) -> &[FlagDef] {
		&self.defs
	}

	pub fn len(&self) -> usize {
		self.defs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::def::Stage;

	#[test]
	fn lookup_and_sorted_enumeration() {
		let registry = FlagRegistry::from_defs([
			FlagDef::new("teamsync", Stage::Stable),
			FlagDef::new("caching", Stage::Stable),
			FlagDef::new("ldapsync", Stage::Experimental),
		])
		.unwrap();

		assert_eq!(registry.len(), 3);
		assert!(registry.lookup("caching").is_some());
		assert!(registry.lookup("missing").is_none());

		let names: Vec<&str> = registry.all().iter().map(|d| &*d.name).collect();
		assert_eq!(names, ["caching", "ldapsync", "teamsync"]);
	}

	#[test]
	fn duplicate_name_is_an_error() {
		let err = FlagRegistry::from_defs([
			FlagDef::new("caching", Stage::Stable).default_enabled(true),
			FlagDef::new("caching", Stage::Experimental),
		])
		.unwrap_err();
		assert_eq!(err, FlagError::DuplicateFlag("caching".into()));
	}

	#[test]
	fn duplicate_keeps_first_definition() {
		let mut builder = FlagRegistry::builder();
		builder
			.register(FlagDef::new("caching", Stage::Stable).default_enabled(true))
			.unwrap();
		let err = builder
			.register(FlagDef::new("caching", Stage::Experimental))
			.unwrap_err();
		assert_eq!(err, FlagError::DuplicateFlag("caching".into()));

		let registry = builder.build();
		let def = registry.lookup("caching").unwrap();
		assert_eq!(def.stage, Stage::Stable);
		assert!(def.default_enabled);
	}

	#[test]
	fn invalid_names_are_rejected() {
		for bad in ["", " caching", "-lead", "a b"] {
			let err = FlagRegistry::from_defs([FlagDef::new(bad, Stage::Stable)]).unwrap_err();
			assert!(
				matches!(err, FlagError::InvalidDescriptor { .. }),
				"expected InvalidDescriptor for {bad:?}, got {err:?}"
			);
		}
	}

	#[test]
	fn registry_is_debug_printable() {
		// Construction results are routinely unwrapped in tests and startup
		// code, which needs the registry itself to format.
		let registry = FlagRegistry::from_defs([FlagDef::new("caching", Stage::Stable)]).unwrap();
		let rendered = format!("{registry:?}");
		assert!(rendered.contains("caching"), "got {rendered}");
	}

	#[test]
	fn empty_registry_is_allowed() {
		let registry = FlagRegistry::from_defs([]).unwrap();
		assert!(registry.is_empty());
		assert!(!registry.contains("anything"));
	}
}
