//! Flag descriptors.

use serde::{Deserialize, Serialize};

/// Stability classification for a flag.
///
/// The stage controls whether the flag accepts runtime overrides: work in
/// progress and stable flags may be toggled by an administrator, while
/// deprecated and locked flags reject override attempts so that a flag on
/// its way out cannot be flipped back on by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
	/// Under active development; may change or disappear between releases.
	Experimental,
	/// Supported and safe to toggle.
	Stable,
	/// Scheduled for removal; runtime overrides are rejected.
	Deprecated,
	/// Pinned to its configured value; runtime overrides are rejected.
	Locked,
}

impl Stage {
	/// Whether a flag in this stage accepts runtime overrides.
	pub fn allows_override(self) -> bool {
		match self {
			Stage::Experimental | Stage::Stable => true,
			Stage::Deprecated | Stage::Locked => false,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Stage::Experimental => "experimental",
			Stage::Stable => "stable",
			Stage::Deprecated => "deprecated",
			Stage::Locked => "locked",
		}
	}
}

impl std::fmt::Display for Stage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for Stage {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"experimental" => Ok(Stage::Experimental),
			"stable" => Ok(Stage::Stable),
			"deprecated" => Ok(Stage::Deprecated),
			"locked" => Ok(Stage::Locked),
			other => Err(format!(
				"unknown stage '{other}' (expected experimental, stable, deprecated or locked)"
			)),
		}
	}
}

/// Static metadata for one flag.
///
/// The `name` is the lookup key and the external wire/config key; it is
/// immutable once the descriptor enters a [`FlagRegistry`]. Everything else
/// is either documentation (`description`, `owner`) or input to state
/// resolution (`default_enabled`, `stage`, `enterprise`).
///
/// [`FlagRegistry`]: crate::FlagRegistry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDef {
	pub name: Box<str>,
	pub description: Box<str>,
	pub default_enabled: bool,
	pub stage: Stage,
	/// Owning team or person. Documentation only.
	pub owner: Box<str>,
	/// Requires a licensed build; unlicensed processes resolve this flag to
	/// `false` regardless of configuration or overrides.
	pub enterprise: bool,
}

impl FlagDef {
	/// Creates a descriptor with the given name and stage, disabled by
	/// default, with no description or owner.
	///
	/// Name validity is checked when the descriptor is registered, not here.
	pub fn new(name: impl Into<Box<str>>, stage: Stage) -> Self {
		Self {
			name: name.into(),
			description: Box::from(""),
			default_enabled: false,
			stage,
			owner: Box::from(""),
			enterprise: false,
		}
	}

	pub fn description(mut self, description: impl Into<Box<str>>) -> Self {
		self.description = description.into();
		self
	}

	pub fn default_enabled(mut self, enabled: bool) -> Self {
		self.default_enabled = enabled;
		self
	}

	pub fn owner(mut self, owner: impl Into<Box<str>>) -> Self {
		self.owner = owner.into();
		self
	}

	pub fn enterprise(mut self, enterprise: bool) -> Self {
		self.enterprise = enterprise;
		self
	}
}

/// Checks that `name` is a usable flag identifier: non-empty, starts with an
/// alphanumeric, and contains only alphanumerics, `.`, `_` and `-`.
///
/// Returns the reason the name is rejected, or `None` if it is valid.
pub(crate) fn name_problem(name: &str) -> Option<&'static str> {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return Some("name is empty");
	};
	if !first.is_ascii_alphanumeric() {
		return Some("name must start with an alphanumeric character");
	}
	if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
		return Some("name may only contain alphanumerics, '.', '_' and '-'");
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stage_override_policy() {
		assert!(Stage::Experimental.allows_override());
		assert!(Stage::Stable.allows_override());
		assert!(!Stage::Deprecated.allows_override());
		assert!(!Stage::Locked.allows_override());
	}

	#[test]
	fn stage_round_trips_through_str() {
		for stage in [
			Stage::Experimental,
			Stage::Stable,
			Stage::Deprecated,
			Stage::Locked,
		] {
			assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
		}
		assert!("alpha".parse::<Stage>().is_err());
	}

	#[test]
	fn name_validation() {
		assert_eq!(name_problem("recordedQueries"), None);
		assert_eq!(name_problem("enterprise.plugins"), None);
		assert_eq!(name_problem("live-service-web-worker"), None);
		assert_eq!(name_problem("database_metrics"), None);
		assert!(name_problem("").is_some());
		assert!(name_problem(".hidden").is_some());
		assert!(name_problem("has space").is_some());
		assert!(name_problem("tab\tname").is_some());
	}
}
