//! Flag manifest specification schema.
//!
//! Defines the declarative manifest consumed by the accessor generator and
//! by registry seeding. A manifest is a TOML document with one `[[flags]]`
//! table per flag:
//!
//! ```toml
//! [[flags]]
//! name = "recordedQueries"
//! description = "Supports saving queries that can be scraped by prometheus"
//! stage = "stable"
//! ```
//!
//! Validation is fail-fast: a manifest with a malformed name, an unknown
//! stage, or a duplicate entry is rejected before any code is generated or
//! any registry is seeded.

#[cfg(feature = "compile")]
pub mod compile;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stages a manifest flag may declare.
pub const VALID_STAGES: &[&str] = &["experimental", "stable", "deprecated", "locked"];

/// One flag entry in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagSpec {
	/// Unique identifier; the lookup and wire/config key.
	pub name: String,
	#[serde(default)]
	pub description: String,
	/// Baseline state when no configuration or override applies.
	#[serde(default)]
	pub default: bool,
	/// One of [`VALID_STAGES`].
	pub stage: String,
	#[serde(default)]
	pub owner: String,
	/// Requires a licensed build.
	#[serde(default)]
	pub enterprise: bool,
}

/// A full flag manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSpec {
	#[serde(default)]
	pub flags: Vec<FlagSpec>,
}

/// Manifest rejection reasons.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestError {
	#[error("flag '{name}': {reason}")]
	InvalidName { name: String, reason: &'static str },

	#[error("flag '{name}': unknown stage '{stage}' (expected one of {VALID_STAGES:?})")]
	UnknownStage { name: String, stage: String },

	#[error("duplicate flag name: '{0}'")]
	DuplicateName(String),
}

impl ManifestSpec {
	/// Parses a manifest from TOML source. Parsing does not validate; call
	/// [`validate`](ManifestSpec::validate) before consuming the result.
	pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(source)
	}

	/// Checks every entry for a usable name, a known stage, and uniqueness.
	pub fn validate(&self) -> Result<(), ManifestError> {
		let mut seen = std::collections::HashSet::new();
		for flag in &self.flags {
			if let Some(reason) = name_problem(&flag.name) {
				return Err(ManifestError::InvalidName {
					name: flag.name.clone(),
					reason,
				});
			}
			if !VALID_STAGES.contains(&flag.stage.as_str()) {
				return Err(ManifestError::UnknownStage {
					name: flag.name.clone(),
					stage: flag.stage.clone(),
				});
			}
			if !seen.insert(flag.name.as_str()) {
				return Err(ManifestError::DuplicateName(flag.name.clone()));
			}
		}
		Ok(())
	}
}

/// Flag name rule: non-empty, leading alphanumeric, then alphanumerics,
/// `.`, `_` and `-`. Matches the runtime registry's rule so a manifest
/// that compiles also registers.
fn name_problem(name: &str) -> Option<&'static str> {
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
