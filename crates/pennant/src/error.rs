//! Error types for flag registration and runtime toggling.

use thiserror::Error;

use crate::def::Stage;

/// Errors produced by the registry and toggle manager.
///
/// The first two variants are startup-phase errors: a registry built from an
/// inconsistent manifest must not serve traffic, so construction fails fast.
/// The other two are runtime-phase conditions returned to the immediate
/// caller; they never take down the serving path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlagError {
	/// A descriptor with a malformed name was registered.
	#[error("invalid flag descriptor '{name}': {reason}")]
	InvalidDescriptor {
		/// The offending name as supplied.
		name: String,
		/// Why the descriptor was rejected.
		reason: &'static str,
	},

	/// Two descriptors with the same name were registered.
	#[error("duplicate flag definition: '{0}'")]
	DuplicateFlag(String),

	/// A query or override named a flag absent from the registry.
	#[error("unknown flag: '{0}'")]
	UnknownFlag(String),

	/// An override was attempted against a non-overridable stage.
	#[error("flag '{name}' is {stage} and cannot be overridden at runtime")]
	FlagLocked {
		/// The flag that rejected the override.
		name: String,
		/// The stage that forbids overriding.
		stage: Stage,
	},
}

/// Result type for flag operations.
pub type Result<T> = std::result::Result<T, FlagError>;
