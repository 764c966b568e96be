//! Startup configuration layer.

use indexmap::IndexMap;

/// The static configuration source: a name-to-bool mapping consumed once at
/// process start to seed the layer between runtime overrides and built-in
/// defaults.
///
/// How the values were transported (config file, environment, embedded
/// table) is the caller's concern; the resolver only consumes the mapping.
/// Insertion order is preserved so administrative displays can mirror the
/// configuration source.
#[derive(Debug, Clone, Default)]
pub struct StaticStates {
	values: IndexMap<Box<str>, bool>,
}

impl StaticStates {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds the layer from explicit `(name, enabled)` pairs.
	///
	/// A name appearing twice keeps the last value, matching how repeated
	/// keys behave in flat config sources.
	pub fn from_pairs<I, N>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (N, bool)>,
		N: Into<Box<str>>,
	{
		Self {
			values: pairs.into_iter().map(|(n, v)| (n.into(), v)).collect(),
		}
	}

	/// Builds the layer from a bare list of flag names to force on, the
	/// `enable = flagA flagB` configuration form.
	pub fn from_enabled<I, N>(names: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<Box<str>>,
	{
		Self {
			values: names.into_iter().map(|n| (n.into(), true)).collect(),
		}
	}

	pub fn set(&mut self, name: impl Into<Box<str>>, enabled: bool) {
		self.values.insert(name.into(), enabled);
	}

	/// The configured value for `name`, if any.
	#[inline]
	pub fn get(&self, name: &str) -> Option<bool> {
		self.values.get(name).copied()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Configured entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
		self.values.iter().map(|(n, &v)| (&**n, v))
	}
}
