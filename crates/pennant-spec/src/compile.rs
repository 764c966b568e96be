//! Build-time accessor generation.
//!
//! Gated behind the `compile` feature and driven from a consumer's
//! `build.rs`. Reads a flag manifest, validates it, and emits a Rust source
//! file into `OUT_DIR` containing the descriptor table and one forwarding
//! accessor per flag. Generation failures are build failures: a manifest
//! problem panics here rather than producing a registry that rejects it at
//! process start.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use heck::ToSnakeCase;

use crate::ManifestSpec;

pub struct BuildCtx {
	pub manifest_dir: PathBuf,
	pub out_dir: PathBuf,
}

impl Default for BuildCtx {
	fn default() -> Self {
		Self::new()
	}
}

impl BuildCtx {
	pub fn new() -> Self {
		let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
		let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
		Self { manifest_dir, out_dir }
	}

	pub fn asset(&self, rel: &str) -> PathBuf {
		self.manifest_dir.join(rel)
	}

	pub fn rerun_if_changed(&self, path: &Path) {
		println!("cargo:rerun-if-changed={}", path.display());
	}

	pub fn write_source(&self, filename: &str, source: &str) {
		let path = self.out_dir.join(filename);
		fs::write(&path, source)
			.unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
	}
}

/// Compiles `assets/flags.toml` into `toggles_gen.rs`.
pub fn build(ctx: &BuildCtx) {
	let path = ctx.asset("assets/flags.toml");
	ctx.rerun_if_changed(&path);

	let source = fs::read_to_string(&path)
		.unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
	let spec = ManifestSpec::from_toml(&source)
		.unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));
	spec.validate()
		.unwrap_or_else(|e| panic!("invalid flag manifest {}: {e}", path.display()));

	ctx.write_source("toggles_gen.rs", &generate(&spec));
}

/// Derives the accessor method name for a flag: `is_{snake_case}_enabled`,
/// with `.`, `-` and `_` treated as word breaks.
pub fn accessor_name(flag: &str) -> String {
	format!("is_{}_enabled", flag.to_snake_case())
}

fn stage_variant(stage: &str) -> &'static str {
	match stage {
		"experimental" => "Experimental",
		"stable" => "Stable",
		"deprecated" => "Deprecated",
		"locked" => "Locked",
		other => panic!("unknown stage '{other}' (manifest not validated?)"),
	}
}

/// Renders the generated source for a validated manifest.
pub fn generate(spec: &ManifestSpec) -> String {
	let mut accessors: HashMap<String, &str> = HashMap::new();
	for flag in &spec.flags {
		let method = accessor_name(&flag.name);
		if let Some(previous) = accessors.insert(method.clone(), flag.name.as_str()) {
			panic!("flags '{previous}' and '{}' both generate accessor '{method}'", flag.name);
		}
	}

	let mut out = String::from("// @generated by pennant-spec from assets/flags.toml. Do not edit.\n\n");

	out.push_str("/// Descriptors for every manifest flag, in manifest order.\n");
	out.push_str("pub fn manifest_flags() -> Vec<pennant::FlagDef> {\n\tvec![\n");
	for flag in &spec.flags {
		let _ = write!(
			out,
			"\t\tpennant::FlagDef::new({:?}, pennant::Stage::{})",
			flag.name,
			stage_variant(&flag.stage)
		);
		if !flag.description.is_empty() {
			let _ = write!(out, "\n\t\t\t.description({:?})", flag.description);
		}
		if flag.default {
			let _ = write!(out, "\n\t\t\t.default_enabled(true)");
		}
		if !flag.owner.is_empty() {
			let _ = write!(out, "\n\t\t\t.owner({:?})", flag.owner);
		}
		if flag.enterprise {
			let _ = write!(out, "\n\t\t\t.enterprise(true)");
		}
		out.push_str(",\n");
	}
	out.push_str("\t]\n}\n\n");

	out.push_str("impl FeatureToggles {\n");
	for (idx, flag) in spec.flags.iter().enumerate() {
		if idx > 0 {
			out.push('\n');
		}
		let _ = writeln!(out, "\t/// Checks the `{}` flag.", flag.name);
		if !flag.description.is_empty() {
			let _ = writeln!(out, "\t///\n\t/// {}", flag.description);
		}
		let _ = writeln!(out, "\tpub fn {}(&self) -> bool {{", accessor_name(&flag.name));
		let _ = writeln!(out, "\t\tself.manager.is_enabled({:?})", flag.name);
		out.push_str("\t}\n");
	}
	out.push_str("}\n");

	out
}
