use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use cereal_testkit::target_dir;

static CEREAL_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn run_cereal(args: &[&str]) -> Output {
	Command::new(cereal_bin()).args(args).output().expect("cereal command executes")
}

pub(crate) fn run_cereal_stdout(args: &[&str]) -> String {
	let output = run_cereal(args);
	assert!(
		output.status.success(),
		"cereal command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

pub(crate) fn run_cereal_json(args: &[&str]) -> serde_json::Value {
	let stdout = run_cereal_stdout(args);
	serde_json::from_str(&stdout).expect("stdout should be valid json")
}

fn cereal_bin() -> &'static PathBuf {
	CEREAL_BIN.get_or_init(resolve_cereal_bin)
}

fn resolve_cereal_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_cereal") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let mut bin = target_dir().join("debug");
	bin.push(if cfg!(windows) { "cereal.exe" } else { "cereal" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "cereal"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build cereal binary at {}", bin.display());

	bin
}
