//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::io::Write;

use package_graph::{PackageDescriptor, PackageGraph};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
}

/// A package with a `*` range on each of `dependencies`.
pub fn package(name: &str, dependencies: &[&str]) -> PackageDescriptor {
	dependencies.iter().fold(PackageDescriptor::new(name), |p, d| p.with_dependency(*d, "*"))
}

/// A package with a `*` range on each of `peer_dependencies`.
pub fn peer_package(name: &str, peer_dependencies: &[&str]) -> PackageDescriptor {
	peer_dependencies.iter().fold(PackageDescriptor::new(name), |p, d| p.with_peer_dependency(*d, "*"))
}

pub fn names(packages: &[PackageDescriptor]) -> Vec<&str> {
	packages.iter().map(|p| p.name.as_str()).collect()
}

pub fn batch_names(batches: &[Vec<PackageDescriptor>]) -> Vec<Vec<&str>> {
	batches.iter().map(|b| names(b)).collect()
}

/// Reads a JSON array of descriptors from the `test-data` directory of the calling crate.
/// # Parameters
/// - `manifest_dir` - usually `env!("CARGO_MANIFEST_DIR")`
pub fn load_fixture(manifest_dir: &str, name: &str) -> Result<Vec<PackageDescriptor>, FixtureError> {
	let path = std::path::Path::new(manifest_dir).join("test-data").join(name);
	let data = std::fs::read_to_string(path)?;
	Ok(serde_json::from_str(&data)?)
}

pub fn fixture_graph(manifest_dir: &str, name: &str) -> Result<PackageGraph, FixtureError> {
	Ok(PackageGraph::from_packages(load_fixture(manifest_dir, name)?))
}

/// Writes one `<name>.json` manifest per package into a new temporary directory.
///
/// Returned paths follow the order of `packages`.
pub fn write_manifests(packages: &[PackageDescriptor]) -> Result<(tempfile::TempDir, Vec<std::path::PathBuf>), FixtureError> {
	let dir = tempfile::tempdir()?;
	let mut paths = Vec::with_capacity(packages.len());
	for package in packages {
		let path = dir.path().join(format!("{}.json", package.name));
		let mut f = std::fs::File::create(&path)?;
		f.write_all(serde_json::to_string_pretty(package)?.as_bytes())?;
		paths.push(path);
	}
	Ok((dir, paths))
}
