//! Package descriptors as supplied by manifest readers.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};

/// A named package and the names it depends on.
///
/// Version ranges are kept as given and never interpreted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub dependencies: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub peer_dependencies: BTreeMap<String, String>,
}

impl PackageDescriptor {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn with_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
		self.dependencies.insert(name.into(), range.into());
		self
	}

	pub fn with_peer_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
		self.peer_dependencies.insert(name.into(), range.into());
		self
	}

	/// Names this package depends on, merged from both dependency maps and de-duplicated.
	pub fn dependency_names(&self, include_peer: bool) -> impl Iterator<Item = &str> {
		let mut names: BTreeSet<&str> = self.dependencies.keys().map(String::as_str).collect();
		if include_peer {
			names.extend(self.peer_dependencies.keys().map(String::as_str));
		}
		names.into_iter()
	}

	pub fn from_json_str(s: &str) -> crate::Result<Self> {
		Ok(serde_json::from_str(s)?)
	}

	/// Reads a JSON manifest from disk.
	pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let data = std::fs::read_to_string(path.as_ref())?;
		log::trace!("read manifest {}", path.as_ref().display());
		Self::from_json_str(&data)
	}
}

impl std::fmt::Display for PackageDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.version {
			Some(version) => write!(f, "{}@{}", self.name, version),
			None => write!(f, "{}", self.name),
		}
	}
}
