use serde::{Serialize, Deserialize};

/// Options controlling how a [`PackageGraph`](crate::PackageGraph) maps and orders packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
	include_peer_dependencies: bool,
	prioritize_fan_in: bool,
}

impl Default for GraphOptions {
	fn default() -> Self {
		Self {
			include_peer_dependencies: true,
			prioritize_fan_in: true,
		}
	}
}

impl GraphOptions {
	pub fn from_json_str(s: &str) -> crate::Result<Self> {
		Ok(serde_json::from_str(s)?)
	}

	/// When `false` only `dependencies` produce edges, `peerDependencies` are ignored.
	pub fn include_peer_dependencies(&self) -> bool {
		self.include_peer_dependencies
	}
	pub fn set_include_peer_dependencies(&mut self, include_peer_dependencies: bool) {
		self.include_peer_dependencies = include_peer_dependencies;
	}

	/// When `false` packages that become ready together are ordered by registration alone.
	pub fn prioritize_fan_in(&self) -> bool {
		self.prioritize_fan_in
	}
	pub fn set_prioritize_fan_in(&mut self, prioritize_fan_in: bool) {
		self.prioritize_fan_in = prioritize_fan_in;
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn options_default_enables_everything() { assert_eq!(GraphOptions::default(), GraphOptions { include_peer_dependencies: true, prioritize_fan_in: true }) }
	#[test] fn options_missing_fields_use_default() { assert!(GraphOptions::from_json_str(r#"{"prioritizeFanIn": false}"#).unwrap().include_peer_dependencies()) }
	#[test] fn options_fields_are_camel_case() { assert!(!GraphOptions::from_json_str(r#"{"includePeerDependencies": false}"#).unwrap().include_peer_dependencies()) }
	#[test] fn options_invalid_json_is_error() { assert!(matches!(GraphOptions::from_json_str("{"), Err(crate::Error::SerdeJSON(_)))) }
}
