//! Orders a collection of packages so every package comes after the packages it depends on.
//!
//! # Usage
//! 1. Create a [`PackageGraph`], optionally with [`GraphOptions`].
//! 1. [`PackageGraph::add_package()`] for every known package.
//! 1. Call one of the resolve methods:
//!     - [`PackageGraph::resolve_order()`] for a single install order.
//!     - [`PackageGraph::resolve_batches()`] for groups of packages that can be processed together.
//!     - [`PackageGraph::resolve_tree()`] for a tree following the dependency hierarchy.
//!
//! Edges are mapped lazily on the first resolve call and remapped after any further
//! [`PackageGraph::add_package()`]. A cycle makes every resolve method fail with a [`CircularDependencyError`].

use std::collections::HashMap;

use petgraph::prelude::*;

use crate::config::GraphOptions;
use crate::package::PackageDescriptor;

mod dependency_graph;
pub use dependency_graph::Node;

mod ordering;

mod package_tree;
pub use package_tree::PackageTree;
pub use package_tree::TreeNode;

mod cycle;
pub use cycle::CircularDependencyError;

/// Registry of packages and the dependency edges between them.
///
/// Nodes live in a petgraph arena in registration order, edges point from a dependent to its requirement.
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
	options: GraphOptions,
	graph: DiGraph<PackageDescriptor, ()>,
	nodes: HashMap<String, NodeIndex>,
	/// Nodes without requirements, valid while `edges_built` is set.
	roots: Vec<NodeIndex>,
	edges_built: bool,
}

impl PackageGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_options(options: GraphOptions) -> Self {
		Self {
			options,
			..Default::default()
		}
	}

	pub fn from_packages(packages: impl IntoIterator<Item = PackageDescriptor>) -> Self {
		packages.into_iter().collect()
	}

	/// Reads a JSON array of package descriptors.
	pub fn from_json_str(s: &str) -> crate::Result<Self> {
		let packages: Vec<PackageDescriptor> = serde_json::from_str(s)?;
		Ok(Self::from_packages(packages))
	}

	/// Reads one JSON manifest per path, registering them in the given order.
	pub fn load_manifests<P: AsRef<std::path::Path>>(paths: impl IntoIterator<Item = P>) -> crate::Result<Self> {
		let mut graph = Self::new();
		for path in paths {
			graph.add_package(PackageDescriptor::load(path)?);
		}
		Ok(graph)
	}

	pub fn options(&self) -> &GraphOptions {
		&self.options
	}

	/// Replaces the options, built edges are discarded.
	pub fn set_options(&mut self, options: GraphOptions) {
		self.options = options;
		self.invalidate();
	}

	/// Registers `package`.
	///
	/// A package with an already registered name replaces the old descriptor but keeps its node.
	/// Edges built by an earlier resolve are discarded and rebuilt on the next resolve.
	pub fn add_package(&mut self, package: PackageDescriptor) {
		if let Some(&i) = self.nodes.get(&package.name) {
			log::debug!("replacing descriptor for `{}`", package.name);
			self.graph[i] = package;
		} else {
			let name = package.name.clone();
			let i = self.graph.add_node(package);
			self.nodes.insert(name, i);
		}

		if self.edges_built {
			self.invalidate();
		}
	}

	/// Discards the mapped edges and roots. They are rebuilt by the next call needing them.
	pub fn invalidate(&mut self) {
		if self.edges_built {
			log::debug!("invalidating dependency edges");
		}
		self.graph.clear_edges();
		self.roots.clear();
		self.edges_built = false;
	}

	/// `true` when edges reflect every registered package.
	pub fn is_built(&self) -> bool {
		self.edges_built
	}

	pub fn len(&self) -> usize {
		self.graph.node_count()
	}

	pub fn is_empty(&self) -> bool {
		self.graph.node_count() == 0
	}

	pub fn contains(&self, name: &str) -> bool {
		self.nodes.contains_key(name)
	}

	pub fn get(&self, name: &str) -> Option<&PackageDescriptor> {
		self.nodes.get(name).map(|&i| &self.graph[i])
	}

	/// Registered packages in registration order.
	pub fn packages(&self) -> impl Iterator<Item = &PackageDescriptor> {
		self.graph.node_weights()
	}
}

impl FromIterator<PackageDescriptor> for PackageGraph {
	fn from_iter<T: IntoIterator<Item = PackageDescriptor>>(iter: T) -> Self {
		let mut graph = Self::new();
		graph.extend(iter);
		graph
	}
}

impl Extend<PackageDescriptor> for PackageGraph {
	fn extend<T: IntoIterator<Item = PackageDescriptor>>(&mut self, iter: T) {
		for package in iter {
			self.add_package(package);
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn package(name: &str, deps: &[&str]) -> PackageDescriptor {
		deps.iter().fold(PackageDescriptor::new(name), |p, d| p.with_dependency(*d, "*"))
	}

	#[test]
	fn readding_keeps_node_and_replaces_descriptor() {
		let mut graph = PackageGraph::from_packages([package("foo", &[]), package("bar", &[])]);
		let before = graph.nodes["foo"];
		graph.add_package(package("foo", &["bar"]));
		assert_eq!(graph.len(), 2);
		assert_eq!(graph.nodes["foo"], before);
		assert!(graph.get("foo").unwrap().dependencies.contains_key("bar"));
	}

	#[test]
	fn adding_after_build_invalidates() {
		let mut graph = PackageGraph::from_packages([package("foo", &[]), package("bar", &["foo"])]);
		graph.build_edges();
		assert!(graph.is_built());
		assert_eq!(graph.graph.edge_count(), 1);

		graph.add_package(package("baz", &["bar"]));
		assert!(!graph.is_built());
		assert_eq!(graph.graph.edge_count(), 0);
		assert!(graph.roots.is_empty());

		graph.build_edges();
		assert_eq!(graph.graph.edge_count(), 2);
	}

	#[test]
	fn set_options_invalidates() {
		let mut graph = PackageGraph::from_packages([package("foo", &[])]);
		graph.build_edges();
		graph.set_options(GraphOptions::default());
		assert!(!graph.is_built());
	}

	#[test]
	fn packages_are_in_registration_order() {
		let graph: PackageGraph = ["c", "a", "b"].into_iter().map(PackageDescriptor::new).collect();
		assert_eq!(graph.packages().map(|p| p.name.as_str()).collect::<Vec<_>>(), ["c", "a", "b"]);
	}
}
