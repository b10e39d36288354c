//! Edge mapping and node queries, nothing here concerns ordering.

use std::cmp::Reverse;

use petgraph::prelude::*;

use super::PackageGraph;
use crate::package::PackageDescriptor;

/// View of a single package in a built [`PackageGraph`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'g> {
	graph: &'g DiGraph<PackageDescriptor, ()>,
	index: NodeIndex,
}

impl<'g> Node<'g> {
	pub fn name(&self) -> &'g str {
		&self.graph[self.index].name
	}

	pub fn descriptor(&self) -> &'g PackageDescriptor {
		&self.graph[self.index]
	}

	/// Packages this package depends on.
	pub fn requirements(&self) -> impl Iterator<Item = Node<'g>> + 'g {
		let graph = self.graph;
		graph.neighbors_directed(self.index, Outgoing).map(move |index| Node { graph, index })
	}

	/// Packages depending on this package.
	pub fn dependents(&self) -> impl Iterator<Item = Node<'g>> + 'g {
		let graph = self.graph;
		graph.neighbors_directed(self.index, Incoming).map(move |index| Node { graph, index })
	}

	pub fn fan_in(&self) -> usize {
		self.graph.neighbors_directed(self.index, Incoming).count()
	}
}

impl PackageGraph {
	/// Links every package to the registered packages it depends on.
	///
	/// Does nothing when the edges are already built.
	pub(super) fn build_edges(&mut self) {
		if self.edges_built { return }

		log::debug!("building dependency edges for {} packages", self.graph.node_count());
		let include_peer = self.options.include_peer_dependencies();

		let mut links = Vec::<(NodeIndex, NodeIndex)>::new();
		for dependent in self.graph.node_indices() {
			for name in self.graph[dependent].dependency_names(include_peer) {
				match self.nodes.get(name) {
					Some(&requirement) => links.push((dependent, requirement)),
					None => log::debug!("`{}` depends on unregistered package `{}`", self.graph[dependent].name, name),
				}
			}
		}

		/* `dependency_names` is de-duplicated so every pair is linked once */
		for (dependent, requirement) in links {
			log::trace!("linking `{}` -> `{}`", self.graph[dependent].name, self.graph[requirement].name);
			self.graph.add_edge(dependent, requirement, ());
		}

		self.roots = self.graph.node_indices()
			.filter(|&i| self.graph.neighbors_directed(i, Outgoing).next().is_none())
			.collect();
		self.edges_built = true;
		log::debug!("mapped {} edges, {} roots", self.graph.edge_count(), self.roots.len());
	}

	/// Names of packages without registered requirements.
	pub fn roots(&mut self) -> Vec<&str> {
		self.build_edges();
		let roots = self.prioritize(self.roots.clone());
		roots.into_iter().map(|i| self.graph[i].name.as_str()).collect()
	}

	pub fn node(&mut self, name: &str) -> Option<Node<'_>> {
		self.build_edges();
		let index = *self.nodes.get(name)?;
		Some(Node { graph: &self.graph, index })
	}

	/// Dependency names without a registered package, as `(dependent, missing)` pairs.
	///
	/// These are ignored when mapping edges.
	pub fn missing_dependencies(&self) -> Vec<(&str, &str)> {
		let include_peer = self.options.include_peer_dependencies();
		let nodes = &self.nodes;
		self.graph.node_weights()
			.flat_map(move |p| {
				p.dependency_names(include_peer)
					.filter(move |name| !nodes.contains_key(*name))
					.map(move |name| (p.name.as_str(), name))
			})
			.collect()
	}

	pub(super) fn fan_in(&self, i: NodeIndex) -> usize {
		Node { graph: &self.graph, index: i }.fan_in()
	}

	/// Sorts packages that became ready together.
	///
	/// Packages with more dependents come first, registration order breaks ties.
	/// Every dependent of a ready package is still unresolved so the full fan-in is the unresolved fan-in.
	pub(super) fn prioritize(&self, mut ready: Vec<NodeIndex>) -> Vec<NodeIndex> {
		if self.options.prioritize_fan_in() {
			ready.sort_by_key(|&i| (Reverse(self.fan_in(i)), i.index()));
		} else {
			ready.sort_by_key(|i| i.index());
		}
		ready
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn package(name: &str, deps: &[&str]) -> PackageDescriptor {
		deps.iter().fold(PackageDescriptor::new(name), |p, d| p.with_dependency(*d, "*"))
	}

	#[test]
	fn dangling_names_produce_no_edge() {
		let mut graph = PackageGraph::from_packages([package("foo", &["left-pad"]), package("bar", &["foo"])]);
		graph.build_edges();
		assert_eq!(graph.graph.edge_count(), 1);
		assert_eq!(graph.len(), 2);
		assert_eq!(graph.missing_dependencies(), [("foo", "left-pad")]);
		assert_eq!(graph.roots(), ["foo"]);
	}

	#[test]
	fn regular_and_peer_dependency_make_one_edge() {
		let mut graph = PackageGraph::from_packages([
			PackageDescriptor::new("foo"),
			PackageDescriptor::new("bar").with_dependency("foo", "1").with_peer_dependency("foo", "1"),
		]);
		graph.build_edges();
		assert_eq!(graph.graph.edge_count(), 1);
	}

	#[test]
	fn building_twice_is_idempotent() {
		let mut graph = PackageGraph::from_packages([package("foo", &[]), package("bar", &["foo"])]);
		graph.build_edges();
		graph.build_edges();
		assert_eq!(graph.graph.edge_count(), 1);
	}

	#[test]
	fn peer_dependencies_can_be_excluded() {
		let mut options = crate::GraphOptions::default();
		options.set_include_peer_dependencies(false);
		let mut graph = PackageGraph::with_options(options);
		graph.add_package(PackageDescriptor::new("foo"));
		graph.add_package(PackageDescriptor::new("bar").with_peer_dependency("foo", "1"));
		assert_eq!(graph.roots(), ["foo", "bar"]);
	}

	#[test]
	fn node_exposes_both_directions() {
		let mut graph = PackageGraph::from_packages([package("foo", &[]), package("bar", &["foo"]), package("baz", &["foo"])]);
		let foo = graph.node("foo").unwrap();
		assert_eq!(foo.fan_in(), 2);
		let mut dependents = foo.dependents().map(|n| n.name()).collect::<Vec<_>>();
		dependents.sort();
		assert_eq!(dependents, ["bar", "baz"]);
		assert_eq!(graph.node("bar").unwrap().requirements().map(|n| n.name()).collect::<Vec<_>>(), ["foo"]);
		assert!(graph.node("qux").is_none());
	}

	#[test]
	fn roots_are_sorted_by_fan_in() {
		let mut graph = PackageGraph::from_packages([package("a", &[]), package("b", &[]), package("c", &["b"])]);
		assert_eq!(graph.roots(), ["b", "a"]);
	}
}
