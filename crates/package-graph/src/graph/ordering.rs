//! Linear and batched orders using Kahn's algorithm.

use std::collections::VecDeque;

use petgraph::prelude::*;

use super::PackageGraph;
use super::CircularDependencyError;
use crate::package::PackageDescriptor;

/// Tracks how many requirements of each package are still unresolved.
///
/// A package is only released once all of its requirements are resolved.
struct RequirementCountdown {
	pending: Vec<usize>,
	resolved: Vec<bool>,
}

impl RequirementCountdown {
	fn new(graph: &DiGraph<PackageDescriptor, ()>) -> Self {
		Self {
			pending: graph.node_indices().map(|i| graph.neighbors_directed(i, Outgoing).count()).collect(),
			resolved: vec![false; graph.node_count()],
		}
	}

	/// Marks `i` resolved and returns the dependents that became ready because of it.
	fn resolve(&mut self, graph: &DiGraph<PackageDescriptor, ()>, i: NodeIndex) -> Vec<NodeIndex> {
		self.resolved[i.index()] = true;
		let mut ready = Vec::new();
		for dependent in graph.neighbors_directed(i, Incoming) {
			let pending = &mut self.pending[dependent.index()];
			*pending -= 1;
			if *pending == 0 {
				ready.push(dependent);
			}
		}
		ready
	}

	fn resolved(&self) -> &[bool] {
		&self.resolved
	}
}

impl PackageGraph {
	/// Returns every package after all of the packages it depends on.
	///
	/// Packages ready at the same time are ordered by descending number of dependents.
	/// # Errors
	/// [`CircularDependencyError`] when any packages depend on each other in a loop.
	pub fn resolve_order(&mut self) -> Result<Vec<PackageDescriptor>, CircularDependencyError> {
		self.build_edges();

		let mut countdown = RequirementCountdown::new(&self.graph);
		let mut queue: VecDeque<NodeIndex> = self.prioritize(self.roots.clone()).into();
		let mut order = Vec::<NodeIndex>::with_capacity(self.graph.node_count());

		while let Some(i) = queue.pop_front() {
			order.push(i);
			let ready = countdown.resolve(&self.graph, i);
			queue.extend(self.prioritize(ready));
		}

		self.ensure_resolved(countdown.resolved())?;
		log::debug!("resolved order of {} packages", order.len());
		Ok(order.into_iter().map(|i| self.graph[i].clone()).collect())
	}

	/// Groups packages into batches where no package depends on another in the same batch.
	///
	/// Every package is placed in the earliest batch after all of its requirements.
	/// # Errors
	/// [`CircularDependencyError`] when any packages depend on each other in a loop.
	pub fn resolve_batches(&mut self) -> Result<Vec<Vec<PackageDescriptor>>, CircularDependencyError> {
		let batches = self.resolve_layers()?;
		log::debug!("resolved {} packages into {} batches", self.graph.node_count(), batches.len());
		Ok(
			batches.into_iter()
				.map(|batch| batch.into_iter().map(|i| self.graph[i].clone()).collect())
				.collect()
		)
	}

	pub(super) fn resolve_layers(&mut self) -> Result<Vec<Vec<NodeIndex>>, CircularDependencyError> {
		self.build_edges();

		let mut countdown = RequirementCountdown::new(&self.graph);
		let mut batches = Vec::<Vec<NodeIndex>>::new();
		let mut batch = self.prioritize(self.roots.clone());

		while !batch.is_empty() {
			let mut next = Vec::new();
			for &i in &batch {
				next.extend(countdown.resolve(&self.graph, i));
			}
			batches.push(batch);
			batch = self.prioritize(next);
		}

		self.ensure_resolved(countdown.resolved())?;
		Ok(batches)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn package(name: &str, deps: &[&str]) -> PackageDescriptor {
		deps.iter().fold(PackageDescriptor::new(name), |p, d| p.with_dependency(*d, "*"))
	}

	fn names(packages: &[PackageDescriptor]) -> Vec<&str> {
		packages.iter().map(|p| p.name.as_str()).collect()
	}

	#[test]
	fn deeper_requirement_is_waited_for() {
		/* `d` is reachable from `b` before `c` is resolved through `a` */
		let mut graph = PackageGraph::from_packages([
			package("a", &[]),
			package("b", &[]),
			package("x", &["b"]),
			package("c", &["a"]),
			package("d", &["b", "c"]),
		]);
		let order = graph.resolve_order().unwrap();
		let pos = |n: &str| names(&order).iter().position(|p| *p == n).unwrap();
		assert!(pos("c") < pos("d"));
		assert!(pos("b") < pos("d"));
	}

	#[test]
	fn batches_wait_for_deepest_requirement() {
		let mut graph = PackageGraph::from_packages([
			package("a", &[]),
			package("b", &[]),
			package("c", &["a"]),
			package("d", &["b", "c"]),
		]);
		let batches = graph.resolve_batches().unwrap();
		assert_eq!(batches.iter().map(|b| names(b)).collect::<Vec<_>>(), vec![vec!["a", "b"], vec!["c"], vec!["d"]]);
	}

	#[test]
	fn registration_order_without_fan_in() {
		let mut options = crate::GraphOptions::default();
		options.set_prioritize_fan_in(false);
		let mut graph = PackageGraph::with_options(options);
		graph.extend([package("a", &[]), package("b", &[]), package("c", &["b"])]);
		assert_eq!(names(&graph.resolve_order().unwrap()), ["a", "b", "c"]);
	}

	#[test]
	fn self_dependency_is_a_cycle() {
		let mut graph = PackageGraph::from_packages([package("a", &["a"])]);
		assert_eq!(graph.resolve_order().unwrap_err().path(), ["a", "a"]);
	}

	#[test] fn empty_graph_resolves_empty() { assert!(PackageGraph::new().resolve_order().unwrap().is_empty() && PackageGraph::new().resolve_batches().unwrap().is_empty()) }
}
