use petgraph::prelude::*;

use super::PackageGraph;

/// Packages depend on each other in a loop, so no order exists.
///
/// Only one representative cycle is carried even when several exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("circular dependency detected: {}", .path.join(" -> "))]
pub struct CircularDependencyError {
	path: Vec<String>,
}

impl CircularDependencyError {
	pub fn new(path: Vec<String>) -> Self {
		Self { path }
	}

	/// Names along the cycle, the first name is repeated at the end.
	pub fn path(&self) -> &[String] {
		&self.path
	}
}

impl PackageGraph {
	/// Checks the resolve accounted for every package.
	///
	/// `resolved` is indexed by node index.
	pub(super) fn ensure_resolved(&self, resolved: &[bool]) -> Result<(), CircularDependencyError> {
		match resolved.iter().position(|r| !r) {
			None => Ok(()),
			Some(start) => {
				let error = CircularDependencyError::new(self.find_cycle(NodeIndex::new(start), resolved));
				log::warn!("{}", error);
				Err(error)
			},
		}
	}

	/// Walks unresolved requirements from `start` until a package repeats.
	///
	/// An unresolved package always has at least one unresolved requirement, so the walk can't dead end.
	fn find_cycle(&self, start: NodeIndex, resolved: &[bool]) -> Vec<String> {
		let mut path = vec![start];
		let mut current = start;
		loop {
			/* Lowest index keeps the reported cycle stable between runs */
			let next = self.graph.neighbors_directed(current, Outgoing)
				.filter(|i| !resolved[i.index()])
				.min_by_key(|i| i.index());
			let Some(next) = next else {
				/* Unreachable while the invariant above holds */
				break;
			};

			if let Some(pos) = path.iter().position(|&i| i == next) {
				path.drain(..pos);
				path.push(next);
				break;
			}
			path.push(next);
			current = next;
		}

		path.into_iter().map(|i| self.graph[i].name.clone()).collect()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn message_joins_path() { assert_eq!(CircularDependencyError::new(vec!["a".into(), "b".into(), "a".into()]).to_string(), "circular dependency detected: a -> b -> a") }
}
