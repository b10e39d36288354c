use petgraph::prelude::*;
use serde::Serialize;

use super::PackageGraph;
use super::CircularDependencyError;
use crate::package::PackageDescriptor;

/// Forest following the dependency hierarchy, requirements above their dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageTree {
	/// Always `true`, marks the synthetic top of the forest when serialized.
	pub root: bool,
	pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
	pub package: PackageDescriptor,
	/// `None` for leaves.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub children: Option<Vec<TreeNode>>,
}

impl PackageTree {
	/// All packages in depth first order.
	pub fn packages(&self) -> Vec<&PackageDescriptor> {
		let mut out = Vec::new();
		let mut stack: Vec<&TreeNode> = self.children.iter().rev().collect();
		while let Some(node) = stack.pop() {
			out.push(&node.package);
			if let Some(children) = &node.children {
				stack.extend(children.iter().rev());
			}
		}
		out
	}
}

impl std::fmt::Display for PackageTree {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut stack: Vec<(&TreeNode, usize)> = self.children.iter().rev().map(|n| (n, 0)).collect();
		while let Some((node, depth)) = stack.pop() {
			writeln!(f, "{:indent$}{}", "", node.package, indent = depth * 2)?;
			if let Some(children) = &node.children {
				stack.extend(children.iter().rev().map(|n| (n, depth + 1)));
			}
		}
		Ok(())
	}
}

/* Nested children would otherwise be dropped recursively, one stack frame per level */
impl Drop for TreeNode {
	fn drop(&mut self) {
		let mut stack = self.children.take().unwrap_or_default();
		while let Some(mut node) = stack.pop() {
			if let Some(children) = node.children.take() {
				stack.extend(children);
			}
		}
	}
}

impl PackageGraph {
	/// Builds a tree starting at the packages without requirements, each package's children being its dependents.
	///
	/// A package is placed once, under the first of its requirements reached.
	/// # Errors
	/// [`CircularDependencyError`] when any packages depend on each other in a loop.
	pub fn resolve_tree(&mut self) -> Result<PackageTree, CircularDependencyError> {
		/* Cycles are rejected the same way the other orders reject them before walking anything */
		self.resolve_layers()?;

		let count = self.graph.node_count();
		let mut visited = vec![false; count];
		let mut children = vec![Vec::<NodeIndex>::new(); count];
		let mut post_order = Vec::<NodeIndex>::with_capacity(count);
		let mut top = Vec::<NodeIndex>::new();

		/* Depth first with an explicit stack, chains can be thousands of packages deep */
		for root in self.prioritize(self.roots.clone()) {
			if visited[root.index()] { continue }
			visited[root.index()] = true;
			top.push(root);

			let mut stack = vec![(root, self.prioritized_dependents(root).into_iter())];
			loop {
				let Some((parent, pending)) = stack.last_mut() else { break };
				let parent = *parent;
				match pending.find(|d| !visited[d.index()]) {
					Some(d) => {
						visited[d.index()] = true;
						children[parent.index()].push(d);
						stack.push((d, self.prioritized_dependents(d).into_iter()));
					},
					None => {
						post_order.push(parent);
						stack.pop();
					},
				}
			}
		}

		/* Post order guarantees every child is built before its parent */
		let mut built: Vec<Option<TreeNode>> = (0..count).map(|_| None).collect();
		for i in post_order {
			let nodes: Vec<TreeNode> = children[i.index()].iter()
				.filter_map(|c| built[c.index()].take())
				.collect();
			built[i.index()] = Some(TreeNode {
				package: self.graph[i].clone(),
				children: if nodes.is_empty() { None } else { Some(nodes) },
			});
		}

		let children = top.iter().filter_map(|r| built[r.index()].take()).collect();
		Ok(PackageTree { root: true, children })
	}

	fn prioritized_dependents(&self, i: NodeIndex) -> Vec<NodeIndex> {
		self.prioritize(self.graph.neighbors_directed(i, Incoming).collect())
	}
}
