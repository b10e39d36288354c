pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::GraphOptions;

pub mod package;
pub use package::PackageDescriptor;

pub mod graph;
pub use graph::PackageGraph;
pub use graph::CircularDependencyError;
pub use graph::PackageTree;
pub use graph::TreeNode;
pub use graph::Node;
