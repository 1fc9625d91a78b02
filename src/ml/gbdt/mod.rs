//! Gradient-boosted regression trees for binary classification.
//!
//! Artifacts are exported by the training side as flat node lists so that
//! inference needs no external ML dependency.

mod model;

pub use model::{Tree, TreeEnsembleModel, TreeNode};
