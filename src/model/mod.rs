mod index;
mod point;
mod tree;

pub use index::{IndexedNode, TreeIndex};
pub use point::{Point, fmt_coord};
pub use tree::{NodeFlags, TreeNode};
