mod cleanse;
mod merge;
mod split;

pub use cleanse::{Cleanse, CleanseLevel, CleanseReport};
pub use merge::{MergeCoincident, MergeVertices};
pub use split::SplitEdge;
