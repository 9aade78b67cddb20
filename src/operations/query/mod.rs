mod bounding_box;
mod verify;

pub use bounding_box::BoundingBox;
pub use verify::{Defect, Verify};
