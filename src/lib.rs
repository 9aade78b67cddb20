pub mod error;
pub mod geometry;
pub mod io;
pub mod math;
pub mod motif;
pub mod operations;
pub mod radial;
pub mod topology;

pub use error::{Result, RosaceError};
