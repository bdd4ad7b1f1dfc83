//! Pure domain types with minimal dependencies
//!
//! This module contains the schematic data model and the two viewer state
//! machines (view transform, selection). Nothing here knows about rendering
//! or the command line.

pub mod color;
pub mod component;
pub mod geometry;
pub mod layout;
pub mod selection;
pub mod transform;

pub use color::*;
pub use component::*;
pub use geometry::*;
pub use layout::*;
pub use selection::*;
pub use transform::*;
