//! Material and element definitions

mod material;
mod triangle;

pub use material::{MaterialProperties, SteelGrade};
pub use triangle::CstElement;
