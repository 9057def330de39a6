//! Applied loads

mod load_case;

pub use load_case::{LoadCase, LoadType};
