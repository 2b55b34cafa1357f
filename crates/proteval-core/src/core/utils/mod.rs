pub mod geometry;
pub mod parse;
