pub mod dimensions;
pub mod geodesy;
