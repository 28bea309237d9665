pub mod root;
pub mod sensors;
