pub mod classes;
pub mod core;
pub mod exchange;
pub mod picker;
pub mod scoring;
pub mod selection;
pub mod students;
