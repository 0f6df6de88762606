pub mod control;
pub mod geometry;
pub mod timer;
