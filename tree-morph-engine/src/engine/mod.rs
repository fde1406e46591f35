pub mod camera;
pub mod core;
pub mod field;
pub mod geometry;
pub mod gesture;
pub mod loading;
pub mod mesh;
pub mod morph;
pub mod scene;
pub mod systems;
pub mod tracking;
pub mod tuning;

#[cfg(test)]
mod flow_tests;
