pub mod camera;
pub mod loading;
