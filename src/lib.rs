pub mod app;
pub mod config;
pub mod field;
pub mod logging;
pub mod palette;
pub mod preset;
pub mod randomize;
pub mod render;
pub mod terminal;
