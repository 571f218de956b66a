pub mod config;
pub mod document;
pub mod editor;
pub mod interchange;
pub mod render;
pub mod theme;
