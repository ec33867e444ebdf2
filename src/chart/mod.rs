pub mod color;
pub mod error;
pub mod layout;
pub mod render;
pub mod scale;
pub mod tooltip;
