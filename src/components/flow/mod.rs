//! Node/edge diagram editor widget.

mod commands;
mod component;
pub mod editor;
mod node;
mod render;
pub mod state;

pub use commands::GraphCommands;
pub use component::FlowCanvas;
