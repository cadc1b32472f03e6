//! Mind map canvas and the model behind it.

mod component;
pub mod debounce;
pub mod error;
pub mod interaction;
pub mod layout;
mod render;
pub mod seed;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod types;

pub use component::MindMapCanvas;
