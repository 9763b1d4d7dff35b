//! Cutline Editor - Interactive editing on top of the composition model
//!
//! Turns pointer gestures and discrete actions into composition mutations:
//! - Typed gesture events (drop, resize, move, pointer-down, split, ...)
//! - The interaction controller that resolves pixels into seconds and lanes
//! - The editing session that exclusively owns composition and cursor

pub mod controller;
pub mod gesture;
pub mod session;

pub use controller::{InteractionController, Notice, Outcome};
pub use gesture::{DragItem, DropEvent, Gesture, MoveEvent, PointerDown, ResizeEvent};
pub use session::EditorSession;
