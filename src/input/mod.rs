//! Actions the viewer binds to keys.

mod keyboard;

pub use keyboard::KeyAction;
