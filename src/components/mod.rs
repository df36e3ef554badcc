pub mod nav_button;
pub mod palette;

pub use nav_button::{ghost_button, nav_button};
