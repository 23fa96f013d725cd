pub mod input;
pub mod spinner;

// Re-export component symbols so callers can `use crate::components::ui::Input` etc.
pub use input::*;
pub use spinner::*;
