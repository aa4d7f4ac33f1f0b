//! Page components.

pub mod countdown;
pub mod effects;
pub mod intro;
