//! Core UI traits and types shared by the carousel components.

pub mod core;

pub use self::core::{Drawable, ScrollClaim, TouchEvent, TouchPoint};
