//! Touch event vocabulary and the drawable trait.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

/// Touch events that can occur on the UI
#[derive(Debug, Clone, Copy)]
pub enum TouchEvent {
    /// Initial touch press at a point
    Press(TouchPoint),
    /// Touch drag to a new point
    Drag(TouchPoint),
    /// Pointer lifted at a point
    Release(TouchPoint),
    /// Touch sequence aborted by the platform
    Cancel,
}

/// Per-event decision on whether an ancestor scrollable container may take
/// over the active gesture.
///
/// The carousel claims every gesture optimistically and releases the claim
/// when the gesture is one it cannot use: a predominantly vertical drag, or
/// a horizontal drag past the first/last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollClaim {
    /// The carousel keeps the gesture; ancestors must not intercept.
    Retain,
    /// Ancestors are free to intercept and handle the gesture.
    Release,
}

/// Trait for any UI element that can be drawn
pub trait Drawable {
    /// Draw the element to the display within the given bounds
    fn draw<D: DrawTarget<Color = embedded_graphics::pixelcolor::Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error>;

    /// Get the bounds of this drawable element
    fn bounds(&self) -> Rectangle;

    /// Check if this element needs to be redrawn
    fn is_dirty(&self) -> bool;

    /// Mark this element as clean (already drawn)
    fn mark_clean(&mut self);

    /// Mark this element as dirty (needs redraw)
    fn mark_dirty(&mut self);
}
