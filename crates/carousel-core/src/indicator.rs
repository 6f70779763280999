//! Dot indicator row mirroring the currently displayed item.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};

use crate::config::{DOT_BOTTOM_INSET_PX, DOT_DIAMETER_PX, DOT_SPACING_PX, MAX_ITEMS};
use crate::error::CarouselError;
use crate::ui::Drawable;

// Dot colors in RGB565; 8-bit channels convert as R>>3, G>>2, B>>3.

/// Active dot color - pure white
pub const COLOR_DOT_ACTIVE: Rgb565 = Rgb565::WHITE;

/// Inactive dot color - medium gray
pub const COLOR_DOT_INACTIVE: Rgb565 = Rgb565::new(120 >> 3, 120 >> 2, 120 >> 3);

/// One dot per item; exactly one dot is active at any time.
pub struct IndicatorRow {
    origin: Point,
    active: heapless::Vec<bool, MAX_ITEMS>,
    previous_active: usize,
    dirty: bool,
}

impl IndicatorRow {
    /// Builds a row of `count` dots with dot 0 active, laid out from
    /// `origin` (top-left of the first dot).
    pub fn new(count: usize, origin: Point) -> Result<Self, CarouselError> {
        if count == 0 {
            return Err(CarouselError::EmptyItemSet);
        }
        let mut active = heapless::Vec::new();
        for i in 0..count {
            active
                .push(i == 0)
                .map_err(|_| CarouselError::TooManyItems(count))?;
        }
        Ok(Self {
            origin,
            active,
            previous_active: 0,
            dirty: true,
        })
    }

    /// Centers the row horizontally inside `bounds`, inset from the bottom.
    pub fn centered_in(count: usize, bounds: Rectangle) -> Result<Self, CarouselError> {
        let row_width = Self::row_width(count);
        let x = bounds.top_left.x + (bounds.size.width.saturating_sub(row_width) / 2) as i32;
        let y = bounds.top_left.y + bounds.size.height as i32
            - (DOT_BOTTOM_INSET_PX + DOT_DIAMETER_PX) as i32;
        Self::new(count, Point::new(x, y))
    }

    fn row_width(count: usize) -> u32 {
        if count == 0 {
            return 0;
        }
        count as u32 * DOT_DIAMETER_PX + (count as u32 - 1) * DOT_SPACING_PX
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn active_index(&self) -> usize {
        self.previous_active
    }

    /// Activates the dot at `index` and deactivates the previous one.
    /// Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) {
        if index >= self.active.len() || index == self.previous_active {
            return;
        }
        self.active[index] = true;
        self.active[self.previous_active] = false;
        self.previous_active = index;
        self.dirty = true;
    }

    fn dot_top_left(&self, index: usize) -> Point {
        let step = (DOT_DIAMETER_PX + DOT_SPACING_PX) as i32;
        Point::new(self.origin.x + index as i32 * step, self.origin.y)
    }
}

impl Drawable for IndicatorRow {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        for (i, enabled) in self.active.iter().enumerate() {
            let color = if *enabled {
                COLOR_DOT_ACTIVE
            } else {
                COLOR_DOT_INACTIVE
            };
            Circle::new(self.dot_top_left(i), DOT_DIAMETER_PX)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        Rectangle::new(
            self.origin,
            Size::new(Self::row_width(self.active.len()), DOT_DIAMETER_PX),
        )
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
