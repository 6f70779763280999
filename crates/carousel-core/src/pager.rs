//! Paging view: hosts the looping adapter, tracks the active gesture, and
//! arbitrates gesture ownership against an ancestor scrollable container.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::adapter::{CarouselItem, LoopingAdapter};
use crate::config::SETTLE_FRACTION;
use crate::ui::{Drawable, ScrollClaim, TouchEvent, TouchPoint};

/// Transient per-touch-sequence state. Reset on every press.
#[derive(Debug, Clone, Copy)]
struct GestureTracking {
    start: TouchPoint,
}

/// Outcome of routing one touch event through the pager.
#[derive(Debug, Clone, Copy)]
pub struct PagerResponse {
    /// Whether an ancestor scroller may take over the gesture.
    pub claim: ScrollClaim,
    /// Virtual position the pager settled on, if this event changed pages.
    pub selected: Option<usize>,
}

impl PagerResponse {
    fn retain() -> Self {
        Self {
            claim: ScrollClaim::Retain,
            selected: None,
        }
    }
}

/// Swipeable page host over a [`LoopingAdapter`].
pub struct PagerView<I: CarouselItem> {
    bounds: Rectangle,
    adapter: LoopingAdapter<I>,
    /// Current virtual position.
    current: usize,
    scroll_enabled: bool,
    gesture: Option<GestureTracking>,
    /// Horizontal drag offset in pixels; positive means dragging right
    /// (revealing the previous page).
    drag_offset: i32,
    dirty: bool,
}

impl<I: CarouselItem> PagerView<I> {
    pub fn new(bounds: Rectangle, adapter: LoopingAdapter<I>, start: usize) -> Self {
        let mut pager = Self {
            bounds,
            adapter,
            current: 0,
            scroll_enabled: true,
            gesture: None,
            drag_offset: 0,
            dirty: true,
        };
        pager.jump_to(start);
        pager
    }

    /// When disabled, gesture and programmatic page changes are no-ops.
    /// Default is enabled.
    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }

    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    pub fn current_position(&self) -> usize {
        self.current
    }

    pub fn current_real_index(&self) -> usize {
        self.adapter.real_index(self.current)
    }

    pub fn adapter(&self) -> &LoopingAdapter<I> {
        &self.adapter
    }

    fn is_first(&self) -> bool {
        self.adapter.range().is_first(self.current)
    }

    fn is_last(&self) -> bool {
        self.adapter.range().is_last(self.current)
    }

    /// Move to `position` without a gesture, keeping the live-view window
    /// centered on it.
    fn jump_to(&mut self, position: usize) -> usize {
        let position = position % self.adapter.count();
        self.current = position;
        let range = self.adapter.range();
        self.adapter.instantiate(range.wrapping_prev(position));
        self.adapter.instantiate(position);
        self.adapter.instantiate(range.wrapping_next(position));
        self.adapter.retain_window(position);
        self.dirty = true;
        position
    }

    /// Programmatic advance by one virtual position, wrapping at the end
    /// of the virtual range. No-op while scrolling is disabled.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.scroll_enabled {
            return None;
        }
        let next = self.adapter.range().wrapping_next(self.current);
        Some(self.jump_to(next))
    }

    /// Routes one touch event.
    ///
    /// The claim starts out as [`ScrollClaim::Retain`] on every event (the
    /// optimistic grab) and is downgraded on drags the pager cannot use: a
    /// predominantly vertical drag always releases; a predominantly
    /// horizontal drag releases only when moving right on the first page or
    /// left on the last page. First/last are recomputed from the adapter
    /// count and the current position on every drag event.
    ///
    /// The pager processes the event regardless of the claim decision; the
    /// claim only arbitrates ancestor/descendant routing.
    pub fn handle_touch(&mut self, event: TouchEvent) -> PagerResponse {
        match event {
            TouchEvent::Press(point) => {
                self.gesture = Some(GestureTracking { start: point });
                PagerResponse::retain()
            }
            TouchEvent::Drag(point) => self.handle_drag(point),
            TouchEvent::Release(_) => PagerResponse {
                claim: ScrollClaim::Retain,
                selected: self.settle(),
            },
            TouchEvent::Cancel => {
                // Aborted sequence: snap back, no page change.
                self.gesture = None;
                if self.drag_offset != 0 {
                    self.drag_offset = 0;
                    self.dirty = true;
                }
                PagerResponse::retain()
            }
        }
    }

    fn handle_drag(&mut self, point: TouchPoint) -> PagerResponse {
        let Some(gesture) = self.gesture else {
            // Drag without a recorded press; nothing to judge against.
            return PagerResponse::retain();
        };

        let dx = point.x as i32 - gesture.start.x as i32;
        let dy = point.y as i32 - gesture.start.y as i32;

        let claim = if dx.abs() > dy.abs() {
            // Predominantly horizontal: release only when there is nothing
            // to page to in the drag direction.
            if dx > 0 && self.is_first() {
                ScrollClaim::Release
            } else if dx < 0 && self.is_last() {
                ScrollClaim::Release
            } else {
                ScrollClaim::Retain
            }
        } else {
            // Predominantly vertical: an ancestor vertical scroller owns it.
            ScrollClaim::Release
        };

        if self.scroll_enabled && dx != self.drag_offset {
            self.drag_offset = dx;
            self.dirty = true;
        }

        PagerResponse {
            claim,
            selected: None,
        }
    }

    /// Ends the active gesture: a drag past the settle threshold pages to
    /// the neighbor in the drag direction, anything shorter snaps back.
    fn settle(&mut self) -> Option<usize> {
        self.gesture = None;
        let offset = core::mem::replace(&mut self.drag_offset, 0);
        if offset != 0 {
            self.dirty = true;
        }
        if !self.scroll_enabled {
            return None;
        }

        let threshold = (self.bounds.size.width / SETTLE_FRACTION) as i32;
        let range = self.adapter.range();
        if offset <= -threshold && !self.is_last() {
            let next = range.wrapping_next(self.current);
            debug!("drag settled forward to virtual {}", next);
            Some(self.jump_to(next))
        } else if offset >= threshold && !self.is_first() {
            let prev = range.wrapping_prev(self.current);
            debug!("drag settled backward to virtual {}", prev);
            Some(self.jump_to(prev))
        } else {
            None
        }
    }
}

impl<I: CarouselItem> Drawable for PagerView<I> {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let mut clipped = display.clipped(&self.bounds);
        let width = self.bounds.size.width as i32;

        let shifted = Rectangle::new(
            self.bounds.top_left + Point::new(self.drag_offset, 0),
            self.bounds.size,
        );
        self.adapter
            .item_at(self.current)
            .draw_item(shifted, &mut clipped)?;

        let range = self.adapter.range();
        if self.drag_offset > 0 && !self.is_first() {
            let prev_bounds = Rectangle::new(shifted.top_left - Point::new(width, 0), shifted.size);
            self.adapter
                .item_at(range.wrapping_prev(self.current))
                .draw_item(prev_bounds, &mut clipped)?;
        } else if self.drag_offset < 0 && !self.is_last() {
            let next_bounds = Rectangle::new(shifted.top_left + Point::new(width, 0), shifted.size);
            self.adapter
                .item_at(range.wrapping_next(self.current))
                .draw_item(next_bounds, &mut clipped)?;
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
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
