//! Looping position adapter: maps a very large virtual position range onto
//! a small fixed item set.

use alloc::vec::Vec;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::debug;

use crate::config::MAX_ITEMS;
use crate::error::CarouselError;

/// An item the carousel can render as a full page.
pub trait CarouselItem {
    /// Render the item into `bounds` on `display`.
    fn draw_item<D: DrawTarget<Color = Rgb565>>(
        &self,
        bounds: Rectangle,
        display: &mut D,
    ) -> Result<(), D::Error>;
}

/// Solid-color page, handy for tests and the simulator.
impl CarouselItem for Rgb565 {
    fn draw_item<D: DrawTarget<Color = Rgb565>>(
        &self,
        bounds: Rectangle,
        display: &mut D,
    ) -> Result<(), D::Error> {
        bounds
            .into_styled(PrimitiveStyle::with_fill(*self))
            .draw(display)
    }
}

/// The bounded-but-huge virtual position range the pager moves through.
///
/// Positions are plain `usize` values in `[0, count)`. The range is large
/// enough that a session starting at the aligned midpoint never reaches
/// either end; if a position is ever stepped past an end it wraps by
/// modular arithmetic, there is no "infinite" illusion to preserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualRange {
    count: usize,
}

impl VirtualRange {
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
        }
    }

    /// Total number of virtual positions.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_first(&self, position: usize) -> bool {
        position == 0
    }

    pub fn is_last(&self, position: usize) -> bool {
        position + 1 == self.count
    }

    /// Next position, wrapping at the end of the range.
    pub fn wrapping_next(&self, position: usize) -> usize {
        (position + 1) % self.count
    }

    /// Previous position, wrapping at the start of the range.
    ///
    /// Computed without an intermediate sum: `count` may be `usize::MAX`
    /// (the default virtual page count on 32-bit targets), where
    /// `position + count` would overflow.
    pub fn wrapping_prev(&self, position: usize) -> usize {
        if position == 0 {
            self.count - 1
        } else {
            position - 1
        }
    }

    /// Starting position for an `item_count`-item carousel: the midpoint of
    /// the range rounded down to a multiple of the item count, so the real
    /// index starts at 0 and there is room to page both directions
    /// indefinitely.
    pub fn aligned_midpoint(&self, item_count: usize) -> Result<usize, CarouselError> {
        if item_count == 0 {
            return Err(CarouselError::EmptyItemSet);
        }
        let mid = self.count / 2;
        Ok(mid - mid % item_count)
    }
}

/// Opaque identity handle for an instantiated page view.
///
/// Two handles refer to the same view instance iff they compare equal;
/// page content is never compared. A released and re-instantiated position
/// yields a fresh, unequal handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHandle(u32);

/// A live page view produced by [`LoopingAdapter::instantiate`].
#[derive(Debug)]
pub struct PageView {
    handle: PageHandle,
    virtual_position: usize,
    real_index: usize,
}

impl PageView {
    pub fn handle(&self) -> PageHandle {
        self.handle
    }

    pub fn virtual_position(&self) -> usize {
        self.virtual_position
    }

    pub fn real_index(&self) -> usize {
        self.real_index
    }
}

/// Presents the virtual range to the pager while rendering only the finite
/// item set underneath, and tracks the small window of live page views.
pub struct LoopingAdapter<I: CarouselItem> {
    items: heapless::Vec<I, MAX_ITEMS>,
    range: VirtualRange,
    live: Vec<PageView>,
    next_handle: u32,
}

impl<I: CarouselItem> LoopingAdapter<I> {
    /// Construction fails fast on an empty item set so the modulo mapping
    /// can never divide by zero afterwards.
    pub fn new(items: heapless::Vec<I, MAX_ITEMS>, range: VirtualRange) -> Result<Self, CarouselError> {
        if items.is_empty() {
            return Err(CarouselError::EmptyItemSet);
        }
        Ok(Self {
            items,
            range,
            live: Vec::new(),
            next_handle: 0,
        })
    }

    pub fn from_slice(items: &[I], range: VirtualRange) -> Result<Self, CarouselError>
    where
        I: Clone,
    {
        let items = heapless::Vec::from_slice(items)
            .map_err(|_| CarouselError::TooManyItems(items.len()))?;
        Self::new(items, range)
    }

    /// Number of virtual positions the pager may visit.
    pub fn count(&self) -> usize {
        self.range.count()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn range(&self) -> VirtualRange {
        self.range
    }

    /// Maps a virtual position onto the item set.
    ///
    /// Positions outside the range wrap first, so the result is always a
    /// valid item index. Never divides by zero: the item set is non-empty
    /// by construction.
    pub fn real_index(&self, virtual_position: usize) -> usize {
        (virtual_position % self.range.count()) % self.items.len()
    }

    pub fn item_at(&self, virtual_position: usize) -> &I {
        &self.items[self.real_index(virtual_position)]
    }

    /// Creates (or returns the already-live) page view for a position.
    pub fn instantiate(&mut self, virtual_position: usize) -> PageHandle {
        let virtual_position = virtual_position % self.range.count();
        if let Some(view) = self
            .live
            .iter()
            .find(|v| v.virtual_position == virtual_position)
        {
            return view.handle;
        }

        let handle = PageHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let real_index = self.real_index(virtual_position);
        debug!(
            "instantiate page view {:?} at virtual {} (real {})",
            handle, virtual_position, real_index
        );
        self.live.push(PageView {
            handle,
            virtual_position,
            real_index,
        });
        handle
    }

    /// Look up a live view by identity.
    pub fn view(&self, handle: PageHandle) -> Option<&PageView> {
        self.live.iter().find(|v| v.handle == handle)
    }

    /// Drops the view behind `handle`. Idempotent: double release and
    /// release of a handle that was never instantiated are no-ops.
    pub fn release(&mut self, handle: PageHandle) {
        self.live.retain(|v| v.handle != handle);
    }

    /// Releases every view outside the window `{prev, center, next}`.
    pub fn retain_window(&mut self, center: usize) {
        let center = center % self.range.count();
        let prev = self.range.wrapping_prev(center);
        let next = self.range.wrapping_next(center);
        self.live
            .retain(|v| v.virtual_position == center
                || v.virtual_position == prev
                || v.virtual_position == next);
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VIRTUAL_PAGE_COUNT;

    #[derive(Clone)]
    struct TestItem;

    impl CarouselItem for TestItem {
        fn draw_item<D: DrawTarget<Color = Rgb565>>(
            &self,
            _bounds: Rectangle,
            _display: &mut D,
        ) -> Result<(), D::Error> {
            Ok(())
        }
    }

    fn adapter(n: usize) -> LoopingAdapter<TestItem> {
        let mut items = heapless::Vec::new();
        for _ in 0..n {
            items.push(TestItem).ok();
        }
        LoopingAdapter::new(items, VirtualRange::new(DEFAULT_VIRTUAL_PAGE_COUNT)).unwrap()
    }

    #[test]
    fn empty_item_set_is_rejected() {
        let items: heapless::Vec<TestItem, MAX_ITEMS> = heapless::Vec::new();
        let result = LoopingAdapter::new(items, VirtualRange::new(100));
        assert!(matches!(result, Err(CarouselError::EmptyItemSet)));
    }

    #[test]
    fn oversized_item_set_is_rejected() {
        let items = [const { TestItem }; 17];
        let result = LoopingAdapter::from_slice(&items, VirtualRange::new(100));
        assert_eq!(result.err(), Some(CarouselError::TooManyItems(17)));
    }

    #[test]
    fn real_index_is_modular() {
        let a = adapter(3);
        for p in 0..12 {
            assert_eq!(a.real_index(p), p % 3);
        }
    }

    #[test]
    fn real_index_holds_at_midpoint_and_range_end() {
        let a = adapter(3);
        let mid = a.range().aligned_midpoint(3).unwrap();
        assert_eq!(a.real_index(mid), 0, "aligned midpoint must map to item 0");
        assert_eq!(a.real_index(mid + 1), 1);
        assert_eq!(a.real_index(mid + 2), 2);

        let last = a.count() - 1;
        assert_eq!(a.real_index(last), last % 3);
    }

    #[test]
    fn aligned_midpoint_is_near_center_and_aligned() {
        let range = VirtualRange::new(DEFAULT_VIRTUAL_PAGE_COUNT);
        for n in 2..=7 {
            let mid = range.aligned_midpoint(n).unwrap();
            assert_eq!(mid % n, 0);
            assert!(range.count() / 2 - mid < n, "midpoint drifted by a full cycle");
        }
        assert_eq!(
            range.aligned_midpoint(0),
            Err(CarouselError::EmptyItemSet)
        );
    }

    #[test]
    fn wrapping_navigation() {
        let range = VirtualRange::new(10);
        assert_eq!(range.wrapping_next(9), 0);
        assert_eq!(range.wrapping_prev(0), 9);
        assert!(range.is_first(0));
        assert!(range.is_last(9));
    }

    #[test]
    fn wrapping_navigation_survives_a_usize_max_range() {
        // On 32-bit targets the default virtual page count already equals
        // usize::MAX, so stepping must not form `position + count`.
        let range = VirtualRange::new(usize::MAX);
        assert_eq!(range.wrapping_prev(1), 0);
        assert_eq!(range.wrapping_prev(0), usize::MAX - 1);
        assert_eq!(range.wrapping_next(usize::MAX - 1), 0);

        let mid = range.aligned_midpoint(3).unwrap();
        assert_eq!(range.wrapping_prev(mid), mid - 1);
    }

    #[test]
    fn instantiate_is_stable_per_position() {
        let mut a = adapter(3);
        let h1 = a.instantiate(100);
        let h2 = a.instantiate(100);
        assert_eq!(h1, h2, "same live position must yield the same handle");
        let h3 = a.instantiate(101);
        assert_ne!(h1, h3);
    }

    #[test]
    fn release_is_idempotent_and_identity_based() {
        let mut a = adapter(3);
        let h = a.instantiate(100);
        assert_eq!(a.live_count(), 1);

        a.release(h);
        assert_eq!(a.live_count(), 0);
        // Double release and releasing a never-instantiated handle are no-ops.
        a.release(h);
        a.release(PageHandle(999));
        assert_eq!(a.live_count(), 0);

        // A re-instantiated position is a fresh view, not the old one.
        let h2 = a.instantiate(100);
        assert_ne!(h, h2);
    }

    #[test]
    fn retain_window_keeps_neighbors_only() {
        let mut a = adapter(3);
        for p in 100..106 {
            a.instantiate(p);
        }
        a.retain_window(103);
        assert_eq!(a.live_count(), 3);
        let prev = a.instantiate(102);
        let next = a.instantiate(104);
        assert!(a.view(prev).is_some());
        assert!(a.view(next).is_some());
        assert_eq!(a.live_count(), 3, "neighbors were already live");
    }

    #[test]
    fn view_lookup_reports_mapping() {
        let mut a = adapter(3);
        let h = a.instantiate(7);
        let view = a.view(h).unwrap();
        assert_eq!(view.virtual_position(), 7);
        assert_eq!(view.real_index(), 1);
        assert_eq!(view.handle(), h);
    }
}
