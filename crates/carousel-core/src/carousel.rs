//! Carousel controller: wires the pager, the indicator row, and the
//! auto-advance state machine together.

use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};

use crate::adapter::{CarouselItem, LoopingAdapter, VirtualRange};
use crate::auto_advance::{AdvanceState, AutoAdvance};
use crate::config::{CarouselConfig, MAX_ITEMS};
use crate::error::CarouselError;
use crate::indicator::IndicatorRow;
use crate::pager::PagerView;
use crate::ui::{Drawable, ScrollClaim, TouchEvent, TouchPoint};

/// Auto-advancing, infinitely-loopable page carousel with a dot indicator.
///
/// The host owns the widget and drives it from a single UI loop:
/// [`Carousel::handle_touch`] for the touch stream and
/// [`Carousel::update`] once per tick. Both take the current instant so
/// the timing behavior is deterministic under test. Dropping the widget
/// is the teardown; there is no timer handle to cancel separately.
pub struct Carousel<I: CarouselItem> {
    pager: PagerView<I>,
    /// `None` in single-item mode.
    indicator: Option<IndicatorRow>,
    /// `None` in single-item mode.
    auto_advance: Option<AutoAdvance>,
    dirty: bool,
}

impl<I: CarouselItem> Carousel<I> {
    /// Builds the carousel inside `bounds`.
    ///
    /// An empty item set is an error the host may treat as "no carousel".
    /// A single item builds a degraded widget: paging disabled, no
    /// indicator dots, auto-advance never armed.
    pub fn new(
        items: heapless::Vec<I, MAX_ITEMS>,
        bounds: Rectangle,
        config: CarouselConfig,
        now: Instant,
    ) -> Result<Self, CarouselError> {
        let adapter = LoopingAdapter::new(items, VirtualRange::new(config.virtual_page_count))?;
        let item_count = adapter.item_count();

        if item_count == 1 {
            info!("carousel: single item, paging disabled");
            let mut pager = PagerView::new(bounds, adapter, 0);
            pager.set_scroll_enabled(false);
            return Ok(Self {
                pager,
                indicator: None,
                auto_advance: None,
                dirty: true,
            });
        }

        let start = adapter.range().aligned_midpoint(item_count)?;
        let pager = PagerView::new(bounds, adapter, start);
        let indicator = IndicatorRow::centered_in(item_count, bounds)?;

        let mut auto_advance = AutoAdvance::new(config.advance_delay, config.min_dwell);
        auto_advance.arm(now);
        info!(
            "carousel: {} items, starting at virtual {}",
            item_count, start
        );

        Ok(Self {
            pager,
            indicator: Some(indicator),
            auto_advance: Some(auto_advance),
            dirty: true,
        })
    }

    pub fn from_slice(
        items: &[I],
        bounds: Rectangle,
        config: CarouselConfig,
        now: Instant,
    ) -> Result<Self, CarouselError>
    where
        I: Clone,
    {
        let items = heapless::Vec::from_slice(items)
            .map_err(|_| CarouselError::TooManyItems(items.len()))?;
        Self::new(items, bounds, config, now)
    }

    pub fn item_count(&self) -> usize {
        self.pager.adapter().item_count()
    }

    pub fn current_real_index(&self) -> usize {
        self.pager.current_real_index()
    }

    pub fn pager(&self) -> &PagerView<I> {
        &self.pager
    }

    pub fn indicator(&self) -> Option<&IndicatorRow> {
        self.indicator.as_ref()
    }

    pub fn advance_state(&self) -> Option<AdvanceState> {
        self.auto_advance.as_ref().map(|a| a.state())
    }

    /// Check if a point is within the widget's bounds.
    ///
    /// Hosts sharing one touch stream between the carousel and sibling
    /// views hit-test the press point with this and route the rest of the
    /// sequence to whichever view it started on.
    pub fn contains_point(&self, point: TouchPoint) -> bool {
        Drawable::bounds(&self.pager).contains(point.to_point())
    }

    /// Routes one touch event and reports whether an ancestor scroller may
    /// take over the gesture.
    ///
    /// A press suspends auto-advance (cancelling only this carousel's
    /// pending check); a release or cancel schedules a fresh check a full
    /// delay out.
    pub fn handle_touch(&mut self, event: TouchEvent, now: Instant) -> ScrollClaim {
        match event {
            TouchEvent::Press(_) => {
                if let Some(auto) = &mut self.auto_advance {
                    auto.pause();
                }
            }
            TouchEvent::Release(_) | TouchEvent::Cancel => {
                if let Some(auto) = &mut self.auto_advance {
                    auto.resume(now);
                }
            }
            TouchEvent::Drag(_) => {}
        }

        let response = self.pager.handle_touch(event);
        if let Some(position) = response.selected {
            self.on_page_selected(position, now);
        }
        response.claim
    }

    /// One UI-loop tick: fires the auto-advance check if its deadline has
    /// passed and the minimum dwell is satisfied.
    pub fn update(&mut self, now: Instant) {
        let fire = self
            .auto_advance
            .as_mut()
            .is_some_and(|auto| auto.poll(now));
        if fire {
            if let Some(position) = self.pager.advance() {
                self.on_page_selected(position, now);
            }
        }
    }

    /// Page settled on a new virtual position, whether user-dragged or
    /// programmatically advanced.
    fn on_page_selected(&mut self, position: usize, now: Instant) {
        let real_index = self.pager.adapter().real_index(position);
        debug!("page selected: virtual {} real {}", position, real_index);

        if let Some(indicator) = &mut self.indicator {
            indicator.set_active(real_index);
        }
        if let Some(auto) = &mut self.auto_advance {
            auto.note_page_change(now);
        }
        self.dirty = true;
    }
}

impl<I: CarouselItem> Drawable for Carousel<I> {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        Drawable::draw(&self.pager, display)?;
        if let Some(indicator) = &self.indicator {
            Drawable::draw(indicator, display)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        Drawable::bounds(&self.pager)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
            || self.pager.is_dirty()
            || self.indicator.as_ref().is_some_and(|i| i.is_dirty())
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        self.pager.mark_clean();
        if let Some(indicator) = &mut self.indicator {
            indicator.mark_clean();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::TouchPoint;
    use embedded_graphics::mock_display::MockDisplay;

    const BOUNDS: Rectangle = Rectangle::new(Point::zero(), Size::new(200, 100));

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn carousel(n: usize) -> Carousel<Rgb565> {
        let colors = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::YELLOW];
        Carousel::from_slice(&colors[..n], BOUNDS, CarouselConfig::default(), at(0)).unwrap()
    }

    fn touch_cycle(c: &mut Carousel<Rgb565>, from_x: u16, to_x: u16, ms: u64) {
        c.handle_touch(TouchEvent::Press(TouchPoint::new(from_x, 50)), at(ms));
        c.handle_touch(TouchEvent::Drag(TouchPoint::new(to_x, 50)), at(ms));
        c.handle_touch(TouchEvent::Release(TouchPoint::new(to_x, 50)), at(ms));
    }

    #[test]
    fn empty_item_set_does_not_build() {
        let none: [Rgb565; 0] = [];
        let result = Carousel::from_slice(&none, BOUNDS, CarouselConfig::default(), at(0));
        assert_eq!(result.err(), Some(CarouselError::EmptyItemSet));
    }

    #[test]
    fn single_item_disables_paging_indicator_and_timer() {
        let mut c = carousel(1);
        assert!(!c.pager().scroll_enabled());
        assert!(c.indicator().is_none());
        assert_eq!(c.advance_state(), None);

        // Nothing ever advances, even across many ticks.
        for ms in (0..60_000).step_by(500) {
            c.update(at(ms));
        }
        assert_eq!(c.current_real_index(), 0);
    }

    #[test]
    fn builds_with_the_maximum_virtual_range() {
        // The widest range the config knob allows; construction centers the
        // live-view window via wrapping steps and must not overflow.
        let colors = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE];
        let config = CarouselConfig::default().with_virtual_page_count(usize::MAX);
        let c = Carousel::from_slice(&colors, BOUNDS, config, at(0)).unwrap();
        assert_eq!(c.current_real_index(), 0);
        assert_eq!(c.pager().adapter().live_count(), 3);
    }

    #[test]
    fn initial_state_shows_item_zero_and_arms() {
        let c = carousel(3);
        assert_eq!(c.current_real_index(), 0);
        let indicator = c.indicator().unwrap();
        assert!(indicator.is_active(0));
        assert_eq!(indicator.len(), 3);
        assert!(matches!(c.advance_state(), Some(AdvanceState::Armed { .. })));
    }

    #[test]
    fn auto_advance_steps_through_items_in_order() {
        let mut c = carousel(3);
        c.update(at(2999));
        assert_eq!(c.current_real_index(), 0, "too early to advance");

        c.update(at(3000));
        assert_eq!(c.current_real_index(), 1);
        assert!(c.indicator().unwrap().is_active(1));

        c.update(at(6000));
        assert_eq!(c.current_real_index(), 2);

        c.update(at(9000));
        assert_eq!(c.current_real_index(), 0, "wraps modulo the item count");
        assert!(c.indicator().unwrap().is_active(0));
    }

    #[test]
    fn press_before_the_deadline_cancels_the_advance() {
        let mut c = carousel(3);
        c.handle_touch(TouchEvent::Press(TouchPoint::new(100, 50)), at(1000));
        c.update(at(3000));
        c.update(at(10_000));
        assert_eq!(c.current_real_index(), 0, "paused carousel must not advance");

        c.handle_touch(TouchEvent::Release(TouchPoint::new(100, 50)), at(10_000));
        c.update(at(12_999));
        assert_eq!(c.current_real_index(), 0, "fresh delay not elapsed");
        c.update(at(13_000));
        assert_eq!(c.current_real_index(), 1);
    }

    #[test]
    fn cancel_also_resumes_auto_advance() {
        let mut c = carousel(3);
        c.handle_touch(TouchEvent::Press(TouchPoint::new(100, 50)), at(500));
        c.handle_touch(TouchEvent::Cancel, at(600));
        assert!(matches!(c.advance_state(), Some(AdvanceState::Armed { .. })));
        c.update(at(3600));
        assert_eq!(c.current_real_index(), 1);
    }

    #[test]
    fn drag_settle_updates_indicator_and_dwell_reference() {
        let mut c = carousel(3);
        touch_cycle(&mut c, 150, 40, 1000);
        assert_eq!(c.current_real_index(), 1);
        assert!(c.indicator().unwrap().is_active(1));

        // Release re-armed at 1000; when the check fires at 4000 the page
        // has been showing for 3000ms, past the 2000ms dwell.
        c.update(at(4000));
        assert_eq!(c.current_real_index(), 2);
    }

    #[test]
    fn backward_drag_moves_to_the_previous_item() {
        let mut c = carousel(3);
        touch_cycle(&mut c, 40, 150, 1000);
        assert_eq!(c.current_real_index(), 2, "backward from 0 wraps to the last item");
        assert!(c.indicator().unwrap().is_active(2));
    }

    #[test]
    fn hit_test_rejects_points_outside_the_widget() {
        let c = carousel(3);
        assert!(c.contains_point(TouchPoint::new(10, 10)));
        assert!(c.contains_point(TouchPoint::new(199, 99)));
        assert!(
            !c.contains_point(TouchPoint::new(10, 150)),
            "points below the widget belong to the host"
        );
    }

    #[test]
    fn vertical_drag_releases_the_claim_to_the_host() {
        let mut c = carousel(3);
        c.handle_touch(TouchEvent::Press(TouchPoint::new(100, 20)), at(0));
        let claim = c.handle_touch(TouchEvent::Drag(TouchPoint::new(102, 80)), at(0));
        assert_eq!(claim, ScrollClaim::Release);
    }

    #[test]
    fn draws_the_current_item_full_bleed() {
        let colors = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE];
        let bounds = Rectangle::new(Point::zero(), Size::new(64, 64));
        let mut c =
            Carousel::from_slice(&colors, bounds, CarouselConfig::default(), at(0)).unwrap();

        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        Drawable::draw(&c, &mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(32, 32)), Some(Rgb565::RED));

        c.update(at(3000));
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        Drawable::draw(&c, &mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(32, 32)), Some(Rgb565::GREEN));
    }

    #[test]
    fn dirty_tracking_aggregates_children() {
        let mut c = carousel(3);
        assert!(c.is_dirty(), "freshly built widget needs a first draw");
        c.mark_clean();
        assert!(!c.is_dirty());

        c.update(at(3000));
        assert!(c.is_dirty(), "page change must schedule a redraw");
    }
}
