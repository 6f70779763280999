//! Compile-time defaults and the runtime carousel configuration.

use embassy_time::Duration;

/// Delay between arming an auto-advance check and the check firing.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(3000);

/// Minimum time the current page must have been displayed before an
/// auto-advance check is allowed to page forward.
pub const MIN_DWELL: Duration = Duration::from_millis(2000);

/// Indicator dot diameter in pixels.
pub const DOT_DIAMETER_PX: u32 = 5;

/// Gap before every indicator dot except the first, in pixels.
pub const DOT_SPACING_PX: u32 = 10;

/// Vertical inset of the indicator row from the bottom of the pager.
pub const DOT_BOTTOM_INSET_PX: u32 = 12;

/// Maximum number of items a carousel can hold (indicator capacity).
pub const MAX_ITEMS: usize = 16;

/// Default virtual page count.
///
/// Large enough that, starting from the aligned midpoint, neither end of
/// the range is reachable in any realistic session. Paging past an end
/// wraps by ordinary modular arithmetic; see [`crate::adapter::VirtualRange`].
pub const DEFAULT_VIRTUAL_PAGE_COUNT: usize = u32::MAX as usize;

/// A drag must cover this fraction of the pager width to settle onto the
/// neighboring page; shorter drags snap back.
pub const SETTLE_FRACTION: u32 = 4;

/// Runtime carousel configuration.
///
/// All fields default to the compile-time constants above. The virtual
/// page count is the one knob tests and unusual hosts need to override.
#[derive(Debug, Clone, Copy)]
pub struct CarouselConfig {
    /// Re-arm delay between auto-advance checks.
    pub advance_delay: Duration,
    /// Minimum dwell on a page before auto-advance may fire.
    pub min_dwell: Duration,
    /// Size of the virtual position range.
    pub virtual_page_count: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            advance_delay: AUTO_ADVANCE_DELAY,
            min_dwell: MIN_DWELL,
            virtual_page_count: DEFAULT_VIRTUAL_PAGE_COUNT,
        }
    }
}

impl CarouselConfig {
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn with_min_dwell(mut self, dwell: Duration) -> Self {
        self.min_dwell = dwell;
        self
    }

    pub fn with_virtual_page_count(mut self, count: usize) -> Self {
        self.virtual_page_count = count;
        self
    }
}
