//! Desktop simulator for the carousel widget.
//!
//! Renders a carousel of colored slides in an SDL2 window via
//! `embedded-graphics-simulator`, forwarding mouse events as touch events.
//! The region below the carousel belongs to a host "ancestor scroller":
//! it only scrolls when the carousel releases its gesture claim, which
//! makes the scroll-conflict arbitration directly observable.
//!
//! # Bindings
//!
//! | Input            | Action                                  |
//! |------------------|-----------------------------------------|
//! | Mouse drag ←/→   | Page the carousel                       |
//! | Mouse drag ↑/↓   | Scroll the host content                 |
//! | Hold the button  | Pause auto-advance                      |
//! | Q / Esc          | Quit                                    |

use std::time::{Duration as StdDuration, Instant as StdInstant};

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Text};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{debug, info};

use carousel_core::adapter::CarouselItem;
use carousel_core::carousel::Carousel;
use carousel_core::config::CarouselConfig;
use carousel_core::ui::{Drawable, ScrollClaim, TouchEvent, TouchPoint};
use embassy_time::Instant;

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DISPLAY_WIDTH_PX: u32 = 320;
const DISPLAY_HEIGHT_PX: u32 = 240;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: StdDuration = StdDuration::from_millis(33);

/// Carousel region: upper part of the screen.
const CAROUSEL_HEIGHT_PX: u32 = 180;

// ---------------------------------------------------------------------------
// Slides
// ---------------------------------------------------------------------------

/// A solid-color slide with a centered label.
#[derive(Clone)]
struct Slide {
    color: Rgb565,
    label: &'static str,
}

impl CarouselItem for Slide {
    fn draw_item<D: DrawTarget<Color = Rgb565>>(
        &self,
        bounds: Rectangle,
        display: &mut D,
    ) -> Result<(), D::Error> {
        self.color.draw_item(bounds, display)?;

        let style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
        Text::with_alignment(self.label, bounds.center(), style, Alignment::Center)
            .draw(display)?;
        Ok(())
    }
}

fn slides() -> [Slide; 4] {
    [
        Slide {
            color: Rgb565::new(20, 10, 8),
            label: "Slide 1",
        },
        Slide {
            color: Rgb565::new(6, 30, 12),
            label: "Slide 2",
        },
        Slide {
            color: Rgb565::new(8, 18, 24),
            label: "Slide 3",
        },
        Slide {
            color: Rgb565::new(18, 30, 6),
            label: "Slide 4",
        },
    ]
}

// ---------------------------------------------------------------------------
// Host scroller
// ---------------------------------------------------------------------------

const HOST_LINES: &[&str] = &[
    "Host content line 1",
    "Host content line 2",
    "Host content line 3",
    "Host content line 4",
    "Host content line 5",
    "Host content line 6",
    "Host content line 7",
    "Host content line 8",
];

const HOST_LINE_STEP_PX: i32 = 14;

/// The ancestor vertical scroller. It only consumes drag events the
/// carousel has released its claim on.
struct HostScroller {
    bounds: Rectangle,
    offset: i32,
    last_y: Option<i32>,
}

impl HostScroller {
    fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            offset: 0,
            last_y: None,
        }
    }

    fn max_offset(&self) -> i32 {
        let content = HOST_LINES.len() as i32 * HOST_LINE_STEP_PX;
        (content - self.bounds.size.height as i32).max(0)
    }

    /// Consume a drag the carousel released. Returns true when the offset
    /// changed and a redraw is needed.
    fn scroll_with(&mut self, point: TouchPoint) -> bool {
        let y = point.y as i32;
        let moved = match self.last_y {
            Some(last) => {
                let next = (self.offset + (last - y)).clamp(0, self.max_offset());
                let changed = next != self.offset;
                self.offset = next;
                changed
            }
            None => false,
        };
        self.last_y = Some(y);
        moved
    }

    fn end_gesture(&mut self) {
        self.last_y = None;
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let mut clipped = display.clipped(&self.bounds);
        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::CSS_LIGHT_GRAY);
        for (i, line) in HOST_LINES.iter().enumerate() {
            let y = self.bounds.top_left.y + 10 + i as i32 * HOST_LINE_STEP_PX - self.offset;
            Text::new(line, Point::new(self.bounds.top_left.x + 8, y), style)
                .draw(&mut clipped)?;
        }
        Ok(())
    }
}

/// Which view owns the active mouse gesture. Decided by hit-testing the
/// press point; the rest of the sequence follows the same target.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureTarget {
    Carousel,
    Host,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting carousel simulator");
    info!(
        "Display: {}×{} (scale {}×), drag horizontally to page, vertically to scroll the host",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );

    // SDL2 display and window
    let mut display =
        SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Carousel Simulator", &output_settings);

    let carousel_bounds = Rectangle::new(
        Point::zero(),
        Size::new(DISPLAY_WIDTH_PX, CAROUSEL_HEIGHT_PX),
    );
    let host_bounds = Rectangle::new(
        Point::new(0, CAROUSEL_HEIGHT_PX as i32),
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX - CAROUSEL_HEIGHT_PX),
    );

    let mut carousel = match Carousel::from_slice(
        &slides(),
        carousel_bounds,
        CarouselConfig::default(),
        Instant::now(),
    ) {
        Ok(carousel) => carousel,
        Err(e) => {
            // Matches the widget's degraded-mode policy: no items, no carousel.
            log::warn!("carousel not created: {}", e);
            return;
        }
    };
    let mut host = HostScroller::new(host_bounds);

    let mut gesture_target: Option<GestureTarget> = None;

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(Rgb565::BLACK);
    let _ = host.draw(&mut display);
    let _ = Drawable::draw(&carousel, &mut display);
    carousel.mark_clean();
    window.update(&display);
    let mut needs_redraw = false;

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = StdInstant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                }

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let touch_point = to_touch_point(point);
                    if carousel.contains_point(touch_point) {
                        gesture_target = Some(GestureTarget::Carousel);
                        carousel.handle_touch(TouchEvent::Press(touch_point), Instant::now());
                    } else {
                        // The press landed on the host content; the widget
                        // never sees this sequence.
                        gesture_target = Some(GestureTarget::Host);
                    }
                }

                SimulatorEvent::MouseMove { point } => {
                    let touch_point = to_touch_point(point);
                    match gesture_target {
                        Some(GestureTarget::Carousel) => {
                            let claim = carousel
                                .handle_touch(TouchEvent::Drag(touch_point), Instant::now());
                            match claim {
                                ScrollClaim::Release => {
                                    if host.scroll_with(touch_point) {
                                        needs_redraw = true;
                                    }
                                }
                                ScrollClaim::Retain => {
                                    debug!("carousel retains the gesture");
                                }
                            }
                        }
                        Some(GestureTarget::Host) => {
                            if host.scroll_with(touch_point) {
                                needs_redraw = true;
                            }
                        }
                        None => {}
                    }
                }

                SimulatorEvent::MouseButtonUp { point, .. } => {
                    if gesture_target == Some(GestureTarget::Carousel) {
                        let touch = TouchEvent::Release(to_touch_point(point));
                        carousel.handle_touch(touch, Instant::now());
                    }
                    host.end_gesture();
                    gesture_target = None;
                }

                _ => {}
            }
        }

        // --- Auto-advance tick --------------------------------------------
        carousel.update(Instant::now());

        // --- Render -------------------------------------------------------
        if needs_redraw || carousel.is_dirty() {
            let _ = display.clear(Rgb565::BLACK);
            if let Err(e) = host.draw(&mut display) {
                log::error!("Host draw error: {:?}", e);
            }
            if let Err(e) = Drawable::draw(&carousel, &mut display) {
                log::error!("Draw error: {:?}", e);
            }
            carousel.mark_clean();
            needs_redraw = false;
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}

fn to_touch_point(point: Point) -> TouchPoint {
    TouchPoint::new(point.x.max(0) as u16, point.y.max(0) as u16)
}
