//! Hardware-independent infinite-looping carousel widget.
//!
//! This crate contains all platform-agnostic logic for an auto-advancing,
//! infinitely-loopable page carousel: the looping position adapter, the
//! paging view with ancestor-scroll gesture arbitration, the dot indicator
//! row, and the auto-advance timing state machine.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod adapter;
pub mod auto_advance;
pub mod carousel;
pub mod config;
pub mod error;
pub mod indicator;
pub mod pager;
pub mod ui;
