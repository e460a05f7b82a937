//! A headless list virtualization engine with slot recycling and focus
//! trapping.
//!
//! The engine renders a very large logical list by keeping a small, bounded
//! pool of physical elements and remapping pool slots to logical indices as
//! the viewport scrolls. It is UI-agnostic: a host layer is expected to
//! provide
//! - element create/update/measure callbacks
//! - scroll offsets and the viewport extent
//! - attach/detach lifecycle reports
//!
//! Alongside the virtualizer it ships a focus-trap controller, since
//! overlay-like hosts commonly trap keyboard focus around virtualized content
//! and must rebuild their focus ring whenever slots are recycled.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod connection;
mod focus;
mod geometry;
mod options;
mod pool;
mod types;
mod virtualizer;


pub use connection::ConnectionObserver;
pub use focus::{FocusNode, FocusTrap, focusable_elements};
pub use geometry::GeometryModel;
pub use options::{
    CreateElements, MeasureElement, OnRangeChange, OnScrollCorrection, UpdateElement,
    VirtualizerOptions,
};
pub use pool::{Slot, SlotPool};
pub use types::{FlushOutcome, ScrollCorrection, TabDirection, VisibleRange};
pub use virtualizer::{Phase, Virtualizer};
