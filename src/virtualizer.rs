use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::geometry::GeometryModel;
use crate::pool::{Slot, SlotPool};
use crate::{FlushOutcome, ScrollCorrection, VirtualizerOptions, VisibleRange};

/// Lifecycle phase of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Not attached to a live tree; all work is skipped.
    Detached,
    /// Attached, no recompute in progress.
    Idle,
    /// A recompute pass is running; further requests coalesce into it.
    Flushing,
}

/// Upper bound on recompute iterations within one `flush()` call. Geometry
/// converges after at most a couple of correction passes; the cap defends
/// against a measurement callback that never settles.
const MAX_FLUSH_PASSES: usize = 8;

/// Renders a very large logical list through a small, bounded pool of
/// physical elements.
///
/// The engine is headless: it holds no UI objects and is driven by the host,
/// which pushes scroll offsets and viewport extents in and supplies
/// create/update/measure callbacks for the slot elements. One `flush()` pass
/// recomputes the rendered range, reassigns slots, measures the newly
/// realized elements, and shifts the scroll offset so the anchor item does
/// not visually jump when measurements refine the estimates.
pub struct Virtualizer<E> {
    options: VirtualizerOptions<E>,
    geometry: GeometryModel,
    pool: SlotPool<E>,
    scroll_offset: u64,
    viewport_extent: u32,
    connected: bool,
    phase: Phase,
    flush_pending: bool,
    dirty: bool,
    range: Option<VisibleRange>,
}

impl<E> Virtualizer<E> {
    /// Creates a detached engine. Nothing is rendered until the connection
    /// observer reports attachment via [`Self::set_connected`].
    pub fn new(options: VirtualizerOptions<E>) -> Self {
        pdebug!(
            size = options.size,
            overrender = options.overrender,
            default_extent = options.default_extent,
            "Virtualizer::new"
        );
        Self {
            geometry: GeometryModel::new(options.size, options.default_extent),
            pool: SlotPool::new(),
            scroll_offset: options.initial_scroll_offset,
            viewport_extent: options.initial_viewport_extent,
            connected: false,
            phase: Phase::Detached,
            flush_pending: false,
            dirty: false,
            range: None,
            options,
        }
    }

    pub fn options(&self) -> &VirtualizerOptions<E> {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn size(&self) -> usize {
        self.options.size
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    /// The rendered range (visible items plus overrender buffer), or `None`
    /// when nothing is realized.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.range
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        self.range.map(|r| r.first)
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.range.map(|r| r.last)
    }

    pub fn total_extent(&self) -> u64 {
        self.geometry.total_extent()
    }

    /// Best-known cumulative offset of the start of `index`.
    pub fn item_offset(&self, index: usize) -> Option<u64> {
        (index < self.options.size).then(|| self.geometry.offset_of(index))
    }

    pub fn item_extent(&self, index: usize) -> Option<u32> {
        self.geometry.extent_of(index)
    }

    pub fn estimate_extent(&self) -> u32 {
        self.geometry.estimate_extent()
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.geometry
            .total_extent()
            .saturating_sub(self.viewport_extent as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Number of physical slots created so far.
    pub fn pool_capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of slots currently carrying a logical index.
    pub fn live_slot_count(&self) -> usize {
        self.pool.live_count()
    }

    /// Visits every slot, released ones included, in pool order.
    pub fn for_each_slot(&self, f: impl FnMut(&Slot<E>)) {
        self.pool.for_each_slot(f);
    }

    /// The element currently representing `index`, if that index is realized.
    pub fn element_for_index(&self, index: usize) -> Option<&E> {
        let id = self.pool.slot_for_index(index)?;
        Some(self.pool.slot(id).element())
    }

    /// Connection-observer transition. Attaching runs any deferred pass;
    /// detaching freezes the pool and abandons pending work.
    pub fn set_connected(&mut self, attached: bool) -> FlushOutcome {
        if self.connected == attached {
            return FlushOutcome::Coalesced;
        }
        self.connected = attached;
        if !attached {
            pdebug!("detached");
            self.phase = Phase::Detached;
            return FlushOutcome::Detached;
        }
        pdebug!(pending = self.flush_pending, "attached");
        self.phase = Phase::Idle;
        self.flush()
    }

    /// Host-pushed scroll position (from the scroll target's offset).
    pub fn set_scroll_offset(&mut self, offset: u64) -> FlushOutcome {
        if self.scroll_offset == offset {
            return FlushOutcome::Coalesced;
        }
        ptrace!(offset, "set_scroll_offset");
        self.scroll_offset = offset;
        self.flush()
    }

    /// Host-pushed viewport extent (resize signal). A transition away from
    /// zero retries a deferred pass.
    pub fn set_viewport_extent(&mut self, extent: u32) -> FlushOutcome {
        if self.viewport_extent == extent {
            return FlushOutcome::Coalesced;
        }
        ptrace!(extent, "set_viewport_extent");
        self.viewport_extent = extent;
        self.flush()
    }

    /// Changes the logical item count. Shrinking clamps the scroll offset so
    /// the view cannot point past the new end, and pulls the rendered range
    /// back inside `[0, size)`.
    pub fn set_size(&mut self, size: usize) -> FlushOutcome {
        if self.options.size == size {
            return FlushOutcome::Coalesced;
        }
        pdebug!(size, prev = self.options.size, "set_size");
        self.options.size = size;
        self.geometry.set_size(size);
        self.scroll_offset = self.clamp_scroll_offset(self.scroll_offset);
        self.flush()
    }

    /// Forces a re-render of the currently realized range without moving the
    /// scroll position. Used when item data changed in place.
    pub fn update(&mut self) -> FlushOutcome {
        self.dirty = true;
        self.flush()
    }

    /// Scrolls so that `index` (clamped to `[0, size)`) starts at the top of
    /// the viewport, then flushes. Returns the applied offset.
    pub fn scroll_to_index(&mut self, index: usize) -> u64 {
        if self.options.size == 0 {
            return self.scroll_offset;
        }
        let index = index.min(self.options.size - 1);
        let offset = self.clamp_scroll_offset(self.geometry.offset_of(index));
        ptrace!(index, offset, "scroll_to_index");
        self.scroll_offset = offset;
        self.flush();
        self.scroll_offset
    }

    /// Recomputes the rendered range and slot assignments.
    ///
    /// Reentrant requests while a pass is running are coalesced into it; a
    /// zero-extent viewport defers the pass until the next resize signal; a
    /// detached engine skips the work entirely until reattached.
    pub fn flush(&mut self) -> FlushOutcome {
        if !self.connected {
            self.flush_pending = true;
            return FlushOutcome::Detached;
        }
        if self.viewport_extent == 0 {
            self.flush_pending = true;
            return FlushOutcome::Deferred;
        }
        if self.phase == Phase::Flushing {
            self.flush_pending = true;
            return FlushOutcome::Coalesced;
        }

        self.phase = Phase::Flushing;
        self.flush_pending = true;
        let mut passes = 0;
        while self.flush_pending && passes < MAX_FLUSH_PASSES {
            self.flush_pending = false;
            self.flush_once();
            passes += 1;
        }
        if self.flush_pending {
            pwarn!(passes, "measurements did not settle; retrying on the next signal");
        }
        self.phase = Phase::Idle;
        FlushOutcome::Flushed
    }

    fn flush_once(&mut self) {
        // Read phase: current scroll position and viewport extent.
        self.scroll_offset = self.clamp_scroll_offset(self.scroll_offset);
        let offset = self.scroll_offset;
        let viewport = self.viewport_extent as u64;
        let size = self.options.size;

        if size == 0 {
            self.pool.release_all();
            self.dirty = false;
            self.publish_range(None);
            return;
        }

        // Visible range, then the overrender buffer on both sides.
        let vis_first = self.geometry.index_at_offset(offset).unwrap_or(0);
        let vis_last = self
            .geometry
            .index_at_offset(offset + viewport - 1)
            .unwrap_or(vis_first)
            .max(vis_first);
        let overrender = self.options.overrender;
        let first = vis_first.saturating_sub(overrender);
        let last = (vis_last + overrender).min(size - 1);

        let create = Arc::clone(&self.options.create_elements);
        self.pool.ensure_capacity(last - first + 1, |n| create(n));

        // Assign slots: keep a slot already carrying the index (re-updating
        // it only when data changed), otherwise recycle the nearest free or
        // least-recently-used slot.
        let update = Arc::clone(&self.options.update_element);
        let mut newly: Vec<(usize, usize)> = Vec::new();
        for index in first..=last {
            match self.pool.slot_for_index(index) {
                Some(id) => {
                    if self.dirty {
                        // A forced refresh can change the rendered extent just
                        // like a reassignment, so it is re-measured too.
                        self.pool.assign(id, index, |e, i| update(e, i));
                        newly.push((id, index));
                    } else {
                        self.pool.touch(id);
                    }
                }
                None => {
                    let Some(id) = self.pool.reusable_slot(first, last) else {
                        pwarn!(index, "no reusable slot; skipping index");
                        debug_assert!(false, "no reusable slot for index {index}");
                        continue;
                    };
                    self.pool.assign(id, index, |e, i| update(e, i));
                    newly.push((id, index));
                }
            }
        }
        self.dirty = false;
        self.pool.release_outside(first, last);

        self.measure_assigned(&newly, vis_first);
        self.publish_range(Some(VisibleRange { first, last }));
    }

    /// Measures slots assigned during this pass and applies anchor correction.
    ///
    /// All layout reads happen before any geometry write. The anchor is the
    /// item whose span contains the viewport top; measured items fully before
    /// it shift its start, so the scroll offset moves by the same amount and
    /// the anchor keeps its visual position exactly. The anchor's own extent
    /// change leaves its start untouched and needs no correction.
    fn measure_assigned(&mut self, newly: &[(usize, usize)], anchor_index: usize) {
        let Some(measure) = self.options.measure_element.clone() else {
            return;
        };
        let mut readings: Vec<(usize, u32)> = Vec::with_capacity(newly.len());
        for &(id, index) in newly {
            let extent = measure(self.pool.slot(id).element(), index);
            readings.push((index, extent));
        }

        let mut correction = 0i64;
        let mut changed = false;
        for (index, extent) in readings {
            let delta = self.geometry.record_extent(index, extent);
            if delta != 0 {
                changed = true;
                if index < anchor_index {
                    correction += delta;
                }
            }
        }
        if changed {
            // The refined geometry may map the offset to a different range;
            // run another pass so a flush always settles on a fixed point.
            self.flush_pending = true;
        }
        if correction == 0 {
            return;
        }

        let shifted = if correction > 0 {
            self.scroll_offset.saturating_add(correction as u64)
        } else {
            self.scroll_offset.saturating_sub(correction.unsigned_abs())
        };
        self.scroll_offset = self.clamp_scroll_offset(shifted);
        ptrace!(
            delta = correction,
            offset = self.scroll_offset,
            "scroll correction"
        );
        if let Some(cb) = &self.options.on_scroll_correction {
            cb(ScrollCorrection {
                delta: correction,
                offset: self.scroll_offset,
            });
        }
    }

    fn publish_range(&mut self, range: Option<VisibleRange>) {
        if self.range == range {
            return;
        }
        self.range = range;
        if let Some(cb) = &self.options.on_range_change {
            cb(range);
        }
    }
}

impl<E> core::fmt::Debug for Virtualizer<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Virtualizer")
            .field("size", &self.options.size)
            .field("phase", &self.phase)
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_extent", &self.viewport_extent)
            .field("range", &self.range)
            .field("pool_capacity", &self.pool.capacity())
            .finish_non_exhaustive()
    }
}
