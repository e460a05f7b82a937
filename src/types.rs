/// Inclusive range of logical indices currently realized by the engine.
///
/// This is the rendered range: the visible items plus the overrender buffer on
/// both sides. It is never empty; an engine with no items reports `None`
/// instead of a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub first: usize,
    pub last: usize, // inclusive
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.last.saturating_sub(self.first) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index <= self.last
    }
}

/// Result of a `flush()` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlushOutcome {
    /// A full recompute pass ran.
    Flushed,
    /// The viewport has no extent yet; the pass is retried on the next resize
    /// signal. This is a precondition-not-met state, not an error.
    Deferred,
    /// The engine is detached from a live tree; work is skipped until it is
    /// reattached.
    Detached,
    /// A pass was already in progress; the request was coalesced into it.
    Coalesced,
}

/// Emitted when the engine shifts the scroll offset to keep the anchor item
/// visually stable after measurements changed the geometry above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollCorrection {
    /// Signed offset shift that was applied.
    pub delta: i64,
    /// The corrected (clamped) scroll offset.
    pub offset: u64,
}

/// Direction for cycling keyboard focus through a trap's ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TabDirection {
    Forward,
    Backward,
}
