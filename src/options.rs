use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{ScrollCorrection, VisibleRange};

/// Factory invoked to materialize `count` new slot elements. The returned
/// elements are owned by the pool for the life of the engine.
pub type CreateElements<E> = Arc<dyn Fn(usize) -> Vec<E> + Send + Sync>;

/// Mutates an element to represent the logical item at `index`.
pub type UpdateElement<E> = Arc<dyn Fn(&mut E, usize) + Send + Sync>;

/// Reads the rendered scroll-axis extent of an element representing `index`.
/// This is the engine's one layout read per realized slot.
pub type MeasureElement<E> = Arc<dyn Fn(&E, usize) -> u32 + Send + Sync>;

/// Fired after a flush whose rendered range differs from the previous one.
pub type OnRangeChange = Arc<dyn Fn(Option<VisibleRange>) + Send + Sync>;

/// Fired when the engine shifts the scroll offset for anchor stability, so
/// dependent absolute-positioned decoration can recompute.
pub type OnScrollCorrection = Arc<dyn Fn(ScrollCorrection) + Send + Sync>;

/// Configuration for [`crate::Virtualizer`].
///
/// Cheap to clone: callbacks are stored in `Arc`s.
pub struct VirtualizerOptions<E> {
    /// Logical item count.
    pub size: usize,
    pub create_elements: CreateElements<E>,
    pub update_element: UpdateElement<E>,
    /// Optional measurement hook. Without it the engine keeps using the
    /// default extent for every item and never corrects the scroll position.
    pub measure_element: Option<MeasureElement<E>>,
    /// Extra items realized on each side of the viewport to mask pop-in.
    pub overrender: usize,
    /// Extent assumed for an item before anything has been measured.
    pub default_extent: u32,
    pub initial_scroll_offset: u64,
    pub initial_viewport_extent: u32,
    pub on_range_change: Option<OnRangeChange>,
    pub on_scroll_correction: Option<OnScrollCorrection>,
}

impl<E> VirtualizerOptions<E> {
    pub fn new(
        size: usize,
        create_elements: impl Fn(usize) -> Vec<E> + Send + Sync + 'static,
        update_element: impl Fn(&mut E, usize) + Send + Sync + 'static,
    ) -> Self {
        Self {
            size,
            create_elements: Arc::new(create_elements),
            update_element: Arc::new(update_element),
            measure_element: None,
            overrender: 1,
            default_extent: 100,
            initial_scroll_offset: 0,
            initial_viewport_extent: 0,
            on_range_change: None,
            on_scroll_correction: None,
        }
    }

    pub fn with_measure_element(
        mut self,
        f: Option<impl Fn(&E, usize) -> u32 + Send + Sync + 'static>,
    ) -> Self {
        self.measure_element = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_overrender(mut self, overrender: usize) -> Self {
        self.overrender = overrender;
        self
    }

    pub fn with_default_extent(mut self, default_extent: u32) -> Self {
        self.default_extent = default_extent;
        self
    }

    pub fn with_initial_scroll_offset(mut self, offset: u64) -> Self {
        self.initial_scroll_offset = offset;
        self
    }

    pub fn with_initial_viewport_extent(mut self, extent: u32) -> Self {
        self.initial_viewport_extent = extent;
        self
    }

    pub fn with_on_range_change(
        mut self,
        f: Option<impl Fn(Option<VisibleRange>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_range_change = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scroll_correction(
        mut self,
        f: Option<impl Fn(ScrollCorrection) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll_correction = f.map(|f| Arc::new(f) as _);
        self
    }
}

impl<E> Clone for VirtualizerOptions<E> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            create_elements: Arc::clone(&self.create_elements),
            update_element: Arc::clone(&self.update_element),
            measure_element: self.measure_element.clone(),
            overrender: self.overrender,
            default_extent: self.default_extent,
            initial_scroll_offset: self.initial_scroll_offset,
            initial_viewport_extent: self.initial_viewport_extent,
            on_range_change: self.on_range_change.clone(),
            on_scroll_correction: self.on_scroll_correction.clone(),
        }
    }
}

impl<E> core::fmt::Debug for VirtualizerOptions<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizerOptions")
            .field("size", &self.size)
            .field("overrender", &self.overrender)
            .field("default_extent", &self.default_extent)
            .field("initial_scroll_offset", &self.initial_scroll_offset)
            .field("initial_viewport_extent", &self.initial_viewport_extent)
            .finish_non_exhaustive()
    }
}
