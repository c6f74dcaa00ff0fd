//! In-memory host and input source that record what the engine asks of them.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::host::{InputSource, SplitHost, StyleDeclaration};
use crate::{Cursor, Dimension, Direction};

/// Handle for a gutter created by [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GutterHandle {
    pub id: u32,
    pub index: usize,
    pub direction: Direction,
}

/// Host whose regions are plain `usize` ids on a fixed-length track.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub track_px: f64,
    pub region_styles: FxHashMap<usize, StyleDeclaration>,
    pub gutter_styles: FxHashMap<u32, StyleDeclaration>,
    /// Attached gutters as `(gutter id, region it precedes)`.
    pub attached: Vec<(u32, usize)>,
    pub created: u32,
    pub removed: u32,
    pub region_style_writes: usize,
    pub cursor: Option<Cursor>,
}

impl RecordingHost {
    #[must_use]
    pub fn with_track(track_px: f64) -> Self {
        Self {
            track_px,
            ..Self::default()
        }
    }

    /// Value of `property` in the style last applied to region `id`.
    #[must_use]
    pub fn region_style(&self, id: usize, property: &str) -> Option<&str> {
        self.region_styles.get(&id).and_then(|style| style.get(property))
    }

    #[must_use]
    pub fn live_gutters(&self) -> usize {
        self.attached.len()
    }
}

impl SplitHost for RecordingHost {
    type Element = usize;
    type Gutter = GutterHandle;

    fn create_gutter(&mut self, index: usize, direction: Direction) -> GutterHandle {
        self.created += 1;
        GutterHandle {
            id: self.created,
            index,
            direction,
        }
    }

    fn insert_gutter(&mut self, gutter: &GutterHandle, before: &usize) {
        self.attached.push((gutter.id, *before));
    }

    fn remove_gutter(&mut self, gutter: GutterHandle) {
        self.removed += 1;
        self.attached.retain(|(id, _)| *id != gutter.id);
        self.gutter_styles.remove(&gutter.id);
    }

    fn apply_region_style(&mut self, element: &usize, style: &StyleDeclaration) {
        self.region_style_writes += 1;
        self.region_styles.insert(*element, style.clone());
    }

    fn apply_gutter_style(&mut self, gutter: &GutterHandle, style: &StyleDeclaration) {
        self.gutter_styles.insert(gutter.id, style.clone());
    }

    fn clear_region_style(&mut self, element: &usize, _dimension: Dimension) {
        self.region_styles.remove(element);
    }

    fn track_length(&self, _elements: &[usize], _dimension: Dimension) -> f64 {
        self.track_px
    }

    fn set_drag_feedback(&mut self, cursor: Option<Cursor>) {
        self.cursor = cursor;
    }
}

/// Input source that tracks which gutters are subscribed.
#[derive(Debug, Default)]
pub struct RecordingInput {
    pub subscribed: FxHashSet<usize>,
    pub subscribe_calls: usize,
    pub unsubscribe_calls: usize,
}

impl InputSource<GutterHandle> for RecordingInput {
    fn subscribe(&mut self, index: usize, _gutter: &GutterHandle) {
        self.subscribe_calls += 1;
        self.subscribed.insert(index);
    }

    fn unsubscribe(&mut self, index: usize, _gutter: &GutterHandle) {
        self.unsubscribe_calls += 1;
        self.subscribed.remove(&index);
    }
}
