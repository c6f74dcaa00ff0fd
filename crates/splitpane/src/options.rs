//! Split configuration and host hooks.
//!
//! [`SplitOptions`] holds plain data and can be loaded from a JSON document
//! with [`SplitOptions::from_json`]. [`SplitHooks`] holds the style functions
//! and lifecycle callbacks, which are code and so live apart from the data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};
use crate::host::{StyleDeclaration, default_element_style, default_gutter_style};
use crate::size::MinSizes;
use crate::{Cursor, Dimension, Direction};

pub const DEFAULT_MIN_SIZE_PX: f64 = 100.0;
pub const DEFAULT_GUTTER_SIZE_PX: f64 = 10.0;
pub const DEFAULT_SNAP_OFFSET_PX: f64 = 30.0;
pub const DEFAULT_DRAG_INTERVAL_PX: f64 = 1.0;

/// Minimum region size in pixels, shared or per region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinSize {
    Uniform(f64),
    PerRegion(Vec<f64>),
}

impl Default for MinSize {
    fn default() -> Self {
        Self::Uniform(DEFAULT_MIN_SIZE_PX)
    }
}

impl From<f64> for MinSize {
    fn from(value: f64) -> Self {
        Self::Uniform(value)
    }
}

impl From<Vec<f64>> for MinSize {
    fn from(value: Vec<f64>) -> Self {
        Self::PerRegion(value)
    }
}

/// Where a gutter sits relative to the split point.
///
/// Only the outer regions are affected: interior regions always give up the
/// full gutter thickness, while the first and last regions give up all, half
/// or none of it depending on alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GutterAlign {
    Start,
    #[default]
    Center,
    End,
}

/// Data options for a split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitOptions {
    /// Initial sizes; an equal split when absent.
    pub sizes: Option<Vec<f64>>,
    pub min_size: MinSize,
    /// Grow initial sizes so every region meets its minimum.
    pub expand_to_min: bool,
    pub gutter_size: f64,
    pub gutter_align: GutterAlign,
    pub snap_offset: f64,
    pub drag_interval: f64,
    pub direction: Direction,
    /// Drag cursor; the direction's default when absent.
    pub cursor: Option<Cursor>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            sizes: None,
            min_size: MinSize::default(),
            expand_to_min: false,
            gutter_size: DEFAULT_GUTTER_SIZE_PX,
            gutter_align: GutterAlign::default(),
            snap_offset: DEFAULT_SNAP_OFFSET_PX,
            drag_interval: DEFAULT_DRAG_INTERVAL_PX,
            direction: Direction::default(),
            cursor: None,
        }
    }
}

impl SplitOptions {
    /// Default options split horizontally.
    pub fn horizontal() -> Self {
        Self::default()
    }

    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
            ..Self::default()
        }
    }

    /// Parse options from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn sizes(mut self, sizes: impl Into<Vec<f64>>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    pub fn min_size(mut self, min_size: impl Into<MinSize>) -> Self {
        self.min_size = min_size.into();
        self
    }

    pub fn expand_to_min(mut self, expand: bool) -> Self {
        self.expand_to_min = expand;
        self
    }

    pub fn gutter_size(mut self, px: f64) -> Self {
        self.gutter_size = px;
        self
    }

    pub fn gutter_align(mut self, align: GutterAlign) -> Self {
        self.gutter_align = align;
        self
    }

    pub fn snap_offset(mut self, px: f64) -> Self {
        self.snap_offset = px;
        self
    }

    pub fn drag_interval(mut self, px: f64) -> Self {
        self.drag_interval = px;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Check the options against a split of `count` regions.
    pub fn validate(&self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(SplitError::NoRegions);
        }
        if let Some(sizes) = &self.sizes
            && sizes.len() != count
        {
            return Err(SplitError::SizeCountMismatch {
                expected: count,
                actual: sizes.len(),
            });
        }
        match &self.min_size {
            MinSize::Uniform(min) => non_negative("minSize", *min)?,
            MinSize::PerRegion(mins) => {
                if mins.len() != count {
                    return Err(SplitError::MinSizeCountMismatch {
                        expected: count,
                        actual: mins.len(),
                    });
                }
                for min in mins {
                    non_negative("minSize", *min)?;
                }
            }
        }
        non_negative("gutterSize", self.gutter_size)?;
        non_negative("snapOffset", self.snap_offset)?;
        if !(self.drag_interval.is_finite() && self.drag_interval > 0.0) {
            return Err(SplitError::InvalidOption {
                field: "dragInterval",
                value: self.drag_interval,
            });
        }
        Ok(())
    }

    /// Per-region minimums for `count` regions.
    #[must_use]
    pub fn min_sizes(&self, count: usize) -> MinSizes {
        match &self.min_size {
            MinSize::Uniform(min) => MinSizes::uniform(count, *min),
            MinSize::PerRegion(mins) => MinSizes::per_region(mins.iter().copied()),
        }
    }

    /// Cursor shown while dragging.
    #[must_use]
    pub fn resolved_cursor(&self) -> Cursor {
        self.cursor.unwrap_or_else(|| self.direction.default_cursor())
    }

    /// Gutter thickness region `index` of `count` gives up in its style.
    #[must_use]
    pub fn region_gutter_size(&self, index: usize, count: usize) -> f64 {
        let full = self.gutter_size;
        let is_first = index == 0;
        let is_last = index + 1 == count;
        if count < 2 {
            return 0.0;
        }
        match (is_first, is_last, self.gutter_align) {
            (true, _, GutterAlign::End) => 0.0,
            (true, _, GutterAlign::Center) => full / 2.0,
            (_, true, GutterAlign::Start) => 0.0,
            (_, true, GutterAlign::Center) => full / 2.0,
            _ => full,
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SplitError::InvalidOption { field, value })
    }
}

pub type ElementStyleFn = Box<dyn Fn(Dimension, f64, f64) -> StyleDeclaration>;
pub type GutterStyleFn = Box<dyn Fn(Dimension, f64) -> StyleDeclaration>;
pub type DragCallback = Box<dyn FnMut(&[f64])>;

/// Style functions and drag lifecycle callbacks.
pub struct SplitHooks {
    pub(crate) element_style: ElementStyleFn,
    pub(crate) gutter_style: GutterStyleFn,
    pub(crate) on_drag: Option<DragCallback>,
    pub(crate) on_drag_start: Option<DragCallback>,
    pub(crate) on_drag_end: Option<DragCallback>,
}

impl Default for SplitHooks {
    fn default() -> Self {
        Self {
            element_style: Box::new(default_element_style),
            gutter_style: Box::new(default_gutter_style),
            on_drag: None,
            on_drag_start: None,
            on_drag_end: None,
        }
    }
}

impl SplitHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style for a region: `(dimension, size_percent, gutter_px)`.
    pub fn element_style(
        mut self,
        f: impl Fn(Dimension, f64, f64) -> StyleDeclaration + 'static,
    ) -> Self {
        self.element_style = Box::new(f);
        self
    }

    /// Style for a gutter: `(dimension, gutter_px)`.
    pub fn gutter_style(
        mut self,
        f: impl Fn(Dimension, f64) -> StyleDeclaration + 'static,
    ) -> Self {
        self.gutter_style = Box::new(f);
        self
    }

    pub fn on_drag(mut self, f: impl FnMut(&[f64]) + 'static) -> Self {
        self.on_drag = Some(Box::new(f));
        self
    }

    pub fn on_drag_start(mut self, f: impl FnMut(&[f64]) + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    pub fn on_drag_end(mut self, f: impl FnMut(&[f64]) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(f));
        self
    }

    pub(crate) fn fire_drag(&mut self, sizes: &[f64]) {
        if let Some(f) = self.on_drag.as_mut() {
            f(sizes);
        }
    }

    pub(crate) fn fire_drag_start(&mut self, sizes: &[f64]) {
        if let Some(f) = self.on_drag_start.as_mut() {
            f(sizes);
        }
    }

    pub(crate) fn fire_drag_end(&mut self, sizes: &[f64]) {
        if let Some(f) = self.on_drag_end.as_mut() {
            f(sizes);
        }
    }
}

impl fmt::Debug for SplitHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitHooks")
            .field("on_drag", &self.on_drag.is_some())
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish_non_exhaustive()
    }
}
