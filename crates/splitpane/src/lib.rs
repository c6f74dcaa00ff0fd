#![forbid(unsafe_code)]

//! Resizable split-panel layout engine.
//!
//! A [`SplitInstance`] manages an ordered list of regions laid out along one
//! axis. It keeps their sizes as percentages summing to 100, places a gutter
//! between each adjacent pair, and resizes the pair next to a gutter while it
//! is dragged. Minimum sizes are honored during drags, and a side dragged to
//! within `snap_offset` pixels of its minimum collapses to zero.
//!
//! Rendering and input binding stay with the host: the engine talks to it only
//! through the [`SplitHost`] and [`InputSource`] strategies.

pub mod drag;
pub mod error;
pub mod host;
pub mod options;
pub mod size;
pub mod solver;
pub mod split;
pub mod testing;

use serde::{Deserialize, Serialize};

pub use drag::{
    DragSession, GutterController, GutterEffect, GutterInput, GutterNoopReason, GutterState,
    GutterTransition,
};
pub use error::{Result, SplitError};
pub use host::{
    InputSource, SplitHost, StyleDeclaration, default_element_style, default_gutter_style,
};
pub use options::{
    DragCallback, ElementStyleFn, GutterAlign, GutterStyleFn, MinSize, SplitHooks, SplitOptions,
};
pub use size::{EPSILON, MinSizes, SizeVector};
pub use split::SplitInstance;

/// Axis along which regions are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Regions side by side; sizes are widths.
    #[default]
    Horizontal,
    /// Regions stacked; sizes are heights.
    Vertical,
}

impl Direction {
    /// The style dimension sized by this direction.
    #[must_use]
    pub const fn dimension(self) -> Dimension {
        match self {
            Self::Horizontal => Dimension::Width,
            Self::Vertical => Dimension::Height,
        }
    }

    /// Pointer hint shown while dragging when no cursor is configured.
    #[must_use]
    pub const fn default_cursor(self) -> Cursor {
        match self {
            Self::Horizontal => Cursor::ColResize,
            Self::Vertical => Cursor::RowResize,
        }
    }
}

/// Style dimension written for each region and gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// Advisory pointer appearance while a drag is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    ColResize,
    RowResize,
}

impl Cursor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColResize => "col-resize",
            Self::RowResize => "row-resize",
        }
    }
}
