//! Host-side strategies: element creation, styling and input binding.
//!
//! The engine never touches a display tree directly. It asks a [`SplitHost`]
//! to create, style and remove gutters and to style regions, and it asks an
//! [`InputSource`] to start and stop delivering pointer input for each gutter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Cursor, Dimension, Direction};

/// Style properties produced by the style functions, keyed by property name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDeclaration(BTreeMap<String, String>);

impl StyleDeclaration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Default region style: `calc(<size>% - <gutter>px)` on the split dimension.
#[must_use]
pub fn default_element_style(dimension: Dimension, size: f64, gutter_px: f64) -> StyleDeclaration {
    StyleDeclaration::new().with(
        dimension.as_str(),
        format!("calc({size}% - {gutter_px}px)"),
    )
}

/// Default gutter style: the gutter thickness on the split dimension.
#[must_use]
pub fn default_gutter_style(dimension: Dimension, gutter_px: f64) -> StyleDeclaration {
    StyleDeclaration::new().with(dimension.as_str(), format!("{gutter_px}px"))
}

/// Rendering capability supplied by the host.
///
/// `Element` is the host's handle for a region; `Gutter` is the handle for a
/// divider the engine asked the host to create. The engine owns gutters until
/// teardown and gives each one back through [`remove_gutter`] exactly once.
///
/// [`remove_gutter`]: SplitHost::remove_gutter
pub trait SplitHost {
    type Element;
    type Gutter;

    /// Gutter factory, called once per adjacent pair at construction.
    fn create_gutter(&mut self, index: usize, direction: Direction) -> Self::Gutter;

    /// Attach `gutter` to the display tree in front of `before`.
    fn insert_gutter(&mut self, gutter: &Self::Gutter, before: &Self::Element);

    /// Detach and drop a gutter created by [`create_gutter`](SplitHost::create_gutter).
    fn remove_gutter(&mut self, gutter: Self::Gutter);

    fn apply_region_style(&mut self, element: &Self::Element, style: &StyleDeclaration);

    fn apply_gutter_style(&mut self, gutter: &Self::Gutter, style: &StyleDeclaration);

    /// Remove the size styling previously applied on `dimension`.
    fn clear_region_style(&mut self, element: &Self::Element, dimension: Dimension);

    /// Pixel length of the track the regions share along `dimension`.
    ///
    /// Called at construction and at the start of every drag. Returning 0
    /// means "not laid out": minimums then convert to 0% and snapping is off.
    fn track_length(&self, elements: &[Self::Element], dimension: Dimension) -> f64;

    /// Show (`Some`) or clear (`None`) drag feedback such as the cursor.
    fn set_drag_feedback(&mut self, cursor: Option<Cursor>) {
        let _ = cursor;
    }
}

/// Source of pointer input for gutters.
///
/// Each gutter is subscribed once at construction and unsubscribed once at
/// teardown. Events themselves reach the engine through
/// [`SplitInstance::handle_input`](crate::SplitInstance::handle_input).
pub trait InputSource<G> {
    fn subscribe(&mut self, index: usize, gutter: &G);
    fn unsubscribe(&mut self, index: usize, gutter: &G);
}
