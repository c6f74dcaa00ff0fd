//! Drag sessions and the per-gutter `Idle`/`Dragging` lifecycle.
//!
//! A [`GutterController`] holds at most one [`DragSession`]. Each move is
//! resolved against the sizes captured when the drag started, so the result
//! depends only on the total pointer displacement and never accumulates
//! rounding error across many small moves.
//!
//! Every input step produces a [`GutterTransition`] record with a monotonic
//! id, which makes interaction sequences easy to assert on and to log.

use serde::{Deserialize, Serialize};

use crate::size::{MinSizes, SizeVector};
use crate::solver;

/// Pointer input for a split, with coordinates already projected onto the
/// split axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GutterInput {
    DragStart { gutter: usize, coordinate: f64 },
    Move { coordinate: f64 },
    End,
    Cancel,
}

/// Observable lifecycle phase of a gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GutterState {
    #[default]
    Idle,
    Dragging,
}

/// State of one in-progress drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    gutter: usize,
    pair: (usize, usize),
    start_coordinate: f64,
    last_coordinate: f64,
    start_sizes: SizeVector,
    track_px: f64,
}

impl DragSession {
    /// Start a drag on `gutter`, which separates regions `gutter` and
    /// `gutter + 1`.
    #[must_use]
    pub fn new(gutter: usize, coordinate: f64, start_sizes: SizeVector, track_px: f64) -> Self {
        Self {
            gutter,
            pair: (gutter, gutter.saturating_add(1)),
            start_coordinate: coordinate,
            last_coordinate: coordinate,
            start_sizes,
            track_px,
        }
    }

    #[must_use]
    pub const fn gutter(&self) -> usize {
        self.gutter
    }

    #[must_use]
    pub const fn pair(&self) -> (usize, usize) {
        self.pair
    }

    #[must_use]
    pub const fn start_coordinate(&self) -> f64 {
        self.start_coordinate
    }

    #[must_use]
    pub const fn last_coordinate(&self) -> f64 {
        self.last_coordinate
    }

    #[must_use]
    pub fn start_sizes(&self) -> &SizeVector {
        &self.start_sizes
    }

    /// Track length measured when the drag started.
    #[must_use]
    pub const fn track_px(&self) -> f64 {
        self.track_px
    }

    /// Sizes for the pointer at `coordinate`: redistribute the displacement
    /// from the start snapshot, then snap.
    #[must_use]
    pub fn resolve(
        &self,
        coordinate: f64,
        min_sizes: &MinSizes,
        snap_offset_px: f64,
        drag_interval_px: f64,
    ) -> SizeVector {
        let delta = coordinate - self.start_coordinate;
        let moved = solver::redistribute(
            &self.start_sizes,
            self.pair,
            delta,
            self.track_px,
            min_sizes,
            drag_interval_px,
        );
        solver::apply_snap(&moved, self.pair, snap_offset_px, self.track_px, min_sizes)
    }

    /// Continue from `sizes` at the last seen pointer position, after the
    /// sizes were replaced outside the drag.
    pub(crate) fn rebase(&mut self, sizes: SizeVector) {
        self.start_sizes = sizes;
        self.start_coordinate = self.last_coordinate;
    }
}

/// Lifecycle controller for a single gutter.
#[derive(Debug, Clone, PartialEq)]
pub struct GutterController {
    index: usize,
    session: Option<DragSession>,
}

impl GutterController {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            session: None,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn state(&self) -> GutterState {
        if self.session.is_some() {
            GutterState::Dragging
        } else {
            GutterState::Idle
        }
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// `Idle → Dragging`. Returns `false` if a session is already open.
    pub fn begin(&mut self, coordinate: f64, sizes: SizeVector, track_px: f64) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession::new(self.index, coordinate, sizes, track_px));
        true
    }

    /// `Dragging → Dragging`. Returns the sizes for `coordinate`, or `None`
    /// when idle.
    pub fn drag_to(
        &mut self,
        coordinate: f64,
        min_sizes: &MinSizes,
        snap_offset_px: f64,
        drag_interval_px: f64,
    ) -> Option<SizeVector> {
        let session = self.session.as_mut()?;
        session.last_coordinate = coordinate;
        Some(session.resolve(coordinate, min_sizes, snap_offset_px, drag_interval_px))
    }

    /// `Dragging → Idle`, handing back the closed session.
    pub fn finish(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    pub(crate) fn rebase(&mut self, sizes: &SizeVector) {
        if let Some(session) = self.session.as_mut() {
            session.rebase(sizes.clone());
        }
    }
}

/// Why an input produced no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GutterNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    UnknownGutter,
    InvalidCoordinate,
    Destroyed,
}

/// Outcome of one input step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum GutterEffect {
    DragStarted {
        gutter: usize,
        origin: f64,
        sizes: Vec<f64>,
    },
    DragUpdated {
        gutter: usize,
        total_delta: f64,
        sizes: Vec<f64>,
    },
    DragEnded {
        gutter: usize,
        canceled: bool,
        sizes: Vec<f64>,
    },
    Noop {
        reason: GutterNoopReason,
    },
}

/// One lifecycle transition with a monotonic id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GutterTransition {
    pub transition_id: u64,
    pub from: GutterState,
    pub to: GutterState,
    pub effect: GutterEffect,
}

impl GutterTransition {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self.effect, GutterEffect::Noop { .. })
    }

    /// Sizes carried by the effect, if any.
    #[must_use]
    pub fn sizes(&self) -> Option<&[f64]> {
        match &self.effect {
            GutterEffect::DragStarted { sizes, .. }
            | GutterEffect::DragUpdated { sizes, .. }
            | GutterEffect::DragEnded { sizes, .. } => Some(sizes),
            GutterEffect::Noop { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::EPSILON;

    fn half_and_half() -> SizeVector {
        SizeVector::from_normalized(vec![50.0, 50.0])
    }

    fn assert_close(actual: &SizeVector, expected: &[f64]) {
        for (a, e) in actual.as_slice().iter().zip(expected) {
            assert!((a - e).abs() <= EPSILON, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn controller_walks_idle_dragging_idle() {
        let mut controller = GutterController::new(0);
        assert_eq!(controller.state(), GutterState::Idle);
        assert!(controller.begin(100.0, half_and_half(), 500.0));
        assert_eq!(controller.state(), GutterState::Dragging);
        assert!(!controller.begin(120.0, half_and_half(), 500.0));

        let session = controller.finish().expect("open session");
        assert_eq!(session.pair(), (0, 1));
        assert_eq!(session.start_coordinate(), 100.0);
        assert_eq!(controller.state(), GutterState::Idle);
        assert!(controller.finish().is_none());
    }

    #[test]
    fn moves_resolve_against_start_snapshot() {
        let mins = MinSizes::uniform(2, 0.0);
        let mut controller = GutterController::new(0);
        controller.begin(200.0, half_and_half(), 500.0);

        // Many small moves end where one large move would.
        let mut last = None;
        for step in 1..=20 {
            last = controller.drag_to(200.0 + f64::from(step), &mins, 0.0, 1.0);
        }
        assert_close(&last.expect("dragging"), &[54.0, 46.0]);

        // Returning to the origin restores the start sizes.
        let back = controller.drag_to(200.0, &mins, 0.0, 1.0).expect("dragging");
        assert_close(&back, &[50.0, 50.0]);
    }

    #[test]
    fn idle_controller_ignores_moves() {
        let mut controller = GutterController::new(1);
        assert!(
            controller
                .drag_to(10.0, &MinSizes::uniform(3, 0.0), 30.0, 1.0)
                .is_none()
        );
    }

    #[test]
    fn rebase_continues_from_last_position() {
        let mins = MinSizes::uniform(2, 0.0);
        let mut controller = GutterController::new(0);
        controller.begin(0.0, half_and_half(), 500.0);
        let _ = controller.drag_to(50.0, &mins, 0.0, 1.0);

        controller.rebase(&SizeVector::from_normalized(vec![30.0, 70.0]));
        let session = controller.session().expect("still dragging");
        assert_eq!(session.start_coordinate(), 50.0);

        let next = controller.drag_to(75.0, &mins, 0.0, 1.0).expect("dragging");
        assert_close(&next, &[35.0, 65.0]);
    }

    #[test]
    fn session_snaps_after_redistribute() {
        let mins = MinSizes::uniform(2, 100.0);
        let session = DragSession::new(0, 0.0, half_and_half(), 500.0);
        // 130px left for region 1: 30px above its minimum, outside the window.
        assert_close(&session.resolve(120.0, &mins, 30.0, 1.0), &[74.0, 26.0]);
        // 120px: inside the window, region 1 collapses.
        assert_close(&session.resolve(130.0, &mins, 30.0, 1.0), &[100.0, 0.0]);
    }

    #[test]
    fn last_index_gutter_resolves_to_start_sizes() {
        let mins = MinSizes::uniform(2, 0.0);
        let mut controller = GutterController::new(usize::MAX);
        assert!(controller.begin(0.0, half_and_half(), 500.0));
        let session = controller.session().expect("open session");
        assert_eq!(session.pair(), (usize::MAX, usize::MAX));

        let next = controller.drag_to(40.0, &mins, 30.0, 1.0).expect("dragging");
        assert_eq!(next, half_and_half());
    }

    #[test]
    fn transition_exposes_effect_sizes() {
        let transition = GutterTransition {
            transition_id: 1,
            from: GutterState::Idle,
            to: GutterState::Idle,
            effect: GutterEffect::Noop {
                reason: GutterNoopReason::IdleWithoutActiveDrag,
            },
        };
        assert!(transition.is_noop());
        assert_eq!(transition.sizes(), None);

        let json = serde_json::to_value(&transition.effect).expect("serialize");
        assert_eq!(json["effect"], "noop");
        assert_eq!(json["reason"], "idle_without_active_drag");
    }
}
