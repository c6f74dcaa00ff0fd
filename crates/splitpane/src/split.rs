//! The public split orchestrator.

use tracing::{debug, debug_span};

use crate::drag::{
    GutterController, GutterEffect, GutterInput, GutterNoopReason, GutterState, GutterTransition,
};
use crate::error::{Result, SplitError};
use crate::host::{InputSource, SplitHost};
use crate::options::{SplitHooks, SplitOptions};
use crate::size::{MinSizes, SizeVector};
use crate::solver;
use crate::Direction;

/// A set of regions sharing one axis, with a draggable gutter between each
/// adjacent pair.
///
/// The instance owns the size vector, the gutters it created and the region
/// handles it was given. At most one gutter drags at a time; that drag is the
/// `active` field, so separate instances never interfere.
///
/// Dropping an instance tears it down as [`destroy`](Self::destroy) does.
pub struct SplitInstance<H, I>
where
    H: SplitHost,
    I: InputSource<H::Gutter>,
{
    host: H,
    input: I,
    elements: Vec<H::Element>,
    gutters: Vec<H::Gutter>,
    controllers: Vec<GutterController>,
    sizes: SizeVector,
    min_sizes: MinSizes,
    options: SplitOptions,
    hooks: SplitHooks,
    active: Option<usize>,
    transition_counter: u64,
    destroyed: bool,
}

impl<H, I> SplitInstance<H, I>
where
    H: SplitHost,
    I: InputSource<H::Gutter>,
{
    /// Build a split over `elements`.
    ///
    /// All validation happens before the host is touched, so an error leaves
    /// no gutters or styles behind.
    pub fn new(
        mut host: H,
        mut input: I,
        elements: Vec<H::Element>,
        options: SplitOptions,
        hooks: SplitHooks,
    ) -> Result<Self> {
        let count = elements.len();
        options.validate(count)?;

        let min_sizes = options.min_sizes(count);
        let dimension = options.direction.dimension();
        let track_px = host.track_length(&elements, dimension);
        let sizes = solver::normalize(
            options.sizes.as_deref(),
            count,
            &min_sizes,
            track_px,
            options.expand_to_min,
        )?;

        let mut gutters = Vec::with_capacity(count.saturating_sub(1));
        for (index, next) in elements.iter().enumerate().skip(1) {
            let gutter = host.create_gutter(index - 1, options.direction);
            host.insert_gutter(&gutter, next);
            gutters.push(gutter);
        }
        for (index, gutter) in gutters.iter().enumerate() {
            input.subscribe(index, gutter);
        }

        debug!(
            regions = count,
            direction = ?options.direction,
            track_px,
            "split constructed"
        );

        let controllers = (0..gutters.len()).map(GutterController::new).collect();
        let mut split = Self {
            host,
            input,
            elements,
            gutters,
            controllers,
            sizes,
            min_sizes,
            options,
            hooks,
            active: None,
            transition_counter: 0,
            destroyed: false,
        };
        split.apply_all_styles();
        Ok(split)
    }

    /// Replace the sizes.
    ///
    /// The input is rescaled to 100 and raised to each region's minimum when
    /// the track can hold all minimums. Entries of exactly 0 stay collapsed,
    /// so the output of [`sizes`](Self::sizes) always restores the same
    /// layout. No drag callback fires.
    pub fn set_sizes(&mut self, sizes: &[f64]) -> Result<()> {
        self.ensure_live("set sizes")?;
        let count = self.elements.len();
        let track_px = self.measure_track();
        let expanded = solver::normalize_keeping_collapsed(sizes, count, &self.min_sizes, track_px);
        let next = match expanded {
            Err(SplitError::MinimumsExceedTrack { required_percent }) => {
                debug!(required_percent, "minimums exceed track, sizes left unclamped");
                solver::normalize(Some(sizes), count, &self.min_sizes, track_px, false)?
            }
            other => other?,
        };

        debug!(sizes = ?next.as_slice(), "sizes set");
        self.replace_sizes(next);
        Ok(())
    }

    /// Current sizes in percent. The returned vector is a copy.
    #[must_use]
    pub fn sizes(&self) -> Vec<f64> {
        self.sizes.to_vec()
    }

    /// Collapse region `index` to 0.
    ///
    /// The freed size goes to the next region, or to the previous one when
    /// `index` is the last region. An out-of-range index or a single-region
    /// split is ignored.
    pub fn collapse(&mut self, index: usize) -> Result<()> {
        self.ensure_live("collapse")?;
        match solver::collapse(&self.sizes, index) {
            Some(next) => {
                debug!(index, "region collapsed");
                self.replace_sizes(next);
            }
            None => debug!(index, regions = self.elements.len(), "collapse ignored"),
        }
        Ok(())
    }

    /// Tear the split down.
    ///
    /// Any active drag is canceled first, which fires `on_drag_end`. Gutters
    /// are unsubscribed and removed and region size styles are cleared.
    /// Calling this again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if self.active.is_some() {
            let _ = self.end_drag(true);
        }

        let gutters = std::mem::take(&mut self.gutters);
        for (index, gutter) in gutters.into_iter().enumerate() {
            self.input.unsubscribe(index, &gutter);
            self.host.remove_gutter(gutter);
        }
        let dimension = self.options.direction.dimension();
        for element in &self.elements {
            self.host.clear_region_style(element, dimension);
        }
        self.controllers.clear();
        self.destroyed = true;
        debug!(regions = self.elements.len(), "split destroyed");
    }

    /// Feed one pointer event through the gutter lifecycle.
    pub fn handle_input(&mut self, event: GutterInput) -> GutterTransition {
        let from = self.phase();
        let effect = if self.destroyed {
            noop(GutterNoopReason::Destroyed)
        } else {
            match event {
                GutterInput::DragStart { gutter, coordinate } => {
                    self.start_drag(gutter, coordinate)
                }
                GutterInput::Move { coordinate } => self.move_drag(coordinate),
                GutterInput::End => self.end_drag(false),
                GutterInput::Cancel => self.end_drag(true),
            }
        };

        self.transition_counter = self.transition_counter.saturating_add(1);
        GutterTransition {
            transition_id: self.transition_counter,
            from,
            to: self.phase(),
            effect,
        }
    }

    fn start_drag(&mut self, gutter: usize, coordinate: f64) -> GutterEffect {
        if self.active.is_some() {
            return noop(GutterNoopReason::ActiveDragAlreadyInProgress);
        }
        if gutter >= self.controllers.len() {
            return noop(GutterNoopReason::UnknownGutter);
        }
        if !coordinate.is_finite() {
            return noop(GutterNoopReason::InvalidCoordinate);
        }

        let track_px = self.measure_track();
        if !self.controllers[gutter].begin(coordinate, self.sizes.clone(), track_px) {
            return noop(GutterNoopReason::ActiveDragAlreadyInProgress);
        }
        self.active = Some(gutter);
        debug!(gutter, coordinate, track_px, "drag started");

        let sizes = self.sizes.to_vec();
        self.hooks.fire_drag_start(&sizes);
        self.host
            .set_drag_feedback(Some(self.options.resolved_cursor()));
        GutterEffect::DragStarted {
            gutter,
            origin: coordinate,
            sizes,
        }
    }

    fn move_drag(&mut self, coordinate: f64) -> GutterEffect {
        let Some(gutter) = self.active else {
            return noop(GutterNoopReason::IdleWithoutActiveDrag);
        };
        if !coordinate.is_finite() {
            return noop(GutterNoopReason::InvalidCoordinate);
        }
        let _span = debug_span!("split.drag", gutter, coordinate).entered();

        let controller = &mut self.controllers[gutter];
        let Some(next) = controller.drag_to(
            coordinate,
            &self.min_sizes,
            self.options.snap_offset,
            self.options.drag_interval,
        ) else {
            return noop(GutterNoopReason::IdleWithoutActiveDrag);
        };
        let total_delta = controller
            .session()
            .map_or(0.0, |session| coordinate - session.start_coordinate());

        self.sizes = next;
        self.style_region(gutter);
        self.style_region(gutter + 1);
        self.style_gutter(gutter);

        let sizes = self.sizes.to_vec();
        self.hooks.fire_drag(&sizes);
        GutterEffect::DragUpdated {
            gutter,
            total_delta,
            sizes,
        }
    }

    fn end_drag(&mut self, canceled: bool) -> GutterEffect {
        let Some(gutter) = self.active.take() else {
            return noop(GutterNoopReason::IdleWithoutActiveDrag);
        };
        let _ = self.controllers[gutter].finish();
        debug!(gutter, canceled, "drag ended");

        self.host.set_drag_feedback(None);
        let sizes = self.sizes.to_vec();
        self.hooks.fire_drag_end(&sizes);
        GutterEffect::DragEnded {
            gutter,
            canceled,
            sizes,
        }
    }

    fn replace_sizes(&mut self, next: SizeVector) {
        self.sizes = next;
        if let Some(gutter) = self.active {
            self.controllers[gutter].rebase(&self.sizes);
        }
        self.apply_all_styles();
    }

    fn apply_all_styles(&mut self) {
        for index in 0..self.elements.len() {
            self.style_region(index);
        }
        for index in 0..self.gutters.len() {
            self.style_gutter(index);
        }
    }

    fn style_region(&mut self, index: usize) {
        let gutter_px = self
            .options
            .region_gutter_size(index, self.elements.len());
        let style = (self.hooks.element_style)(
            self.options.direction.dimension(),
            self.sizes[index],
            gutter_px,
        );
        self.host.apply_region_style(&self.elements[index], &style);
    }

    fn style_gutter(&mut self, index: usize) {
        let style = (self.hooks.gutter_style)(
            self.options.direction.dimension(),
            self.options.gutter_size,
        );
        self.host.apply_gutter_style(&self.gutters[index], &style);
    }

    fn measure_track(&self) -> f64 {
        self.host
            .track_length(&self.elements, self.options.direction.dimension())
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.destroyed {
            Err(SplitError::Destroyed { operation })
        } else {
            Ok(())
        }
    }

    fn phase(&self) -> GutterState {
        if self.active.is_some() {
            GutterState::Dragging
        } else {
            GutterState::Idle
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.options.direction
    }

    #[must_use]
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.elements.len()
    }

    /// Live gutters; 0 after teardown.
    #[must_use]
    pub fn gutter_count(&self) -> usize {
        self.gutters.len()
    }

    #[must_use]
    pub fn controller(&self, gutter: usize) -> Option<&GutterController> {
        self.controllers.get(gutter)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active_gutter(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn elements(&self) -> &[H::Element] {
        &self.elements
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Tear down and hand the region handles back to the caller.
    pub fn into_elements(mut self) -> Vec<H::Element> {
        self.destroy();
        std::mem::take(&mut self.elements)
    }
}

impl<H, I> Drop for SplitInstance<H, I>
where
    H: SplitHost,
    I: InputSource<H::Gutter>,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

const fn noop(reason: GutterNoopReason) -> GutterEffect {
    GutterEffect::Noop { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::EPSILON;
    use crate::testing::{RecordingHost, RecordingInput};
    use std::cell::RefCell;
    use std::rc::Rc;

    type TestSplit = SplitInstance<RecordingHost, RecordingInput>;

    fn build(count: usize, track_px: f64, options: SplitOptions) -> TestSplit {
        SplitInstance::new(
            RecordingHost::with_track(track_px),
            RecordingInput::default(),
            (0..count).collect(),
            options,
            SplitHooks::default(),
        )
        .expect("valid split")
    }

    fn assert_sizes(split: &TestSplit, expected: &[f64]) {
        let sizes = split.sizes();
        assert_eq!(sizes.len(), expected.len(), "{sizes:?}");
        for (a, e) in sizes.iter().zip(expected) {
            assert!((a - e).abs() <= EPSILON, "{sizes:?} vs {expected:?}");
        }
    }

    #[test]
    fn construction_creates_one_gutter_per_pair() {
        let split = build(3, 600.0, SplitOptions::default());
        assert_eq!(split.gutter_count(), 2);
        assert_eq!(split.host().attached, vec![(1, 1), (2, 2)]);
        assert_eq!(split.input().subscribe_calls, 2);
        assert_sizes(&split, &[100.0 / 3.0, 100.0 / 3.0, 100.0 / 3.0]);
        assert_eq!(split.host().gutter_styles.len(), 2);
    }

    #[test]
    fn single_region_has_no_gutters() {
        let mut split = build(1, 600.0, SplitOptions::default());
        assert_eq!(split.gutter_count(), 0);
        assert_sizes(&split, &[100.0]);
        assert!(split.collapse(0).is_ok());
        assert_sizes(&split, &[100.0]);
        let transition = split.handle_input(GutterInput::DragStart {
            gutter: 0,
            coordinate: 0.0,
        });
        assert_eq!(
            transition.effect,
            GutterEffect::Noop {
                reason: GutterNoopReason::UnknownGutter
            }
        );
    }

    #[test]
    fn construction_failure_leaves_host_untouched() {
        let result = SplitInstance::new(
            RecordingHost::with_track(500.0),
            RecordingInput::default(),
            vec![0, 1, 2],
            SplitOptions::default().sizes(vec![50.0, 50.0]),
            SplitHooks::default(),
        );
        assert!(matches!(
            result,
            Err(SplitError::SizeCountMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let result = SplitInstance::new(
            RecordingHost::with_track(250.0),
            RecordingInput::default(),
            vec![0, 1, 2],
            SplitOptions::default().expand_to_min(true),
            SplitHooks::default(),
        );
        assert!(matches!(
            result,
            Err(SplitError::MinimumsExceedTrack { .. })
        ));
    }

    #[test]
    fn region_styles_reflect_gutter_alignment() {
        let split = build(3, 600.0, SplitOptions::default().sizes(vec![25.0, 25.0, 50.0]));
        assert_eq!(split.host().region_style(0, "width"), Some("calc(25% - 5px)"));
        assert_eq!(split.host().region_style(1, "width"), Some("calc(25% - 10px)"));
        assert_eq!(split.host().region_style(2, "width"), Some("calc(50% - 5px)"));
    }

    #[test]
    fn collapse_sends_size_toward_front_or_back() {
        let options = SplitOptions::default().sizes(vec![30.0, 30.0, 40.0]);
        let mut split = build(3, 1000.0, options.clone());
        split.collapse(0).expect("live split");
        assert_sizes(&split, &[0.0, 60.0, 40.0]);

        let mut split = build(3, 1000.0, options);
        split.collapse(2).expect("live split");
        assert_sizes(&split, &[30.0, 70.0, 0.0]);

        split.collapse(9).expect("out of range is ignored");
        assert_sizes(&split, &[30.0, 70.0, 0.0]);
    }

    #[test]
    fn set_sizes_round_trips_and_clamps() {
        let mut split = build(2, 500.0, SplitOptions::default());
        split.set_sizes(&[30.0, 70.0]).expect("valid sizes");
        assert_sizes(&split, &[30.0, 70.0]);

        // 10% is below the 20% minimum on a 500px track.
        split.set_sizes(&[10.0, 90.0]).expect("valid sizes");
        assert_sizes(&split, &[20.0, 80.0]);

        assert_eq!(
            split.set_sizes(&[100.0]),
            Err(SplitError::SizeCountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_sizes(&split, &[20.0, 80.0]);
    }

    #[test]
    fn set_sizes_restores_collapsed_layout() {
        let options = SplitOptions::default().sizes(vec![30.0, 30.0, 40.0]);
        let mut split = build(3, 1000.0, options);
        split.collapse(0).expect("live split");
        let saved = split.sizes();

        split.set_sizes(&[30.0, 30.0, 40.0]).expect("valid sizes");
        split.set_sizes(&saved).expect("valid sizes");
        assert_sizes(&split, &saved);
        assert_eq!(split.sizes()[0], 0.0);
        assert_eq!(split.host().region_style(0, "width"), Some("calc(0% - 5px)"));
    }

    #[test]
    fn set_sizes_on_cramped_track_skips_clamping() {
        let mut split = build(3, 200.0, SplitOptions::default());
        split.set_sizes(&[10.0, 30.0, 60.0]).expect("valid sizes");
        assert_sizes(&split, &[10.0, 30.0, 60.0]);
    }

    #[test]
    fn sizes_returns_an_independent_copy() {
        let split = build(2, 500.0, SplitOptions::default());
        let mut copy = split.sizes();
        copy[0] = 99.0;
        assert_sizes(&split, &[50.0, 50.0]);
    }

    #[test]
    fn drag_lifecycle_fires_callbacks_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (start, drag, end) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
        let hooks = SplitHooks::new()
            .on_drag_start(move |s| start.borrow_mut().push(("start", s.to_vec())))
            .on_drag(move |s| drag.borrow_mut().push(("drag", s.to_vec())))
            .on_drag_end(move |s| end.borrow_mut().push(("end", s.to_vec())));
        let mut split = SplitInstance::new(
            RecordingHost::with_track(500.0),
            RecordingInput::default(),
            vec![0, 1],
            SplitOptions::default().min_size(0.0),
            hooks,
        )
        .expect("valid split");

        let t = split.handle_input(GutterInput::DragStart {
            gutter: 0,
            coordinate: 250.0,
        });
        assert_eq!((t.from, t.to), (GutterState::Idle, GutterState::Dragging));
        assert_eq!(split.host().cursor, Some(crate::Cursor::ColResize));

        let t = split.handle_input(GutterInput::Move { coordinate: 270.0 });
        assert_eq!(t.transition_id, 2);
        assert_sizes(&split, &[54.0, 46.0]);

        let t = split.handle_input(GutterInput::End);
        assert_eq!((t.from, t.to), (GutterState::Dragging, GutterState::Idle));
        assert_eq!(split.host().cursor, None);

        let names: Vec<&str> = log.borrow().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["start", "drag", "end"]);
        assert_eq!(log.borrow()[0].1, vec![50.0, 50.0]);
    }

    #[test]
    fn second_drag_start_is_ignored() {
        let mut split = build(3, 900.0, SplitOptions::default().min_size(0.0));
        split.handle_input(GutterInput::DragStart {
            gutter: 0,
            coordinate: 300.0,
        });
        let t = split.handle_input(GutterInput::DragStart {
            gutter: 1,
            coordinate: 600.0,
        });
        assert_eq!(
            t.effect,
            GutterEffect::Noop {
                reason: GutterNoopReason::ActiveDragAlreadyInProgress
            }
        );
        assert_eq!(split.active_gutter(), Some(0));
        assert_eq!(
            split.controller(1).map(GutterController::state),
            Some(GutterState::Idle)
        );
    }

    #[test]
    fn move_while_idle_is_noop() {
        let mut split = build(2, 500.0, SplitOptions::default());
        let t = split.handle_input(GutterInput::Move { coordinate: 10.0 });
        assert!(t.is_noop());
        assert_sizes(&split, &[50.0, 50.0]);
    }

    #[test]
    fn collapse_during_drag_rebases_session() {
        let mut split = build(3, 1000.0, SplitOptions::default().min_size(0.0).snap_offset(0.0));
        split.handle_input(GutterInput::DragStart {
            gutter: 1,
            coordinate: 500.0,
        });
        split.handle_input(GutterInput::Move { coordinate: 550.0 });
        split.collapse(0).expect("live split");
        // Collapse gave region 0's third to region 1; the drag continues from there.
        let t = split.handle_input(GutterInput::Move { coordinate: 600.0 });
        let sizes = t.sizes().expect("drag update");
        assert!((sizes[0]).abs() <= EPSILON);
        assert!((sizes[1] - (200.0 / 3.0 + 10.0)).abs() <= EPSILON, "{sizes:?}");
    }

    #[test]
    fn destroy_cancels_drag_and_is_idempotent() {
        let ended = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&ended);
        let mut split = SplitInstance::new(
            RecordingHost::with_track(500.0),
            RecordingInput::default(),
            vec![0, 1, 2],
            SplitOptions::default(),
            SplitHooks::new().on_drag_end(move |_| *counter.borrow_mut() += 1),
        )
        .expect("valid split");
        split.handle_input(GutterInput::DragStart {
            gutter: 0,
            coordinate: 10.0,
        });

        split.destroy();
        assert_eq!(*ended.borrow(), 1);
        assert!(!split.is_dragging());
        assert_eq!(split.host().live_gutters(), 0);
        assert_eq!(split.host().removed, 2);
        assert!(split.host().region_styles.is_empty());
        assert!(split.input().subscribed.is_empty());
        assert_eq!(split.host().cursor, None);

        split.destroy();
        assert_eq!(split.host().removed, 2);
        assert_eq!(split.input().unsubscribe_calls, 2);
        assert_eq!(*ended.borrow(), 1);

        assert_eq!(
            split.collapse(0),
            Err(SplitError::Destroyed {
                operation: "collapse"
            })
        );
        assert!(split.set_sizes(&[50.0, 25.0, 25.0]).is_err());
        let t = split.handle_input(GutterInput::Move { coordinate: 1.0 });
        assert_eq!(
            t.effect,
            GutterEffect::Noop {
                reason: GutterNoopReason::Destroyed
            }
        );
    }

    #[test]
    fn no_drag_callback_after_cancel_or_destroy() {
        let drags = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&drags);
        let mut split = SplitInstance::new(
            RecordingHost::with_track(500.0),
            RecordingInput::default(),
            vec![0, 1],
            SplitOptions::default().min_size(0.0),
            SplitHooks::new().on_drag(move |_| *counter.borrow_mut() += 1),
        )
        .expect("valid split");

        split.handle_input(GutterInput::DragStart {
            gutter: 0,
            coordinate: 250.0,
        });
        split.handle_input(GutterInput::Move { coordinate: 260.0 });
        assert_eq!(*drags.borrow(), 1);

        split.handle_input(GutterInput::Cancel);
        let t = split.handle_input(GutterInput::Move { coordinate: 300.0 });
        assert!(t.is_noop());
        assert_eq!(*drags.borrow(), 1);
        let after_cancel = split.sizes();

        split.handle_input(GutterInput::DragStart {
            gutter: 0,
            coordinate: 250.0,
        });
        split.destroy();
        split.handle_input(GutterInput::Move { coordinate: 400.0 });
        assert_eq!(*drags.borrow(), 1);
        assert_sizes(&split, &after_cancel);
    }

    #[tracing_test::traced_test]
    #[test]
    fn lifecycle_is_logged() {
        let mut split = build(2, 500.0, SplitOptions::default());
        split.handle_input(GutterInput::DragStart {
            gutter: 0,
            coordinate: 100.0,
        });
        split.handle_input(GutterInput::Cancel);
        split.collapse(5).expect("live split");
        split.destroy();

        assert!(logs_contain("split constructed"));
        assert!(logs_contain("drag started"));
        assert!(logs_contain("canceled=true"));
        assert!(logs_contain("collapse ignored"));
        assert!(logs_contain("split destroyed"));
    }

    #[test]
    fn into_elements_returns_regions() {
        let split = build(3, 500.0, SplitOptions::default());
        assert_eq!(split.into_elements(), vec![0, 1, 2]);
    }
}
