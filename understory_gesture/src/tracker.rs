// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contact tracking for one recognizer.
//!
//! A [`PointTracker`] turns a stream of down/move/up inputs carrying any
//! number of contacts into one logical session: it starts when the first
//! contact lands and completes when the last one lifts.
//!
//! ## Usage
//!
//! 1) Call [`PointTracker::start_session`] on every down. It returns `true`
//!    for the first contact of a session, which is when the target's
//!    geometry is captured.
//! 2) Call [`PointTracker::update_session`] on every move.
//! 3) Call [`PointTracker::end_session`] on every up. It returns `true` once
//!    no contact is left; [`PointTracker::gesture_fingers`] then reports how
//!    many contacts took part.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_gesture::contact::ContactId;
//! use understory_gesture::input::{Edge, RawInput};
//! use understory_gesture::position::CoordinatePolicy;
//! use understory_gesture::tracker::PointTracker;
//!
//! let target = Rect::new(100.0, 100.0, 300.0, 300.0);
//! let mut tracker = PointTracker::new(1, 2, CoordinatePolicy::Relative);
//!
//! let down = RawInput::new(Edge::Down, 0)
//!     .with_sample(ContactId(1), (150.0, 150.0))
//!     .with_sample(ContactId(2), (250.0, 150.0))
//!     .with_sample(ContactId(3), (200.0, 250.0));
//! assert!(tracker.start_session(&down, &target));
//! // The third contact is over the maximum and is not tracked.
//! assert_eq!(tracker.active(), 2);
//! assert_eq!(tracker.identifier(), "1,2");
//! assert_eq!(tracker.centroid(), Some(Point::new(100.0, 50.0)));
//!
//! let up = RawInput::new(Edge::Up, 80).with_sample(ContactId(1), (150.0, 150.0));
//! assert!(tracker.end_session(&up, |_| {}));
//! assert_eq!(tracker.gesture_fingers(), 2);
//! ```

use alloc::string::String;
use core::fmt::Write as _;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use understory_timing::Millis;

use crate::contact::{ContactId, ContactPoint, PointerSample};
use crate::geometry::{BoundingBox, BoundingBoxCache, GeometrySource};
use crate::input::RawInput;
use crate::position::CoordinatePolicy;

/// The contacts of one recognizer's current session.
#[derive(Clone, Debug)]
pub struct PointTracker {
    /// Sorted by id.
    points: SmallVec<[ContactPoint; 4]>,
    active: usize,
    min: usize,
    max: usize,
    policy: CoordinatePolicy,
    bbox: BoundingBoxCache,
    cancelled: bool,
    gesture_fingers: usize,
    session_start: Millis,
}

impl Default for PointTracker {
    fn default() -> Self {
        Self::new(1, usize::MAX, CoordinatePolicy::Relative)
    }
}

impl PointTracker {
    /// Creates a tracker admitting up to `max` contacts.
    #[must_use]
    pub fn new(min: usize, max: usize, policy: CoordinatePolicy) -> Self {
        Self {
            points: SmallVec::new(),
            active: 0,
            min,
            max: max.max(1),
            policy,
            bbox: BoundingBoxCache::new(),
            cancelled: false,
            gesture_fingers: 0,
            session_start: 0,
        }
    }

    /// Registers the contacts of a down input.
    ///
    /// Returns `true` if this input started a new session. Contacts beyond
    /// the maximum are ignored. A new contact replaces a contact that already
    /// lifted, which marks the session as cancelled.
    pub fn start_session(&mut self, input: &RawInput, geometry: &dyn GeometrySource) -> bool {
        let first = self.active == 0;
        for sample in &input.changed {
            if self.active == 0 {
                self.points.clear();
                self.bbox.refresh(geometry);
                self.cancelled = false;
                self.gesture_fingers = 0;
                self.session_start = input.time;
                self.insert(sample, input.time);
                continue;
            }
            if self.active >= self.max {
                tracing::trace!(id = sample.id.0, max = self.max, "contact over maximum ignored");
                break;
            }
            match self.index_of(sample.id) {
                Some(i) if !self.points[i].ended => continue,
                Some(i) => {
                    self.points.remove(i);
                    self.cancelled = true;
                }
                None => {
                    if let Some(i) = self.points.iter().position(|p| p.ended) {
                        self.points.remove(i);
                        self.cancelled = true;
                    }
                }
            }
            self.insert(sample, input.time);
        }
        first && self.active > 0
    }

    /// Moves known contacts to their new positions.
    ///
    /// Returns the number of contacts updated; unknown ids are ignored.
    pub fn update_session(&mut self, input: &RawInput) -> usize {
        let mut updated = 0;
        for sample in &input.changed {
            if let Some(point) = self.point_mut(sample.id).filter(|p| !p.ended) {
                point.current = point.local(sample.page);
                point.page = sample.page;
                point.move_time = input.time;
                updated += 1;
            }
        }
        updated
    }

    /// Ends every contact not listed as still touching.
    ///
    /// `on_lift` runs once if any contact ended in this call. Returns `true`
    /// when this call ended the last contact of the session.
    pub fn end_session<F: FnMut(&mut Self)>(&mut self, input: &RawInput, mut on_lift: F) -> bool {
        let before = self.active;
        for point in &mut self.points {
            if point.ended || input.is_touching(point.id) {
                continue;
            }
            point.ended = true;
            self.active -= 1;
        }
        if self.active != before {
            on_lift(self);
        }
        if before == 0 || self.active > 0 {
            return false;
        }
        self.gesture_fingers = self.points.len();
        true
    }

    /// Re-reads the target geometry and marks every contact dirty.
    pub fn refresh_geometry(&mut self, geometry: &dyn GeometrySource) -> BoundingBox {
        for point in &mut self.points {
            point.dirty = true;
        }
        self.bbox.refresh(geometry)
    }

    /// Starts `id` over at `page`, deriving a new offset from the cached box.
    pub fn restart_contact(&mut self, id: ContactId, page: Point, now: Millis) {
        let offset = self.offset_for(page);
        if let Some(point) = self.point_mut(id) {
            let ended = point.ended;
            *point = ContactPoint::new(id, page, offset, now);
            point.ended = ended;
        }
    }

    /// Forgets one contact.
    pub fn remove(&mut self, id: ContactId) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        if !self.points.remove(i).ended {
            self.active -= 1;
        }
        true
    }

    /// Forgets every contact.
    pub fn reset(&mut self) {
        self.points.clear();
        self.active = 0;
        self.cancelled = false;
    }

    /// Comma-joined ids of the session's contacts.
    #[must_use]
    pub fn identifier(&self) -> String {
        let mut out = String::new();
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{}", point.id);
        }
        out
    }

    /// Mean logical position of the contacts still down.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        let mut sum = Vec2::ZERO;
        let mut n = 0_u32;
        for point in self.points.iter().filter(|p| !p.ended) {
            sum += point.current.to_vec2();
            n += 1;
        }
        (n > 0).then(|| (sum / f64::from(n)).to_point())
    }

    /// Whether `fingers` lies within the configured bounds.
    #[must_use]
    pub fn in_bounds(&self, fingers: usize) -> bool {
        self.min <= fingers && fingers <= self.max
    }

    /// Number of contacts still down.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Minimum contact count.
    #[must_use]
    pub fn min(&self) -> usize {
        self.min
    }

    /// Maximum contact count.
    #[must_use]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Coordinate policy.
    #[must_use]
    pub fn policy(&self) -> CoordinatePolicy {
        self.policy
    }

    /// Contacts taking part in the last completed session.
    #[must_use]
    pub fn gesture_fingers(&self) -> usize {
        self.gesture_fingers
    }

    /// Whether the session was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Marks the session cancelled, or clears the mark.
    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    /// Time the session's first contact landed.
    #[must_use]
    pub fn session_start(&self) -> Millis {
        self.session_start
    }

    /// Box captured for the session.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox.get_or_default()
    }

    /// All tracked contacts, including lifted ones, in id order.
    #[must_use]
    pub fn points(&self) -> &[ContactPoint] {
        &self.points
    }

    /// Mutable access to the tracked contacts.
    pub fn points_mut(&mut self) -> &mut [ContactPoint] {
        &mut self.points
    }

    /// The contact with the lowest id.
    #[must_use]
    pub fn first(&self) -> Option<&ContactPoint> {
        self.points.first()
    }

    /// Looks a contact up.
    #[must_use]
    pub fn point(&self, id: ContactId) -> Option<&ContactPoint> {
        self.index_of(id).map(|i| &self.points[i])
    }

    /// Looks a contact up mutably.
    pub fn point_mut(&mut self, id: ContactId) -> Option<&mut ContactPoint> {
        self.index_of(id).map(|i| &mut self.points[i])
    }

    fn index_of(&self, id: ContactId) -> Option<usize> {
        self.points.binary_search_by_key(&id, |p| p.id).ok()
    }

    fn offset_for(&self, page: Point) -> Vec2 {
        self.policy.offset(page, &self.bounding_box())
    }

    fn insert(&mut self, sample: &PointerSample, now: Millis) {
        let offset = self.offset_for(sample.page);
        let point = ContactPoint::new(sample.id, sample.page, offset, now);
        let at = self
            .points
            .binary_search_by_key(&sample.id, |p| p.id)
            .unwrap_or_else(|i| i);
        self.points.insert(at, point);
        self.active += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Edge;
    use kurbo::Rect;

    const TARGET: Rect = Rect::new(10.0, 20.0, 110.0, 120.0);

    fn down(time: Millis, ids: &[(u64, f64, f64)]) -> RawInput {
        ids.iter().fold(RawInput::new(Edge::Down, time), |input, &(id, x, y)| {
            input.with_sample(ContactId(id), (x, y))
        })
    }

    #[test]
    fn first_contact_captures_geometry_and_offsets() {
        let mut t = PointTracker::default();
        assert!(t.start_session(&down(0, &[(1, 30.0, 40.0)]), &TARGET));
        let p = t.point(ContactId(1)).unwrap();
        assert_eq!(p.start, Point::new(20.0, 20.0));
        assert_eq!(t.bounding_box().rect, TARGET);
        assert!(!t.start_session(&down(5, &[(2, 50.0, 40.0)]), &TARGET));
        assert_eq!(t.active(), 2);
    }

    #[test]
    fn duplicate_down_is_not_counted_twice() {
        let mut t = PointTracker::default();
        t.start_session(&down(0, &[(4, 30.0, 40.0)]), &TARGET);
        t.start_session(&down(1, &[(4, 31.0, 40.0)]), &TARGET);
        assert_eq!(t.active(), 1);
        assert_eq!(t.points().len(), 1);
    }

    #[test]
    fn lifted_contact_is_replaced_and_cancels() {
        let mut t = PointTracker::default();
        t.start_session(&down(0, &[(1, 30.0, 40.0), (2, 40.0, 40.0)]), &TARGET);
        let lift = RawInput::new(Edge::Up, 10)
            .with_sample(ContactId(1), (30.0, 40.0))
            .with_touching([ContactId(2)]);
        assert!(!t.end_session(&lift, |_| {}));
        assert_eq!(t.active(), 1);

        t.start_session(&down(20, &[(3, 50.0, 40.0)]), &TARGET);
        assert!(t.is_cancelled());
        assert_eq!(t.active(), 2);
        assert_eq!(t.identifier(), "2,3");
        assert_eq!(t.points().iter().filter(|p| !p.ended).count(), t.active());
    }

    #[test]
    fn update_ignores_unknown_ids() {
        let mut t = PointTracker::new(1, 1, CoordinatePolicy::Absolute);
        t.start_session(&down(0, &[(1, 30.0, 40.0)]), &TARGET);
        let mv = RawInput::new(Edge::Move, 16)
            .with_sample(ContactId(9), (0.0, 0.0))
            .with_sample(ContactId(1), (35.0, 45.0));
        assert_eq!(t.update_session(&mv), 1);
        let p = t.point(ContactId(1)).unwrap();
        assert_eq!(p.current, Point::new(35.0, 45.0));
        assert_eq!(p.move_time, 16);
    }

    #[test]
    fn end_session_runs_callback_once_per_call() {
        let mut t = PointTracker::default();
        t.start_session(&down(0, &[(1, 30.0, 40.0), (2, 40.0, 40.0)]), &TARGET);
        let mut calls = 0;
        let all_up = RawInput::new(Edge::Up, 30);
        assert!(t.end_session(&all_up, |_| calls += 1));
        assert_eq!(calls, 1);
        assert_eq!(t.gesture_fingers(), 2);

        // A stray up with nothing down neither calls back nor completes.
        assert!(!t.end_session(&all_up, |_| calls += 1));
        assert_eq!(calls, 1);
    }

    #[test]
    fn refresh_marks_dirty_and_restart_rebases() {
        let mut t = PointTracker::new(1, 2, CoordinatePolicy::Move);
        t.start_session(&down(0, &[(1, 30.0, 40.0)]), &TARGET);
        t.refresh_geometry(&Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(t.points()[0].dirty);
        t.restart_contact(ContactId(1), Point::new(50.0, 50.0), 40);
        let p = &t.points()[0];
        assert!(!p.dirty);
        assert_eq!(p.offset, Vec2::new(50.0, 50.0));
        assert_eq!(p.start_time, 40);
    }

    #[test]
    fn remove_and_reset_keep_count_consistent() {
        let mut t = PointTracker::default();
        t.start_session(&down(0, &[(1, 30.0, 40.0), (2, 40.0, 40.0)]), &TARGET);
        assert!(t.remove(ContactId(1)));
        assert!(!t.remove(ContactId(1)));
        assert_eq!(t.active(), 1);
        t.reset();
        assert_eq!(t.active(), 0);
        assert!(t.first().is_none());
    }
}
