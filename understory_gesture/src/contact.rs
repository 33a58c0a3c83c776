// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contacts: one touch, pen or mouse input stream on the surface.

use core::fmt;

use kurbo::{Point, Vec2};
use understory_timing::Millis;

/// Identifies one contact for as long as it touches the surface.
///
/// Touch hosts supply their own identifiers; mouse input uses the synthetic
/// [`ContactId::MOUSE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub u64);

impl ContactId {
    /// The id given to mouse input and to pointers without an id.
    pub const MOUSE: Self = Self(1);
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One normalized contact position taken from a native event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// The contact this sample belongs to.
    pub id: ContactId,
    /// Position in page coordinates.
    pub page: Point,
}

impl PointerSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(id: ContactId, page: Point) -> Self {
        Self { id, page }
    }
}

/// A tracked contact.
///
/// Logical positions (`start`, `current`) are page positions minus `offset`,
/// where the offset comes from the configured
/// [`CoordinatePolicy`](crate::position::CoordinatePolicy).
#[derive(Clone, Debug, PartialEq)]
pub struct ContactPoint {
    /// Contact identifier.
    pub id: ContactId,
    /// Offset subtracted from page coordinates.
    pub offset: Vec2,
    /// Logical position when the contact began.
    pub start: Point,
    /// Logical position at the latest sample.
    pub current: Point,
    /// Page position at the latest sample.
    pub page: Point,
    /// Time the contact began.
    pub start_time: Millis,
    /// Time of the latest move.
    pub move_time: Millis,
    /// Rotation accumulated by the pinch/rotate recognizer, in degrees.
    pub rotation: f64,
    /// Angle around the centroid at the previous pinch/rotate reading.
    pub prev_angle: Option<f64>,
    /// Distance from the centroid at the first usable pinch/rotate reading.
    pub start_distance: Option<f64>,
    /// The contact has lifted.
    pub ended: bool,
    /// Target geometry was refreshed after this contact began.
    pub dirty: bool,
}

impl ContactPoint {
    /// Starts a contact at `page` with the given coordinate offset.
    #[must_use]
    pub fn new(id: ContactId, page: Point, offset: Vec2, now: Millis) -> Self {
        let local = page - offset;
        Self {
            id,
            offset,
            start: local,
            current: local,
            page,
            start_time: now,
            move_time: now,
            rotation: 0.0,
            prev_angle: None,
            start_distance: None,
            ended: false,
            dirty: false,
        }
    }

    /// Converts a page position into this contact's logical coordinates.
    #[must_use]
    pub fn local(&self, page: Point) -> Point {
        page - self.offset
    }

    /// Returns `true` if the contact is away from where it started.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.start != self.current
    }

    /// Distance between the start and current positions.
    #[must_use]
    pub fn distance_moved(&self) -> f64 {
        self.start.distance(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn logical_position_subtracts_offset() {
        let p = ContactPoint::new(
            ContactId(7),
            Point::new(110.0, 220.0),
            Vec2::new(100.0, 200.0),
            5,
        );
        assert_eq!(p.start, Point::new(10.0, 20.0));
        assert_eq!(p.current, p.start);
        assert_eq!(p.local(Point::new(130.0, 200.0)), Point::new(30.0, 0.0));
        assert!(!p.has_moved());
        assert_eq!(p.distance_moved(), 0.0);
    }

    #[test]
    fn id_displays_as_number() {
        assert_eq!(ContactId(12).to_string(), "12");
        assert_eq!(ContactId::MOUSE.to_string(), "1");
    }
}
