// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate policies: how a contact's logical position is derived from page
//! coordinates when the contact starts.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Vec2};

use crate::error::ParseError;
use crate::geometry::BoundingBox;

/// The rule that turns page coordinates into logical coordinates.
///
/// The policy produces an offset once, when a contact starts; every later
/// position of that contact is `page - offset`.
///
/// ```
/// use kurbo::{Point, Rect, Vec2};
/// use understory_gesture::geometry::BoundingBox;
/// use understory_gesture::position::CoordinatePolicy;
///
/// let bbox = BoundingBox::new(Rect::new(100.0, 50.0, 300.0, 150.0));
/// let page = Point::new(120.0, 60.0);
///
/// assert_eq!(CoordinatePolicy::Relative.offset(page, &bbox), Vec2::new(100.0, 50.0));
/// assert_eq!(CoordinatePolicy::Absolute.offset(page, &bbox), Vec2::ZERO);
/// assert_eq!(CoordinatePolicy::Move.offset(page, &bbox), Vec2::new(20.0, 10.0));
/// assert_eq!("differenceFromLast".parse(), Ok(CoordinatePolicy::DifferenceFromLast));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoordinatePolicy {
    /// Relative to the target's top-left corner, corrected for container scroll.
    #[default]
    Relative,
    /// Page coordinates unchanged.
    Absolute,
    /// The pointer's offset into the target, for dragging the target itself:
    /// logical positions are where the target's top-left should go.
    Move,
    /// Relative to where the contact started.
    Difference,
    /// Relative to the previously reported position of the contact.
    DifferenceFromLast,
}

impl CoordinatePolicy {
    /// Offset for a contact starting at `page` over a target with `bbox`.
    #[must_use]
    pub fn offset(self, page: Point, bbox: &BoundingBox) -> Vec2 {
        match self {
            Self::Relative => bbox.origin().to_vec2() - bbox.scroll,
            Self::Absolute => Vec2::ZERO,
            Self::Move => page - bbox.origin(),
            Self::Difference | Self::DifferenceFromLast => page.to_vec2(),
        }
    }

    /// The option string for this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Move => "move",
            Self::Difference => "difference",
            Self::DifferenceFromLast => "differenceFromLast",
        }
    }
}

impl fmt::Display for CoordinatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinatePolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [CoordinatePolicy; 5] = [
            CoordinatePolicy::Relative,
            CoordinatePolicy::Absolute,
            CoordinatePolicy::Move,
            CoordinatePolicy::Difference,
            CoordinatePolicy::DifferenceFromLast,
        ];
        ALL.into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownPosition(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn relative_subtracts_container_scroll() {
        let bbox = BoundingBox::new(Rect::new(10.0, 20.0, 50.0, 60.0)).with_scroll(Vec2::new(0.0, 5.0));
        assert_eq!(
            CoordinatePolicy::Relative.offset(Point::new(0.0, 0.0), &bbox),
            Vec2::new(10.0, 15.0)
        );
    }

    #[test]
    fn difference_policies_offset_by_pointer() {
        let bbox = BoundingBox::default();
        let page = Point::new(7.0, 9.0);
        assert_eq!(CoordinatePolicy::Difference.offset(page, &bbox), Vec2::new(7.0, 9.0));
        assert_eq!(
            CoordinatePolicy::DifferenceFromLast.offset(page, &bbox),
            Vec2::new(7.0, 9.0)
        );
    }

    #[test]
    fn parse_is_case_insensitive_and_rejects_unknown() {
        assert_eq!("MOVE".parse(), Ok(CoordinatePolicy::Move));
        assert_eq!(" relative ".parse(), Ok(CoordinatePolicy::Relative));
        assert_eq!(
            "sideways".parse::<CoordinatePolicy>(),
            Err(ParseError::UnknownPosition("sideways".into()))
        );
    }

    #[test]
    fn display_round_trips_option_string() {
        for p in [
            CoordinatePolicy::Relative,
            CoordinatePolicy::Absolute,
            CoordinatePolicy::Move,
            CoordinatePolicy::Difference,
            CoordinatePolicy::DifferenceFromLast,
        ] {
            assert_eq!(p.to_string().parse(), Ok(p));
        }
    }
}
