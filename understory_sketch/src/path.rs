// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recorded samples, stroke grouping, smoothing and SVG path data.

use alloc::string::String;
use core::fmt::Write as _;

use kurbo::{BezPath, PathEl, Point};
use serde::{Deserialize, Serialize};
use understory_timing::Millis;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::style::Style;

/// One recorded sample.
///
/// The first sample of a stroke has `begin_path` set and carries the style
/// the stroke is drawn with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    /// Horizontal position in sketch units.
    pub x: f64,
    /// Vertical position in sketch units.
    pub y: f64,
    /// Milliseconds since the previous sample of the same stroke.
    #[serde(default)]
    pub lapse: Millis,
    /// Starts a new stroke.
    #[serde(default, skip_serializing_if = "is_false")]
    pub begin_path: bool,
    /// Style snapshot, present on stroke starts.
    #[serde(flatten)]
    pub style: Option<Style>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl PathEntry {
    /// A sample continuing the current stroke.
    #[must_use]
    pub fn new(point: Point, lapse: Millis) -> Self {
        Self {
            x: point.x,
            y: point.y,
            lapse,
            begin_path: false,
            style: None,
        }
    }

    /// A sample starting a stroke drawn with `style`.
    #[must_use]
    pub fn begin(point: Point, style: Style) -> Self {
        Self {
            begin_path: true,
            style: Some(style),
            ..Self::new(point, 0)
        }
    }

    /// The sample position.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Iterator over the strokes of a recording.
///
/// A stroke runs from a `begin_path` sample up to the next one. Samples
/// before the first `begin_path` form a stroke of their own.
#[derive(Clone, Debug)]
pub struct Strokes<'a> {
    rest: &'a [PathEntry],
}

impl<'a> Strokes<'a> {
    /// Groups `path` into strokes.
    #[must_use]
    pub fn new(path: &'a [PathEntry]) -> Self {
        Self { rest: path }
    }
}

impl<'a> Iterator for Strokes<'a> {
    type Item = &'a [PathEntry];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self.rest[1..]
            .iter()
            .position(|e| e.begin_path)
            .map_or(self.rest.len(), |i| i + 1);
        let (stroke, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(stroke)
    }
}

/// Smooths `points` into cubic Béziers through every point.
///
/// Uses a Catmull-Rom spline with the end points repeated as phantom
/// neighbors. `tension` is in `0.0..=1.0`; `0.0` is the classic spline and
/// `1.0` gives straight segments. Fewer than two points give an empty path.
#[must_use]
pub fn catmull_rom(points: &[Point], tension: f64) -> BezPath {
    let mut path = BezPath::new();
    if points.len() < 2 {
        return path;
    }
    let t = (1.0 - tension) / 6.0;
    let last = points.len() - 1;
    path.move_to(points[0]);
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let (p1, p2) = (points[i], points[i + 1]);
        let p3 = points[(i + 2).min(last)];
        path.curve_to(p1 + (p2 - p0) * t, p2 - (p3 - p1) * t, p2);
    }
    path
}

/// Writes `path` as SVG path data.
///
/// A command letter is written only when it differs from the previous one.
/// With `precision`, coordinates are rounded to that many decimals.
pub fn write_svg_path_data(out: &mut String, path: &BezPath, precision: Option<u32>) {
    let scale = precision.map(|p| (0..p).fold(1.0, |s, _| s * 10.0));
    let round = |v: f64| match scale {
        Some(scale) => (v * scale).round() / scale,
        None => v,
    };
    let mut previous = None;
    for el in path.elements() {
        let (cmd, points, n) = match *el {
            PathEl::MoveTo(p) => ('M', [p, p, p], 1),
            PathEl::LineTo(p) => ('L', [p, p, p], 1),
            PathEl::QuadTo(a, b) => ('Q', [a, b, b], 2),
            PathEl::CurveTo(a, b, c) => ('C', [a, b, c], 3),
            PathEl::ClosePath => ('Z', [Point::ZERO; 3], 0),
        };
        if cmd == 'Z' {
            trim_space(out);
            out.push(cmd);
        } else if previous != Some(cmd) {
            out.push(cmd);
        }
        for p in &points[..n] {
            let _ = write!(out, "{} {} ", round(p.x), round(p.y));
        }
        previous = Some(cmd);
    }
    trim_space(out);
}

fn trim_space(out: &mut String) {
    if out.ends_with(' ') {
        out.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn strokes_split_at_begin_path() {
        let style = Style::default();
        let path = vec![
            PathEntry::new(Point::new(0.0, 0.0), 0),
            PathEntry::begin(Point::new(1.0, 1.0), style.clone()),
            PathEntry::new(Point::new(2.0, 2.0), 16),
            PathEntry::begin(Point::new(3.0, 3.0), style),
        ];
        let lens: Vec<usize> = Strokes::new(&path).map(<[_]>::len).collect();
        assert_eq!(lens, [1, 2, 1]);
    }

    #[test]
    fn catmull_rom_passes_through_every_point() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 10.0), (30.0, 10.0)]);
        let path = catmull_rom(&points, 0.0);
        let ends: Vec<Point> = path
            .elements()
            .iter()
            .map(|el| match *el {
                PathEl::MoveTo(p) | PathEl::CurveTo(_, _, p) => p,
                _ => Point::ZERO,
            })
            .collect();
        assert_eq!(ends, points);
    }

    #[test]
    fn full_tension_gives_straight_segments() {
        let path = catmull_rom(&pts(&[(0.0, 0.0), (30.0, 0.0)]), 1.0);
        assert_eq!(
            path.elements()[1],
            PathEl::CurveTo(
                Point::new(0.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(30.0, 0.0)
            )
        );
        assert!(catmull_rom(&pts(&[(5.0, 5.0)]), 0.0).elements().is_empty());
    }

    #[test]
    fn svg_data_repeats_no_command_letters() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 2.0));
        path.line_to((3.25, 4.0));
        path.close_path();
        let mut out = String::new();
        write_svg_path_data(&mut out, &path, None);
        assert_eq!(out, "M0 0 L1 2 3.25 4Z");

        let mut curve = BezPath::new();
        curve.move_to((0.0, 0.0));
        curve.curve_to((1.0 / 3.0, 0.0), (2.0 / 3.0, 1.0), (1.0, 1.0));
        let mut out = String::new();
        write_svg_path_data(&mut out, &curve, Some(2));
        assert_eq!(out, "M0 0 C0.33 0 0.67 1 1 1");
    }
}
