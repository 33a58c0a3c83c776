// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sketch recorder.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use kurbo::{BezPath, Point, Size};
use understory_gesture::{GestureEvent, GestureKind, Phase};
use understory_timing::Millis;

use crate::error::SketchError;
use crate::path::{PathEntry, Strokes, catmull_rom, write_svg_path_data};
use crate::replay::{Replay, ReplayPoll};
use crate::style::{Style, Tool};

/// Initial state of a [`Sketch`].
#[derive(Clone, Debug, PartialEq)]
pub struct SketchConfig {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Pixels per sketch unit.
    pub zoom: f64,
    /// A previous recording to start from.
    pub path: Vec<PathEntry>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            zoom: 1.0,
            path: Vec::new(),
        }
    }
}

/// Records drag gestures as strokes.
///
/// Feed it the drag events of the drawing surface with
/// [`record`](Self::record). Positions are divided by the zoom, so the
/// recording is independent of the display scale. Rendering is up to the
/// host: [`strokes`](Self::strokes) and [`stroke_path`](Self::stroke_path)
/// give what to draw, and a [`Replay`] started with
/// [`start_replay`](Self::start_replay) says when.
#[derive(Clone, Debug)]
pub struct Sketch {
    size: Size,
    zoom: f64,
    style: Style,
    path: Vec<PathEntry>,
    stroke: Option<ActiveStroke>,
    replay: Option<Replay>,
}

/// Stroke being recorded.
#[derive(Copy, Clone, Debug)]
struct ActiveStroke {
    start: usize,
    last_time: Millis,
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

impl Sketch {
    /// Creates a sketch.
    ///
    /// A zoom that is not a positive number is treated as `1.0`.
    #[must_use]
    pub fn new(config: SketchConfig) -> Self {
        let zoom = if config.zoom > 0.0 { config.zoom } else { 1.0 };
        Self {
            size: Size::new(config.width, config.height),
            zoom,
            style: Style::default(),
            path: config.path,
            stroke: None,
            replay: None,
        }
    }

    /// Canvas size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Changes the canvas size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
    }

    /// Pixels per sketch unit.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The style new strokes are drawn with.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// The style new strokes are drawn with, mutably.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Switches the drawing tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.style.set_tool(tool);
    }

    /// Every recorded sample.
    #[must_use]
    pub fn path(&self) -> &[PathEntry] {
        &self.path
    }

    /// The recording grouped into strokes.
    #[must_use]
    pub fn strokes(&self) -> Strokes<'_> {
        Strokes::new(&self.path)
    }

    /// Returns `true` while a stroke is being recorded.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.stroke.is_some()
    }

    /// Records one drag event.
    ///
    /// `down` starts a stroke with a snapshot of the current style, `move`
    /// and `up` extend it. Returns whether the event was recorded; other
    /// gestures, moves outside a stroke and anything arriving during a
    /// replay are ignored.
    pub fn record(&mut self, event: &GestureEvent) -> bool {
        if event.kind != GestureKind::Drag || self.replay.is_some() {
            return false;
        }
        let point = Point::new(event.position.x / self.zoom, event.position.y / self.zoom);
        match (event.phase, self.stroke) {
            (Phase::Down, _) => {
                self.stroke = Some(ActiveStroke {
                    start: self.path.len(),
                    last_time: event.time,
                });
                self.path.push(PathEntry::begin(point, self.style.clone()));
            }
            (Phase::Move | Phase::Up, Some(mut stroke)) => {
                let lapse = event.time.saturating_sub(stroke.last_time);
                stroke.last_time = event.time;
                self.path.push(PathEntry::new(point, lapse));
                self.stroke = (event.phase == Phase::Move).then_some(stroke);
                if event.phase == Phase::Up {
                    tracing::trace!(samples = self.path.len() - stroke.start, "stroke recorded");
                }
            }
            _ => return false,
        }
        true
    }

    /// Removes the last stroke. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(start) = self.path.iter().rposition(|e| e.begin_path) else {
            return false;
        };
        self.path.truncate(start);
        self.stroke = None;
        true
    }

    /// Forgets the whole recording.
    pub fn clear_recording(&mut self) {
        self.path.clear();
        self.stroke = None;
        self.replay = None;
    }

    /// Smoothed outline of one stroke, in sketch units.
    #[must_use]
    pub fn stroke_path(stroke: &[PathEntry]) -> BezPath {
        let points: Vec<Point> = stroke.iter().map(PathEntry::point).collect();
        catmull_rom(&points, 0.0)
    }

    /// Smoothed outlines of every stroke, in sketch units.
    #[must_use]
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for stroke in self.strokes() {
            for el in Self::stroke_path(stroke).elements() {
                path.push(*el);
            }
        }
        path
    }

    /// The recording as SVG path data, rounded to `precision` decimals if
    /// given.
    #[must_use]
    pub fn to_svg_path_data(&self, precision: Option<u32>) -> String {
        let mut out = String::new();
        write_svg_path_data(&mut out, &self.to_bez_path(), precision);
        out
    }

    /// The recording as an SVG `<path>` element in the current style.
    #[must_use]
    pub fn to_svg_path(&self, precision: Option<u32>) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<path fill="none" stroke="{}" stroke-linecap="{}" stroke-width="{}" d="{}" />"#,
            self.style.stroke_style,
            self.style.line_cap.as_str(),
            self.style.line_width,
            self.to_svg_path_data(precision),
        );
        out
    }

    /// The recording as JSON.
    pub fn to_json(&self) -> Result<String, SketchError> {
        serde_json::to_string(&self.path).map_err(|e| SketchError::encode(&e))
    }

    /// Creates a sketch whose recording is read from JSON.
    ///
    /// `config.path` is ignored.
    pub fn from_json(config: SketchConfig, json: &str) -> Result<Self, SketchError> {
        let path = serde_json::from_str(json).map_err(|e| SketchError::decode(&e))?;
        Ok(Self::new(SketchConfig { path, ..config }))
    }

    /// Replaces the recording with one read from JSON.
    ///
    /// On error the current recording is kept.
    pub fn load_json(&mut self, json: &str) -> Result<(), SketchError> {
        let path: Vec<PathEntry> =
            serde_json::from_str(json).map_err(|e| SketchError::decode(&e))?;
        self.path = path;
        self.stroke = None;
        Ok(())
    }

    /// Starts replaying the recording at `now`.
    ///
    /// Recording is suspended until the replay is done or stopped.
    pub fn start_replay(&mut self, now: Millis) -> &mut Replay {
        self.stroke = None;
        self.replay.insert(Replay::new(now))
    }

    /// Returns `true` while a replay is in progress.
    #[must_use]
    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    /// Advances the replay; ends it once every sample has been drawn.
    ///
    /// Returns [`ReplayPoll::Done`] when no replay is in progress.
    pub fn poll_replay(&mut self, now: Millis) -> ReplayPoll {
        let Some(replay) = &mut self.replay else {
            return ReplayPoll::Done;
        };
        let poll = replay.poll(&self.path, now);
        if poll == ReplayPoll::Done {
            self.replay = None;
        }
        poll
    }

    /// Abandons the replay in progress.
    pub fn stop_replay(&mut self) {
        self.replay = None;
    }
}
