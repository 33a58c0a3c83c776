// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-binding gesture configuration.
//!
//! Every option is optional; each recognizer resolves the options it uses
//! against its own defaults when it is built. Options can be set with the
//! typed builder methods or, for option-object style callers, by name with
//! [`GestureConfig::set_option`].
//!
//! ```
//! use understory_gesture::config::GestureConfig;
//! use understory_gesture::position::CoordinatePolicy;
//!
//! let typed = GestureConfig::new().fingers(2).timeout(300).position(CoordinatePolicy::Move);
//!
//! let mut named = GestureConfig::new();
//! named.set_option("fingers", "2").unwrap();
//! named.set_option("timeout", "300").unwrap();
//! named.set_option("position", "move").unwrap();
//!
//! assert_eq!(typed, named);
//! assert_eq!(typed.finger_bounds(1, usize::MAX), (2, 2));
//! ```

use alloc::string::{String, ToString};

use understory_timing::Millis;

use crate::error::ParseError;
use crate::position::CoordinatePolicy;

/// Options for one gesture binding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureConfig {
    /// Minimum number of contacts.
    pub min_fingers: Option<usize>,
    /// Maximum number of contacts.
    pub max_fingers: Option<usize>,
    /// Exact number of contacts; fallback for both bounds.
    pub fingers: Option<usize>,
    /// Coordinate policy for contact positions.
    pub position: Option<CoordinatePolicy>,
    /// Gesture-specific time limit, in milliseconds.
    pub timeout: Option<Millis>,
    /// Gesture-specific delay, in milliseconds.
    pub delay: Option<Millis>,
    /// Sampling interval, in milliseconds.
    pub interval: Option<Millis>,
    /// Movement tolerance, in pixels.
    pub drift_deviance: Option<f64>,
    /// Angle snap for swipes, in degrees.
    pub snap: Option<f64>,
    /// Velocity threshold for swipes, in pixels per millisecond.
    pub threshold: Option<f64>,
    /// Period of the drag coalescing frame timer, in milliseconds.
    pub frame_interval: Option<Millis>,
    /// Drag: track moves without an initial down.
    pub monitor: bool,
    /// Drag: coalesce moves into frames.
    pub animation_frame: bool,
    /// Register in the capture phase.
    pub use_capture: bool,
    /// Do not fan native pointer names out to other input families.
    pub strict: bool,
}

impl GestureConfig {
    /// Creates a configuration with every option unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum number of contacts.
    #[must_use]
    pub fn min_fingers(mut self, n: usize) -> Self {
        self.min_fingers = Some(n);
        self
    }

    /// Sets the maximum number of contacts.
    #[must_use]
    pub fn max_fingers(mut self, n: usize) -> Self {
        self.max_fingers = Some(n);
        self
    }

    /// Sets the exact number of contacts.
    #[must_use]
    pub fn fingers(mut self, n: usize) -> Self {
        self.fingers = Some(n);
        self
    }

    /// Sets the coordinate policy.
    #[must_use]
    pub fn position(mut self, policy: CoordinatePolicy) -> Self {
        self.position = Some(policy);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn timeout(mut self, ms: Millis) -> Self {
        self.timeout = Some(ms);
        self
    }

    /// Sets the delay.
    #[must_use]
    pub fn delay(mut self, ms: Millis) -> Self {
        self.delay = Some(ms);
        self
    }

    /// Sets the sampling interval.
    #[must_use]
    pub fn interval(mut self, ms: Millis) -> Self {
        self.interval = Some(ms);
        self
    }

    /// Sets the drift tolerance.
    #[must_use]
    pub fn drift_deviance(mut self, px: f64) -> Self {
        self.drift_deviance = Some(px);
        self
    }

    /// Sets the swipe angle snap.
    #[must_use]
    pub fn snap(mut self, degrees: f64) -> Self {
        self.snap = Some(degrees);
        self
    }

    /// Sets the swipe velocity threshold.
    #[must_use]
    pub fn threshold(mut self, px_per_ms: f64) -> Self {
        self.threshold = Some(px_per_ms);
        self
    }

    /// Sets the drag frame period.
    #[must_use]
    pub fn frame_interval(mut self, ms: Millis) -> Self {
        self.frame_interval = Some(ms);
        self
    }

    /// Enables or disables drag monitoring.
    #[must_use]
    pub fn monitor(mut self, on: bool) -> Self {
        self.monitor = on;
        self
    }

    /// Enables or disables frame coalescing.
    #[must_use]
    pub fn animation_frame(mut self, on: bool) -> Self {
        self.animation_frame = on;
        self
    }

    /// Enables or disables capture-phase registration.
    #[must_use]
    pub fn use_capture(mut self, on: bool) -> Self {
        self.use_capture = on;
        self
    }

    /// Enables or disables strict native names.
    #[must_use]
    pub fn strict(mut self, on: bool) -> Self {
        self.strict = on;
        self
    }

    /// Sets an option from its name and string value.
    ///
    /// Names use the option-object spelling (`minFingers`, `driftDeviance`,
    /// `animationFrame`, ...) and match case-insensitively.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        let value = value.trim();
        let invalid = || ParseError::InvalidValue {
            option: name.to_string(),
            value: value.to_string(),
        };
        let count = || value.parse::<usize>().map_err(|_| invalid());
        let millis = || value.parse::<Millis>().map_err(|_| invalid());
        let float = || {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)
        };
        let flag = || match value {
            "" | "1" => Ok(true),
            "0" => Ok(false),
            v if v.eq_ignore_ascii_case("true") => Ok(true),
            v if v.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(invalid()),
        };

        match Self::canonical_name(name) {
            Some("minFingers") => self.min_fingers = Some(count()?),
            Some("maxFingers") => self.max_fingers = Some(count()?),
            Some("fingers") => self.fingers = Some(count()?),
            Some("position") => self.position = Some(value.parse()?),
            Some("timeout") => self.timeout = Some(millis()?),
            Some("delay") => self.delay = Some(millis()?),
            Some("interval") => self.interval = Some(millis()?),
            Some("driftDeviance") => self.drift_deviance = Some(float()?),
            Some("snap") => self.snap = Some(float()?),
            Some("threshold") => self.threshold = Some(float()?),
            Some("frameInterval") => self.frame_interval = Some(millis()?),
            Some("monitor") => self.monitor = flag()?,
            Some("animationFrame") => self.animation_frame = flag()?,
            Some("useCapture") => self.use_capture = flag()?,
            Some("strict") => self.strict = flag()?,
            _ => return Err(ParseError::UnknownOption(String::from(name))),
        }
        Ok(())
    }

    /// Builds a configuration from `(name, value)` option pairs.
    pub fn from_options<'a>(
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ParseError> {
        let mut config = Self::new();
        for (name, value) in options {
            config.set_option(name, value)?;
        }
        Ok(config)
    }

    fn canonical_name(name: &str) -> Option<&'static str> {
        const NAMES: [&str; 15] = [
            "minFingers",
            "maxFingers",
            "fingers",
            "position",
            "timeout",
            "delay",
            "interval",
            "driftDeviance",
            "snap",
            "threshold",
            "frameInterval",
            "monitor",
            "animationFrame",
            "useCapture",
            "strict",
        ];
        let name = name.trim();
        NAMES.into_iter().find(|n| n.eq_ignore_ascii_case(name))
    }

    /// Layers `overrides` on top of `self`.
    ///
    /// Options set in `overrides` win; flags are enabled if either side
    /// enables them. Used for bulk registrations with shared options.
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        Self {
            min_fingers: overrides.min_fingers.or(self.min_fingers),
            max_fingers: overrides.max_fingers.or(self.max_fingers),
            fingers: overrides.fingers.or(self.fingers),
            position: overrides.position.or(self.position),
            timeout: overrides.timeout.or(self.timeout),
            delay: overrides.delay.or(self.delay),
            interval: overrides.interval.or(self.interval),
            drift_deviance: overrides.drift_deviance.or(self.drift_deviance),
            snap: overrides.snap.or(self.snap),
            threshold: overrides.threshold.or(self.threshold),
            frame_interval: overrides.frame_interval.or(self.frame_interval),
            monitor: self.monitor || overrides.monitor,
            animation_frame: self.animation_frame || overrides.animation_frame,
            use_capture: self.use_capture || overrides.use_capture,
            strict: self.strict || overrides.strict,
        }
    }

    /// Resolves `(min, max)` contact bounds.
    ///
    /// An explicit bound wins, then `fingers`, then the recognizer default.
    /// Zero counts as unset.
    #[must_use]
    pub fn finger_bounds(&self, default_min: usize, default_max: usize) -> (usize, usize) {
        let set = |v: Option<usize>| v.filter(|&n| n > 0);
        let fingers = set(self.fingers);
        let min = set(self.min_fingers).or(fingers).unwrap_or(default_min);
        let max = set(self.max_fingers).or(fingers).unwrap_or(default_max);
        (min, max.max(min))
    }

    /// The coordinate policy, defaulting to [`CoordinatePolicy::Relative`].
    #[must_use]
    pub fn policy(&self) -> CoordinatePolicy {
        self.position.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_bounds_prefer_explicit_then_fingers() {
        let c = GestureConfig::new();
        assert_eq!(c.finger_bounds(1, 1), (1, 1));
        assert_eq!(c.clone().fingers(3).finger_bounds(1, 10), (3, 3));
        assert_eq!(
            c.clone().fingers(3).max_fingers(5).finger_bounds(1, 10),
            (3, 5)
        );
        assert_eq!(c.min_fingers(0).finger_bounds(2, 10), (2, 10));
    }

    #[test]
    fn max_never_below_min() {
        let c = GestureConfig::new().min_fingers(4);
        assert_eq!(c.finger_bounds(1, 1), (4, 4));
    }

    #[test]
    fn set_option_accepts_camel_case_any_case() {
        let mut c = GestureConfig::new();
        c.set_option("DRIFTDEVIANCE", "12.5").unwrap();
        c.set_option("animationFrame", "true").unwrap();
        c.set_option("monitor", "").unwrap();
        assert_eq!(c.drift_deviance, Some(12.5));
        assert!(c.animation_frame);
        assert!(c.monitor);
    }

    #[test]
    fn set_option_rejects_bad_input() {
        let mut c = GestureConfig::new();
        assert_eq!(
            c.set_option("bogus", "1"),
            Err(ParseError::UnknownOption("bogus".into()))
        );
        assert_eq!(
            c.set_option("timeout", "-3"),
            Err(ParseError::InvalidValue {
                option: "timeout".into(),
                value: "-3".into()
            })
        );
        assert!(c.set_option("snap", "NaN").is_err());
        assert_eq!(
            c.set_option("position", "left"),
            Err(ParseError::UnknownPosition("left".into()))
        );
        assert_eq!(c, GestureConfig::new());
    }

    #[test]
    fn merged_overrides_win() {
        let shared = GestureConfig::new().timeout(100).delay(50).strict(true);
        let entry = GestureConfig::new().timeout(300).monitor(true);
        let m = shared.merged(&entry);
        assert_eq!(m.timeout, Some(300));
        assert_eq!(m.delay, Some(50));
        assert!(m.strict && m.monitor);
    }
}
