// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event names and bulk event lists.
//!
//! Names are separated by spaces or commas, matched without regard to case,
//! and may carry an `on` prefix (`"onClick"` is `click`). A name that is a
//! gesture is always the gesture, even where the host has a native event of
//! the same name.
//!
//! ```
//! use understory_gesture::{GestureKind, NativeType};
//! use understory_gesture_registry::names::{parse_event_names, EventName};
//!
//! let names = parse_event_names("onClick, dbltap mousedown").unwrap();
//! assert_eq!(
//!     names.as_slice(),
//!     [
//!         EventName::Gesture(GestureKind::Click),
//!         EventName::Gesture(GestureKind::DoubleTap),
//!         EventName::Native(NativeType::MouseDown),
//!     ]
//! );
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use understory_gesture::{GestureConfig, GestureKind, NativeType};

use crate::error::RegistryError;
use crate::listener::Listener;

/// A parsed event name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    /// A gesture recognized by `understory_gesture`.
    Gesture(GestureKind),
    /// A native event, delivered as is.
    Native(NativeType),
}

impl EventName {
    /// Parses one name.
    ///
    /// Returns `None` for an empty name.
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        let lower = word.trim().to_ascii_lowercase();
        let name = match lower.strip_prefix("on") {
            Some(rest) if !rest.is_empty() => rest,
            _ => lower.as_str(),
        };
        if name.is_empty() {
            return None;
        }
        Some(match GestureKind::from_name(name) {
            Some(kind) => Self::Gesture(kind),
            None => Self::Native(NativeType::from(name)),
        })
    }

    /// The canonical name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gesture(kind) => kind.name(),
            Self::Native(ty) => ty.name(),
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a name list into event names, dropping repeats.
pub fn parse_event_names(names: &str) -> Result<SmallVec<[EventName; 2]>, RegistryError> {
    let mut out = SmallVec::<[EventName; 2]>::new();
    for name in names.split([' ', ',']).filter_map(EventName::parse) {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    if out.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    Ok(out)
}

/// Several event names, each with its own listener and options.
///
/// Used with [`DispatchRegistry::add_bulk`](crate::DispatchRegistry::add_bulk),
/// which layers each entry's options over a shared set.
#[derive(Clone, Debug, Default)]
pub struct EventSpec {
    entries: Vec<SpecEntry>,
}

#[derive(Clone, Debug)]
pub(crate) struct SpecEntry {
    pub(crate) names: String,
    pub(crate) listener: Listener,
    pub(crate) config: Option<GestureConfig>,
}

impl EventSpec {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `names` handled by `listener` with the shared options.
    #[must_use]
    pub fn on(mut self, names: impl Into<String>, listener: Listener) -> Self {
        self.entries.push(SpecEntry {
            names: names.into(),
            listener,
            config: None,
        });
        self
    }

    /// Adds `names` handled by `listener` with options of their own.
    #[must_use]
    pub fn on_with(
        mut self,
        names: impl Into<String>,
        listener: Listener,
        config: GestureConfig,
    ) -> Self {
        self.entries.push(SpecEntry {
            names: names.into(),
            listener,
            config: Some(config),
        });
        self
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_prefix_and_case_are_ignored() {
        assert_eq!(
            EventName::parse("ONDBLCLICK"),
            Some(EventName::Gesture(GestureKind::DoubleClick))
        );
        assert_eq!(
            EventName::parse("onMSPointerDown"),
            Some(EventName::Native(NativeType::MsPointerDown))
        );
        assert_eq!(
            EventName::parse("on"),
            Some(EventName::Native(NativeType::Other("on".into())))
        );
        assert_eq!(EventName::parse(""), None);
    }

    #[test]
    fn gesture_names_win_over_native_ones() {
        assert_eq!(
            EventName::parse("wheel"),
            Some(EventName::Gesture(GestureKind::Wheel))
        );
        assert_eq!(
            EventName::parse("mousewheel"),
            Some(EventName::Native(NativeType::MouseWheel))
        );
    }

    #[test]
    fn lists_split_on_spaces_and_commas() {
        let names = parse_event_names(" tap,,longpress  tap ").unwrap();
        assert_eq!(
            names.as_slice(),
            [
                EventName::Gesture(GestureKind::Tap),
                EventName::Gesture(GestureKind::LongPress)
            ]
        );
        assert_eq!(parse_event_names(" , "), Err(RegistryError::EmptyName));
    }
}
