// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke style and drawing tools.

use alloc::string::String;

use serde::{Deserialize, Serialize};

/// The active drawing tool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints with the stroke color.
    #[default]
    Brush,
    /// Removes what lies under the stroke.
    Eraser,
}

impl Tool {
    /// The composite mode this tool draws with.
    #[must_use]
    pub const fn composite(self) -> Composite {
        match self {
            Self::Brush => Composite::SourceOver,
            Self::Eraser => Composite::DestinationOut,
        }
    }
}

/// How a stroke combines with what is already drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Composite {
    /// Draw over existing content.
    #[default]
    SourceOver,
    /// Erase existing content where the stroke covers it.
    DestinationOut,
}

/// Shape of stroke ends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Flat end at the endpoint.
    Butt,
    /// Rounded end.
    #[default]
    Round,
    /// Square end extending past the endpoint.
    Square,
}

impl LineCap {
    /// The CSS and SVG keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Shape of stroke corners.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    /// Rounded corner.
    #[default]
    Round,
    /// Cut-off corner.
    Bevel,
    /// Sharp corner.
    Miter,
}

/// Style a stroke is drawn with.
///
/// Serialized with the canvas property names (`strokeStyle`, `lineWidth`, …)
/// so recordings stay readable by other players.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Drawing tool.
    pub tool: Tool,
    /// Opacity in `0.0..=1.0`.
    pub global_alpha: f64,
    /// Composite mode, following the tool.
    pub global_composite_operation: Composite,
    /// Stroke color as a CSS color string.
    pub stroke_style: String,
    /// Stroke width in sketch units.
    pub line_width: f64,
    /// End shape.
    pub line_cap: LineCap,
    /// Corner shape.
    pub line_join: LineJoin,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            global_alpha: 0.5,
            global_composite_operation: Composite::SourceOver,
            stroke_style: "#FF0000".into(),
            line_width: 10.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
        }
    }
}

impl Style {
    /// Switches the tool and the composite mode with it.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.global_composite_operation = tool.composite();
    }

    /// Returns `true` if strokes in this style erase.
    #[must_use]
    pub fn is_eraser(&self) -> bool {
        self.global_composite_operation == Composite::DestinationOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eraser_draws_destination_out() {
        let mut style = Style::default();
        style.set_tool(Tool::Eraser);
        assert!(style.is_eraser());
        style.set_tool(Tool::Brush);
        assert_eq!(style.global_composite_operation, Composite::SourceOver);
    }

    #[test]
    fn serializes_with_canvas_names() {
        let json = serde_json::to_string(&Style::default()).unwrap();
        assert_eq!(
            json,
            r##"{"tool":"brush","globalAlpha":0.5,"globalCompositeOperation":"source-over","strokeStyle":"#FF0000","lineWidth":10.0,"lineCap":"round","lineJoin":"round"}"##
        );
    }
}
