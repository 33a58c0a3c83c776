// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target geometry and the per-session bounding-box cache.
//!
//! Recognizers read a target's box once when a contact session starts and
//! reuse it for every sample of that session. [`GeometrySource`] is how the
//! host supplies the box; [`BoundingBoxCache`] holds the session copy.
//!
//! ```
//! use kurbo::{Insets, Rect, Size};
//! use understory_gesture::geometry::BoundingBox;
//!
//! // A 200x100 element with a 2px border drawn at 1:1 scale.
//! let bbox = BoundingBox::from_client_rect(
//!     Rect::new(10.0, 20.0, 210.0, 120.0),
//!     Insets::uniform(2.0),
//!     false,
//!     Some(Size::new(200.0, 100.0)),
//! );
//! assert_eq!(bbox.rect, Rect::new(12.0, 22.0, 208.0, 118.0));
//! assert_eq!(bbox.scale.x, 1.0);
//! ```

use kurbo::{Insets, Point, Rect, Size, Vec2};

/// Screen geometry of a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Content box in client (viewport) coordinates.
    pub rect: Rect,
    /// Scroll accumulated from the target's scrolling containers, relative to
    /// the document scroll.
    pub scroll: Vec2,
    /// Scroll of the document itself.
    pub document_scroll: Vec2,
    /// Rendered size over layout size, per axis.
    pub scale: Vec2,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

impl BoundingBox {
    /// Creates a box with no scroll and unit scale.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self {
            rect,
            scroll: Vec2::ZERO,
            document_scroll: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
        }
    }

    /// Builds a box from a client rect as reported by the host.
    ///
    /// Unless the element uses `border-box` sizing, the border widths are
    /// removed so the box covers the content area. `layout_size` is the
    /// untransformed size of the element; when present, [`BoundingBox::scale`]
    /// is the rendered size divided by it.
    #[must_use]
    pub fn from_client_rect(
        client: Rect,
        border: Insets,
        border_box: bool,
        layout_size: Option<Size>,
    ) -> Self {
        let ratio = |rendered: f64, layout: f64| {
            if layout > 0.0 && rendered > 0.0 {
                rendered / layout
            } else {
                1.0
            }
        };
        let scale = layout_size.map_or(Vec2::new(1.0, 1.0), |layout| {
            Vec2::new(
                ratio(client.width(), layout.width),
                ratio(client.height(), layout.height),
            )
        });
        let rect = if border_box {
            client
        } else {
            Rect::new(
                client.x0 + border.x0,
                client.y0 + border.y0,
                client.x1 - border.x1,
                client.y1 - border.y1,
            )
        };
        Self {
            rect,
            scroll: Vec2::ZERO,
            document_scroll: Vec2::ZERO,
            scale,
        }
    }

    /// Sets the container scroll.
    #[must_use]
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }

    /// Sets the document scroll.
    #[must_use]
    pub fn with_document_scroll(mut self, scroll: Vec2) -> Self {
        self.document_scroll = scroll;
        self
    }

    /// Top-left corner of the content box.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.rect.origin()
    }

    /// Content box width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Content box height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Position of `page` relative to the box's top-left corner.
    #[must_use]
    pub fn to_local(&self, page: Point) -> Point {
        page - self.origin().to_vec2()
    }

    /// Converts a page position to client coordinates.
    #[must_use]
    pub fn page_to_client(&self, page: Point) -> Point {
        page - self.document_scroll
    }

    /// Strict containment of a box-local point: the edges are outside.
    #[must_use]
    pub fn contains_local(&self, local: Point) -> bool {
        local.x > 0.0 && local.x < self.width() && local.y > 0.0 && local.y < self.height()
    }

    /// Strict containment of a client point: the edges are outside.
    #[must_use]
    pub fn contains_client(&self, client: Point) -> bool {
        client.x > self.rect.x0
            && client.y > self.rect.y0
            && client.x < self.rect.x1
            && client.y < self.rect.y1
    }
}

/// Supplies the current geometry of a target.
pub trait GeometrySource {
    /// Returns the target's box as of now.
    fn bounding_box(&self) -> BoundingBox;
}

impl GeometrySource for BoundingBox {
    fn bounding_box(&self) -> BoundingBox {
        *self
    }
}

impl GeometrySource for Rect {
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(*self)
    }
}

/// The box captured for the current session.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundingBoxCache {
    cached: Option<BoundingBox>,
}

impl BoundingBoxCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { cached: None }
    }

    /// Reads the box from `source` and caches it.
    pub fn refresh(&mut self, source: &dyn GeometrySource) -> BoundingBox {
        let bbox = source.bounding_box();
        self.cached = Some(bbox);
        bbox
    }

    /// The cached box, if any.
    #[must_use]
    pub fn get(&self) -> Option<&BoundingBox> {
        self.cached.as_ref()
    }

    /// The cached box, or an empty one.
    #[must_use]
    pub fn get_or_default(&self) -> BoundingBox {
        self.cached.unwrap_or_default()
    }

    /// Drops the cached box.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
