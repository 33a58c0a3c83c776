// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Targets and the host that resolves them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use understory_gesture::geometry::{BoundingBox, GeometrySource};

use crate::error::RegistryError;

/// Identifies one element of the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a registration applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// One element.
    Element(TargetId),
    /// Several elements; the registration fans out over them.
    Elements(Vec<TargetId>),
    /// Every element matching a selector, resolved through the host.
    Selector(String),
}

impl From<TargetId> for Target {
    fn from(id: TargetId) -> Self {
        Self::Element(id)
    }
}

impl From<Vec<TargetId>> for Target {
    fn from(ids: Vec<TargetId>) -> Self {
        Self::Elements(ids)
    }
}

impl From<&[TargetId]> for Target {
    fn from(ids: &[TargetId]) -> Self {
        Self::Elements(ids.to_vec())
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.into())
    }
}

impl Target {
    /// Resolves to concrete elements, in order and without repeats.
    pub fn resolve(&self, host: &dyn TargetHost) -> Result<SmallVec<[TargetId; 1]>, RegistryError> {
        let mut out = SmallVec::<[TargetId; 1]>::new();
        let mut push = |id: TargetId| {
            if !out.contains(&id) {
                out.push(id);
            }
        };
        match self {
            Self::Element(id) => push(*id),
            Self::Elements(ids) => ids.iter().copied().for_each(&mut push),
            Self::Selector(selector) => {
                let selector = selector.trim();
                if selector.is_empty() {
                    return Err(RegistryError::EmptySelector);
                }
                let matches = host.query_selector_all(selector);
                if matches.is_empty() {
                    return Err(RegistryError::NoMatch(selector.into()));
                }
                matches.into_iter().for_each(&mut push);
            }
        }
        if out.is_empty() {
            return Err(RegistryError::NoTarget);
        }
        Ok(out)
    }
}

/// The host the registry runs in.
///
/// Resolves selectors and reports element geometry. Elements are addressed
/// by [`TargetId`]s the host hands out.
pub trait TargetHost {
    /// Every element matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<TargetId>;

    /// Current geometry of `target`.
    fn bounding_box(&self, target: TargetId) -> BoundingBox;
}

/// Geometry of one target, read through the host.
pub(crate) struct HostGeometry<'a> {
    host: &'a dyn TargetHost,
    target: TargetId,
}

impl<'a> HostGeometry<'a> {
    pub(crate) fn new(host: &'a dyn TargetHost, target: TargetId) -> Self {
        Self { host, target }
    }
}

impl GeometrySource for HostGeometry<'_> {
    fn bounding_box(&self) -> BoundingBox {
        self.host.bounding_box(self.target)
    }
}
