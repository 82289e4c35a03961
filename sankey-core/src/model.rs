//! Data model for single-source Sankey diagrams

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::canvas::Color;

/// An RGB triple as written in the input.
///
/// Channels are nominally 0–255 but are not range-checked here; clamping
/// happens in [`Rgb::to_color`] right before a value reaches a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Per-channel linear blend toward `other`.
    ///
    /// `t = 0.0` yields `self` and `t = 1.0` yields `other`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        Rgb {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }

    /// Clamp every channel into `0..=255` and round to the nearest integer.
    pub fn to_color(self) -> Color {
        fn channel(v: f64) -> u8 {
            // NaN falls through `clamp` and casts to 0
            v.clamp(0.0, 255.0).round() as u8
        }
        Color::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r as f64, g as f64, b as f64)
    }
}

/// The single node all flow originates from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceNode {
    pub label: String,
    pub color: Rgb,
}

/// One receiving node of the diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationNode {
    /// Display label, also the key within [`Destinations`]
    pub label: String,
    /// Non-negative flow amount
    pub flow: f64,
    pub color: Rgb,
}

/// Destinations keyed by label, iterated in first-seen order.
///
/// Inserting a label that already exists replaces the stored node but keeps
/// the key where it was first seen, so stacking order follows the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Destinations {
    nodes: IndexMap<String, DestinationNode>,
}

impl Destinations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node, returning the node it replaced.
    pub fn insert(&mut self, node: DestinationNode) -> Option<DestinationNode> {
        self.nodes.insert(node.label.clone(), node)
    }

    pub fn get(&self, label: &str) -> Option<&DestinationNode> {
        self.nodes.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationNode> {
        self.nodes.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of every destination's flow
    pub fn total_flow(&self) -> f64 {
        self.iter().map(|d| d.flow).sum()
    }
}

impl<'a> IntoIterator for &'a Destinations {
    type Item = &'a DestinationNode;
    type IntoIter = indexmap::map::Values<'a, String, DestinationNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.values()
    }
}

impl FromIterator<DestinationNode> for Destinations {
    fn from_iter<I: IntoIterator<Item = DestinationNode>>(iter: I) -> Self {
        let mut destinations = Destinations::new();
        for node in iter {
            destinations.insert(node);
        }
        destinations
    }
}

// Serialized as an ordered list; the label key is already inside each node.
impl Serialize for Destinations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.nodes.values())
    }
}

/// A complete diagram as produced by the loader
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramSpec {
    pub title: String,
    pub source: SourceNode,
    pub destinations: Destinations,
}

impl DiagramSpec {
    pub fn total_flow(&self) -> f64 {
        self.destinations.total_flow()
    }
}
