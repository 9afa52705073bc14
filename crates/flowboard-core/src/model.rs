//! Core data model for flowboard diagrams.
//!
//! A diagram is two flat, ordered collections: nodes (rectangles and text
//! labels placed on the canvas) and directed edges between node handles.
//! There is no containment hierarchy; z-order is insertion order. The wire
//! names used by serde (`type`, `sourceHandle`, …) are the persisted JSON
//! format, so renames here are format changes.

use crate::id::ElementId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Measured rectangle dimensions clamp to this floor; the canvas resizer
/// enforces the same minimum on its end.
pub const MIN_RECT_SIZE: f64 = 200.0;

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ─── Color ───────────────────────────────────────────────────────────────

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// RGB color, persisted as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string: `#RGB` or `#RRGGBB`.
    /// The string may optionally start with `#`. Case-insensitive.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Emit as `#rrggbb`. Lowercase, matching the palette constants the
    /// recolor popover displays.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color {s:?}")))
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// The node kinds that can be placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Rectangle,
    Text,
}

/// A node's editable payload.
///
/// `width`/`height` are the measured dimensions reported by the canvas
/// resizer; they stay absent until the user resizes a rectangle node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub label: String,

    /// Fill color for rectangles, text color for text nodes.
    #[serde(default)]
    pub color: Color,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A diagram node: id, kind, canvas position, and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    pub position: Position,

    pub data: NodeData,
}

// ─── Handles ─────────────────────────────────────────────────────────────

/// The four sides a handle can sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// A named directional connection point on a node.
///
/// Every node exposes 8 handles: one primary per side plus an "opposite"
/// duplicate on the same side wired in the reverse direction, so any side
/// can both start and receive a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub side: HandleSide,
    pub opposite: bool,
}

impl Handle {
    /// All 8 handles, primaries first.
    pub const ALL: [Handle; 8] = [
        Handle::primary(HandleSide::Top),
        Handle::primary(HandleSide::Right),
        Handle::primary(HandleSide::Bottom),
        Handle::primary(HandleSide::Left),
        Handle::primary(HandleSide::Top).paired(),
        Handle::primary(HandleSide::Right).paired(),
        Handle::primary(HandleSide::Bottom).paired(),
        Handle::primary(HandleSide::Left).paired(),
    ];

    pub const fn primary(side: HandleSide) -> Self {
        Self {
            side,
            opposite: false,
        }
    }

    /// The duplicate handle on the same side, wired the other way.
    pub const fn paired(self) -> Self {
        Self {
            side: self.side,
            opposite: !self.opposite,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match (self.side, self.opposite) {
            (HandleSide::Top, false) => "top",
            (HandleSide::Right, false) => "right",
            (HandleSide::Bottom, false) => "bottom",
            (HandleSide::Left, false) => "left",
            (HandleSide::Top, true) => "top-opposite",
            (HandleSide::Right, true) => "right-opposite",
            (HandleSide::Bottom, true) => "bottom-opposite",
            (HandleSide::Left, true) => "left-opposite",
        }
    }

    /// Parse the wire form (`"right"`, `"right-opposite"`, …).
    pub fn parse(s: &str) -> Option<Self> {
        let (name, opposite) = match s.strip_suffix("-opposite") {
            Some(name) => (name, true),
            None => (s, false),
        };
        let side = match name {
            "top" => HandleSide::Top,
            "right" => HandleSide::Right,
            "bottom" => HandleSide::Bottom,
            "left" => HandleSide::Left,
            _ => return None,
        };
        Some(Self { side, opposite })
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Handle::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown handle {s:?}")))
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// How the edge is drawn. One kind today; the tag is persisted so more can
/// be added without a format break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Default,
}

/// A directed connection between two node handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: ElementId,

    pub source: ElementId,

    pub target: ElementId,

    #[serde(rename = "type", default)]
    pub kind: EdgeKind,

    #[serde(rename = "sourceHandle", default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<Handle>,

    #[serde(rename = "targetHandle", default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<Handle>,
}

/// A proposed edge, as reported by the renderer's connection gesture.
/// Becomes an [`Edge`] only if the store accepts it.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: ElementId,
    pub target: ElementId,
    pub source_handle: Option<Handle>,
    pub target_handle: Option<Handle>,
}

impl Connection {
    pub fn new(source: ElementId, target: ElementId) -> Self {
        Self {
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(mut self, source: Handle, target: Handle) -> Self {
        self.source_handle = Some(source);
        self.target_handle = Some(target);
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert_eq!(c.to_hex(), "#ff8800");

        // Short form expands per digit
        let c = Color::from_hex("#f80").unwrap();
        assert_eq!(c.to_hex(), "#ff8800");

        // Uppercase input accepted, lowercase emitted
        let c = Color::from_hex("6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6c5ce7");

        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gggggg"), None);
    }

    #[test]
    fn handle_wire_form_roundtrip() {
        for handle in Handle::ALL {
            assert_eq!(Handle::parse(handle.as_str()), Some(handle));
        }
        assert_eq!(Handle::parse("diagonal"), None);
        assert_eq!(
            Handle::parse("left-opposite"),
            Some(Handle::primary(HandleSide::Left).paired())
        );
    }

    #[test]
    fn paired_handle_is_involutive() {
        let h = Handle::primary(HandleSide::Right);
        assert_eq!(h.paired().paired(), h);
        assert_eq!(Handle::ALL.len(), 8);
    }

    #[test]
    fn node_json_shape() {
        let node = DiagramNode {
            id: ElementId::intern("node_1"),
            kind: NodeKind::Rectangle,
            position: Position::new(120.0, 80.5),
            data: NodeData {
                label: "Node 1".into(),
                color: Color::rgb(0xff, 0x00, 0x88),
                width: None,
                height: None,
            },
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "node_1",
                "type": "rectangle",
                "position": { "x": 120.0, "y": 80.5 },
                "data": { "label": "Node 1", "color": "#ff0088" }
            })
        );
    }

    #[test]
    fn edge_json_omits_absent_handles() {
        let edge = Edge {
            id: ElementId::intern("edge_1"),
            source: ElementId::intern("node_1"),
            target: ElementId::intern("node_2"),
            kind: EdgeKind::Default,
            source_handle: Some(Handle::primary(HandleSide::Right)),
            target_handle: None,
        };
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "edge_1",
                "source": "node_1",
                "target": "node_2",
                "type": "default",
                "sourceHandle": "right"
            })
        );

        // Absent "type" defaults on the way back in
        let parsed: Edge = serde_json::from_value(serde_json::json!({
            "id": "edge_2",
            "source": "node_2",
            "target": "node_1"
        }))
        .unwrap();
        assert_eq!(parsed.kind, EdgeKind::Default);
        assert_eq!(parsed.source_handle, None);
    }

    #[test]
    fn text_node_without_color_defaults_black() {
        let parsed: DiagramNode = serde_json::from_value(serde_json::json!({
            "id": "node_9",
            "type": "text",
            "position": { "x": 0.0, "y": 0.0 },
            "data": { "label": "caption" }
        }))
        .unwrap();
        assert_eq!(parsed.data.color, Color::BLACK);
    }
}
