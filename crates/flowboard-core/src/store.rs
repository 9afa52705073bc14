//! The diagram store: the single owner of the node and edge collections.
//!
//! Every operation is a synchronous, total mutation that preserves insertion
//! order. Operations on ids that are not present are silent no-ops, which
//! keeps delete/disconnect idempotent. The renderer never mutates these
//! collections itself; it reports gestures and reads snapshots.
//!
//! Invariant: every edge's `source`/`target` name existing, distinct nodes.
//! Enforced at edge insertion, preserved by cascading edge removal when a
//! node is deleted.

use crate::document::Document;
use crate::id::{ElementId, IdGen};
use crate::model::{
    Color, Connection, DiagramNode, Edge, EdgeKind, MIN_RECT_SIZE, NodeData, NodeKind, Position,
};
use crate::spawn::Spawner;
use log::debug;
use smallvec::SmallVec;

/// A partial update to a node's payload; `Some` fields overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub color: Option<Color>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// In-memory diagram state: ordered nodes and edges plus the id/spawn
/// sources used when creating elements.
pub struct DiagramStore {
    nodes: Vec<DiagramNode>,
    edges: Vec<Edge>,
    ids: IdGen,
    spawn: Spawner,
}

impl DiagramStore {
    /// An empty store with an explicit spawn seed. Tests pass a fixed seed;
    /// the wasm shell passes the clock.
    pub fn seeded(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            ids: IdGen::new(),
            spawn: Spawner::seeded(seed),
        }
    }

    pub fn new() -> Self {
        Self::seeded(0)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: ElementId) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: ElementId) -> Option<&mut DiagramNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: ElementId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    /// Clones of every edge incident to `id`, in collection order.
    pub fn edges_touching(&self, id: ElementId) -> SmallVec<[Edge; 4]> {
        self.edges
            .iter()
            .filter(|e| e.source == id || e.target == id)
            .cloned()
            .collect()
    }

    // ─── Node operations ─────────────────────────────────────────────────

    /// Build a node without inserting it: fresh id, spawn-random position
    /// and color where unspecified, label numbered from the current count.
    /// Rectangle dimensions stay unmeasured until the resizer reports them.
    pub fn create_node(
        &mut self,
        kind: NodeKind,
        position: Option<Position>,
        color: Option<Color>,
    ) -> DiagramNode {
        let id = self.ids.node_id();
        let position = position.unwrap_or_else(|| self.spawn.position());
        let color = color.unwrap_or_else(|| self.spawn.color());
        DiagramNode {
            id,
            kind,
            position,
            data: NodeData {
                label: format!("Node {}", self.nodes.len() + 1),
                color,
                width: None,
                height: None,
            },
        }
    }

    /// Append a fully-formed node. No-op if its id is already present.
    pub fn insert_node(&mut self, node: DiagramNode) {
        if self.contains_node(node.id) {
            debug!("insert_node: id {} already present, skipping", node.id);
            return;
        }
        debug!("insert {:?} node {}", node.kind, node.id);
        self.nodes.push(node);
    }

    /// Create and append a node, returning its id.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Option<Position>,
        color: Option<Color>,
    ) -> ElementId {
        let node = self.create_node(kind, position, color);
        let id = node.id;
        self.insert_node(node);
        id
    }

    /// Merge a patch into the node's payload. No-op when `id` is absent.
    pub fn update_node_data(&mut self, id: ElementId, patch: NodeDataPatch) {
        if let Some(node) = self.node_mut(id) {
            if let Some(label) = patch.label {
                node.data.label = label;
            }
            if let Some(color) = patch.color {
                node.data.color = color;
            }
            if let Some(width) = patch.width {
                node.data.width = Some(width);
            }
            if let Some(height) = patch.height {
                node.data.height = Some(height);
            }
        }
    }

    /// Replace the node's whole payload (the undo path for data edits).
    pub fn replace_node_data(&mut self, id: ElementId, data: NodeData) {
        if let Some(node) = self.node_mut(id) {
            node.data = data;
        }
    }

    /// Geometry callback: the renderer moved a node.
    pub fn set_position(&mut self, id: ElementId, position: Position) {
        if let Some(node) = self.node_mut(id) {
            node.position = position;
        }
    }

    /// Measurement callback: the renderer resized a node. Rectangle
    /// dimensions clamp to [`MIN_RECT_SIZE`].
    pub fn set_size(&mut self, id: ElementId, width: f64, height: f64) {
        if let Some(node) = self.node_mut(id) {
            let (width, height) = match node.kind {
                NodeKind::Rectangle => (width.max(MIN_RECT_SIZE), height.max(MIN_RECT_SIZE)),
                NodeKind::Text => (width, height),
            };
            node.data.width = Some(width);
            node.data.height = Some(height);
        }
    }

    /// Remove a node and, in the same step, every edge incident to it.
    /// Returns the cascaded edges so callers can restore them on undo.
    /// Idempotent: deleting an absent id removes nothing.
    pub fn delete_node(&mut self, id: ElementId) -> SmallVec<[Edge; 4]> {
        let removed = self.remove_edges_touching(id);
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() < before {
            debug!("deleted node {} ({} edge(s) cascaded)", id, removed.len());
        }
        removed
    }

    // ─── Edge operations ─────────────────────────────────────────────────

    fn accepts(&self, connection: &Connection) -> bool {
        if connection.is_self_loop() {
            debug!("connection rejected: self-loop on {}", connection.source);
            return false;
        }
        if !self.contains_node(connection.source) || !self.contains_node(connection.target) {
            debug!(
                "connection rejected: dangling endpoint {} -> {}",
                connection.source, connection.target
            );
            return false;
        }
        true
    }

    /// Build an edge from a proposed connection without inserting it.
    /// `None` for self-loops and dangling endpoints; the id counter is not
    /// consumed on rejection. Parallel edges between the same endpoints are
    /// permitted by policy, whatever their handles.
    pub fn prepare_edge(&mut self, connection: Connection) -> Option<Edge> {
        if !self.accepts(&connection) {
            return None;
        }
        Some(Edge {
            id: self.ids.edge_id(),
            source: connection.source,
            target: connection.target,
            kind: EdgeKind::Default,
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
        })
    }

    /// Append a fully-formed edge, re-checking the endpoint invariant.
    /// Returns whether the edge was accepted.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        let connection = Connection {
            source: edge.source,
            target: edge.target,
            source_handle: edge.source_handle,
            target_handle: edge.target_handle,
        };
        if !self.accepts(&connection) || self.edge(edge.id).is_some() {
            return false;
        }
        debug!("insert edge {} ({} -> {})", edge.id, edge.source, edge.target);
        self.edges.push(edge);
        true
    }

    /// Construct and append an edge from a connection gesture.
    pub fn add_edge(&mut self, connection: Connection) -> Option<ElementId> {
        let edge = self.prepare_edge(connection)?;
        let id = edge.id;
        self.edges.push(edge);
        Some(id)
    }

    pub fn remove_edge(&mut self, id: ElementId) -> Option<Edge> {
        let pos = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(pos))
    }

    /// Remove every edge incident to `id` without touching the node
    /// (the "disconnect" action). Returns the removed edges in order.
    pub fn remove_edges_touching(&mut self, id: ElementId) -> SmallVec<[Edge; 4]> {
        let mut removed = SmallVec::new();
        self.edges.retain(|e| {
            if e.source == id || e.target == id {
                removed.push(e.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Snapshot both collections.
    pub fn serialize(&self) -> Document {
        Document {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Replace both collections wholesale, then re-seed the id generator
    /// past every loaded id.
    pub fn load(&mut self, doc: Document) {
        self.nodes = doc.nodes;
        self.edges = doc.edges;
        self.ids.bump_past(
            self.nodes
                .iter()
                .map(|n| n.id)
                .chain(self.edges.iter().map(|e| e.id)),
        );
        debug!(
            "loaded document: {} node(s), {} edge(s)",
            self.nodes.len(),
            self.edges.len()
        );
    }
}

impl Default for DiagramStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> DiagramStore {
        DiagramStore::seeded(1)
    }

    #[test]
    fn add_node_grows_serialized_document_by_one() {
        let mut s = store();
        let before = s.serialize().nodes.len();
        let id = s.add_node(NodeKind::Rectangle, None, None);
        let doc = s.serialize();
        assert_eq!(doc.nodes.len(), before + 1);
        assert!(doc.nodes.iter().any(|n| n.id == id));
    }

    #[test]
    fn add_node_numbers_labels_from_count() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        let b = s.add_node(NodeKind::Text, None, None);
        assert_eq!(s.node(a).unwrap().data.label, "Node 1");
        assert_eq!(s.node(b).unwrap().data.label, "Node 2");
    }

    #[test]
    fn add_node_respects_explicit_position_and_color() {
        let mut s = store();
        let id = s.add_node(
            NodeKind::Rectangle,
            Some(Position::new(10.0, 20.0)),
            Some(Color::rgb(1, 2, 3)),
        );
        let node = s.node(id).unwrap();
        assert_eq!(node.position, Position::new(10.0, 20.0));
        assert_eq!(node.data.color, Color::rgb(1, 2, 3));
        assert_eq!(node.data.width, None, "dimensions start unmeasured");
    }

    #[test]
    fn self_loop_never_changes_edge_collection() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        assert_eq!(s.add_edge(Connection::new(a, a)), None);
        assert!(s.edges().is_empty());
    }

    #[test]
    fn dangling_endpoints_are_rejected() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        let ghost = ElementId::intern("node_999");
        assert_eq!(s.add_edge(Connection::new(a, ghost)), None);
        assert_eq!(s.add_edge(Connection::new(ghost, a)), None);
        assert!(s.edges().is_empty());
    }

    #[test]
    fn parallel_edges_are_permitted() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        let b = s.add_node(NodeKind::Rectangle, None, None);
        let e1 = s.add_edge(Connection::new(a, b)).unwrap();
        let e2 = s.add_edge(Connection::new(a, b)).unwrap();
        assert_ne!(e1, e2);
        assert_eq!(s.edges().len(), 2);
    }

    #[test]
    fn delete_cascades_to_incident_edges_only() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        let b = s.add_node(NodeKind::Rectangle, None, None);
        let c = s.add_node(NodeKind::Text, None, None);
        s.add_edge(Connection::new(a, b)).unwrap();
        s.add_edge(Connection::new(b, a)).unwrap();
        let bc = s.add_edge(Connection::new(b, c)).unwrap();

        let removed = s.delete_node(a);
        assert_eq!(removed.len(), 2);
        assert!(s.node(a).is_none());
        assert_eq!(s.edges().len(), 1);
        assert_eq!(s.edges()[0].id, bc);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        assert!(s.delete_node(a).is_empty(), "no edges to cascade");
        assert!(s.nodes().is_empty());

        let again = s.delete_node(a);
        assert!(again.is_empty());
        assert!(s.nodes().is_empty());
    }

    #[test]
    fn disconnect_keeps_the_node() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        let b = s.add_node(NodeKind::Rectangle, None, None);
        s.add_edge(Connection::new(a, b)).unwrap();
        s.add_edge(Connection::new(b, a)).unwrap();

        let removed = s.remove_edges_touching(a);
        assert_eq!(removed.len(), 2);
        assert!(s.edges().is_empty());
        assert!(s.contains_node(a));
        assert!(s.contains_node(b));
    }

    #[test]
    fn patch_merges_and_absent_id_is_noop() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        let original_color = s.node(a).unwrap().data.color;

        s.update_node_data(
            a,
            NodeDataPatch {
                label: Some("renamed".into()),
                ..Default::default()
            },
        );
        let node = s.node(a).unwrap();
        assert_eq!(node.data.label, "renamed");
        assert_eq!(node.data.color, original_color, "untouched field survives");

        let snapshot = s.serialize();
        s.update_node_data(
            ElementId::intern("node_404"),
            NodeDataPatch {
                label: Some("ghost".into()),
                ..Default::default()
            },
        );
        assert_eq!(s.serialize(), snapshot);
    }

    #[test]
    fn rectangle_resize_clamps_to_minimum() {
        let mut s = store();
        let rect = s.add_node(NodeKind::Rectangle, None, None);
        let text = s.add_node(NodeKind::Text, None, None);

        s.set_size(rect, 50.0, 400.0);
        let data = &s.node(rect).unwrap().data;
        assert_eq!(data.width, Some(MIN_RECT_SIZE));
        assert_eq!(data.height, Some(400.0));

        s.set_size(text, 50.0, 18.0);
        let data = &s.node(text).unwrap().data;
        assert_eq!(data.width, Some(50.0));
        assert_eq!(data.height, Some(18.0));
    }

    #[test]
    fn load_replaces_wholesale_and_reseeds_ids() {
        let mut s = store();
        let a = s.add_node(NodeKind::Rectangle, None, None);
        let b = s.add_node(NodeKind::Rectangle, None, None);
        s.add_edge(Connection::new(a, b)).unwrap();
        let doc = s.serialize();

        let mut fresh = DiagramStore::seeded(99);
        fresh.add_node(NodeKind::Text, None, None);
        fresh.load(doc.clone());
        assert_eq!(fresh.serialize(), doc);

        // Fresh ids never collide with loaded ones
        let next = fresh.add_node(NodeKind::Rectangle, None, None);
        assert!(doc.nodes.iter().all(|n| n.id != next));
    }
}
