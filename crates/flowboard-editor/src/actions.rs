//! The editor facade: user-facing actions over the diagram store.
//!
//! `Editor` is the store interface handed to the canvas shell. Actions map
//! 1:1 to the toolbar and node-popover operations plus the two callbacks the
//! renderer reports (move and measured resize). Every action goes through
//! the command stack so it participates in undo/redo; actions on absent ids
//! return `false` and record nothing.

use crate::commands::CommandStack;
use crate::mutation::DiagramMutation;
use flowboard_core::document::{Document, DocumentError};
use flowboard_core::id::ElementId;
use flowboard_core::model::{Color, Connection, NodeKind, Position};
use flowboard_core::store::DiagramStore;
use log::info;

/// Undo history bound.
const UNDO_DEPTH: usize = 200;

pub struct Editor {
    store: DiagramStore,
    commands: CommandStack,
}

impl Editor {
    pub fn seeded(seed: u64) -> Self {
        Self {
            store: DiagramStore::seeded(seed),
            commands: CommandStack::new(UNDO_DEPTH),
        }
    }

    pub fn store(&self) -> &DiagramStore {
        &self.store
    }

    /// Snapshot for the renderer's read view.
    pub fn document(&self) -> Document {
        self.store.serialize()
    }

    // ─── Toolbar actions ─────────────────────────────────────────────────

    pub fn add_rectangle(&mut self, position: Option<Position>) -> ElementId {
        self.add_node(NodeKind::Rectangle, position)
    }

    pub fn add_text(&mut self, position: Option<Position>) -> ElementId {
        self.add_node(NodeKind::Text, position)
    }

    fn add_node(&mut self, kind: NodeKind, position: Option<Position>) -> ElementId {
        let node = self.store.create_node(kind, position, None);
        let id = node.id;
        info!("add {kind:?} node {id}");
        self.commands.execute(
            &mut self.store,
            DiagramMutation::AddNode {
                node: Box::new(node),
            },
            "add node",
        );
        id
    }

    // ─── Connection gesture ──────────────────────────────────────────────

    /// The renderer's "user attempted a connection" callback. Returns the
    /// new edge id, or `None` when the store rejects the connection
    /// (self-loop or dangling endpoint); rejections record no undo step.
    pub fn connect(&mut self, connection: Connection) -> Option<ElementId> {
        let edge = self.store.prepare_edge(connection)?;
        let id = edge.id;
        info!("connect {} -> {} as {id}", edge.source, edge.target);
        self.commands.execute(
            &mut self.store,
            DiagramMutation::AddEdge {
                edge: Box::new(edge),
            },
            "connect",
        );
        Some(id)
    }

    // ─── Node popover actions ────────────────────────────────────────────

    pub fn rename(&mut self, id: ElementId, label: &str) -> bool {
        if !self.store.contains_node(id) {
            return false;
        }
        self.commands.execute(
            &mut self.store,
            DiagramMutation::SetLabel {
                id,
                label: label.to_string(),
            },
            "rename",
        );
        true
    }

    /// Recolor from the palette or a free-form picker value.
    pub fn recolor(&mut self, id: ElementId, color: Color) -> bool {
        if !self.store.contains_node(id) {
            return false;
        }
        self.commands
            .execute(&mut self.store, DiagramMutation::SetColor { id, color }, "recolor");
        true
    }

    /// Delete a node, cascading to its edges.
    pub fn delete(&mut self, id: ElementId) -> bool {
        if !self.store.contains_node(id) {
            return false;
        }
        info!("delete node {id}");
        self.commands
            .execute(&mut self.store, DiagramMutation::RemoveNode { id }, "delete node");
        true
    }

    /// Remove every connection of a node, keeping the node.
    pub fn disconnect(&mut self, id: ElementId) -> bool {
        if self.store.edges_touching(id).is_empty() {
            return false;
        }
        info!("disconnect node {id}");
        self.commands
            .execute(&mut self.store, DiagramMutation::Disconnect { id }, "disconnect");
        true
    }

    // ─── Renderer geometry callbacks ─────────────────────────────────────

    pub fn node_moved(&mut self, id: ElementId, position: Position) -> bool {
        if !self.store.contains_node(id) {
            return false;
        }
        self.commands
            .execute(&mut self.store, DiagramMutation::SetPosition { id, position }, "move");
        true
    }

    pub fn node_resized(&mut self, id: ElementId, width: f64, height: f64) -> bool {
        if !self.store.contains_node(id) {
            return false;
        }
        self.commands.execute(
            &mut self.store,
            DiagramMutation::SetSize { id, width, height },
            "resize",
        );
        true
    }

    /// Bracket a drag gesture: per-frame moves/resizes in between collapse
    /// into one undo step.
    pub fn begin_drag(&mut self) {
        self.commands.begin_batch(&self.store);
    }

    pub fn end_drag(&mut self) {
        self.commands.end_batch(&self.store);
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.commands.undo(&mut self.store).is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.commands.redo(&mut self.store).is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// The Save payload: the current document as 2-space-indented JSON.
    pub fn export(&self) -> String {
        self.store.serialize().to_json()
    }

    /// Replace the diagram from imported JSON. On parse failure the current
    /// diagram is left untouched and the error carries the single
    /// notification message. A successful import clears undo history.
    pub fn import(&mut self, text: &str) -> Result<(), DocumentError> {
        let doc = Document::from_json(text)?;
        info!(
            "import document: {} node(s), {} edge(s)",
            doc.nodes.len(),
            doc.edges.len()
        );
        self.store.load(doc);
        self.commands.clear();
        Ok(())
    }
}
