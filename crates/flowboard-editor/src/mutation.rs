//! Reversible diagram mutations.
//!
//! Every edit the user can make is one `DiagramMutation`. The command stack
//! computes the inverse *before* applying the forward mutation, while the
//! prior state is still observable, then routes both through [`apply`].
//!
//! The `Restore*` variants only appear as inverses: node removal cascades to
//! incident edges, so undoing it has to bring the edges back alongside the
//! node, and undoing a disconnect re-inserts the whole removed set.

use flowboard_core::id::ElementId;
use flowboard_core::model::{Color, DiagramNode, Edge, NodeData, Position};
use flowboard_core::store::{DiagramStore, NodeDataPatch};
use smallvec::SmallVec;

#[derive(Debug, Clone)]
pub enum DiagramMutation {
    AddNode {
        node: Box<DiagramNode>,
    },
    RemoveNode {
        id: ElementId,
    },
    /// Re-insert a deleted node together with its cascaded edges.
    RestoreNode {
        node: Box<DiagramNode>,
        edges: SmallVec<[Edge; 4]>,
    },
    SetPosition {
        id: ElementId,
        position: Position,
    },
    SetSize {
        id: ElementId,
        width: f64,
        height: f64,
    },
    SetLabel {
        id: ElementId,
        label: String,
    },
    SetColor {
        id: ElementId,
        color: Color,
    },
    /// Replace a node's whole payload (inverse of the data edits above).
    SetData {
        id: ElementId,
        data: NodeData,
    },
    AddEdge {
        edge: Box<Edge>,
    },
    RemoveEdge {
        id: ElementId,
    },
    /// Remove every edge incident to a node, keeping the node.
    Disconnect {
        id: ElementId,
    },
    RemoveEdges {
        ids: SmallVec<[ElementId; 4]>,
    },
    RestoreEdges {
        edges: SmallVec<[Edge; 4]>,
    },
}

/// Apply a mutation to the store.
pub fn apply(store: &mut DiagramStore, mutation: DiagramMutation) {
    match mutation {
        DiagramMutation::AddNode { node } => store.insert_node(*node),
        DiagramMutation::RemoveNode { id } => {
            store.delete_node(id);
        }
        DiagramMutation::RestoreNode { node, edges } => {
            store.insert_node(*node);
            for edge in edges {
                store.insert_edge(edge);
            }
        }
        DiagramMutation::SetPosition { id, position } => store.set_position(id, position),
        DiagramMutation::SetSize { id, width, height } => store.set_size(id, width, height),
        DiagramMutation::SetLabel { id, label } => store.update_node_data(
            id,
            NodeDataPatch {
                label: Some(label),
                ..Default::default()
            },
        ),
        DiagramMutation::SetColor { id, color } => store.update_node_data(
            id,
            NodeDataPatch {
                color: Some(color),
                ..Default::default()
            },
        ),
        DiagramMutation::SetData { id, data } => store.replace_node_data(id, data),
        DiagramMutation::AddEdge { edge } => {
            store.insert_edge(*edge);
        }
        DiagramMutation::RemoveEdge { id } => {
            store.remove_edge(id);
        }
        DiagramMutation::Disconnect { id } => {
            store.remove_edges_touching(id);
        }
        DiagramMutation::RemoveEdges { ids } => {
            for id in ids {
                store.remove_edge(id);
            }
        }
        DiagramMutation::RestoreEdges { edges } => {
            for edge in edges {
                store.insert_edge(edge);
            }
        }
    }
}

/// Compute the mutation that undoes `mutation`, reading the state it is
/// about to overwrite. Mutations targeting absent ids invert to themselves;
/// both directions are no-ops.
pub fn inverse_of(store: &DiagramStore, mutation: &DiagramMutation) -> DiagramMutation {
    match mutation {
        DiagramMutation::AddNode { node } => DiagramMutation::RemoveNode { id: node.id },
        DiagramMutation::RemoveNode { id } => match store.node(*id) {
            Some(node) => DiagramMutation::RestoreNode {
                node: Box::new(node.clone()),
                edges: store.edges_touching(*id),
            },
            None => DiagramMutation::RemoveNode { id: *id },
        },
        DiagramMutation::RestoreNode { node, .. } => DiagramMutation::RemoveNode { id: node.id },
        DiagramMutation::SetPosition { id, .. } => DiagramMutation::SetPosition {
            id: *id,
            position: store.node(*id).map(|n| n.position).unwrap_or_default(),
        },
        DiagramMutation::SetSize { id, .. }
        | DiagramMutation::SetLabel { id, .. }
        | DiagramMutation::SetColor { id, .. }
        | DiagramMutation::SetData { id, .. } => DiagramMutation::SetData {
            id: *id,
            data: store.node(*id).map(|n| n.data.clone()).unwrap_or_default(),
        },
        DiagramMutation::AddEdge { edge } => DiagramMutation::RemoveEdge { id: edge.id },
        DiagramMutation::RemoveEdge { id } => match store.edge(*id) {
            Some(edge) => DiagramMutation::AddEdge {
                edge: Box::new(edge.clone()),
            },
            None => DiagramMutation::RemoveEdge { id: *id },
        },
        DiagramMutation::Disconnect { id } => DiagramMutation::RestoreEdges {
            edges: store.edges_touching(*id),
        },
        DiagramMutation::RemoveEdges { ids } => DiagramMutation::RestoreEdges {
            edges: ids
                .iter()
                .filter_map(|id| store.edge(*id).cloned())
                .collect(),
        },
        DiagramMutation::RestoreEdges { edges } => DiagramMutation::RemoveEdges {
            ids: edges.iter().map(|e| e.id).collect(),
        },
    }
}
