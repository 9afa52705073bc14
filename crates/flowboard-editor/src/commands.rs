//! Undo/Redo command stack.
//!
//! Every mutation is wrapped in a reversible `Command` that can be undone.
//! Commands are pushed to a stack; undo pops and applies the inverse.
//!
//! Drag gestures use **snapshot batching**: the full document is captured at
//! the start and end of the gesture, so undo/redo replaces the whole diagram
//! in a single step (no per-frame inverse chain).

use crate::mutation::{self, DiagramMutation};
use flowboard_core::document::Document;
use flowboard_core::store::DiagramStore;

/// A command that captures both a forward mutation and its inverse.
/// May hold a single mutation or a document snapshot pair (from drag
/// gestures).
#[derive(Debug, Clone)]
pub enum Command {
    /// Single mutation with its inverse (for non-batch operations).
    Single {
        forward: Box<DiagramMutation>,
        inverse: Box<DiagramMutation>,
        description: String,
    },
    /// Snapshot-based batch: the document before and after a gesture.
    Snapshot {
        doc_before: Document,
        doc_after: Document,
        description: String,
    },
}

/// Manages undo/redo stacks with batch grouping for drag gestures.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Document captured at the start of a batch.
    batch_snapshot: Option<Document>,
    /// Whether any mutations occurred during the current batch.
    batch_dirty: bool,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch group. Captures the current document as a snapshot for
    /// undo. All mutations until `end_batch()` are applied live but tracked
    /// as one atomic undo step.
    pub fn begin_batch(&mut self, store: &DiagramStore) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(store.serialize());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes, if any mutations
    /// changed the document, push one snapshot command to the undo stack.
    pub fn end_batch(&mut self, store: &DiagramStore) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            if self.batch_dirty {
                let doc_after = store.serialize();
                let doc_before = self.batch_snapshot.take().unwrap_or_default();

                if doc_before != doc_after {
                    self.push(Command::Snapshot {
                        doc_before,
                        doc_after,
                        description: "drag".to_string(),
                    });
                }
            }
            self.batch_snapshot = None;
            self.batch_dirty = false;
        }
    }

    /// Apply a mutation through the stack.
    pub fn execute(
        &mut self,
        store: &mut DiagramStore,
        mutation: DiagramMutation,
        description: &str,
    ) {
        if self.batch_depth > 0 {
            // Inside a batch: apply live but don't track; the snapshot at
            // end_batch() captures the cumulative effect.
            mutation::apply(store, mutation);
            self.batch_dirty = true;
            return;
        }

        let inverse = mutation::inverse_of(store, &mutation);
        mutation::apply(store, mutation.clone());

        self.push(Command::Single {
            forward: Box::new(mutation),
            inverse: Box::new(inverse),
            description: description.to_string(),
        });
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // New action invalidates the redo chain
        self.redo_stack.clear();
    }

    /// Undo the last command (or batch snapshot).
    pub fn undo(&mut self, store: &mut DiagramStore) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                inverse,
                description,
                ..
            } => {
                mutation::apply(store, *inverse.clone());
                description.clone()
            }
            Command::Snapshot {
                doc_before,
                description,
                ..
            } => {
                store.load(doc_before.clone());
                description.clone()
            }
        };
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone command (or batch snapshot).
    pub fn redo(&mut self, store: &mut DiagramStore) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                forward,
                description,
                ..
            } => {
                mutation::apply(store, *forward.clone());
                description.clone()
            }
            Command::Snapshot {
                doc_after,
                description,
                ..
            } => {
                store.load(doc_after.clone());
                description.clone()
            }
        };
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop both stacks. Used after a document import, whose previous
    /// diagram the recorded inverses no longer apply to.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
        self.batch_dirty = false;
    }
}
