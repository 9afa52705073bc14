use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for element IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for nodes and edges.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern a new string as an ElementId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}

/// Per-store unique-id generator: `node_<n>` / `edge_<n>`.
///
/// The counters live on the store (not in a global static) so a wholesale
/// document load can re-seed them past every id it brought in — fresh ids
/// must never collide with loaded ones.
#[derive(Debug, Clone)]
pub struct IdGen {
    next_node: u64,
    next_edge: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self {
            next_node: 1,
            next_edge: 1,
        }
    }

    /// Mint a fresh node id.
    pub fn node_id(&mut self) -> ElementId {
        let id = ElementId::intern(&format!("node_{}", self.next_node));
        self.next_node += 1;
        id
    }

    /// Mint a fresh edge id.
    pub fn edge_id(&mut self) -> ElementId {
        let id = ElementId::intern(&format!("edge_{}", self.next_edge));
        self.next_edge += 1;
        id
    }

    /// Advance both counters past any `node_<n>` / `edge_<n>` id in `ids`.
    /// Ids in a foreign format (e.g. UUIDs from another exporter) are ignored;
    /// they cannot collide with the prefixed scheme.
    pub fn bump_past(&mut self, ids: impl Iterator<Item = ElementId>) {
        for id in ids {
            let s = id.as_str();
            if let Some(n) = s.strip_prefix("node_").and_then(|t| t.parse::<u64>().ok()) {
                self.next_node = self.next_node.max(n + 1);
            } else if let Some(n) = s.strip_prefix("edge_").and_then(|t| t.parse::<u64>().ok()) {
                self.next_edge = self.next_edge.max(n + 1);
            }
        }
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("node_1");
        let b = ElementId::intern("node_1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "node_1");
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut ids = IdGen::new();
        let a = ids.node_id();
        let b = ids.node_id();
        let e = ids.edge_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "node_1");
        assert_eq!(b.as_str(), "node_2");
        assert_eq!(e.as_str(), "edge_1");
    }

    #[test]
    fn bump_past_skips_loaded_ids() {
        let mut ids = IdGen::new();
        let loaded = [
            ElementId::intern("node_7"),
            ElementId::intern("edge_3"),
            ElementId::intern("3f2a9c44-uuid-style"),
        ];
        ids.bump_past(loaded.into_iter());
        assert_eq!(ids.node_id().as_str(), "node_8");
        assert_eq!(ids.edge_id().as_str(), "edge_4");
    }
}
