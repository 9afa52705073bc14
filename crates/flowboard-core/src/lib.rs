pub mod document;
pub mod id;
pub mod model;
pub mod spawn;
pub mod store;

pub use document::{Document, DocumentError, EXPORT_FILE_NAME};
pub use id::{ElementId, IdGen};
pub use model::*;
pub use spawn::{PALETTE, Spawner};
pub use store::{DiagramStore, NodeDataPatch};
