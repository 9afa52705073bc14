//! WASM bridge for flowboard — exposes the diagram engine to JavaScript.
//!
//! The JS shell owns the graph-canvas renderer (hit-testing, drag/pan/zoom,
//! connection preview) and the chrome around it (toolbar, popovers, file
//! pickers). This bridge owns the state: every gesture callback lands here,
//! and the renderer re-reads `snapshot_json()` after any call that returns
//! `true`.
//!
//! Compiled via `wasm-pack build --target web`.

use flowboard_core::document::EXPORT_FILE_NAME;
use flowboard_core::id::ElementId;
use flowboard_core::model::{Color, Connection, Handle, Position};
use flowboard_core::spawn::PALETTE;
use flowboard_editor::Editor;
use wasm_bindgen::prelude::*;

/// The main WASM-facing diagram controller.
///
/// Holds the editor (store + undo stack). All interaction from the canvas
/// shell goes through this struct.
#[wasm_bindgen]
pub struct FlowBoard {
    editor: Editor,
}

#[wasm_bindgen]
impl FlowBoard {
    /// Create a controller seeded from the clock, so spawn positions and
    /// colors vary between sessions.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        init_runtime();
        Self {
            editor: Editor::seeded(js_sys::Date::now() as u64),
        }
    }

    /// Create a controller with a fixed spawn seed (deterministic demos,
    /// JS-side tests).
    pub fn seeded(seed: u64) -> FlowBoard {
        init_runtime();
        Self {
            editor: Editor::seeded(seed),
        }
    }

    // ─── Toolbar actions ─────────────────────────────────────────────────

    /// Add a rectangle node at a random spawn position. Returns its id.
    pub fn add_rectangle(&mut self) -> String {
        self.editor.add_rectangle(None).to_string()
    }

    pub fn add_rectangle_at(&mut self, x: f64, y: f64) -> String {
        self.editor
            .add_rectangle(Some(Position::new(x, y)))
            .to_string()
    }

    /// Add a text node at a random spawn position. Returns its id.
    pub fn add_text(&mut self) -> String {
        self.editor.add_text(None).to_string()
    }

    pub fn add_text_at(&mut self, x: f64, y: f64) -> String {
        self.editor.add_text(Some(Position::new(x, y))).to_string()
    }

    // ─── Connection gesture ──────────────────────────────────────────────

    /// The renderer's connection callback. Unknown handle names are treated
    /// as handle-less connections. Returns whether an edge was created.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> bool {
        let connection = Connection {
            source: ElementId::intern(source),
            target: ElementId::intern(target),
            source_handle: source_handle.as_deref().and_then(Handle::parse),
            target_handle: target_handle.as_deref().and_then(Handle::parse),
        };
        self.editor.connect(connection).is_some()
    }

    // ─── Node popover actions ────────────────────────────────────────────

    pub fn rename_node(&mut self, id: &str, label: &str) -> bool {
        self.editor.rename(ElementId::intern(id), label)
    }

    /// Recolor from a hex string (palette button or free-form picker).
    /// Invalid colors are refused.
    pub fn recolor_node(&mut self, id: &str, color: &str) -> bool {
        match Color::from_hex(color) {
            Some(color) => self.editor.recolor(ElementId::intern(id), color),
            None => {
                log::warn!("recolor: invalid hex color {color:?}");
                false
            }
        }
    }

    pub fn delete_node(&mut self, id: &str) -> bool {
        self.editor.delete(ElementId::intern(id))
    }

    pub fn disconnect_node(&mut self, id: &str) -> bool {
        self.editor.disconnect(ElementId::intern(id))
    }

    // ─── Renderer geometry callbacks ─────────────────────────────────────

    pub fn node_moved(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.editor
            .node_moved(ElementId::intern(id), Position::new(x, y))
    }

    pub fn node_resized(&mut self, id: &str, width: f64, height: f64) -> bool {
        self.editor
            .node_resized(ElementId::intern(id), width, height)
    }

    /// Bracket a drag gesture so its frames undo as one step.
    pub fn begin_drag(&mut self) {
        self.editor.begin_drag();
    }

    pub fn end_drag(&mut self) {
        self.editor.end_drag();
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    // ─── Read views ──────────────────────────────────────────────────────

    /// The `{nodes, edges}` snapshot the renderer draws from (compact JSON).
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.editor.document())
            .unwrap_or_else(|_| r#"{"nodes":[],"edges":[]}"#.to_string())
    }

    pub fn node_count(&self) -> usize {
        self.editor.store().nodes().len()
    }

    pub fn edge_count(&self) -> usize {
        self.editor.store().edges().len()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// The Save payload: 2-space-indented JSON for the file download.
    pub fn export_json(&self) -> String {
        self.editor.export()
    }

    /// The download name the Save action should use.
    pub fn export_file_name() -> String {
        EXPORT_FILE_NAME.to_string()
    }

    /// Replace the diagram from an uploaded file. Returns JSON:
    /// `{"ok":true}` or `{"ok":false,"error":"…"}`; the error string is the
    /// one notification the shell shows, and on failure the current diagram
    /// is untouched.
    pub fn import_json(&mut self, text: &str) -> String {
        match self.editor.import(text) {
            Ok(()) => r#"{"ok":true}"#.to_string(),
            Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
        }
    }

    /// The fixed 14-color recolor palette, as hex strings.
    pub fn palette_json() -> String {
        let hex: Vec<String> = PALETTE.iter().map(Color::to_hex).collect();
        serde_json::to_string(&hex).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for FlowBoard {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Standalone validation (no controller needed) ────────────────────────

/// Validate an uploaded document without touching any state. Returns JSON:
/// `{"ok":true}` or `{"ok":false,"error":"…"}`.
#[wasm_bindgen]
pub fn validate(text: &str) -> String {
    match flowboard_core::Document::from_json(text) {
        Ok(_) => r#"{"ok":true}"#.to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

// ─── Runtime setup ───────────────────────────────────────────────────────

/// Install the console logger and panic hook once.
fn init_runtime() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = console_log::init_with_level(log::Level::Debug);
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(|info| {
            let msg = format!("flowboard panic: {info}");
            web_sys::console::error_1(&msg.into());
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn palette_json_lists_fourteen_hex_strings() {
        let palette: Vec<String> = serde_json::from_str(&FlowBoard::palette_json()).unwrap();
        assert_eq!(palette.len(), 14);
        assert_eq!(palette[0], "#ff0000");
        assert_eq!(palette[13], "#000000");
    }

    #[test]
    fn export_file_name_is_stable() {
        assert_eq!(FlowBoard::export_file_name(), "flow_data.json");
    }

    #[test]
    fn validate_reports_parse_errors_as_json() {
        assert_eq!(validate("{}"), r#"{"ok":true}"#);
        let report: serde_json::Value = serde_json::from_str(&validate("not json")).unwrap();
        assert_eq!(report["ok"], serde_json::json!(false));
        assert!(report["error"].as_str().unwrap().contains("diagram JSON"));
    }
}
