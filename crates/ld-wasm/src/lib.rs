//! WASM bridge for LD — exposes the editor core to the browser.
//!
//! Compiled via `wasm-pack build --target web`. The page renders the DOM
//! from `render_json()`, measures every element with
//! `getBoundingClientRect` and reports it through `set_bounds`, then
//! places drop-zone indicators from `drop_zones_json()`. Node handles cross
//! the boundary as integers; `-1` means "none".

use ld_core::{ElementKind, NodeIndex};
use ld_editor::{Editor, EditorConfig, EditorEvent};
use ld_render::{Bounds, RenderId};
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
#[wasm_bindgen]
pub struct LdEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl LdEditor {
    /// Create an editor. `config_json` may be empty for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<LdEditor, JsValue> {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let editor = Editor::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { editor })
    }

    /// Forward editor events to `callback` as JSON strings.
    pub fn on_event(&mut self, callback: js_sys::Function) {
        self.editor.subscribe(move |event| {
            let json = event_json(event).to_string();
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                web_sys::console::error_1(&e);
            }
        });
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// The rendered tree as JSON, or `null` before the first render.
    pub fn render_json(&self) -> String {
        let tree = self.editor.render_tree();
        tree.root()
            .and_then(|root| tree.snapshot(root))
            .and_then(|snap| serde_json::to_string(&snap).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    /// Report the measured box of a rendered element.
    pub fn set_bounds(&mut self, element: u32, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.editor.set_bounds(
            RenderId::from_index(element as usize),
            Bounds::new(x, y, width, height),
        )
    }

    /// All drop zones with their current screen points, as a JSON array.
    pub fn drop_zones_json(&self) -> String {
        let tree = self.editor.render_tree();
        let zones: Vec<serde_json::Value> = self
            .editor
            .drop_zones()
            .iter()
            .enumerate()
            .map(|(i, z)| {
                let point = z.point(tree);
                serde_json::json!({
                    "zone": i,
                    "anchor": z.anchor.index(),
                    "position": z.position.as_str(),
                    "parent": z.parent.index(),
                    "index": z.index,
                    "x": point.map(|p| p.0),
                    "y": point.map(|p| p.1),
                })
            })
            .collect();
        serde_json::to_string(&zones).unwrap_or_else(|_| "[]".to_string())
    }

    /// Zone closest to a pointer position, or -1.
    pub fn nearest_zone(&self, x: f32, y: f32) -> i32 {
        self.editor
            .drop_zones()
            .nearest(self.editor.render_tree(), x, y)
            .map_or(-1, |z| z as i32)
    }

    /// Node under a pointer position, or -1.
    pub fn hit_test(&self, x: f32, y: f32) -> i32 {
        to_handle(self.editor.hit_test(x, y))
    }

    // ─── Drag and drop ───────────────────────────────────────────────────

    pub fn drag_enter(&mut self, zone: u32, payload: &str) -> bool {
        let payload = (!payload.is_empty()).then_some(payload);
        self.editor.drag_enter(zone as usize, payload)
    }

    pub fn drag_leave(&mut self, zone: u32) -> bool {
        self.editor.drag_leave(zone as usize)
    }

    /// Drop a payload. Returns the new node, or -1 if nothing was inserted.
    pub fn drop(&mut self, zone: u32, payload: &str) -> i32 {
        to_handle(self.editor.drop(zone as usize, payload))
    }

    pub fn drag_end(&mut self) -> bool {
        self.editor.drag_end()
    }

    /// Start dragging an existing node. Returns the drag payload, or an
    /// empty string if the node cannot be moved.
    pub fn begin_move(&mut self, node: u32) -> String {
        self.editor
            .begin_move(NodeIndex::new(node as usize))
            .unwrap_or_default()
    }

    // ─── Selection and properties ────────────────────────────────────────

    /// Select a node, or clear the selection with -1.
    pub fn select(&mut self, node: i32) -> bool {
        self.editor.select(from_handle(node))
    }

    pub fn get_selection(&self) -> i32 {
        to_handle(self.editor.selection())
    }

    /// A node's element data as JSON, or `{}` if unknown.
    pub fn get_node_json(&self, node: u32) -> String {
        self.editor
            .document()
            .serialize(NodeIndex::new(node as usize))
            .map(|data| data.to_json())
            .unwrap_or_else(|| "{}".to_string())
    }

    /// Editable properties of a node as JSON: `{ "kind": ..., "fields": [...] }`.
    pub fn get_node_props(&self, node: u32) -> String {
        let Some(el) = self.editor.document().get(NodeIndex::new(node as usize)) else {
            return "{}".to_string();
        };
        serde_json::json!({
            "kind": kind_name(el.kind),
            "tag": el.tag.as_str(),
            "fields": el.kind.properties(),
        })
        .to_string()
    }

    /// Apply the `field`-th property of a node's kind.
    pub fn set_node_prop(&mut self, node: u32, field: u32, value: &str) -> bool {
        let idx = NodeIndex::new(node as usize);
        let Some(target) = self
            .editor
            .document()
            .get(idx)
            .and_then(|el| el.kind.properties().get(field as usize))
            .map(|f| f.target)
        else {
            return false;
        };
        self.editor.apply_property(idx, target, value)
    }

    pub fn set_attributes_json(&mut self, node: u32, json: &str) -> bool {
        self.editor
            .set_attributes_json(NodeIndex::new(node as usize), json)
    }

    pub fn remove(&mut self, node: u32) -> bool {
        self.editor.remove(NodeIndex::new(node as usize))
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

    // ─── Import / export ─────────────────────────────────────────────────

    /// Replace the document. Returns `false` (and changes nothing) on
    /// malformed input.
    pub fn import_json(&mut self, json: &str) -> bool {
        match self.editor.import_json(json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("import failed: {e}");
                false
            }
        }
    }

    pub fn export_json(&self) -> String {
        self.editor.export_json_pretty()
    }

    pub fn export_markup(&self) -> String {
        self.editor.export_markup()
    }

    // ─── Layout generation ───────────────────────────────────────────────

    /// Request body for the generation endpoint.
    pub fn generate_request(&self, message: &str) -> String {
        serde_json::to_string(&self.editor.generate_request(message)).unwrap_or_default()
    }

    /// Apply an endpoint response. Returns
    /// `{"ok":true,"systemMessage":...}` or `{"ok":false,"error":"..."}`.
    pub fn apply_generate_reply(&mut self, body: &str) -> String {
        match self.editor.apply_generate_reply(body) {
            Ok(layout) => serde_json::json!({
                "ok": true,
                "systemMessage": layout.system_message,
            }),
            Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
        }
        .to_string()
    }
}

fn to_handle(node: Option<NodeIndex>) -> i32 {
    node.map_or(-1, |n| n.index() as i32)
}

fn from_handle(node: i32) -> Option<NodeIndex> {
    usize::try_from(node).ok().map(NodeIndex::new)
}

fn kind_name(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Generic => "generic",
        ElementKind::Flex => "flex",
        ElementKind::Card => "card",
        ElementKind::Button => "button",
        ElementKind::RichText => "rich-text",
    }
}

fn event_json(event: &EditorEvent) -> serde_json::Value {
    match event {
        EditorEvent::Rendered => serde_json::json!({ "type": "rendered" }),
        EditorEvent::HistoryChanged { position, len } => {
            serde_json::json!({ "type": "history", "position": position, "len": len })
        }
        EditorEvent::PreviewShown { zone } => {
            serde_json::json!({ "type": "previewShown", "zone": zone })
        }
        EditorEvent::PreviewHidden { zone } => {
            serde_json::json!({ "type": "previewHidden", "zone": zone })
        }
        EditorEvent::SelectionChanged { node } => {
            serde_json::json!({ "type": "selection", "node": to_handle(*node) })
        }
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("LD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
