//! Import and export of whole documents.

use crate::editor::Editor;
use ld_core::{ElementData, emit_markup};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Editor {
    /// Compact JSON of the current root. Previews never appear.
    pub fn export_json(&self) -> String {
        self.document.to_data().to_json()
    }

    /// Pretty-printed JSON of the current root, as written to files.
    pub fn export_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.document.to_data()).unwrap_or_default()
    }

    /// Replace the document with an imported root. On a parse failure the
    /// document and history are left alone.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let data = ElementData::from_json(json)?;
        log::debug!("importing document ({} nodes)", data.count());
        self.replace_root(&data);
        self.flush();
        Ok(())
    }

    /// The current document as markup.
    pub fn export_markup(&self) -> String {
        emit_markup(&self.document.to_data())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::Editor;
    use pretty_assertions::assert_eq;

    #[test]
    fn import_replaces_root_and_records_history() {
        let mut ed = Editor::new(EditorConfig::default()).unwrap();
        let json = r#"{"tag":"gds-card","attributes":{},"children":[{"tag":"gds-button","attributes":{"rank":"primary"},"text":"OK","children":[]}]}"#;
        ed.import_json(json).unwrap();
        assert_eq!(ed.export_json(), json);
        assert_eq!((ed.history().len(), ed.history().position()), (2, 1));
        assert!(ed.undo());
        assert_eq!(ed.document().get(ed.document().root()).unwrap().tag.as_str(), "gds-flex");
    }

    #[test]
    fn malformed_import_leaves_document_alone() {
        let mut ed = Editor::new(EditorConfig::default()).unwrap();
        let before = ed.export_json();
        assert!(ed.import_json("{\"tag\":").is_err());
        assert!(ed.import_json("{}").is_err());
        assert_eq!(ed.export_json(), before);
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn markup_of_default_document() {
        let ed = Editor::new(EditorConfig::default()).unwrap();
        assert_eq!(
            ed.export_markup(),
            r#"<gds-flex padding="m" gap="m" flex-direction="column"></gds-flex>"#
        );
    }
}
