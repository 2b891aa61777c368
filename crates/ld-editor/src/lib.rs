pub mod ai;
pub mod config;
pub mod drop_zones;
pub mod editor;
pub mod history;
pub mod io;
pub mod preview;

pub use ai::{GENERATE_FAILED_MESSAGE, GenerateError, GenerateRequest, GeneratedLayout, parse_generate_reply};
pub use config::{DEFAULT_PREVIEW_STYLE, EditorConfig, default_root};
pub use drop_zones::{DropZone, DropZones, zones_for};
pub use editor::{Editor, EditorEvent, Listener, Subscription};
pub use history::{DEFAULT_HISTORY_LIMIT, History, SnapshotError};
pub use io::ImportError;
pub use preview::{ActivePreview, DragSession, PendingMove};
