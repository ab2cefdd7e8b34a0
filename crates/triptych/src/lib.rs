// Triptych library exports

pub mod app;
pub mod compositor;
pub mod config;
pub mod editor;
pub mod exporter;
pub mod highlight;
pub mod sandbox;
pub mod ui;
pub mod ui_state;

pub use app::App;
pub use compositor::Compositor;
pub use config::Config;
pub use editor::Editor;
pub use exporter::Exporter;
pub use sandbox::SandboxSurface;
pub use ui_state::{Mode, UIState};
