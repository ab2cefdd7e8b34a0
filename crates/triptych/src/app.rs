use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use pagecore::{SourceKind, SourceSet};

use crate::compositor::Compositor;
use crate::config::Config;
use crate::editor::Editor;
use crate::exporter::Exporter;
use crate::highlight::Highlighter;
use crate::sandbox::SandboxSurface;
use crate::ui_state::{Mode, UIState};

/// One editor per source kind. Cursor and undo history stay put when the
/// user switches panes.
pub struct Panes {
    html: Editor,
    css: Editor,
    js: Editor,
}

impl Panes {
    fn from_sources(sources: &SourceSet, tab_size: usize, use_spaces: bool) -> Self {
        let mut make = |kind: SourceKind| {
            let mut editor = Editor::with_content(sources.get(kind).to_string());
            editor.set_tab_config(tab_size, use_spaces);
            editor
        };
        Self {
            html: make(SourceKind::Html),
            css: make(SourceKind::Css),
            js: make(SourceKind::Js),
        }
    }

    pub fn get(&self, kind: SourceKind) -> &Editor {
        match kind {
            SourceKind::Html => &self.html,
            SourceKind::Css => &self.css,
            SourceKind::Js => &self.js,
        }
    }

    pub fn get_mut(&mut self, kind: SourceKind) -> &mut Editor {
        match kind {
            SourceKind::Html => &mut self.html,
            SourceKind::Css => &mut self.css,
            SourceKind::Js => &mut self.js,
        }
    }
}

pub struct App {
    pub sources: SourceSet,
    pub panes: Panes,
    pub compositor: Compositor,
    pub sandbox: SandboxSurface,
    pub exporter: Exporter,
    pub config: Config,
    pub ui_state: UIState,
    pub highlighter: Highlighter,
    preview_doc: String,
}

impl App {
    pub async fn new() -> Result<Self> {
        let config = Config::load().await?;
        let sources = SourceSet::default();
        let panes =
            Panes::from_sources(&sources, config.editor.tab_size, config.editor.use_spaces);
        let compositor = Compositor::new(Duration::from_millis(config.preview.debounce_ms));
        let sandbox = SandboxSurface::create().await?;
        let exporter = Exporter::new();
        let ui_state = UIState::new(config.start_pane);
        let highlighter = Highlighter::new(&config.theme.syntax_theme);

        let mut app = Self {
            sources,
            panes,
            compositor,
            sandbox,
            exporter,
            config,
            ui_state,
            highlighter,
            preview_doc: String::new(),
        };

        // The surface must hold a page before anyone points a browser at it.
        app.render_preview().await?;
        if app.config.preview.open_on_start {
            if let Err(e) = app.sandbox.open() {
                log::warn!("Could not open preview on start: {}", e);
            }
        }
        Ok(app)
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit()
    }

    pub fn quit(&mut self) {
        self.ui_state.quit();
    }

    pub fn active_pane(&self) -> &Editor {
        self.panes.get(self.ui_state.active())
    }

    pub fn active_pane_mut(&mut self) -> &mut Editor {
        self.panes.get_mut(self.ui_state.active())
    }

    pub fn preview_doc(&self) -> &str {
        &self.preview_doc
    }

    pub fn update_status(&mut self) {
        self.ui_state.update_status();
    }

    /// One iteration of the cooperative loop: fires the debounced render
    /// when its quiescence window has elapsed.
    pub async fn tick(&mut self, now: Instant) -> Result<()> {
        if self.compositor.take_due(now) {
            self.render_preview().await?;
        }
        Ok(())
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match self.ui_state.mode {
            Mode::Edit => self.handle_edit_key(key).await,
            Mode::Help => {
                self.handle_help_key(key);
                Ok(())
            }
            Mode::ResetPrompt => self.handle_reset_prompt_key(key).await,
        }
    }

    async fn handle_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('r') => self.render_now().await,
                KeyCode::Char('s') => self.export_project().await,
                KeyCode::Char('o') => self.open_preview(),
                KeyCode::Char('n') => self.ui_state.enter_reset_prompt(),
                KeyCode::Char('z') => self.undo_active(),
                KeyCode::Char('y') => self.redo_active(),
                KeyCode::Char('g') => self.ui_state.toggle_help(),
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            // Pane selection
            KeyCode::F(1) => self.ui_state.select(SourceKind::Html),
            KeyCode::F(2) => self.ui_state.select(SourceKind::Css),
            KeyCode::F(3) => self.ui_state.select(SourceKind::Js),
            KeyCode::BackTab => self.ui_state.select_next(),

            // Editing; every mutation is pushed to the store and schedules
            // a debounced render.
            KeyCode::Char(c) => {
                self.active_pane_mut().insert_char(c);
                self.apply_edit();
            }
            KeyCode::Enter => {
                self.active_pane_mut().insert_newline();
                self.apply_edit();
            }
            KeyCode::Tab => {
                self.active_pane_mut().insert_tab();
                self.apply_edit();
            }
            KeyCode::Backspace => {
                self.active_pane_mut().delete_backward();
                self.apply_edit();
            }
            KeyCode::Delete => {
                self.active_pane_mut().delete_forward();
                self.apply_edit();
            }

            // Movement leaves the buffers untouched, so no render.
            KeyCode::Left => self.active_pane_mut().move_left(),
            KeyCode::Right => self.active_pane_mut().move_right(),
            KeyCode::Up => self.active_pane_mut().move_up(),
            KeyCode::Down => self.active_pane_mut().move_down(),
            KeyCode::Home => self.active_pane_mut().move_line_start(),
            KeyCode::End => self.active_pane_mut().move_line_end(),
            KeyCode::PageUp => self.active_pane_mut().page_up(),
            KeyCode::PageDown => self.active_pane_mut().page_down(),

            _ => {}
        }
        Ok(())
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.ui_state.toggle_help(),
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.ui_state.toggle_help()
            }
            _ => {}
        }
    }

    async fn handle_reset_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.reset_panes();
                self.ui_state.leave_prompt();
                self.ui_state
                    .set_success("All panes reset to placeholders".to_string());
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.ui_state.leave_prompt();
                self.ui_state.set_info("Reset cancelled".to_string());
            }
            _ => {}
        }
        Ok(())
    }

    /// Pushes the active pane's text into the store and (re)arms the
    /// debounce. The store sees every keystroke; the renderer only the
    /// state that survives the quiescence window.
    fn apply_edit(&mut self) {
        let kind = self.ui_state.active();
        let text = self.panes.get(kind).get_content();
        self.sources.set(kind, text);
        self.compositor.schedule(Instant::now());
    }

    fn undo_active(&mut self) {
        if self.active_pane_mut().undo() {
            self.apply_edit();
            self.ui_state.set_success("Undone".to_string());
        } else {
            self.ui_state.set_warning("Nothing to undo".to_string());
        }
    }

    fn redo_active(&mut self) {
        if self.active_pane_mut().redo() {
            self.apply_edit();
            self.ui_state.set_success("Redone".to_string());
        } else {
            self.ui_state.set_warning("Nothing to redo".to_string());
        }
    }

    /// Manual run: bypasses the debounce and renders current state.
    pub async fn render_now(&mut self) {
        self.compositor.cancel();
        match self.render_preview().await {
            Ok(()) => self.ui_state.set_success("Preview rendered".to_string()),
            Err(e) => {
                log::error!("Manual render failed: {}", e);
                self.ui_state.set_error(format!("Render failed: {}", e));
            }
        }
    }

    async fn render_preview(&mut self) -> Result<()> {
        let document = self.compositor.compose(&self.sources);
        self.sandbox.render(&document).await?;
        self.preview_doc = document;
        Ok(())
    }

    async fn export_project(&mut self) {
        match self.exporter.save(&self.sources).await {
            Ok(path) => {
                self.ui_state
                    .set_success(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.ui_state.set_error(format!("Export failed: {}", e));
            }
        }
    }

    fn open_preview(&mut self) {
        match self.sandbox.open() {
            Ok(()) => self
                .ui_state
                .set_info(format!("Opened {}", self.sandbox.page_path().display())),
            Err(e) => {
                log::error!("Open preview failed: {}", e);
                self.ui_state.set_error(format!("Open failed: {}", e));
            }
        }
    }

    fn reset_panes(&mut self) {
        self.sources.reset();
        for kind in SourceKind::ALL {
            self.panes
                .get_mut(kind)
                .set_content(self.sources.get(kind).to_string());
        }
        self.compositor.schedule(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::fs;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn test_app_creation_renders_initial_preview() {
        let app = App::new().await.unwrap();
        assert!(matches!(app.ui_state.mode, Mode::Edit));
        assert!(!app.should_quit());
        assert_eq!(app.ui_state.active(), app.config.start_pane);
        // The surface already holds the composed welcome page.
        assert!(app.preview_doc().contains("<style>"));
        assert_eq!(app.sandbox.render_count(), 1);
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_typing_updates_store_and_arms_debounce() {
        let mut app = App::new().await.unwrap();
        app.ui_state.select(SourceKind::Js);
        let before = app.sources.revision();

        app.handle_key_event(key(KeyCode::Char('x'))).await.unwrap();
        assert!(app.sources.get(SourceKind::Js).starts_with('x'));
        assert_eq!(app.sources.revision(), before + 1);
        assert!(app.compositor.is_armed());
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_movement_does_not_arm_debounce() {
        let mut app = App::new().await.unwrap();
        app.handle_key_event(key(KeyCode::Down)).await.unwrap();
        app.handle_key_event(key(KeyCode::End)).await.unwrap();
        assert!(!app.compositor.is_armed());
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_pane_switching_keys() {
        let mut app = App::new().await.unwrap();
        app.handle_key_event(key(KeyCode::F(2))).await.unwrap();
        assert_eq!(app.ui_state.active(), SourceKind::Css);
        app.handle_key_event(key(KeyCode::F(3))).await.unwrap();
        assert_eq!(app.ui_state.active(), SourceKind::Js);
        app.handle_key_event(key(KeyCode::BackTab)).await.unwrap();
        assert_eq!(app.ui_state.active(), SourceKind::Html);
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_manual_run_bypasses_debounce() {
        let mut app = App::new().await.unwrap();
        app.ui_state.select(SourceKind::Css);
        app.handle_key_event(key(KeyCode::Char('b'))).await.unwrap();
        assert!(app.compositor.is_armed());

        app.handle_key_event(ctrl('r')).await.unwrap();
        assert!(!app.compositor.is_armed());
        assert!(app.preview_doc().contains("<style>b"));
        let on_disk = fs::read_to_string(app.sandbox.page_path()).await.unwrap();
        assert_eq!(on_disk, app.preview_doc());
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_debounced_render_reflects_final_state_only() {
        let mut app = App::new().await.unwrap();
        app.ui_state.select(SourceKind::Js);
        let renders_before = app.sandbox.render_count();

        for c in ['a', 'b', 'c'] {
            app.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
        // Nothing rendered while the window is still open.
        let armed_at = Instant::now();
        app.tick(armed_at).await.unwrap();
        assert_eq!(app.sandbox.render_count(), renders_before);

        app.tick(armed_at + app.compositor.window() + Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(app.sandbox.render_count(), renders_before + 1);
        assert!(app.preview_doc().contains("abc"));

        // The slot is drained; a later tick renders nothing new.
        app.tick(armed_at + Duration::from_secs(60)).await.unwrap();
        assert_eq!(app.sandbox.render_count(), renders_before + 1);
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_reset_prompt_confirms_and_cancels() {
        let mut app = App::new().await.unwrap();
        app.handle_key_event(ctrl('n')).await.unwrap();
        assert!(matches!(app.ui_state.mode, Mode::ResetPrompt));

        // Cancel leaves content alone.
        app.handle_key_event(key(KeyCode::Char('n'))).await.unwrap();
        assert!(matches!(app.ui_state.mode, Mode::Edit));
        assert_ne!(
            app.sources.get(SourceKind::Html),
            SourceKind::Html.placeholder()
        );

        // Confirm replaces every buffer with its placeholder.
        app.handle_key_event(ctrl('n')).await.unwrap();
        app.handle_key_event(key(KeyCode::Char('y'))).await.unwrap();
        for kind in SourceKind::ALL {
            assert_eq!(app.sources.get(kind), kind.placeholder());
            assert_eq!(app.panes.get(kind).get_content(), kind.placeholder());
        }
        assert!(app.compositor.is_armed());
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_undo_syncs_store() {
        let mut app = App::new().await.unwrap();
        app.ui_state.select(SourceKind::Js);
        app.handle_key_event(key(KeyCode::Char('q'))).await.unwrap();
        let with_edit = app.sources.get(SourceKind::Js).to_string();

        app.handle_key_event(ctrl('z')).await.unwrap();
        assert_ne!(app.sources.get(SourceKind::Js), with_edit);

        app.handle_key_event(ctrl('y')).await.unwrap();
        assert_eq!(app.sources.get(SourceKind::Js), with_edit);
        app.sandbox.cleanup().await;
    }

    #[tokio::test]
    async fn test_help_toggle_keys() {
        let mut app = App::new().await.unwrap();
        app.handle_key_event(ctrl('g')).await.unwrap();
        assert!(matches!(app.ui_state.mode, Mode::Help));
        app.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert!(matches!(app.ui_state.mode, Mode::Edit));
        app.sandbox.cleanup().await;
    }
}
