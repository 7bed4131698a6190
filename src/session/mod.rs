//! Owns one editing session: the committed canvas, the preview being drawn,
//! the active tool and the undo history.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::canvas::{encode_base64_png, CanvasError, PixelBuffer};
use crate::config::AppConfig;
use crate::geometry::Point;
use crate::history::{HistoryStack, Snapshot, UndoOutcome};
use crate::storage::{ExportService, ExportedImage, StorageError};
use crate::tools::{
    SettingKey, SettingOutcome, SettingValue, SettingsError, Tool, ToolError, ToolKind,
    ToolSettings,
};

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("invalid dimensions {width}x{height}: each side must be within {min}..={max}")]
    DimensionsOutOfRange {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What an undo or redo did to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMove {
    Restored,
    /// Undo went below the oldest snapshot and reset to a blank canvas.
    Initial,
    Nothing,
}

#[derive(Debug)]
pub struct Session {
    config: AppConfig,
    canvas: PixelBuffer,
    preview: PixelBuffer,
    tool: Tool,
    // Values the user changed; carried over to every tool selected later.
    overrides: BTreeMap<SettingKey, SettingValue>,
    history: HistoryStack,
}

impl Session {
    pub fn new(config: AppConfig) -> SessionResult<Self> {
        let config = config.normalized();
        let canvas =
            PixelBuffer::new(config.canvas_width, config.canvas_height, config.background)?;
        tracing::info!(
            width = canvas.width(),
            height = canvas.height(),
            history_capacity = config.history_capacity,
            "session created"
        );
        Ok(Self {
            history: HistoryStack::new(config.history_capacity),
            preview: canvas.clone(),
            canvas,
            tool: Tool::new(ToolKind::Pencil),
            overrides: BTreeMap::new(),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Last committed canvas.
    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    /// Committed canvas plus the gesture in progress.
    pub fn preview(&self) -> &PixelBuffer {
        &self.preview
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn settings(&self) -> &ToolSettings {
        self.tool.settings()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn select_tool(&mut self, name: &str) -> SessionResult<&Tool> {
        let kind = ToolKind::from_name(name).inspect_err(|err| {
            tracing::warn!(%err, "tool selection rejected");
        })?;

        let mut tool = Tool::new(kind);
        for (key, value) in &self.overrides {
            if let Err(err) = tool.configure(*key, value) {
                tracing::warn!(%err, tool = %kind, "dropping stored setting");
            }
        }
        self.tool = tool;
        self.preview.clone_from(&self.canvas);
        tracing::debug!(tool = %kind, "tool selected");
        Ok(&self.tool)
    }

    /// Applies a named setting. Unknown names are ignored; malformed values
    /// for known names are rejected without changing anything.
    pub fn update_setting(
        &mut self,
        name: &str,
        value: SettingValue,
    ) -> SessionResult<SettingOutcome> {
        let Some(key) = SettingKey::from_name(name) else {
            tracing::debug!(name, "ignoring unknown setting");
            return Ok(SettingOutcome::Ignored);
        };

        ToolSettings::default().set(key, &value).inspect_err(|err| {
            tracing::warn!(%err, "setting rejected");
        })?;
        let outcome = self.tool.configure(key, &value)?;
        self.overrides.insert(key, value);
        tracing::debug!(%key, ?outcome, tool = %self.tool.kind(), "setting updated");
        Ok(outcome)
    }

    pub fn start_drawing(&mut self, at: Point) -> &PixelBuffer {
        if self.tool.is_drawing() {
            tracing::debug!(tool = %self.tool.kind(), "abandoning unfinished gesture");
        }
        self.preview.clone_from(&self.canvas);
        self.tool.start_drawing(at);
        self.tool.render(&mut self.preview);
        &self.preview
    }

    pub fn continue_drawing(&mut self, at: Point) -> &PixelBuffer {
        if self.tool.continue_drawing(at) {
            self.render_frame();
        }
        &self.preview
    }

    /// Finishes the gesture and commits it. Returns `false` when the gesture
    /// produced nothing to commit.
    pub fn end_drawing(&mut self, at: Point) -> bool {
        if !self.tool.end_drawing(at) {
            self.preview.clone_from(&self.canvas);
            return false;
        }
        self.render_frame();
        self.canvas.clone_from(&self.preview);
        self.history.push(Snapshot::capture(&self.canvas));
        tracing::info!(tool = %self.tool.kind(), history = self.history.len(), "gesture committed");
        true
    }

    fn render_frame(&mut self) {
        let kind = self.tool.kind();
        if kind.requires_redraw() && !kind.accumulates_strokes() {
            self.preview.clone_from(&self.canvas);
        }
        self.tool.render(&mut self.preview);
    }

    pub fn undo(&mut self) -> SessionResult<HistoryMove> {
        let step = match self.history.undo() {
            UndoOutcome::Restored(snapshot) => {
                self.canvas = snapshot.to_buffer();
                HistoryMove::Restored
            }
            UndoOutcome::Initial => {
                self.canvas = PixelBuffer::new(
                    self.canvas.width(),
                    self.canvas.height(),
                    self.config.background,
                )?;
                HistoryMove::Initial
            }
            UndoOutcome::Nothing => HistoryMove::Nothing,
        };
        self.preview.clone_from(&self.canvas);
        tracing::info!(?step, can_undo = self.can_undo(), "undo");
        Ok(step)
    }

    pub fn redo(&mut self) -> HistoryMove {
        let step = match self.history.redo() {
            Some(snapshot) => {
                self.canvas = snapshot.to_buffer();
                self.preview.clone_from(&self.canvas);
                HistoryMove::Restored
            }
            None => HistoryMove::Nothing,
        };
        tracing::info!(?step, can_redo = self.can_redo(), "redo");
        step
    }

    /// Fills the canvas with the background color as an undoable step.
    pub fn clear(&mut self) {
        self.canvas.fill(self.config.background);
        self.preview.clone_from(&self.canvas);
        self.history.push(Snapshot::capture(&self.canvas));
        tracing::info!("canvas cleared");
    }

    /// Scales the canvas content to the new size. Out-of-range sizes are
    /// rejected and leave the canvas untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> SessionResult<()> {
        if !self.config.accepts_dimensions(width, height) {
            tracing::warn!(width, height, "resize rejected");
            return Err(SessionError::DimensionsOutOfRange {
                width,
                height,
                min: self.config.min_dimension,
                max: self.config.max_dimension,
            });
        }
        let resized = self.canvas.resized(width, height)?;
        self.canvas = resized;
        self.preview = self.canvas.clone();
        self.history.push(Snapshot::capture(&self.canvas));
        tracing::info!(width, height, "canvas resized");
        Ok(())
    }

    /// Writes the committed canvas as PNG into `dir`, or the configured
    /// export directory.
    pub fn export(
        &self,
        dir: Option<&Path>,
        filename: Option<&str>,
    ) -> SessionResult<ExportedImage> {
        let service = match dir {
            Some(dir) => ExportService::with_dir(dir),
            None => ExportService::with_dir(self.config.export_dir()),
        };
        Ok(service.save(&self.canvas, filename)?)
    }

    pub fn encoded_canvas(&self) -> SessionResult<String> {
        Ok(encode_base64_png(&self.canvas)?)
    }

    pub fn encoded_preview(&self) -> SessionResult<String> {
        Ok(encode_base64_png(&self.preview)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;

    const RED: Color = Color::rgb(255, 0, 0);

    fn session() -> Session {
        Session::new(AppConfig {
            canvas_width: 120,
            canvas_height: 100,
            ..AppConfig::default()
        })
        .expect("valid session")
    }

    fn draw(session: &mut Session, from: (f64, f64), to: (f64, f64)) -> bool {
        session.start_drawing(Point::new(from.0, from.1));
        session.continue_drawing(Point::new(to.0, to.1));
        session.end_drawing(Point::new(to.0, to.1))
    }

    #[test]
    fn new_session_starts_blank_with_pencil() {
        let session = session();
        assert_eq!(session.tool().kind(), ToolKind::Pencil);
        assert_eq!(session.canvas().get(0, 0), Some(Color::WHITE));
        assert_eq!((session.canvas().width(), session.canvas().height()), (120, 100));
        assert!(!session.can_undo());
        assert!(!session.can_redo());
    }

    #[test]
    fn gesture_commits_on_release_only() {
        let mut session = session();
        session.start_drawing(Point::new(10.0, 50.0));
        session.continue_drawing(Point::new(60.0, 50.0));
        assert_eq!(session.preview().get(30, 50), Some(Color::BLACK));
        assert_eq!(session.canvas().get(30, 50), Some(Color::WHITE));

        assert!(session.end_drawing(Point::new(60.0, 50.0)));
        assert_eq!(session.canvas().get(30, 50), Some(Color::BLACK));
        assert!(session.can_undo());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn shape_preview_redraws_from_committed_canvas() {
        let mut session = session();
        session.select_tool("line").expect("line exists");
        session.start_drawing(Point::new(10.0, 10.0));
        session.continue_drawing(Point::new(100.0, 10.0));
        session.continue_drawing(Point::new(10.0, 90.0));
        // The first drag position no longer shows up.
        assert_eq!(session.preview().get(80, 10), Some(Color::WHITE));
        assert_eq!(session.preview().get(10, 60), Some(Color::BLACK));
    }

    #[test]
    fn undo_to_initial_restores_blank_canvas() {
        let mut session = session();
        assert!(draw(&mut session, (10.0, 10.0), (100.0, 10.0)));
        assert!(draw(&mut session, (10.0, 80.0), (100.0, 80.0)));

        assert_eq!(session.undo().expect("undo"), HistoryMove::Restored);
        assert_eq!(session.canvas().get(50, 10), Some(Color::BLACK));
        assert_eq!(session.canvas().get(50, 80), Some(Color::WHITE));

        assert_eq!(session.undo().expect("undo"), HistoryMove::Initial);
        assert_eq!(session.canvas().get(50, 10), Some(Color::WHITE));
        assert_eq!(session.undo().expect("undo"), HistoryMove::Initial);
        assert_eq!(session.canvas().get(50, 10), Some(Color::WHITE));

        assert_eq!(session.redo(), HistoryMove::Restored);
        assert_eq!(session.canvas().get(50, 10), Some(Color::BLACK));
        assert_eq!(session.redo(), HistoryMove::Restored);
        assert_eq!(session.redo(), HistoryMove::Nothing);
        assert_eq!(session.canvas().get(50, 80), Some(Color::BLACK));
    }

    #[test]
    fn settings_survive_tool_changes() {
        let mut session = session();
        assert_eq!(
            session
                .update_setting("color", SettingValue::from("#ff0000"))
                .expect("valid color"),
            SettingOutcome::Applied
        );
        assert_eq!(
            session
                .update_setting("tolerance", SettingValue::Number(4.0))
                .expect("valid tolerance"),
            SettingOutcome::NotApplicable
        );
        assert_eq!(
            session
                .update_setting("sparkle", SettingValue::Bool(true))
                .expect("unknown names are ignored"),
            SettingOutcome::Ignored
        );

        session.select_tool("Fill").expect("fill exists");
        assert_eq!(session.settings().color, RED);
        assert_eq!(session.settings().tolerance, 4);
    }

    #[test]
    fn malformed_setting_is_rejected_and_not_stored() {
        let mut session = session();
        let err = session
            .update_setting("color", SettingValue::from("red"))
            .expect_err("not a hex color");
        assert!(matches!(err, SessionError::Settings(_)));
        assert_eq!(session.settings().color, Color::BLACK);

        session.select_tool("Brush").expect("brush exists");
        assert_eq!(session.settings().color, Color::BLACK);
        assert_eq!(session.settings().size, 10);
    }

    #[test]
    fn unknown_tool_is_an_error_and_keeps_active_tool() {
        let mut session = session();
        session.select_tool("Circle").expect("circle exists");
        let err = session.select_tool("Spray").expect_err("no such tool");
        assert!(matches!(err, SessionError::Tool(ToolError::UnknownTool(_))));
        assert_eq!(session.tool().kind(), ToolKind::Circle);
    }

    #[test]
    fn fill_commits_and_is_undoable() {
        let mut session = session();
        session.select_tool("Fill").expect("fill exists");
        session
            .update_setting("color", SettingValue::from("#ff0000"))
            .expect("valid color");
        assert!(draw(&mut session, (5.0, 5.0), (5.0, 5.0)));
        assert_eq!(session.canvas().get(119, 99), Some(RED));

        assert_eq!(session.undo().expect("undo"), HistoryMove::Initial);
        assert_eq!(session.canvas().get(119, 99), Some(Color::WHITE));
    }

    #[test]
    fn fill_that_changes_nothing_leaves_history_alone() {
        let mut session = session();
        session.select_tool("Fill").expect("fill exists");
        session
            .update_setting("color", SettingValue::from("#ffffff"))
            .expect("valid color");
        assert!(!draw(&mut session, (5.0, 5.0), (5.0, 5.0)));
        assert!(session.history().is_empty());

        session
            .update_setting("color", SettingValue::from("#ff0000"))
            .expect("valid color");
        assert!(!draw(&mut session, (-50.0, -50.0), (-50.0, -50.0)));
        assert!(session.history().is_empty());
        assert!(!session.can_undo());
        assert_eq!(session.preview(), session.canvas());
    }

    #[test]
    fn gradient_dragged_far_past_the_canvas_stays_clipped() {
        let mut session = session();
        session.select_tool("Gradient").expect("gradient exists");
        session.start_drawing(Point::new(0.0, -2e7));
        session.continue_drawing(Point::new(119.0, 2e7));
        assert_eq!(session.preview().get(0, 0), Some(Color::BLACK));
        assert_eq!(session.preview().get(119, 99), Some(Color::WHITE));
        assert!(session.end_drawing(Point::new(119.0, 2e7)));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn release_without_press_commits_nothing() {
        let mut session = session();
        assert!(!session.end_drawing(Point::new(3.0, 3.0)));
        assert!(session.history().is_empty());
    }

    #[test]
    fn clear_is_recorded_in_history() {
        let mut session = session();
        draw(&mut session, (10.0, 10.0), (100.0, 10.0));
        session.clear();
        assert_eq!(session.canvas().get(50, 10), Some(Color::WHITE));
        assert_eq!(session.history().len(), 2);

        session.undo().expect("undo");
        assert_eq!(session.canvas().get(50, 10), Some(Color::BLACK));
    }

    #[test]
    fn resize_validates_range_and_scales_content() {
        let mut session = session();
        let err = session.resize(99, 500).expect_err("below minimum");
        assert!(matches!(
            err,
            SessionError::DimensionsOutOfRange {
                width: 99,
                height: 500,
                ..
            }
        ));
        assert_eq!(session.canvas().width(), 120);
        assert!(session.history().is_empty());

        session.resize(240, 200).expect("in range");
        assert_eq!((session.canvas().width(), session.canvas().height()), (240, 200));
        assert_eq!((session.preview().width(), session.preview().height()), (240, 200));
        assert!(session.can_undo());
    }

    #[test]
    fn export_writes_png_into_given_directory() {
        let dir = std::env::temp_dir().join(format!("pixpaint-session-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let session = session();

        let exported = session.export(Some(&dir), Some("canvas")).expect("export");
        assert_eq!(exported.filename, "canvas.png");
        let bytes = std::fs::read(&exported.path).expect("file written");
        assert_eq!(PixelBuffer::from_png(&bytes).expect("png"), *session.canvas());
        let _ = std::fs::remove_dir_all(dir);
    }
}
