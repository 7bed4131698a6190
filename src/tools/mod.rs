mod gesture;
mod settings;
mod tool;

use thiserror::Error;

pub use gesture::{
    GestureError, GestureEvent, GestureMachine, GesturePhase, GestureResult, GestureTransition,
};
pub use settings::{
    BrushType, GradientType, SettingKey, SettingOutcome, SettingValue, SettingsError,
    SettingsResult, ToolSettings, DEFAULT_TEXT, MAX_FONT_SIZE, MAX_SIZE,
};
pub use tool::{Tool, MAX_BEZIER_POINTS};

pub type ToolResult<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    UnknownTool(String),
}

/// Which settings a tool reads when it rasterizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOptionVisibility {
    pub has_color: bool,
    pub has_fill_color: bool,
    pub has_size: bool,
    pub has_opacity: bool,
    pub has_brush_type: bool,
    pub has_gradient: bool,
    pub has_text: bool,
    pub has_fill_toggle: bool,
    pub has_tolerance: bool,
}

impl ToolOptionVisibility {
    const NONE: Self = Self {
        has_color: false,
        has_fill_color: false,
        has_size: false,
        has_opacity: false,
        has_brush_type: false,
        has_gradient: false,
        has_text: false,
        has_fill_toggle: false,
        has_tolerance: false,
    };

    pub const fn has_any(&self) -> bool {
        let Self {
            has_color,
            has_fill_color,
            has_size,
            has_opacity,
            has_brush_type,
            has_gradient,
            has_text,
            has_fill_toggle,
            has_tolerance,
        } = *self;
        has_color
            || has_fill_color
            || has_size
            || has_opacity
            || has_brush_type
            || has_gradient
            || has_text
            || has_fill_toggle
            || has_tolerance
    }

    pub const fn consumes(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::Color => self.has_color,
            SettingKey::FillColor => self.has_fill_color,
            SettingKey::Size => self.has_size,
            SettingKey::Opacity => self.has_opacity,
            SettingKey::BrushType => self.has_brush_type,
            SettingKey::GradientStart | SettingKey::GradientEnd | SettingKey::GradientType => {
                self.has_gradient
            }
            SettingKey::Text | SettingKey::FontSize | SettingKey::FontFamily => self.has_text,
            SettingKey::IsFilled => self.has_fill_toggle,
            SettingKey::Tolerance => self.has_tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Pencil,
    Brush,
    Line,
    Rectangle,
    Circle,
    Text,
    Fill,
    Gradient,
    Bezier,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        Self::Pencil,
        Self::Brush,
        Self::Line,
        Self::Rectangle,
        Self::Circle,
        Self::Text,
        Self::Fill,
        Self::Gradient,
        Self::Bezier,
        Self::Eraser,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pencil => "Pencil",
            Self::Brush => "Brush",
            Self::Line => "Line",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Text => "Text",
            Self::Fill => "Fill",
            Self::Gradient => "Gradient",
            Self::Bezier => "Bezier",
            Self::Eraser => "Eraser",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Pencil => "\u{270f}\u{fe0f}",
            Self::Brush => "\u{1f58c}\u{fe0f}",
            Self::Line => "\u{2500}",
            Self::Rectangle => "\u{25a1}",
            Self::Circle => "\u{25cb}",
            Self::Text => "T",
            Self::Fill => "\u{1f3a8}",
            Self::Gradient => "\u{1f308}",
            Self::Bezier => "\u{2934}\u{fe0f}",
            Self::Eraser => "\u{1f9fd}",
        }
    }

    pub const fn cursor(self) -> &'static str {
        match self {
            Self::Text => "text",
            _ => "crosshair",
        }
    }

    /// Whether a live preview must start again from the committed canvas.
    pub const fn requires_redraw(self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Stroke tools consume their point list as they render.
    pub const fn accumulates_strokes(self) -> bool {
        matches!(self, Self::Pencil | Self::Brush | Self::Eraser)
    }

    pub fn from_name(name: &str) -> ToolResult<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    pub const fn option_visibility(self) -> ToolOptionVisibility {
        let none = ToolOptionVisibility::NONE;
        match self {
            Self::Pencil | Self::Line | Self::Bezier => ToolOptionVisibility {
                has_color: true,
                has_size: true,
                has_opacity: true,
                ..none
            },
            Self::Brush => ToolOptionVisibility {
                has_color: true,
                has_size: true,
                has_opacity: true,
                has_brush_type: true,
                ..none
            },
            Self::Rectangle | Self::Circle => ToolOptionVisibility {
                has_color: true,
                has_fill_color: true,
                has_size: true,
                has_opacity: true,
                has_fill_toggle: true,
                ..none
            },
            Self::Text => ToolOptionVisibility {
                has_color: true,
                has_opacity: true,
                has_text: true,
                ..none
            },
            Self::Fill => ToolOptionVisibility {
                has_color: true,
                has_opacity: true,
                has_tolerance: true,
                ..none
            },
            Self::Gradient => ToolOptionVisibility {
                has_opacity: true,
                has_gradient: true,
                ..none
            },
            Self::Eraser => ToolOptionVisibility {
                has_size: true,
                ..none
            },
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Ok(kind));
            assert_eq!(
                ToolKind::from_name(&kind.name().to_ascii_lowercase()),
                Ok(kind)
            );
        }
        assert_eq!(ToolKind::from_name(" brush "), Ok(ToolKind::Brush));
    }

    #[test]
    fn unknown_tool_name_is_an_error() {
        assert_eq!(
            ToolKind::from_name("Lasso"),
            Err(ToolError::UnknownTool("Lasso".to_string()))
        );
    }

    #[test]
    fn only_text_skips_redraw_and_uses_text_cursor() {
        for kind in ToolKind::ALL {
            let is_text = kind == ToolKind::Text;
            assert_eq!(kind.requires_redraw(), !is_text, "{kind}");
            assert_eq!(kind.cursor() == "text", is_text, "{kind}");
        }
    }

    #[test]
    fn stroke_tools_accumulate() {
        let stroke: Vec<_> = ToolKind::ALL
            .into_iter()
            .filter(|kind| kind.accumulates_strokes())
            .collect();
        assert_eq!(stroke, vec![ToolKind::Pencil, ToolKind::Brush, ToolKind::Eraser]);
    }

    #[test]
    fn option_visibility_matches_consumed_settings() {
        assert!(ToolKind::Brush.option_visibility().consumes(SettingKey::BrushType));
        assert!(!ToolKind::Pencil.option_visibility().consumes(SettingKey::BrushType));
        assert!(ToolKind::Rectangle.option_visibility().consumes(SettingKey::IsFilled));
        assert!(ToolKind::Gradient.option_visibility().consumes(SettingKey::GradientType));
        assert!(!ToolKind::Gradient.option_visibility().consumes(SettingKey::Color));
        assert!(ToolKind::Text.option_visibility().consumes(SettingKey::FontFamily));
        assert!(ToolKind::Fill.option_visibility().consumes(SettingKey::Tolerance));

        let eraser = ToolKind::Eraser.option_visibility();
        assert!(eraser.consumes(SettingKey::Size));
        assert!(!eraser.consumes(SettingKey::Color));
        assert!(!eraser.consumes(SettingKey::Opacity));

        assert!(ToolKind::ALL
            .into_iter()
            .all(|kind| kind.option_visibility().has_any()));
        assert!(!ToolOptionVisibility::NONE.has_any());
    }
}
