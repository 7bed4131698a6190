use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ToolKind;
use crate::geometry::Color;

pub const MAX_SIZE: u32 = 200;
pub const MAX_FONT_SIZE: u32 = 200;
pub const DEFAULT_TEXT: &str = "Sample Text";

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("invalid color for {key}: {value:?}")]
    InvalidColor { key: SettingKey, value: String },
    #[error("expected a number for {key}, got {value:?}")]
    ExpectedNumber { key: SettingKey, value: SettingValue },
    #[error("expected a boolean for {key}, got {value:?}")]
    ExpectedBool { key: SettingKey, value: SettingValue },
    #[error("expected text for {key}, got {value:?}")]
    ExpectedText { key: SettingKey, value: SettingValue },
    #[error("unknown gradient type: {0}")]
    UnknownGradientType(String),
}

/// Result of applying a named setting to a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingOutcome {
    Applied,
    /// The name is not a known setting.
    Ignored,
    /// Known setting the active tool does not consume.
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    Color,
    FillColor,
    Size,
    Opacity,
    BrushType,
    GradientStart,
    GradientEnd,
    GradientType,
    Text,
    FontSize,
    FontFamily,
    IsFilled,
    Tolerance,
}

impl SettingKey {
    pub const ALL: [SettingKey; 13] = [
        Self::Color,
        Self::FillColor,
        Self::Size,
        Self::Opacity,
        Self::BrushType,
        Self::GradientStart,
        Self::GradientEnd,
        Self::GradientType,
        Self::Text,
        Self::FontSize,
        Self::FontFamily,
        Self::IsFilled,
        Self::Tolerance,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::FillColor => "fillColor",
            Self::Size => "size",
            Self::Opacity => "opacity",
            Self::BrushType => "brushType",
            Self::GradientStart => "gradientStart",
            Self::GradientEnd => "gradientEnd",
            Self::GradientType => "gradientType",
            Self::Text => "text",
            Self::FontSize => "fontSize",
            Self::FontFamily => "fontFamily",
            Self::IsFilled => "isFilled",
            Self::Tolerance => "tolerance",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Loosely typed value as it arrives from a settings form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    fn as_number(&self, key: SettingKey) -> SettingsResult<f64> {
        let number = match self {
            Self::Number(number) => Some(*number),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Bool(_) => None,
        };
        number
            .filter(|number| number.is_finite())
            .ok_or_else(|| SettingsError::ExpectedNumber {
                key,
                value: self.clone(),
            })
    }

    fn as_bool(&self, key: SettingKey) -> SettingsResult<bool> {
        match self {
            Self::Bool(flag) => Ok(*flag),
            Self::Number(number) if *number == 0.0 || *number == 1.0 => Ok(*number == 1.0),
            Self::Text(text) => match text.trim() {
                "true" | "1" | "on" => Ok(true),
                "false" | "0" | "off" | "" => Ok(false),
                _ => Err(SettingsError::ExpectedBool {
                    key,
                    value: self.clone(),
                }),
            },
            Self::Number(_) => Err(SettingsError::ExpectedBool {
                key,
                value: self.clone(),
            }),
        }
    }

    fn as_text(&self, key: SettingKey) -> SettingsResult<&str> {
        match self {
            Self::Text(text) => Ok(text),
            _ => Err(SettingsError::ExpectedText {
                key,
                value: self.clone(),
            }),
        }
    }

    fn as_color(&self, key: SettingKey) -> SettingsResult<Color> {
        let text = self.as_text(key)?;
        Color::from_hex(text).ok_or_else(|| SettingsError::InvalidColor {
            key,
            value: text.to_string(),
        })
    }

    fn as_clamped(&self, key: SettingKey, min: u32, max: u32) -> SettingsResult<u32> {
        let number = self.as_number(key)?.round();
        Ok(number.clamp(f64::from(min), f64::from(max)) as u32)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Color> for SettingValue {
    fn from(value: Color) -> Self {
        Self::Text(value.to_hex())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushType {
    #[default]
    Round,
    Square,
}

impl BrushType {
    /// Anything but `square` paints with a round tip.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("square") {
            Self::Square
        } else {
            Self::Round
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

impl GradientType {
    pub fn from_name(name: &str) -> SettingsResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "radial" => Ok(Self::Radial),
            _ => Err(SettingsError::UnknownGradientType(name.to_string())),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Radial => "radial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSettings {
    pub color: Color,
    pub fill_color: Color,
    pub size: u32,
    pub opacity: u8,
    pub brush_type: BrushType,
    pub gradient_start: Color,
    pub gradient_end: Color,
    pub gradient_type: GradientType,
    pub text: String,
    pub font_size: u32,
    pub font_family: String,
    pub is_filled: bool,
    pub tolerance: u8,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            fill_color: Color::WHITE,
            size: 5,
            opacity: 100,
            brush_type: BrushType::Round,
            gradient_start: Color::BLACK,
            gradient_end: Color::WHITE,
            gradient_type: GradientType::Linear,
            text: DEFAULT_TEXT.to_string(),
            font_size: 16,
            font_family: "Arial".to_string(),
            is_filled: false,
            tolerance: 0,
        }
    }
}

impl ToolSettings {
    pub fn for_tool(kind: ToolKind) -> Self {
        let size = match kind {
            ToolKind::Brush | ToolKind::Eraser => 10,
            _ => 5,
        };
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::Color => self.color.into(),
            SettingKey::FillColor => self.fill_color.into(),
            SettingKey::Size => self.size.into(),
            SettingKey::Opacity => u32::from(self.opacity).into(),
            SettingKey::BrushType => self.brush_type.name().into(),
            SettingKey::GradientStart => self.gradient_start.into(),
            SettingKey::GradientEnd => self.gradient_end.into(),
            SettingKey::GradientType => self.gradient_type.name().into(),
            SettingKey::Text => self.text.as_str().into(),
            SettingKey::FontSize => self.font_size.into(),
            SettingKey::FontFamily => self.font_family.as_str().into(),
            SettingKey::IsFilled => self.is_filled.into(),
            SettingKey::Tolerance => u32::from(self.tolerance).into(),
        }
    }

    /// Parses and stores one value. On error the settings are unchanged.
    pub fn set(&mut self, key: SettingKey, value: &SettingValue) -> SettingsResult<()> {
        match key {
            SettingKey::Color => self.color = value.as_color(key)?,
            SettingKey::FillColor => self.fill_color = value.as_color(key)?,
            SettingKey::Size => self.size = value.as_clamped(key, 1, MAX_SIZE)?,
            SettingKey::Opacity => self.opacity = clamp_u8(value.as_clamped(key, 0, 100)?),
            SettingKey::BrushType => self.brush_type = BrushType::from_name(value.as_text(key)?),
            SettingKey::GradientStart => self.gradient_start = value.as_color(key)?,
            SettingKey::GradientEnd => self.gradient_end = value.as_color(key)?,
            SettingKey::GradientType => {
                self.gradient_type = GradientType::from_name(value.as_text(key)?)?
            }
            SettingKey::Text => self.text = value.as_text(key)?.to_string(),
            SettingKey::FontSize => self.font_size = value.as_clamped(key, 1, MAX_FONT_SIZE)?,
            SettingKey::FontFamily => self.font_family = value.as_text(key)?.to_string(),
            SettingKey::IsFilled => self.is_filled = value.as_bool(key)?,
            SettingKey::Tolerance => self.tolerance = clamp_u8(value.as_clamped(key, 0, 255)?),
        }
        Ok(())
    }

    /// Stroke color with the opacity applied.
    pub fn outline_color(&self) -> Color {
        self.color.with_opacity(self.opacity)
    }

    pub fn interior_color(&self) -> Color {
        self.fill_color.with_opacity(self.opacity)
    }
}

fn clamp_u8(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}
