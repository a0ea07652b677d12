//! Challenge Screen Customization
//!
//! Styling the host application hands to the engine for the challenge UI.
//! Values are validated before a session starts so that a bad color or
//! font size fails the flow early instead of inside the vendor engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Styling validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiCustomizationError {
    #[error("Invalid hex color for {field}: {value}")]
    InvalidColor { field: &'static str, value: String },

    #[error("Font size for {field} must be greater than zero")]
    InvalidFontSize { field: &'static str },

    #[error("Font name for {field} must not be empty")]
    EmptyFontName { field: &'static str },
}

/// Standard challenge-screen buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonType {
    Submit,
    Continue,
    Next,
    Cancel,
    Resend,
    OpenOobApp,
    AddCardholder,
}

/// Text attributes shared by every customizable element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextCustomization {
    pub text_font_name: Option<String>,
    pub text_color_hex: Option<String>,
    pub dark_text_color_hex: Option<String>,
    pub text_font_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonCustomization {
    #[serde(flatten)]
    pub text: TextCustomization,
    pub background_color_hex: Option<String>,
    pub dark_background_color_hex: Option<String>,
    pub corner_radius: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarCustomization {
    #[serde(flatten)]
    pub text: TextCustomization,
    pub background_color_hex: Option<String>,
    pub dark_background_color_hex: Option<String>,
    pub header_text: Option<String>,
    pub button_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelCustomization {
    #[serde(flatten)]
    pub text: TextCustomization,
    pub heading_text_color_hex: Option<String>,
    pub heading_dark_text_color_hex: Option<String>,
    pub heading_text_font_name: Option<String>,
    pub heading_text_font_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBoxCustomization {
    #[serde(flatten)]
    pub text: TextCustomization,
    pub border_width: Option<u32>,
    pub border_color_hex: Option<String>,
    pub dark_border_color_hex: Option<String>,
    pub corner_radius: Option<u32>,
}

/// Full challenge-screen styling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiCustomization {
    pub buttons: HashMap<ButtonType, ButtonCustomization>,
    /// Buttons keyed by an implementer-specific type name
    pub custom_buttons: HashMap<String, ButtonCustomization>,
    pub toolbar: Option<ToolbarCustomization>,
    pub label: Option<LabelCustomization>,
    pub text_box: Option<TextBoxCustomization>,
}

impl UiCustomization {
    /// Check every color, font name and font size
    pub fn validate(&self) -> Result<(), UiCustomizationError> {
        for button in self.buttons.values().chain(self.custom_buttons.values()) {
            button.validate()?;
        }
        if let Some(toolbar) = &self.toolbar {
            toolbar.validate()?;
        }
        if let Some(label) = &self.label {
            label.validate()?;
        }
        if let Some(text_box) = &self.text_box {
            text_box.validate()?;
        }
        Ok(())
    }
}

impl TextCustomization {
    fn validate(&self) -> Result<(), UiCustomizationError> {
        check_font_name("text_font_name", self.text_font_name.as_deref())?;
        check_color("text_color_hex", self.text_color_hex.as_deref())?;
        check_color("dark_text_color_hex", self.dark_text_color_hex.as_deref())?;
        check_font_size("text_font_size", self.text_font_size)
    }
}

impl ButtonCustomization {
    fn validate(&self) -> Result<(), UiCustomizationError> {
        self.text.validate()?;
        check_color("background_color_hex", self.background_color_hex.as_deref())?;
        check_color(
            "dark_background_color_hex",
            self.dark_background_color_hex.as_deref(),
        )
    }
}

impl ToolbarCustomization {
    fn validate(&self) -> Result<(), UiCustomizationError> {
        self.text.validate()?;
        check_color("background_color_hex", self.background_color_hex.as_deref())?;
        check_color(
            "dark_background_color_hex",
            self.dark_background_color_hex.as_deref(),
        )
    }
}

impl LabelCustomization {
    fn validate(&self) -> Result<(), UiCustomizationError> {
        self.text.validate()?;
        check_color(
            "heading_text_color_hex",
            self.heading_text_color_hex.as_deref(),
        )?;
        check_color(
            "heading_dark_text_color_hex",
            self.heading_dark_text_color_hex.as_deref(),
        )?;
        check_font_name(
            "heading_text_font_name",
            self.heading_text_font_name.as_deref(),
        )?;
        check_font_size("heading_text_font_size", self.heading_text_font_size)
    }
}

impl TextBoxCustomization {
    fn validate(&self) -> Result<(), UiCustomizationError> {
        self.text.validate()?;
        check_color("border_color_hex", self.border_color_hex.as_deref())?;
        check_color("dark_border_color_hex", self.dark_border_color_hex.as_deref())
    }
}

/// `#RRGGBB` or `#AARRGGBB`, leading `#` optional
fn is_hex_color(value: &str) -> bool {
    let digits = value.strip_prefix('#').unwrap_or(value);
    matches!(digits.len(), 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn check_color(field: &'static str, value: Option<&str>) -> Result<(), UiCustomizationError> {
    match value {
        Some(color) if !is_hex_color(color) => Err(UiCustomizationError::InvalidColor {
            field,
            value: color.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_font_size(field: &'static str, value: Option<u32>) -> Result<(), UiCustomizationError> {
    match value {
        Some(0) => Err(UiCustomizationError::InvalidFontSize { field }),
        _ => Ok(()),
    }
}

fn check_font_name(field: &'static str, value: Option<&str>) -> Result<(), UiCustomizationError> {
    match value {
        Some(name) if name.trim().is_empty() => Err(UiCustomizationError::EmptyFontName { field }),
        _ => Ok(()),
    }
}
