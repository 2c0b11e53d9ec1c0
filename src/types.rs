//! Shared value types: tools, style enums, and small direction helpers.

use serde::{Deserialize, Serialize};

/// The active tool. Every drawable kind has a tool of the same name.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    #[default]
    Selection,
    Rectangle,
    Diamond,
    Ellipse,
    Arrow,
    Line,
    Draw,
    Text,
}

impl ElementType {
    /// Tools that create linear elements.
    pub fn is_linear(self) -> bool {
        matches!(self, Self::Arrow | Self::Line | Self::Draw)
    }

    /// Tools whose elements may bind their endpoints to shapes.
    pub fn is_binding(self) -> bool {
        matches!(self, Self::Arrow | Self::Line)
    }

    /// Tool selected by a single-key shortcut.
    pub fn from_shortcut(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'v' | '1' => Some(Self::Selection),
            'r' | '2' => Some(Self::Rectangle),
            'd' | '3' => Some(Self::Diamond),
            'e' | '4' => Some(Self::Ellipse),
            'a' | '5' => Some(Self::Arrow),
            'l' | '6' => Some(Self::Line),
            'x' | '7' => Some(Self::Draw),
            't' | '8' => Some(Self::Text),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeSharpness {
    #[default]
    Sharp,
    Round,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrowhead {
    #[default]
    Arrow,
    Bar,
    Dot,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontFamily {
    #[default]
    Virgil,
    Helvetica,
    Cascadia,
}

/// Which endpoint of a two-point linear element a corner handle drags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrowDirection {
    /// The first point follows the pointer
    #[default]
    Origin,
    /// The last point follows the pointer
    End,
}

/// One end of a linear element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinearEnd {
    Start,
    End,
}

impl LinearEnd {
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Pointer button state as exposed to remote collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorButton {
    #[default]
    Up,
    Down,
}
