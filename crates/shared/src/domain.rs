use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(NodeId);
id_newtype!(ListenerId);

/// Placeholder channel id used when a control has no address configured.
pub const DEFAULT_ADDRESS: &str = "/cmd/demo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Button,
    Checkbox,
    Switch,
    Toggle,
    Slider,
    Knob,
    Label,
    Input,
    Divider,
    VerticalDivider,
}

impl ControlKind {
    pub const ALL: [ControlKind; 10] = [
        ControlKind::Button,
        ControlKind::Checkbox,
        ControlKind::Switch,
        ControlKind::Toggle,
        ControlKind::Slider,
        ControlKind::Knob,
        ControlKind::Label,
        ControlKind::Input,
        ControlKind::Divider,
        ControlKind::VerticalDivider,
    ];

    /// Human-readable type name, used as the registry label fallback.
    pub fn type_name(self) -> &'static str {
        match self {
            ControlKind::Button => "Button",
            ControlKind::Checkbox => "Checkbox",
            ControlKind::Switch => "Switch",
            ControlKind::Toggle => "Toggle Button",
            ControlKind::Slider => "Slider",
            ControlKind::Knob => "Knob",
            ControlKind::Label => "Label",
            ControlKind::Input => "Input",
            ControlKind::Divider => "Divider",
            ControlKind::VerticalDivider => "Vertical Divider",
        }
    }

    /// Template reference handed to the view loader.
    pub fn template_ref(self) -> &'static str {
        match self {
            ControlKind::Button => "widgets/Button/widget.html",
            ControlKind::Checkbox => "widgets/Checkbox/widget.html",
            ControlKind::Switch => "widgets/Switch/widget.html",
            ControlKind::Toggle => "widgets/ToggleButton/widget.html",
            ControlKind::Slider => "widgets/Slider/widget.html",
            ControlKind::Knob => "widgets/Knob/widget.html",
            ControlKind::Label => "widgets/Label/widget.html",
            ControlKind::Input => "widgets/Input/widget.html",
            ControlKind::Divider => "widgets/Divider/widget.html",
            ControlKind::VerticalDivider => "widgets/VDivider/widget.html",
        }
    }

    /// Default container size in grid cells (width, height).
    pub fn default_size(self) -> (u32, u32) {
        match self {
            ControlKind::Button
            | ControlKind::Checkbox
            | ControlKind::Switch
            | ControlKind::Toggle
            | ControlKind::Label => (8, 2),
            ControlKind::Slider | ControlKind::Input => (12, 2),
            ControlKind::Knob => (4, 4),
            ControlKind::Divider => (24, 1),
            ControlKind::VerticalDivider => (1, 10),
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Requested grid placement. Missing fields fall back to the kind's defaults
/// and to host-chosen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
}

impl Placement {
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size_for(&self, kind: ControlKind) -> (u32, u32) {
        let (w, h) = kind.default_size();
        (self.w.unwrap_or(w), self.h.unwrap_or(h))
    }
}
