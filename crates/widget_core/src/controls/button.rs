use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;

use super::{
    assign, default_address, DEFAULT_BG_COLOR, DEFAULT_BORDER_STYLE, DEFAULT_FONT_SIZE,
    PRIMARY_ACTIVE_COLOR, PRIMARY_COLOR,
};
use crate::{
    coerce::wire_bool,
    contract::{LoosePatch, PatchReader, PropsPatch, WidgetProps},
    control::{Control, ControlState},
    dispatcher::CommandOutcome,
    view::ViewModel,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
    pub command_id: String,
    pub bg_color: String,
    pub font_size: String,
    pub label: String,
    pub button_color: String,
    pub active_color: String,
    pub text_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for ButtonProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            label: "Run".into(),
            button_color: PRIMARY_COLOR.into(),
            active_color: PRIMARY_ACTIVE_COLOR.into(),
            text_color: "#ffffff".into(),
            border_color: PRIMARY_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

/// `active` drives the transient pressed look and is never reported back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonPatch {
    pub command_id: Option<String>,
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub label: Option<String>,
    pub button_color: Option<String>,
    pub active_color: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
    pub active: Option<bool>,
}

impl LoosePatch for ButtonPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            label: reader.text("label"),
            button_color: reader.text("buttonColor"),
            active_color: reader.text("activeColor"),
            text_color: reader.text("textColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
            active: reader.flag_or_value("active"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonState {
    pub props: ButtonProps,
    pub active: bool,
}

impl ControlState for ButtonState {
    const KIND: ControlKind = ControlKind::Button;
    type Patch = ButtonPatch;

    fn apply(&mut self, patch: &ButtonPatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.label, &patch.label);
        assign(&mut p.button_color, &patch.button_color);
        assign(&mut p.active_color, &patch.active_color);
        assign(&mut p.text_color, &patch.text_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
        assign(&mut self.active, &patch.active);
    }

    /// The active flag only drives a mounted view.
    fn apply_cached(&mut self, patch: &ButtonPatch) {
        self.apply(&ButtonPatch {
            active: None,
            ..patch.clone()
        });
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Button(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&ButtonPatch> {
        match patch {
            PropsPatch::Button(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let fill = if self.active {
            &p.active_color
        } else {
            &p.button_color
        };
        ViewModel::text(p.label.clone())
            .with_colors(fill, &p.text_color)
            .with_border(&p.border_color, &p.border_style)
            .with_font_size(&p.font_size)
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }
}

pub type ButtonControl = Control<ButtonState>;

impl Control<ButtonState> {
    pub fn press_down(&self) {
        self.update_live(|state| (!state.active).then(|| state.active = true));
    }

    pub fn press_up(&self) {
        self.update_live(|state| state.active.then(|| state.active = false));
    }

    /// Every click sends `"1"`.
    pub async fn click(&self) -> Option<CommandOutcome> {
        if !self.is_interactive() {
            return None;
        }
        Some(self.dispatch(wire_bool(true).to_string()).await)
    }
}
