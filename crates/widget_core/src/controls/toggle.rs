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
pub struct ToggleProps {
    pub command_id: String,
    pub bg_color: String,
    pub font_size: String,
    pub label_on: String,
    pub label_off: String,
    pub active: bool,
    pub button_color: String,
    pub active_color: String,
    pub press_color: String,
    pub text_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for ToggleProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            label_on: "On".into(),
            label_off: "Off".into(),
            active: false,
            button_color: PRIMARY_COLOR.into(),
            active_color: PRIMARY_ACTIVE_COLOR.into(),
            press_color: "#2a7bd8".into(),
            text_color: "#ffffff".into(),
            border_color: PRIMARY_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TogglePatch {
    pub command_id: Option<String>,
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub label_on: Option<String>,
    pub label_off: Option<String>,
    pub active: Option<bool>,
    pub button_color: Option<String>,
    pub active_color: Option<String>,
    pub press_color: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
}

impl LoosePatch for TogglePatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            label_on: reader.text("labelOn"),
            label_off: reader.text("labelOff"),
            active: reader.flag_or_value("active"),
            button_color: reader.text("buttonColor"),
            active_color: reader.text("activeColor"),
            press_color: reader.text("pressColor"),
            text_color: reader.text("textColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToggleState {
    pub props: ToggleProps,
    /// Pointer currently held down. Affects rendering only.
    pub pressed: bool,
}

impl ControlState for ToggleState {
    const KIND: ControlKind = ControlKind::Toggle;
    type Patch = TogglePatch;

    fn apply(&mut self, patch: &TogglePatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.label_on, &patch.label_on);
        assign(&mut p.label_off, &patch.label_off);
        assign(&mut p.active, &patch.active);
        assign(&mut p.button_color, &patch.button_color);
        assign(&mut p.active_color, &patch.active_color);
        assign(&mut p.press_color, &patch.press_color);
        assign(&mut p.text_color, &patch.text_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Toggle(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&TogglePatch> {
        match patch {
            PropsPatch::Toggle(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let fill = if self.pressed {
            &p.press_color
        } else if p.active {
            &p.active_color
        } else {
            &p.button_color
        };
        let text = if p.active { &p.label_on } else { &p.label_off };
        ViewModel::text(text.clone())
            .with_colors(fill, &p.text_color)
            .with_border(&p.border_color, &p.border_style)
            .with_font_size(&p.font_size)
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }
}

pub type ToggleControl = Control<ToggleState>;

impl Control<ToggleState> {
    pub fn press_down(&self) {
        self.update_live(|state| (!state.pressed).then(|| state.pressed = true));
    }

    pub fn press_up(&self) {
        self.update_live(|state| state.pressed.then(|| state.pressed = false));
    }

    /// Flips the state and dispatches the new value.
    pub async fn click(&self) -> Option<CommandOutcome> {
        let active = self.update_live(|state| {
            state.props.active = !state.props.active;
            Some(state.props.active)
        })?;
        Some(self.dispatch(wire_bool(active).to_string()).await)
    }
}
