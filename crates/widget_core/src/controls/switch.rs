use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;

use super::{
    assign, default_address, DEFAULT_BG_COLOR, DEFAULT_BORDER_COLOR, DEFAULT_BORDER_STYLE,
    DEFAULT_FONT_SIZE,
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
pub struct SwitchProps {
    pub command_id: String,
    pub bg_color: String,
    pub font_size: String,
    pub checked: bool,
    pub on_color: String,
    pub off_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for SwitchProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            checked: false,
            on_color: "#13ce66".into(),
            off_color: "#ff4949".into(),
            border_color: DEFAULT_BORDER_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchPatch {
    pub command_id: Option<String>,
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub checked: Option<bool>,
    pub on_color: Option<String>,
    pub off_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
}

impl LoosePatch for SwitchPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            checked: reader.flag_or_value("checked"),
            on_color: reader.text("onColor"),
            off_color: reader.text("offColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchState {
    pub props: SwitchProps,
}

impl ControlState for SwitchState {
    const KIND: ControlKind = ControlKind::Switch;
    type Patch = SwitchPatch;

    fn apply(&mut self, patch: &SwitchPatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.checked, &patch.checked);
        assign(&mut p.on_color, &patch.on_color);
        assign(&mut p.off_color, &patch.off_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Switch(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&SwitchPatch> {
        match patch {
            PropsPatch::Switch(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let (text, track) = if p.checked {
            ("ON", &p.on_color)
        } else {
            ("OFF", &p.off_color)
        };
        ViewModel::text(text)
            .with_colors(track, &p.bg_color)
            .with_border(&p.border_color, &p.border_style)
            .with_font_size(&p.font_size)
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }
}

pub type SwitchControl = Control<SwitchState>;

impl Control<SwitchState> {
    pub async fn toggle(&self) -> Option<CommandOutcome> {
        let checked = self.state().props.checked;
        self.set_checked(!checked).await
    }

    pub async fn set_checked(&self, checked: bool) -> Option<CommandOutcome> {
        self.update_live(|state| {
            (state.props.checked != checked).then(|| state.props.checked = checked)
        })?;
        Some(self.dispatch(wire_bool(checked).to_string()).await)
    }
}
