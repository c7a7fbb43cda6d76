use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;

use super::{
    assign, default_address, DEFAULT_BG_COLOR, DEFAULT_BORDER_STYLE, DEFAULT_FONT_SIZE,
    DEFAULT_TEXT_COLOR, PRIMARY_COLOR,
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
pub struct CheckboxProps {
    pub command_id: String,
    pub bg_color: String,
    pub font_size: String,
    pub label: String,
    pub checked: bool,
    pub active_color: String,
    pub text_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for CheckboxProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            label: "Enable".into(),
            checked: false,
            active_color: PRIMARY_COLOR.into(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            border_color: PRIMARY_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckboxPatch {
    pub command_id: Option<String>,
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub label: Option<String>,
    pub checked: Option<bool>,
    pub active_color: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
}

impl LoosePatch for CheckboxPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            label: reader.text("label"),
            checked: reader.flag_or_value("checked"),
            active_color: reader.text("activeColor"),
            text_color: reader.text("textColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckboxState {
    pub props: CheckboxProps,
}

impl ControlState for CheckboxState {
    const KIND: ControlKind = ControlKind::Checkbox;
    type Patch = CheckboxPatch;

    fn apply(&mut self, patch: &CheckboxPatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.label, &patch.label);
        assign(&mut p.checked, &patch.checked);
        assign(&mut p.active_color, &patch.active_color);
        assign(&mut p.text_color, &patch.text_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Checkbox(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&CheckboxPatch> {
        match patch {
            PropsPatch::Checkbox(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let mark = if p.checked { "[x]" } else { "[ ]" };
        let border = if p.checked {
            &p.active_color
        } else {
            &p.border_color
        };
        ViewModel::text(format!("{mark} {}", p.label))
            .with_colors(&p.bg_color, &p.text_color)
            .with_border(border, &p.border_style)
            .with_font_size(&p.font_size)
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }
}

pub type CheckboxControl = Control<CheckboxState>;

impl Control<CheckboxState> {
    pub async fn toggle(&self) -> Option<CommandOutcome> {
        let checked = self.state().props.checked;
        self.set_checked(!checked).await
    }

    /// Dispatches `"1"`/`"0"` when the box actually flips.
    pub async fn set_checked(&self, checked: bool) -> Option<CommandOutcome> {
        self.update_live(|state| {
            (state.props.checked != checked).then(|| state.props.checked = checked)
        })?;
        Some(self.dispatch(wire_bool(checked).to_string()).await)
    }
}
