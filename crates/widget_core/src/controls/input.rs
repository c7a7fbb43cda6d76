use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;

use super::{
    assign, default_address, DEFAULT_BG_COLOR, DEFAULT_BORDER_COLOR, DEFAULT_BORDER_STYLE,
    DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR,
};
use crate::{
    contract::{LoosePatch, PatchReader, PropsPatch, WidgetProps},
    control::{Control, ControlState},
    dispatcher::CommandOutcome,
    view::ViewModel,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProps {
    pub command_id: String,
    pub bg_color: String,
    pub font_size: String,
    pub placeholder: String,
    pub value: String,
    pub text_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for InputProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            placeholder: "Please enter".into(),
            value: String::new(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            border_color: DEFAULT_BORDER_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputPatch {
    pub command_id: Option<String>,
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub placeholder: Option<String>,
    pub value: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
}

impl LoosePatch for InputPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            placeholder: reader.text("placeholder"),
            value: reader.text("value"),
            text_color: reader.text("textColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub props: InputProps,
}

impl ControlState for InputState {
    const KIND: ControlKind = ControlKind::Input;
    type Patch = InputPatch;

    fn apply(&mut self, patch: &InputPatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.placeholder, &patch.placeholder);
        assign(&mut p.value, &patch.value);
        assign(&mut p.text_color, &patch.text_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Input(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&InputPatch> {
        match patch {
            PropsPatch::Input(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let mut view = ViewModel::text(p.value.clone())
            .with_colors(&p.bg_color, &p.text_color)
            .with_border(&p.border_color, &p.border_style)
            .with_font_size(&p.font_size);
        view.placeholder = Some(p.placeholder.clone());
        view
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }
}

pub type InputControl = Control<InputState>;

impl Control<InputState> {
    /// Replaces the content; every actual change is dispatched, no debounce.
    pub async fn edit(&self, text: impl Into<String>) -> Option<CommandOutcome> {
        let text = text.into();
        let value = self.update_live(|state| {
            if state.props.value == text {
                return None;
            }
            state.props.value = text.clone();
            Some(text)
        })?;
        Some(self.dispatch(value).await)
    }
}
