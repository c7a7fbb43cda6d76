use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;

use super::{
    assign, assign_range, default_address, DEFAULT_BG_COLOR, DEFAULT_BORDER_COLOR,
    DEFAULT_BORDER_STYLE, DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR,
};
use crate::{
    coerce::wire_number,
    contract::{LoosePatch, PatchReader, PropsPatch, WidgetProps},
    control::{Control, ControlState},
    dispatcher::CommandOutcome,
    gesture::ListenerEvent,
    mapper::{map_linear, round_half_up, ValueDomain},
    view::ViewModel,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderProps {
    pub command_id: String,
    pub bg_color: String,
    pub font_size: String,
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub bar_color: String,
    pub fill_color: String,
    pub value_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for SliderProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            min: 0.0,
            max: 100.0,
            value: 0.0,
            bar_color: DEFAULT_BORDER_COLOR.into(),
            fill_color: "#2b6cb0".into(),
            value_color: DEFAULT_TEXT_COLOR.into(),
            border_color: DEFAULT_BORDER_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderPatch {
    pub command_id: Option<String>,
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub value: Option<f64>,
    pub bar_color: Option<String>,
    pub fill_color: Option<String>,
    pub value_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
}

impl LoosePatch for SliderPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            min: reader.number("min"),
            max: reader.number("max"),
            value: reader.number("value"),
            bar_color: reader.text("barColor"),
            fill_color: reader.text("fillColor"),
            value_color: reader.text("valueColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderState {
    pub props: SliderProps,
}

impl SliderState {
    pub fn domain(&self) -> ValueDomain {
        ValueDomain::new(self.props.min, self.props.max)
    }
}

impl ControlState for SliderState {
    const KIND: ControlKind = ControlKind::Slider;
    type Patch = SliderPatch;

    fn apply(&mut self, patch: &SliderPatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign_range(&mut p.min, &mut p.max, patch.min, patch.max);
        assign(&mut p.value, &patch.value);
        assign(&mut p.bar_color, &patch.bar_color);
        assign(&mut p.fill_color, &patch.fill_color);
        assign(&mut p.value_color, &patch.value_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
        self.props.value = self.domain().clamp(self.props.value);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Slider(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&SliderPatch> {
        match patch {
            PropsPatch::Slider(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let mut view = ViewModel::text(wire_number(round_half_up(p.value)))
            .with_colors(&p.bg_color, &p.value_color)
            .with_border(&p.border_color, &p.border_style)
            .with_font_size(&p.font_size);
        view.fill_ratio = Some(self.domain().ratio(p.value));
        view.fill_color = Some(p.fill_color.clone());
        view
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }
}

pub type SliderControl = Control<SliderState>;

impl Control<SliderState> {
    /// Starts a drag at offset `x` of a track `width` pixels wide and applies
    /// the value under the pointer.
    pub async fn pointer_down(&self, x: f64, width: f64) -> Option<CommandOutcome> {
        if !self.is_interactive() {
            return None;
        }
        self.begin_capture(&ListenerEvent::POINTER_DRAG);
        self.drag_to(x, width).await
    }

    pub async fn pointer_move(&self, x: f64, width: f64) -> Option<CommandOutcome> {
        if !self.is_capturing() {
            return None;
        }
        self.drag_to(x, width).await
    }

    pub fn pointer_up(&self) {
        self.end_capture();
    }

    pub fn pointer_cancel(&self) {
        self.end_capture();
    }

    async fn drag_to(&self, x: f64, width: f64) -> Option<CommandOutcome> {
        let value = self.update_live(|state| {
            let p = &mut state.props;
            let value = map_linear(x, width, p.min, p.max);
            if value == p.value {
                return None;
            }
            p.value = value;
            Some(value)
        })?;
        Some(self.dispatch(wire_number(value)).await)
    }
}
