use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;

use super::{assign, assign_range, default_address, DEFAULT_BORDER_STYLE};
use crate::{
    coerce::wire_number,
    contract::{LoosePatch, PatchReader, PropsPatch, WidgetProps},
    control::{Control, ControlState},
    dispatcher::CommandOutcome,
    gesture::ListenerEvent,
    mapper::{
        describe_arc, domain_to_angle, map_angle_to_domain, pointer_angle, round_half_up,
        ValueDomain, SWEEP_MAX_DEG, SWEEP_MIN_DEG,
    },
    view::{KnobArcs, ViewModel},
};

const DIAL_CENTER: f64 = 50.0;
const DIAL_RADIUS: f64 = 40.0;
const TRACK_COLOR: &str = "#dfe7ef";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnobProps {
    pub command_id: String,
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub step: f64,
    pub value_color: String,
    pub range_color: String,
    pub stroke_width: f64,
    pub show_value: bool,
    pub text_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for KnobProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            min: 0.0,
            max: 100.0,
            value: 0.0,
            step: 1.0,
            value_color: "#3B82F6".into(),
            range_color: TRACK_COLOR.into(),
            stroke_width: 14.0,
            show_value: true,
            text_color: "#495057".into(),
            border_color: TRACK_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnobPatch {
    pub command_id: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub value: Option<f64>,
    pub step: Option<f64>,
    pub value_color: Option<String>,
    pub range_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub show_value: Option<bool>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
}

impl LoosePatch for KnobPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            min: reader.number("min"),
            max: reader.number("max"),
            value: reader.number("value"),
            step: reader.number("step"),
            value_color: reader.text("valueColor"),
            range_color: reader.text("rangeColor"),
            stroke_width: reader.number("strokeWidth"),
            show_value: reader.flag("showValue"),
            text_color: reader.text("textColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnobState {
    pub props: KnobProps,
}

impl KnobState {
    pub fn domain(&self) -> ValueDomain {
        ValueDomain::new(self.props.min, self.props.max).with_step(self.props.step)
    }

    pub fn angle(&self) -> f64 {
        domain_to_angle(self.props.value, &self.domain())
    }
}

impl ControlState for KnobState {
    const KIND: ControlKind = ControlKind::Knob;
    type Patch = KnobPatch;

    fn apply(&mut self, patch: &KnobPatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign_range(&mut p.min, &mut p.max, patch.min, patch.max);
        if let Some(step) = patch.step.filter(|step| *step > 0.0) {
            p.step = step;
        }
        assign(&mut p.value, &patch.value);
        assign(&mut p.value_color, &patch.value_color);
        assign(&mut p.range_color, &patch.range_color);
        if let Some(width) = patch.stroke_width.filter(|width| *width > 0.0) {
            p.stroke_width = width;
        }
        assign(&mut p.show_value, &patch.show_value);
        assign(&mut p.text_color, &patch.text_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
        self.props.value = self.domain().constrain(self.props.value);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Knob(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&KnobPatch> {
        match patch {
            PropsPatch::Knob(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let text = if p.show_value {
            wire_number(round_half_up(p.value))
        } else {
            String::new()
        };
        let mut view = ViewModel::text(text).with_border(&p.border_color, &p.border_style);
        view.foreground = Some(p.text_color.clone());
        view.arcs = Some(KnobArcs {
            track: describe_arc(DIAL_CENTER, DIAL_CENTER, DIAL_RADIUS, SWEEP_MIN_DEG, SWEEP_MAX_DEG),
            value: describe_arc(DIAL_CENTER, DIAL_CENTER, DIAL_RADIUS, SWEEP_MIN_DEG, self.angle()),
            stroke_width: p.stroke_width,
            track_color: p.range_color.clone(),
            value_color: p.value_color.clone(),
        });
        view
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }
}

pub type KnobControl = Control<KnobState>;

/// Pointer offsets are relative to the dial center, `dy` growing downwards.
impl Control<KnobState> {
    pub async fn mouse_down(&self, dx: f64, dy: f64) -> Option<CommandOutcome> {
        if !self.is_interactive() {
            return None;
        }
        self.begin_capture(&ListenerEvent::MOUSE_DRAG);
        self.turn_to(dx, dy).await
    }

    pub async fn mouse_move(&self, dx: f64, dy: f64) -> Option<CommandOutcome> {
        if !self.is_capturing() {
            return None;
        }
        self.turn_to(dx, dy).await
    }

    pub fn mouse_up(&self) {
        self.end_capture();
    }

    /// Ignored unless exactly one contact is down.
    pub async fn touch_start(&self, touches: &[(f64, f64)]) -> Option<CommandOutcome> {
        let [(dx, dy)] = touches else {
            return None;
        };
        if !self.is_interactive() {
            return None;
        }
        self.begin_capture(&ListenerEvent::TOUCH_DRAG);
        self.turn_to(*dx, *dy).await
    }

    pub async fn touch_move(&self, touches: &[(f64, f64)]) -> Option<CommandOutcome> {
        let [(dx, dy)] = touches else {
            return None;
        };
        if !self.is_capturing() {
            return None;
        }
        self.turn_to(*dx, *dy).await
    }

    pub fn touch_end(&self) {
        self.end_capture();
    }

    pub fn touch_cancel(&self) {
        self.end_capture();
    }

    async fn turn_to(&self, dx: f64, dy: f64) -> Option<CommandOutcome> {
        let angle = pointer_angle(dx, dy);
        let value = self.update_live(|state| {
            let value = map_angle_to_domain(angle, &state.domain());
            if value == state.props.value {
                return None;
            }
            state.props.value = value;
            Some(value)
        })?;
        Some(self.dispatch(wire_number(value)).await)
    }
}
