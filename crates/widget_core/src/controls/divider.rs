//! Horizontal and vertical dividers. Both are static: no address, no
//! interactions.

use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;

use super::{assign, DEFAULT_BG_COLOR, DEFAULT_BORDER_COLOR, DEFAULT_BORDER_STYLE, DEFAULT_FONT_SIZE};
use crate::{
    contract::{LoosePatch, PatchReader, PropsPatch, WidgetProps},
    control::{Control, ControlState},
    view::{Rule, ViewModel},
};

const DEFAULT_LINE_WIDTH: f64 = 2.0;

fn assign_width(slot: &mut f64, value: Option<f64>) {
    if let Some(width) = value.filter(|width| *width >= 0.0) {
        *slot = width;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerProps {
    pub bg_color: String,
    pub font_size: String,
    pub text: String,
    pub line_color: String,
    pub line_width: f64,
    pub border_style: String,
    pub text_color: String,
}

impl Default for DividerProps {
    fn default() -> Self {
        Self {
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            text: "Divider".into(),
            line_color: DEFAULT_BORDER_COLOR.into(),
            line_width: DEFAULT_LINE_WIDTH,
            border_style: DEFAULT_BORDER_STYLE.into(),
            text_color: "#64748b".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DividerPatch {
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub text: Option<String>,
    pub line_color: Option<String>,
    pub line_width: Option<f64>,
    pub border_style: Option<String>,
    pub text_color: Option<String>,
}

impl LoosePatch for DividerPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            text: reader.text("text"),
            line_color: reader.text("lineColor"),
            line_width: reader.number("lineWidth"),
            border_style: reader.text("borderStyle"),
            text_color: reader.text("textColor"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividerState {
    pub props: DividerProps,
}

impl ControlState for DividerState {
    const KIND: ControlKind = ControlKind::Divider;
    type Patch = DividerPatch;

    fn apply(&mut self, patch: &DividerPatch) {
        let p = &mut self.props;
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.text, &patch.text);
        assign(&mut p.line_color, &patch.line_color);
        assign_width(&mut p.line_width, patch.line_width);
        assign(&mut p.border_style, &patch.border_style);
        assign(&mut p.text_color, &patch.text_color);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Divider(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&DividerPatch> {
        match patch {
            PropsPatch::Divider(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let mut view = ViewModel::text(p.text.clone())
            .with_colors(&p.bg_color, &p.text_color)
            .with_font_size(&p.font_size);
        view.rule = Some(Rule {
            color: p.line_color.clone(),
            width: p.line_width,
            vertical: false,
        });
        view
    }
}

pub type DividerControl = Control<DividerState>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalDividerProps {
    pub bg_color: String,
    pub font_size: String,
    pub line_color: String,
    pub line_width: f64,
    pub border_style: String,
}

impl Default for VerticalDividerProps {
    fn default() -> Self {
        Self {
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            line_color: DEFAULT_BORDER_COLOR.into(),
            line_width: DEFAULT_LINE_WIDTH,
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerticalDividerPatch {
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub line_color: Option<String>,
    pub line_width: Option<f64>,
    pub border_style: Option<String>,
}

impl LoosePatch for VerticalDividerPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            line_color: reader.text("lineColor"),
            line_width: reader.number("lineWidth"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerticalDividerState {
    pub props: VerticalDividerProps,
}

impl ControlState for VerticalDividerState {
    const KIND: ControlKind = ControlKind::VerticalDivider;
    type Patch = VerticalDividerPatch;

    fn apply(&mut self, patch: &VerticalDividerPatch) {
        let p = &mut self.props;
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.line_color, &patch.line_color);
        assign_width(&mut p.line_width, patch.line_width);
        assign(&mut p.border_style, &patch.border_style);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::VerticalDivider(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&VerticalDividerPatch> {
        match patch {
            PropsPatch::VerticalDivider(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        let mut view = ViewModel::default().with_colors(&p.bg_color, &p.line_color);
        view.rule = Some(Rule {
            color: p.line_color.clone(),
            width: p.line_width,
            vertical: true,
        });
        view
    }
}

pub type VerticalDividerControl = Control<VerticalDividerState>;
