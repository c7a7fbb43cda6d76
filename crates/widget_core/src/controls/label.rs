use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{domain::ControlKind, protocol::PushUpdate};
use tokio::{
    sync::{broadcast::error::RecvError, watch},
    task::JoinHandle,
};
use tracing::{debug, warn};

use super::{
    assign, default_address, DEFAULT_BG_COLOR, DEFAULT_BORDER_COLOR, DEFAULT_BORDER_STYLE,
    DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR,
};
use crate::{
    contract::{LoosePatch, PatchReader, PropsPatch, WidgetProps},
    control::{Control, ControlState},
    session::WidgetServices,
    view::ViewModel,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelProps {
    pub command_id: String,
    pub bg_color: String,
    pub font_size: String,
    pub text: String,
    pub text_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl Default for LabelProps {
    fn default() -> Self {
        Self {
            command_id: default_address(),
            bg_color: DEFAULT_BG_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            text: "Label".into(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            border_color: DEFAULT_BORDER_COLOR.into(),
            border_style: DEFAULT_BORDER_STYLE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelPatch {
    pub command_id: Option<String>,
    pub bg_color: Option<String>,
    pub font_size: Option<String>,
    pub text: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub border_style: Option<String>,
}

impl LoosePatch for LabelPatch {
    fn read(reader: &PatchReader<'_>) -> Self {
        Self {
            command_id: reader.text("commandId"),
            bg_color: reader.text("bgColor"),
            font_size: reader.text("fontSize"),
            text: reader.text("value").or_else(|| reader.text("text")),
            text_color: reader.text("textColor"),
            border_color: reader.text("borderColor"),
            border_style: reader.text("borderStyle"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelState {
    pub props: LabelProps,
}

impl LabelState {
    /// Applies a push update addressed to this label. Returns whether the
    /// displayed text changed.
    pub fn apply_push(&mut self, update: &PushUpdate) -> bool {
        if update.command_id != self.props.command_id {
            return false;
        }
        match update.display_text() {
            Some(text) if text != self.props.text => {
                self.props.text = text;
                true
            }
            _ => false,
        }
    }
}

impl ControlState for LabelState {
    const KIND: ControlKind = ControlKind::Label;
    type Patch = LabelPatch;

    fn apply(&mut self, patch: &LabelPatch) {
        let p = &mut self.props;
        assign(&mut p.command_id, &patch.command_id);
        assign(&mut p.bg_color, &patch.bg_color);
        assign(&mut p.font_size, &patch.font_size);
        assign(&mut p.text, &patch.text);
        assign(&mut p.text_color, &patch.text_color);
        assign(&mut p.border_color, &patch.border_color);
        assign(&mut p.border_style, &patch.border_style);
    }

    fn props(&self) -> WidgetProps {
        WidgetProps::Label(self.props.clone())
    }

    fn patch_of(patch: &PropsPatch) -> Option<&LabelPatch> {
        match patch {
            PropsPatch::Label(patch) => Some(patch),
            _ => None,
        }
    }

    fn render(&self) -> ViewModel {
        let p = &self.props;
        ViewModel::text(p.text.clone())
            .with_colors(&p.bg_color, &p.text_color)
            .with_border(&p.border_color, &p.border_style)
            .with_font_size(&p.font_size)
    }

    fn address(&self) -> Option<&str> {
        Some(&self.props.command_id)
    }

    fn on_interactive(
        live: &Arc<watch::Sender<Self>>,
        services: &WidgetServices,
    ) -> Option<JoinHandle<()>> {
        let mut updates = services.push.subscribe();
        let live = Arc::downgrade(live);
        Some(tokio::spawn(async move {
            loop {
                let update = match updates.recv().await {
                    Ok(update) => update,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "label push listener lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(live) = live.upgrade() else {
                    break;
                };
                live.send_if_modified(|state| state.apply_push(&update));
            }
            debug!("label push listener stopped");
        }))
    }
}

pub type LabelControl = Control<LabelState>;

impl Control<LabelState> {
    /// Applies a push update directly. Updates arriving before the view is
    /// mounted are dropped.
    pub fn apply_push_update(&self, update: &PushUpdate) -> bool {
        if !self.is_interactive() {
            debug!(node = %self.node(), command_id = %update.command_id, "push update before mount dropped");
            return false;
        }
        self.update_live(|state| state.apply_push(update).then_some(()))
            .is_some()
    }
}
