use serde::Serialize;

/// What a mount point currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Rendered {
    /// Template still loading.
    Pending,
    /// Visible error indicator left by a failed template load.
    Failed { message: String },
    View(ViewModel),
}

impl Rendered {
    pub fn view(&self) -> Option<&ViewModel> {
        match self {
            Rendered::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Rendered::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub color: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnobArcs {
    pub track: String,
    pub value: String,
    pub stroke_width: f64,
    pub track_color: String,
    pub value_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub color: String,
    pub width: f64,
    pub vertical: bool,
}

/// Render-ready snapshot of one control's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// Filled share of the slider track, in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcs: Option<KnobArcs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

impl ViewModel {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_border(mut self, color: &str, style: &str) -> Self {
        self.border = Some(Border {
            color: color.to_string(),
            style: style.to_string(),
        });
        self
    }

    pub fn with_colors(mut self, background: &str, foreground: &str) -> Self {
        self.background = Some(background.to_string());
        self.foreground = Some(foreground.to_string());
        self
    }

    pub fn with_font_size(mut self, font_size: &str) -> Self {
        self.font_size = Some(font_size.to_string());
        self
    }
}
