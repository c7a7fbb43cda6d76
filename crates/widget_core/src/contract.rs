//! The property contract every placed control exposes to the editor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::domain::ControlKind;

use crate::{
    coerce::{coerce_bool, coerce_number, coerce_text},
    controls::{
        button::{ButtonPatch, ButtonProps},
        checkbox::{CheckboxPatch, CheckboxProps},
        divider::{DividerPatch, DividerProps, VerticalDividerPatch, VerticalDividerProps},
        input::{InputPatch, InputProps},
        knob::{KnobPatch, KnobProps},
        label::{LabelPatch, LabelProps},
        slider::{SliderPatch, SliderProps},
        switch::{SwitchPatch, SwitchProps},
        toggle::{TogglePatch, ToggleProps},
    },
};

/// Loose property dictionary exchanged with the editor's property panel.
pub type PropertySet = Map<String, Value>;

/// Get/set interface the registry forwards to. Implementations never fail:
/// a patch for another kind is ignored.
pub trait WidgetContract: Send + Sync {
    fn kind(&self) -> ControlKind;
    fn get_props(&self) -> WidgetProps;
    fn set_props(&self, patch: &PropsPatch);
}

/// Builds a typed patch from a loose dictionary. Unknown keys are ignored and
/// values that fail coercion are left out of the patch.
pub trait LoosePatch: Sized {
    fn read(reader: &PatchReader<'_>) -> Self;
}

pub struct PatchReader<'a> {
    set: &'a PropertySet,
}

impl<'a> PatchReader<'a> {
    pub fn new(set: &'a PropertySet) -> Self {
        Self { set }
    }

    pub fn has(&self, key: &str) -> bool {
        self.set.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.set.get(key).and_then(coerce_text)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.set.get(key).and_then(coerce_number)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.set.get(key).map(coerce_bool)
    }

    /// Boolean `key`, with the legacy `value` alias taking precedence.
    pub fn flag_or_value(&self, key: &str) -> Option<bool> {
        self.flag("value").or_else(|| self.flag(key))
    }
}

fn to_property_set<T: Serialize>(props: &T) -> PropertySet {
    match serde_json::to_value(props) {
        Ok(Value::Object(map)) => map,
        _ => PropertySet::new(),
    }
}

macro_rules! catalogue {
    ($($variant:ident => $props:ty, $patch:ty;)*) => {
        /// Complete property set of one control, tagged by kind.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", rename_all = "snake_case")]
        pub enum WidgetProps {
            $($variant($props),)*
        }

        /// Partial update for one control kind; `None` fields are untouched.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", rename_all = "snake_case")]
        pub enum PropsPatch {
            $($variant($patch),)*
        }

        impl WidgetProps {
            pub fn kind(&self) -> ControlKind {
                match self {
                    $(Self::$variant(_) => ControlKind::$variant,)*
                }
            }

            /// Untagged dictionary form handed to the property panel.
            pub fn to_property_set(&self) -> PropertySet {
                match self {
                    $(Self::$variant(props) => to_property_set(props),)*
                }
            }

            pub fn defaults(kind: ControlKind) -> Self {
                match kind {
                    $(ControlKind::$variant => Self::$variant(<$props>::default()),)*
                }
            }
        }

        impl PropsPatch {
            pub fn kind(&self) -> ControlKind {
                match self {
                    $(Self::$variant(_) => ControlKind::$variant,)*
                }
            }

            pub fn from_property_set(kind: ControlKind, set: &PropertySet) -> Self {
                let reader = PatchReader::new(set);
                match kind {
                    $(ControlKind::$variant => Self::$variant(<$patch>::read(&reader)),)*
                }
            }

            pub fn empty(kind: ControlKind) -> Self {
                match kind {
                    $(ControlKind::$variant => Self::$variant(<$patch>::default()),)*
                }
            }
        }

        $(
            impl From<$patch> for PropsPatch {
                fn from(patch: $patch) -> Self {
                    Self::$variant(patch)
                }
            }
        )*
    };
}

catalogue! {
    Button => ButtonProps, ButtonPatch;
    Checkbox => CheckboxProps, CheckboxPatch;
    Switch => SwitchProps, SwitchPatch;
    Toggle => ToggleProps, TogglePatch;
    Slider => SliderProps, SliderPatch;
    Knob => KnobProps, KnobPatch;
    Label => LabelProps, LabelPatch;
    Input => InputProps, InputPatch;
    Divider => DividerProps, DividerPatch;
    VerticalDivider => VerticalDividerProps, VerticalDividerPatch;
}

impl WidgetProps {
    /// Display title, when the kind has one.
    pub fn title(&self) -> Option<String> {
        self.to_property_set()
            .get("title")
            .and_then(coerce_text)
            .filter(|title| !title.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "tests/contract_tests.rs"]
mod tests;
