//! The control catalogue. Each module defines the property set, patch and
//! state of one kind, plus the user interactions it supports.

use tracing::warn;

pub mod button;
pub mod checkbox;
pub mod divider;
pub mod input;
pub mod knob;
pub mod label;
pub mod slider;
pub mod switch;
pub mod toggle;

pub const DEFAULT_BG_COLOR: &str = "#ffffff";
pub const DEFAULT_FONT_SIZE: &str = "14";
pub const DEFAULT_TEXT_COLOR: &str = "#111827";
pub const DEFAULT_BORDER_COLOR: &str = "#e5e7eb";
pub const DEFAULT_BORDER_STYLE: &str = "solid";
pub const PRIMARY_COLOR: &str = "#409EFF";
pub const PRIMARY_ACTIVE_COLOR: &str = "#3a8ee6";

pub(crate) fn assign<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

/// Updates a `[min, max]` pair. A patch that would leave `min > max` is
/// rejected as a whole.
pub(crate) fn assign_range(min: &mut f64, max: &mut f64, new_min: Option<f64>, new_max: Option<f64>) {
    if new_min.is_none() && new_max.is_none() {
        return;
    }
    let lo = new_min.unwrap_or(*min);
    let hi = new_max.unwrap_or(*max);
    if lo > hi {
        warn!(min = lo, max = hi, "inverted range ignored");
        return;
    }
    *min = lo;
    *max = hi;
}

pub(crate) fn default_address() -> String {
    shared::domain::DEFAULT_ADDRESS.to_string()
}
