//! Pointer-to-value mapping for the slider track and the knob dial.

/// Lower bound of the knob sweep, in degrees clockwise from straight up.
pub const SWEEP_MIN_DEG: f64 = -145.0;
/// Upper bound of the knob sweep.
pub const SWEEP_MAX_DEG: f64 = 145.0;

/// Rounds halves towards positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ValueDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Nearest multiple of `step`, rounded to the decimals `step` carries; a
    /// missing or non-positive step leaves the value as is.
    pub fn quantize(&self, value: f64) -> f64 {
        match self.step {
            Some(step) if step > 0.0 => {
                let scale = 10f64.powi(step_decimals(step));
                (round_half_up(value / step) * step * scale).round() / scale
            }
            _ => value,
        }
    }

    /// Quantize, then clamp. Quantizing can push a value just outside the
    /// range, so the clamp always runs last.
    pub fn constrain(&self, value: f64) -> f64 {
        self.clamp(self.quantize(value))
    }

    /// Position of `value` within the range as a ratio in `[0, 1]`.
    pub fn ratio(&self, value: f64) -> f64 {
        let range = (self.max - self.min).max(0.0001);
        ((value - self.min) / range).clamp(0.0, 1.0)
    }
}

/// Number of fractional digits in the shortest decimal form of `step`.
fn step_decimals(step: f64) -> i32 {
    let repr = format!("{step}");
    let decimals = repr.split_once('.').map_or(0, |(_, frac)| frac.len());
    decimals.min(12) as i32
}

/// Maps a pointer offset `x` inside a track of width `width` onto
/// `[min, max]`. Slider values are always whole numbers.
pub fn map_linear(x: f64, width: f64, min: f64, max: f64) -> f64 {
    let ratio = (x / width.max(1.0)).clamp(0.0, 1.0);
    round_half_up(min + ratio * (max - min))
}

/// Angle of a pointer relative to the dial center, in degrees clockwise from
/// straight up, normalized to `(-180, 180]`. Screen coordinates: `dy` grows
/// downwards.
pub fn pointer_angle(dx: f64, dy: f64) -> f64 {
    let mut deg = dy.atan2(dx).to_degrees() + 90.0;
    if deg > 180.0 {
        deg -= 360.0;
    }
    deg
}

/// Clamps an angle into the sweep. Angles in the bottom dead zone land on
/// whichever bound is closer, because the dead zone straddles ±180°.
pub fn clamp_angle(deg: f64) -> f64 {
    deg.clamp(SWEEP_MIN_DEG, SWEEP_MAX_DEG)
}

/// Maps a dial angle onto the domain: clamp the angle, interpolate, quantize,
/// clamp the value.
pub fn map_angle_to_domain(deg: f64, domain: &ValueDomain) -> f64 {
    let deg = clamp_angle(deg);
    let raw = map_range(deg, SWEEP_MIN_DEG, SWEEP_MAX_DEG, domain.min, domain.max);
    domain.constrain(raw)
}

/// Inverse of [`map_angle_to_domain`] without quantization; used for drawing.
pub fn domain_to_angle(value: f64, domain: &ValueDomain) -> f64 {
    if domain.max == domain.min {
        return SWEEP_MIN_DEG;
    }
    let deg = map_range(value, domain.min, domain.max, SWEEP_MIN_DEG, SWEEP_MAX_DEG);
    clamp_angle(deg)
}

fn map_range(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, deg: f64) -> (f64, f64) {
    let rad = (deg - 90.0).to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// SVG path of a circular arc from `start_deg` to `end_deg`.
pub fn describe_arc(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> String {
    let (sx, sy) = polar_to_cartesian(cx, cy, radius, end_deg);
    let (ex, ey) = polar_to_cartesian(cx, cy, radius, start_deg);
    let large_arc = if end_deg - start_deg <= 180.0 { 0 } else { 1 };
    format!("M {sx} {sy} A {radius} {radius} 0 {large_arc} 0 {ex} {ey}")
}

#[cfg(test)]
#[path = "tests/mapper_tests.rs"]
mod tests;
