use serde::{Deserialize, Serialize};

/// Correlated color temperature together with its linear RGB tint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KelvinColor {
    pub kelvin: f64,
    pub rgb: [f64; 3],
}

impl KelvinColor {
    #[must_use]
    pub fn from_kelvin(kelvin: f64) -> Self {
        Self {
            kelvin,
            rgb: kelvin_to_rgb(kelvin),
        }
    }
}

fn channel(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 255.0)
    }
}

/// Tanner Helland's black-body approximation, each channel scaled to `[0, 1]`.
#[must_use]
pub fn kelvin_to_rgb(kelvin: f64) -> [f64; 3] {
    // Non-positive or NaN input behaves like the coldest representable light.
    let temp = (kelvin / 100.0).max(0.01);

    let (red, green) = if temp <= 66.0 {
        (255.0, channel(99.470_802_586_1 * temp.ln() - 161.119_568_166_1))
    } else {
        (
            channel(329.698_727_446 * (temp - 60.0).powf(-0.133_204_759_2)),
            channel(288.122_169_528_3 * (temp - 60.0).powf(-0.075_514_849_2)),
        )
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        channel(138.517_731_223_1 * (temp - 10.0).ln() - 305.044_792_730_7)
    };

    [red / 255.0, green / 255.0, blue / 255.0]
}
