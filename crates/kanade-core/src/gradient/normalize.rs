use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DISPLAY_MAX, MID_GRAY};

/// What to write when a field holds a single value and cannot be stretched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Every cell becomes 0.
    #[default]
    Zero,
    /// Every cell becomes 128.
    MidGray,
    /// The field is left as it is.
    Unchanged,
}

impl std::fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zero => write!(f, "Zero"),
            Self::MidGray => write!(f, "Mid Gray"),
            Self::Unchanged => write!(f, "Unchanged"),
        }
    }
}

/// Outcome of normalizing one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// Values in `[min, max]` were stretched to `[0, 255]`.
    Stretched { min: u8, max: u8 },
    /// Every cell held `value`; the degenerate policy was applied.
    Degenerate { value: u8 },
    /// The field has no cells.
    Empty,
}

/// Smallest and largest value in a field, or `None` when it is empty.
pub fn field_range(field: &Array2<u8>) -> Option<(u8, u8)> {
    field.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Linearly rescale a field in place so its values span `[0, 255]`.
///
/// Each value maps to `round(255 * (v - min) / (max - min))`. A constant field
/// follows `policy` instead of dividing by zero.
pub fn normalize_field(field: &mut Array2<u8>, policy: DegeneratePolicy) -> Normalization {
    let Some((min, max)) = field_range(field) else {
        return Normalization::Empty;
    };

    if min == max {
        debug!(value = min, policy = %policy, "Constant field, applying degenerate policy");
        match policy {
            DegeneratePolicy::Zero => field.fill(0),
            DegeneratePolicy::MidGray => field.fill(MID_GRAY),
            DegeneratePolicy::Unchanged => {}
        }
        return Normalization::Degenerate { value: min };
    }

    let span = (max - min) as f64;
    field.mapv_inplace(|v| {
        let scaled = DISPLAY_MAX * (v - min) as f64 / span;
        scaled.round().clamp(0.0, DISPLAY_MAX) as u8
    });

    Normalization::Stretched { min, max }
}
