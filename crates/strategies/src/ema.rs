// In crates/strategies/src/ema.rs

use serde::{Deserialize, Serialize};

/// How early observations are weighted while the average warms up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmaConvention {
    /// Bias-corrected weights: every output is the weighted mean of all inputs
    /// so far with weights `(1-α)^i`, renormalised by their sum.
    #[default]
    Adjusted,
    /// Plain recursion seeded by the first value:
    /// `ema[i] = α·x[i] + (1-α)·ema[i-1]`.
    Recursive,
}

impl EmaConvention {
    pub fn from_adjust(adjust: bool) -> Self {
        if adjust {
            EmaConvention::Adjusted
        } else {
            EmaConvention::Recursive
        }
    }
}

/// Smoothing factor for a span: `α = 2 / (span + 1)`.
///
/// Derived through the centre of mass (`com = (span - 1) / 2`, `α = 1 / (1 + com)`)
/// so the value is bit-identical to the one used by the reference tooling.
pub fn alpha_for_span(span: usize) -> f64 {
    let com = (span as f64 - 1.0) / 2.0;
    1.0 / (1.0 + com)
}

/// Exponentially weighted mean of `values`, one output per input.
///
/// The recurrence keeps a running weighted value and the total weight of the
/// history behind it. Each step decays the old weight by `1-α`, blends in the
/// new value with weight `1` (adjusted) or `α` (recursive), then divides by the
/// combined weight. The output at index 0 is the first input.
///
/// `span` must be at least 1; a span of 1 reproduces the input.
pub fn ewm_mean(values: &[f64], span: usize, convention: EmaConvention) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let Some((&first, rest)) = values.split_first() else {
        return out;
    };

    let alpha = alpha_for_span(span);
    let old_weight_factor = 1.0 - alpha;
    let new_weight = match convention {
        EmaConvention::Adjusted => 1.0,
        EmaConvention::Recursive => alpha,
    };

    let mut weighted = first;
    let mut old_weight = 1.0;
    out.push(weighted);

    for &current in rest {
        old_weight *= old_weight_factor;
        // Skipping the blend on an unchanged value keeps constant series exact.
        if weighted != current {
            weighted = old_weight * weighted + new_weight * current;
            weighted /= old_weight + new_weight;
        }
        match convention {
            EmaConvention::Adjusted => old_weight += new_weight,
            EmaConvention::Recursive => old_weight = 1.0,
        }
        out.push(weighted);
    }

    out
}
