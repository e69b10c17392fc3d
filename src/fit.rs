//! Fit evaluation for a single item against a single carton.
//!
//! Tries the axis-aligned orientations the packer considers and reports
//! whether the item fits, plus a coarse per-axis capacity estimate.

use crate::model::{BoxType, Item};

/// Outcome of checking one item against one box type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitAssessment {
    pub fits: bool,
    /// Upper bound on how many identical items the box could hold, taken
    /// per axis in the matched orientation. This is not true bin packing;
    /// the first-fit planner treats it as informational metadata only.
    pub fit_count: u32,
}

impl FitAssessment {
    const NO_FIT: Self = Self {
        fits: false,
        fit_count: 0,
    };
}

/// Checks whether an item fits into a box type in any of four axis-aligned
/// orientations, tried in priority order:
///
/// 1. length × width × height unchanged
/// 2. length and width swapped
/// 3. length and height swapped (item standing on its side)
/// 4. length and height swapped, then length and width swapped
///
/// An orientation matches when every oriented item dimension is strictly
/// less than the corresponding box dimension; the first match wins. An item
/// exactly as long as the box in some axis does not fit in that orientation.
pub fn assess_fit(item: &Item, box_type: &BoxType) -> FitAssessment {
    let (l, w, h) = item.dims();

    // Missing or degenerate dimensions never fit.
    if l <= 0.0 || w <= 0.0 || h <= 0.0 {
        return FitAssessment::NO_FIT;
    }

    let (bl, bw, bh) = box_type.dims();
    let orientations = [(l, w, h), (w, l, h), (h, w, l), (w, h, l)];

    for (ol, ow, oh) in orientations {
        if ol < bl && ow < bw && oh < bh {
            let fit_count = ((bl / ol).floor() * (bw / ow).floor() * (bh / oh).floor()) as u32;
            return FitAssessment {
                fits: true,
                fit_count,
            };
        }
    }

    FitAssessment::NO_FIT
}
