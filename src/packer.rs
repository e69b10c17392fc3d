//! Greedy first-fit packing of cart items into catalog cartons.
//!
//! The planner is intentionally simple: items are taken in arrival order and
//! fit is evaluated item-vs-box-type only. An open box is never re-checked
//! against the residual volume of what it already holds, so dense multi-item
//! boxes are not validated for true remaining capacity. The `PackingStrategy`
//! trait keeps the seam open for a stricter 3-D strategy later.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::warn;

use crate::fit::assess_fit;
use crate::model::{BoxType, Item, PackedBox};

/// Strategy seam for the packing step.
pub trait PackingStrategy: Send + Sync {
    /// Partitions the expanded item list into packed boxes.
    ///
    /// Items that fit no candidate box type end up in `unpacked`; that is
    /// not an error (zero packages observably yields zero rates).
    fn pack(&self, items: Vec<Item>, box_types: &[BoxType]) -> PackingOutcome;
}

/// Result of the packing step.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PackingOutcome {
    pub packed: Vec<PackedBox>,
    pub unpacked: Vec<Item>,
}

impl PackingOutcome {
    /// Indicates whether every item found a box.
    pub fn is_complete(&self) -> bool {
        self.unpacked.is_empty()
    }

    /// Number of boxes the shipment needs.
    pub fn package_count(&self) -> usize {
        self.packed.len()
    }

    /// Number of items excluded from the shipment.
    pub fn unpacked_count(&self) -> usize {
        self.unpacked.len()
    }

    /// Total shipping weight across all boxes, tare included.
    pub fn total_weight_oz(&self) -> f64 {
        self.packed.iter().map(|b| b.total_weight_oz()).sum()
    }
}

/// Greedy first-fit packer over the box-type catalog.
///
/// Ship-alone items are isolated first, each into the smallest fitting box.
/// Remaining items go into the first open box whose type still reports a
/// fit, or open a new box when none does.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstFitPacker;

impl FirstFitPacker {
    /// Smallest candidate (by interior volume) the item fits into.
    /// The stable sort keeps catalog order for equal volumes.
    fn smallest_fitting<'a>(candidates: &[&'a BoxType], item: &Item) -> Option<&'a BoxType> {
        candidates
            .iter()
            .find(|bt| assess_fit(item, bt).fits)
            .copied()
    }
}

impl PackingStrategy for FirstFitPacker {
    fn pack(&self, items: Vec<Item>, box_types: &[BoxType]) -> PackingOutcome {
        let mut candidates: Vec<&BoxType> = box_types.iter().collect();
        candidates.sort_by(|a, b| {
            a.volume()
                .partial_cmp(&b.volume())
                .unwrap_or(Ordering::Equal)
        });

        let mut packed: Vec<PackedBox> = Vec::new();
        let mut unpacked: Vec<Item> = Vec::new();

        let (alone, shared): (Vec<Item>, Vec<Item>) =
            items.into_iter().partition(|item| item.ship_alone);

        for item in alone {
            match Self::smallest_fitting(&candidates, &item) {
                Some(box_type) => packed.push(PackedBox::open(box_type.clone(), item)),
                None => {
                    warn!(
                        product_id = ?item.id.product_id,
                        "ship-alone item fits no candidate box type, excluded from shipment"
                    );
                    unpacked.push(item);
                }
            }
        }

        // Boxes holding ship-alone items stay closed; only boxes opened
        // below accept further items.
        let first_open = packed.len();

        for item in shared {
            if let Some(open) = packed[first_open..]
                .iter_mut()
                .find(|b| assess_fit(&item, &b.box_type).fits)
            {
                open.items.push(item);
                continue;
            }

            match Self::smallest_fitting(&candidates, &item) {
                Some(box_type) => packed.push(PackedBox::open(box_type.clone(), item)),
                None => {
                    warn!(
                        product_id = ?item.id.product_id,
                        "item fits no candidate box type, excluded from shipment"
                    );
                    unpacked.push(item);
                }
            }
        }

        PackingOutcome { packed, unpacked }
    }
}
