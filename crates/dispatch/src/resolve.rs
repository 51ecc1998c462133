//! Terminal status resolution.

use wuphf_common::types::{DeliveryOutcome, DeliveryStatus};

/// Map per-channel outcomes to one overall status.
///
/// Pure and total: zero successes is `Failed`, a clean sweep is `Delivered`,
/// anything in between is `PartiallyDelivered`. The engine guarantees
/// `outcomes.len() == requested` before calling; a mismatch is a defect in
/// the caller, not a condition this function reports.
#[must_use]
pub fn resolve_status(outcomes: &[DeliveryOutcome], requested: usize) -> DeliveryStatus {
    debug_assert_eq!(outcomes.len(), requested);
    let successes = outcomes.iter().filter(|o| o.success).count();
    if successes == 0 {
        DeliveryStatus::Failed
    } else if successes == requested {
        DeliveryStatus::Delivered
    } else {
        DeliveryStatus::PartiallyDelivered
    }
}
