//! Batch statistics
//!
//! Pure computation over one drained batch, no I/O.

use contracts::{CongestionAlert, Reading, Summary};

/// Summarize one batch
///
/// Returns `None` for an empty batch. The average is integer division of the
/// sum by the count. Alerts are emitted in batch order, one per reading whose
/// value is strictly greater than `threshold`.
pub fn summarize(cycle: u64, batch: &[Reading], threshold: u32) -> Option<Summary> {
    let first = batch.first()?;

    let mut total = 0u64;
    let mut min = first.value;
    let mut max = first.value;
    let mut alerts = Vec::new();

    for reading in batch {
        total += u64::from(reading.value);
        min = min.min(reading.value);
        max = max.max(reading.value);

        if reading.value > threshold {
            alerts.push(CongestionAlert {
                source_id: reading.source_id,
                value: reading.value,
            });
        }
    }

    let count = batch.len();
    // average lies in [min, max], so it fits back into u32
    let average = u32::try_from(total / count as u64).unwrap_or(max);

    Some(Summary {
        cycle,
        count,
        total,
        average,
        min,
        max,
        alerts,
    })
}
