use gonostop_core::{Classification, TrialOutcome, TrialType};
use serde::{Deserialize, Serialize};

use crate::stats::{coefficient_of_variation, mean, median};

/// Latency above which a correct primary response counts as a lapse.
const LAPSE_RT_MS: f64 = 1200.0;
/// Minimum primary-trial count for the vigilance decrement to be defined.
const DECREMENT_MIN_TRIALS: usize = 9;

/// Per-slice statistics over the temporally ordered primary trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VigilanceSlice {
    /// 1-based slice index.
    pub index: usize,
    pub trials: usize,
    pub omissions: usize,
    pub anticipations: usize,
    /// 0 when the slice is empty.
    pub omission_rate: f64,
    pub anticipation_rate: f64,
    /// -1 when the slice holds no valid latencies.
    pub rt_median_ms: f64,
}

/// Aggregated behavioral statistics for one session.
///
/// Rates default to 0 and latency-derived quantities to -1 when their
/// denominators are empty, so an aborted session still yields a valid,
/// if sparse, summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub n_trials: usize,
    pub primary_trials: usize,
    pub inhibition_trials: usize,
    /// Inhibition trials whose secondary cue was actually presented; the
    /// denominator for the commission and stop-success rates.
    pub armed_inhibition_trials: usize,
    pub commission_rate: f64,
    pub omission_rate: f64,
    pub anticipation_rate: f64,
    pub stop_success_rate: f64,
    /// Primary trials lost to omission or to latency above 1200 ms.
    pub lapse_rate: f64,
    /// Trials with an interpretable record (every inhibition trial, plus
    /// primary trials that drew a response) over all trials.
    pub valid_trial_ratio: f64,
    /// Median latency of correct primary responses inside the validity
    /// bounds; -1 when none.
    pub rt_median_ms: f64,
    /// Coefficient of variation of those latencies; -1 below two samples.
    pub rt_cv: f64,
    /// Mean recorded staircase value; -1 without armed inhibition trials.
    pub mean_secondary_delay_ms: f64,
    /// Simple-mean inhibition-latency estimate: max(0, RT median - mean
    /// secondary delay). An approximation to the integration method of
    /// the stop-signal literature, not a race-model fit. -1 when either
    /// operand is undefined.
    pub inhibition_latency_ms: f64,
    pub vigilance: Vec<VigilanceSlice>,
    /// First-third accuracy minus last-third accuracy over primary
    /// trials; 0 below nine primary trials.
    pub vigilance_decrement: f64,
}

/// Encoded primary-trial result, in temporal order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PrimaryResult {
    Valid(f64),
    Omission,
    Anticipation,
}

/// Reduces an outcome log plus the staircase trace into a summary.
/// Latencies above `max_valid_rt_ms` stay in the log but are excluded
/// from the RT statistics. Pure and idempotent: recomputing from the
/// same log yields identical results, and the log is never mutated.
pub fn aggregate(
    outcomes: &[TrialOutcome],
    staircase_trace: &[f64],
    slices: usize,
    max_valid_rt_ms: f64,
) -> SessionSummary {
    let primary: Vec<&TrialOutcome> = outcomes
        .iter()
        .filter(|o| o.trial_type == TrialType::Primary)
        .collect();
    let inhibition_trials = outcomes.len() - primary.len();
    let armed: Vec<&TrialOutcome> = outcomes
        .iter()
        .filter(|o| o.is_armed_inhibition())
        .collect();

    let commissions = armed
        .iter()
        .filter(|o| o.classification == Classification::StopFailure)
        .count();
    let stop_successes = armed
        .iter()
        .filter(|o| o.classification == Classification::StopSuccess)
        .count();
    let omissions = primary
        .iter()
        .filter(|o| o.classification == Classification::Omission)
        .count();
    let anticipations = primary
        .iter()
        .filter(|o| o.classification == Classification::Anticipation)
        .count();
    let lapses = primary
        .iter()
        .filter(|o| {
            o.classification == Classification::Omission
                || o.latency_ms.is_some_and(|rt| rt > LAPSE_RT_MS)
        })
        .count();
    let responded_primaries = primary.iter().filter(|o| o.responded).count();
    let valid_trials = inhibition_trials + responded_primaries;

    let latencies: Vec<f64> = primary
        .iter()
        .filter(|o| o.classification == Classification::Correct)
        .filter_map(|o| o.latency_ms)
        .filter(|&rt| rt <= max_valid_rt_ms)
        .collect();
    let rt_median_ms = median(&latencies);
    let rt_cv = coefficient_of_variation(&latencies);

    let mean_secondary_delay_ms = mean(staircase_trace);
    let inhibition_latency_ms = if rt_median_ms >= 0.0 && mean_secondary_delay_ms >= 0.0 {
        (rt_median_ms - mean_secondary_delay_ms).max(0.0)
    } else {
        -1.0
    };

    let series: Vec<PrimaryResult> = primary
        .iter()
        .map(|o| match o.classification {
            Classification::Correct => PrimaryResult::Valid(o.latency_ms.unwrap_or(0.0)),
            Classification::Anticipation => PrimaryResult::Anticipation,
            _ => PrimaryResult::Omission,
        })
        .collect();

    SessionSummary {
        n_trials: outcomes.len(),
        primary_trials: primary.len(),
        inhibition_trials,
        armed_inhibition_trials: armed.len(),
        commission_rate: rate(commissions, armed.len()),
        omission_rate: rate(omissions, primary.len()),
        anticipation_rate: rate(anticipations, primary.len()),
        stop_success_rate: rate(stop_successes, armed.len()),
        lapse_rate: rate(lapses, primary.len()),
        valid_trial_ratio: rate(valid_trials, outcomes.len()),
        rt_median_ms,
        rt_cv,
        mean_secondary_delay_ms,
        inhibition_latency_ms,
        vigilance: vigilance_profile(&series, slices),
        vigilance_decrement: vigilance_decrement(&series),
    }
}

fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Splits the primary-trial series into `slices` contiguous chunks,
/// earlier chunks absorbing any remainder, and summarizes each. Empty
/// chunks (more slices than trials) are skipped.
fn vigilance_profile(series: &[PrimaryResult], slices: usize) -> Vec<VigilanceSlice> {
    let n = series.len();
    if n == 0 || slices == 0 {
        return Vec::new();
    }
    let base = n / slices;
    let remainder = n % slices;

    let mut profile = Vec::with_capacity(slices);
    let mut start = 0;
    for slice_index in 1..=slices {
        let size = base + usize::from(slice_index <= remainder);
        if size == 0 {
            continue;
        }
        let chunk = &series[start..start + size];
        start += size;

        let omissions = chunk
            .iter()
            .filter(|r| matches!(r, PrimaryResult::Omission))
            .count();
        let anticipations = chunk
            .iter()
            .filter(|r| matches!(r, PrimaryResult::Anticipation))
            .count();
        let valid: Vec<f64> = chunk
            .iter()
            .filter_map(|r| match r {
                PrimaryResult::Valid(rt) => Some(*rt),
                _ => None,
            })
            .collect();

        profile.push(VigilanceSlice {
            index: slice_index,
            trials: chunk.len(),
            omissions,
            anticipations,
            omission_rate: rate(omissions, chunk.len()),
            anticipation_rate: rate(anticipations, chunk.len()),
            rt_median_ms: median(&valid),
        });
    }
    profile
}

/// Accuracy of the first third minus accuracy of the last third of the
/// primary-trial series; a positive value means performance declined.
fn vigilance_decrement(series: &[PrimaryResult]) -> f64 {
    let n = series.len();
    if n < DECREMENT_MIN_TRIALS {
        return 0.0;
    }
    let third = n / 3;
    let accuracy = |chunk: &[PrimaryResult]| {
        let correct = chunk
            .iter()
            .filter(|r| matches!(r, PrimaryResult::Valid(_)))
            .count();
        rate(correct, chunk.len())
    };
    accuracy(&series[..third]) - accuracy(&series[2 * third..])
}
