//! Active period extraction for threshold rings (rain, wind).
//!
//! An hourly series is scanned against a threshold and every contiguous run
//! of qualifying hours becomes an [`ActivePeriod`]: an arc on the dial with a
//! peak intensity. Runs touching midnight are clipped by the ring's midnight
//! gap, a whole-day run is split in two, and runs separated by short quiet
//! spells are merged.

use crate::clock::{HOURS_PER_DAY, TimePosition};
use crate::series::HourlySeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

const LAST_HOUR: usize = HOURS_PER_DAY - 1;

/// Contiguous arc of the dial where a series exceeds its threshold.
///
/// `start` and `end` are fractions of the day with `start <= end`; `end` is
/// the exclusive boundary of the last hour, so it may be exactly `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePeriod {
    pub start: f64,
    pub end: f64,
    /// Peak value of the run normalized to `[0, 1]`
    pub intensity: f64,
    /// First qualifying hour of the underlying run
    pub first_hour: usize,
    /// Last qualifying hour of the underlying run
    pub last_hour: usize,
}

impl ActivePeriod {
    #[must_use]
    pub fn start_position(&self) -> TimePosition {
        TimePosition::new(self.start)
    }

    #[must_use]
    pub fn end_position(&self) -> TimePosition {
        TimePosition::new(self.end)
    }

    /// Whether the position lies on this arc. The start is inclusive and
    /// the end exclusive, so adjacent arcs never share a position.
    #[must_use]
    pub fn contains(&self, position: TimePosition) -> bool {
        let p = position.value();
        p >= self.start && p < self.end
    }

    /// Runs starting at hour 0 or ending at hour 23 touch the midnight break
    #[must_use]
    pub fn touches_midnight(&self) -> bool {
        self.first_hour == 0 || self.last_hour == LAST_HOUR
    }

    /// Arc length as a fraction of the day
    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Threshold rule for one ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRule {
    /// Samples strictly above this value qualify
    pub threshold: f64,
    /// Value mapped to full intensity
    pub ceiling: f64,
    /// Quiet spells of at most this many hours are bridged; 0 never merges
    pub max_merge_gap_hours: usize,
}

impl PeriodRule {
    fn intensity(&self, peak: f64) -> f64 {
        if self.ceiling <= 0.0 || !self.ceiling.is_finite() {
            return 1.0;
        }
        (peak / self.ceiling).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Run {
    first: usize,
    last: usize,
    peak: f64,
}

impl Run {
    fn touches_midnight(&self) -> bool {
        self.first == 0 || self.last == LAST_HOUR
    }
}

enum ScanState {
    Outside,
    Inside { first: usize, peak: f64 },
}

/// Extract the active periods of `series` for a ring.
///
/// `midnight_gap` is the reserved arc at the top of the ring as a fraction
/// of the circle; pass 0 for none. The result is sorted by start and no two
/// periods overlap.
#[must_use]
pub fn extract_periods(
    series: &HourlySeries<f64>,
    rule: &PeriodRule,
    midnight_gap: f64,
) -> Vec<ActivePeriod> {
    let gap = sanitize_gap(midnight_gap);
    let runs = merge_runs(scan_runs(series, rule.threshold), rule.max_merge_gap_hours);

    let mut periods = Vec::with_capacity(runs.len() + 1);
    for run in runs {
        emit(&mut periods, run, rule.intensity(run.peak), gap);
    }

    debug!(count = periods.len(), threshold = rule.threshold, "extracted active periods");
    periods
}

fn sanitize_gap(gap: f64) -> f64 {
    if gap.is_finite() { gap.clamp(0.0, 0.25) } else { 0.0 }
}

fn scan_runs(series: &HourlySeries<f64>, threshold: f64) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut state = ScanState::Outside;

    for (hour, &value) in series.iter().enumerate() {
        let qualifies = value > threshold;
        state = match (state, qualifies) {
            (ScanState::Outside, true) => ScanState::Inside { first: hour, peak: value },
            (ScanState::Inside { first, peak }, true) => ScanState::Inside {
                first,
                peak: peak.max(value),
            },
            (ScanState::Inside { first, peak }, false) => {
                runs.push(Run {
                    first,
                    last: hour - 1,
                    peak,
                });
                ScanState::Outside
            }
            (ScanState::Outside, false) => ScanState::Outside,
        };
    }

    if let ScanState::Inside { first, peak } = state {
        runs.push(Run {
            first,
            last: LAST_HOUR,
            peak,
        });
    }
    runs
}

fn merge_runs(runs: Vec<Run>, max_gap_hours: usize) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());

    for run in runs {
        if let Some(current) = merged.last_mut() {
            let quiet_hours = run.first - current.last - 1;
            if !current.touches_midnight() && !run.touches_midnight() && quiet_hours <= max_gap_hours {
                debug!(quiet_hours, "merging adjacent periods");
                current.last = run.last;
                current.peak = current.peak.max(run.peak);
                continue;
            }
        }
        merged.push(run);
    }
    merged
}

fn emit(periods: &mut Vec<ActivePeriod>, run: Run, intensity: f64, gap: f64) {
    let period = |start: f64, end: f64| ActivePeriod {
        start,
        end,
        intensity,
        first_hour: run.first,
        last_hour: run.last,
    };

    let mut start = run.first as f64 / HOURS_PER_DAY as f64;
    let mut end = (run.last + 1) as f64 / HOURS_PER_DAY as f64;

    if run.first == 0 && run.last == LAST_HOUR {
        if gap > 0.0 {
            // both halves meet at midday so neither crosses the break
            periods.push(period(gap, 0.5));
            periods.push(period(0.5, 1.0 - gap));
        } else {
            periods.push(period(0.0, 1.0));
        }
        return;
    }

    if run.first == 0 {
        start += gap;
    }
    if run.last == LAST_HOUR {
        end -= gap;
    }

    if end > start {
        periods.push(period(start, end));
    } else {
        debug!(first = run.first, last = run.last, "period swallowed by midnight gap");
    }
}

/// The period containing `position`, if any
#[must_use]
pub fn active_period_at(periods: &[ActivePeriod], position: TimePosition) -> Option<&ActivePeriod> {
    periods.iter().find(|period| period.contains(position))
}

/// Whether moving from `previous` to `current` entered or left an active period.
/// With no previous position nothing has been crossed yet.
#[must_use]
pub fn crossed_boundary(
    periods: &[ActivePeriod],
    previous: Option<TimePosition>,
    current: TimePosition,
) -> bool {
    match previous {
        Some(previous) => {
            active_period_at(periods, previous).is_some() != active_period_at(periods, current).is_some()
        }
        None => false,
    }
}
