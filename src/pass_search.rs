//! # Pass window search
//!
//! Bracket-and-refine search for the maximal intervals where the satellite's
//! elevation stays at or above a visibility threshold.
//!
//! The span is scanned at a coarse step derived from the orbital period
//! (period/100 by default, so a typical pass collects several samples); a
//! sign change of `elevation - threshold` between consecutive samples
//! brackets a rise or a set, which bisection then refines to the configured
//! time tolerance. Within each window a golden-section search locates the
//! transit (elevation is unimodal across one pass, barring pathological
//! geometries).
//!
//! Correctness assumption, not a guarantee: a grazing pass shorter than the
//! coarse step can fall between two samples and be missed. The default step
//! (period/100, clamped to [1 s, 120 s]) keeps that window well below the
//! duration of any observable pass of a low-Earth orbiter.

use hifitime::Epoch;
use itertools::Itertools;
use log::{debug, warn};

use crate::constants::{Degree, PassList, Seconds, MJD, SECONDS_PER_DAY};
use crate::elements::OrbitalElements;
use crate::observer::Observer;
use crate::passes::{assemble, WindowGeometry};
use crate::satpass_errors::SatPassError;
use crate::time::epoch_to_mjd;
use crate::visibility::{elevation_at, look_angles_at};

/// Hard cap on the number of coarse samples of one search; spans that would
/// exceed it are scanned with a widened step (and a warning).
const MAX_COARSE_STEPS: usize = 2_000_000;

/// Bisection iterations comfortably past any achievable time tolerance.
const MAX_BISECTIONS: usize = 60;

const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Tunable parameters of one pass search. All configuration is explicit — no
/// global state; defaults are engineering choices, not extracted requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Visibility threshold in degrees of elevation (default 10°)
    pub min_elevation_deg: Degree,
    /// Coarse sampling step; `None` derives it from the orbital period
    /// (period/100, clamped to [1 s, 120 s])
    pub coarse_step: Option<Seconds>,
    /// Time tolerance of the refined rise/transit/set instants (default 1 s)
    pub refine_tolerance: Seconds,
    /// Element age beyond which results are flagged as degraded (default 3 days)
    pub staleness_bound_days: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_elevation_deg: 10.0,
            coarse_step: None,
            refine_tolerance: 1.0,
            staleness_bound_days: 3.0,
        }
    }
}

impl SearchConfig {
    /// Effective coarse step in seconds for the given element set.
    pub fn coarse_step_for(&self, elements: &OrbitalElements) -> Seconds {
        self.coarse_step
            .unwrap_or_else(|| (elements.orbital_period() / 100.0).clamp(1.0, 120.0))
    }
}

/// Find all passes of `elements` over `observer` within `[start, end]`.
///
/// Passes already in progress at `start` are included, truncated at `start`
/// (the rise instant and azimuth are evaluated there); passes still in
/// progress at `end` are truncated symmetrically. A satellite that never
/// rises above the threshold yields an empty list, not an error.
///
/// Arguments
/// ---------
/// * `elements`: the element set to search (validated on entry)
/// * `observer`: the ground site
/// * `start`, `end`: search span; an empty or inverted span yields an empty list
/// * `config`: thresholds and tolerances, see [`SearchConfig`]
///
/// Return
/// ------
/// * the passes in ascending order of start time (the scan proceeds forward
///   in time, so no separate sort is needed)
pub fn find_passes(
    elements: &OrbitalElements,
    observer: &Observer,
    start: Epoch,
    end: Epoch,
    config: &SearchConfig,
) -> Result<PassList, SatPassError> {
    elements.validate()?;

    let mut passes = PassList::new();
    let t0 = epoch_to_mjd(start);
    let t1 = epoch_to_mjd(end);
    if t1 <= t0 {
        return Ok(passes);
    }

    let degraded = elements.is_stale(t0, config.staleness_bound_days)
        || elements.is_stale(t1, config.staleness_bound_days);
    if degraded {
        warn!(
            "element set is {:.1} days from epoch within the span (bound {} days), flagging results",
            span_age(elements, t0, t1),
            config.staleness_bound_days
        );
    }

    let mut step = config.coarse_step_for(elements) / SECONDS_PER_DAY;
    let span = t1 - t0;
    if span / step > MAX_COARSE_STEPS as f64 {
        step = span / MAX_COARSE_STEPS as f64;
        warn!(
            "span of {span:.1} days exceeds the sample cap, widening coarse step to {:.1} s",
            step * SECONDS_PER_DAY
        );
    }
    let tolerance = (config.refine_tolerance / SECONDS_PER_DAY).max(1e-3 / SECONDS_PER_DAY);
    let threshold = config.min_elevation_deg;

    // Coarse sampling of elevation - threshold over the whole span
    let n_steps = (span / step).ceil() as usize;
    let samples: Vec<(MJD, f64)> = (0..=n_steps)
        .map(|k| {
            let t = (t0 + k as f64 * step).min(t1);
            elevation_at(elements, observer, t).map(|elev| (t, elev - threshold))
        })
        .collect::<Result<_, _>>()?;

    // A pass already in progress at the first sample starts at t0
    let mut open_rise: Option<MJD> = (samples[0].1 > 0.0).then_some(t0);

    for ((t_prev, f_prev), (t_next, f_next)) in samples.iter().copied().tuple_windows() {
        let was_above = f_prev > 0.0;
        let is_above = f_next > 0.0;

        if !was_above && is_above {
            let rise = refine_crossing(elements, observer, threshold, t_prev, t_next, tolerance)?;
            debug!("rise bracketed in [{t_prev:.6}, {t_next:.6}], refined to {rise:.8}");
            open_rise = Some(rise);
        } else if was_above && !is_above {
            let set = refine_crossing(elements, observer, threshold, t_prev, t_next, tolerance)?;
            debug!("set bracketed in [{t_prev:.6}, {t_next:.6}], refined to {set:.8}");
            if let Some(rise) = open_rise.take() {
                close_window(
                    elements, observer, rise, set, tolerance, degraded, &mut passes,
                )?;
            }
        }
    }

    // Pass still in progress at the end of the span: truncate at t1
    if let Some(rise) = open_rise.take() {
        close_window(
            elements, observer, rise, t1, tolerance, degraded, &mut passes,
        )?;
    }

    Ok(passes)
}

/// Largest absolute element-set age reached over `[t0, t1]`, in days. The
/// extremum sits at an endpoint since the age is linear in time.
fn span_age(elements: &OrbitalElements, t0: MJD, t1: MJD) -> f64 {
    f64::max(elements.age_at(t0).abs(), elements.age_at(t1).abs())
}

/// Refine one bracketed window into a [`crate::passes::Pass`] and append it.
/// Windows shorter than the refine tolerance are discarded as numerical noise.
fn close_window(
    elements: &OrbitalElements,
    observer: &Observer,
    rise: MJD,
    set: MJD,
    tolerance: f64,
    degraded: bool,
    passes: &mut PassList,
) -> Result<(), SatPassError> {
    if set - rise < tolerance {
        debug!("discarding sub-tolerance window [{rise:.8}, {set:.8}]");
        return Ok(());
    }

    let mut transit = refine_transit(elements, observer, rise, set, tolerance)?;

    let at_rise = look_angles_at(elements, observer, rise)?;
    let mut at_transit = look_angles_at(elements, observer, transit)?;
    let at_set = look_angles_at(elements, observer, set)?;

    // A window truncated at the span boundary can peak exactly on that
    // boundary, one tolerance outside the golden-section interior
    if at_rise.elevation > at_transit.elevation {
        transit = rise;
        at_transit = at_rise;
    }
    if at_set.elevation > at_transit.elevation {
        transit = set;
        at_transit = at_set;
    }

    let pass = assemble(
        WindowGeometry {
            rise,
            transit,
            set,
            rise_azimuth: at_rise.azimuth,
            set_azimuth: at_set.azimuth,
            rise_elevation: at_rise.elevation,
            set_elevation: at_set.elevation,
            transit_elevation: at_transit.elevation,
        },
        degraded,
    )?;
    passes.push(pass);
    Ok(())
}

/// Bisect the threshold crossing of the elevation inside `[lo, hi]` down to
/// `tolerance` (days). The bracket must hold a sign change of
/// `elevation - threshold`.
fn refine_crossing(
    elements: &OrbitalElements,
    observer: &Observer,
    threshold: Degree,
    mut lo: MJD,
    mut hi: MJD,
    tolerance: f64,
) -> Result<MJD, SatPassError> {
    let mut f_lo = elevation_at(elements, observer, lo)? - threshold;

    for _ in 0..MAX_BISECTIONS {
        if hi - lo <= tolerance {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let f_mid = elevation_at(elements, observer, mid)? - threshold;
        if (f_mid > 0.0) == (f_lo > 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}

/// Golden-section search for the elevation maximum inside `[lo, hi]`,
/// assuming the elevation is unimodal across one pass.
fn refine_transit(
    elements: &OrbitalElements,
    observer: &Observer,
    mut lo: MJD,
    mut hi: MJD,
    tolerance: f64,
) -> Result<MJD, SatPassError> {
    let mut c = hi - INV_PHI * (hi - lo);
    let mut d = lo + INV_PHI * (hi - lo);
    let mut f_c = elevation_at(elements, observer, c)?;
    let mut f_d = elevation_at(elements, observer, d)?;

    while hi - lo > tolerance {
        if f_c > f_d {
            hi = d;
            d = c;
            f_d = f_c;
            c = hi - INV_PHI * (hi - lo);
            f_c = elevation_at(elements, observer, c)?;
        } else {
            lo = c;
            c = d;
            f_c = f_d;
            d = lo + INV_PHI * (hi - lo);
            f_d = elevation_at(elements, observer, d)?;
        }
    }

    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod pass_search_test {
    use super::*;
    use crate::constants::RADEG;
    use crate::time::{gmst, mjd_to_epoch};

    const EPOCH: MJD = 60382.0;

    /// Circular equatorial orbit placed so the satellite sits exactly at the
    /// zenith of a (0°, 0°) observer at `EPOCH`: with e=0 and i=0 the inertial
    /// position angle is Ω + ω + M, so M is set to the sidereal angle.
    fn overhead_elements() -> OrbitalElements {
        let m_deg = gmst(EPOCH) / RADEG;
        OrbitalElements::new(EPOCH, 15.5, 0.0, 0.0, 0.0, 0.0, m_deg, 0.0).unwrap()
    }

    fn greenwich_observer() -> Observer {
        Observer::new(0.0, 0.0, 0.0, None).unwrap()
    }

    #[test]
    fn test_empty_span_yields_no_passes() {
        let elements = overhead_elements();
        let observer = greenwich_observer();
        let t = mjd_to_epoch(EPOCH);

        let passes =
            find_passes(&elements, &observer, t, t, &SearchConfig::default()).unwrap();
        assert!(passes.is_empty());

        let inverted = find_passes(
            &elements,
            &observer,
            t,
            mjd_to_epoch(EPOCH - 1.0),
            &SearchConfig::default(),
        )
        .unwrap();
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_span_age_reports_magnitude() {
        let elements = overhead_elements();

        // Future span: the far endpoint dominates
        assert_eq!(span_age(&elements, EPOCH + 1.0, EPOCH + 4.0), 4.0);
        // Past-prediction span: ages are negative, the magnitude is reported
        assert_eq!(span_age(&elements, EPOCH - 5.0, EPOCH - 2.0), 5.0);
        // Span straddling the epoch
        assert_eq!(span_age(&elements, EPOCH - 1.0, EPOCH + 3.0), 3.0);
    }

    #[test]
    fn test_unreachable_geometry_yields_empty_list() {
        // Equatorial orbit seen from a near-polar site: the satellite never
        // clears the horizon, let alone the threshold
        let elements = overhead_elements();
        let observer = Observer::new(89.0, 0.0, 0.0, None).unwrap();

        let passes = find_passes(
            &elements,
            &observer,
            mjd_to_epoch(EPOCH),
            mjd_to_epoch(EPOCH + 1.0),
            &SearchConfig::default(),
        )
        .unwrap();
        assert!(passes.is_empty());
    }

    #[test]
    fn test_pass_in_progress_at_start_is_truncated() {
        let elements = overhead_elements();
        let observer = greenwich_observer();
        let start = mjd_to_epoch(EPOCH);
        let end = mjd_to_epoch(EPOCH + 0.02);

        let passes =
            find_passes(&elements, &observer, start, end, &SearchConfig::default()).unwrap();
        assert_eq!(passes.len(), 1);

        let pass = &passes[0];
        assert!((pass.start_time - start).abs() < hifitime::Duration::from_seconds(0.001));
        // Overhead at the start instant, so the peak sits essentially there
        assert!(pass.max_elevation > 80.0);
        assert!(pass.duration > 30.0 && pass.duration < 600.0);
    }

    #[test]
    fn test_pass_in_progress_at_end_is_truncated() {
        let elements = overhead_elements();
        let observer = greenwich_observer();
        // The span ends at the overhead instant; the satellite is above the
        // threshold for the whole short span
        let start = mjd_to_epoch(EPOCH - 0.001);
        let end = mjd_to_epoch(EPOCH);

        let passes =
            find_passes(&elements, &observer, start, end, &SearchConfig::default()).unwrap();
        assert_eq!(passes.len(), 1);

        let pass = &passes[0];
        assert!((pass.end_time - end).abs() < hifitime::Duration::from_seconds(0.001));
        assert!((pass.duration - 86.4).abs() < 1.0);
    }

    #[test]
    fn test_default_coarse_step_tracks_period() {
        let config = SearchConfig::default();

        let leo = overhead_elements();
        let step = config.coarse_step_for(&leo);
        assert!((step - leo.orbital_period() / 100.0).abs() < 1e-9);

        // A 24h-period orbit clamps at the 120 s ceiling
        let geo = OrbitalElements::new(EPOCH, 1.0027, 0.0, 0.1, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(config.coarse_step_for(&geo), 120.0);
    }

    #[test]
    fn test_explicit_coarse_step_is_honored() {
        let config = SearchConfig {
            coarse_step: Some(30.0),
            ..SearchConfig::default()
        };
        assert_eq!(config.coarse_step_for(&overhead_elements()), 30.0);
    }
}
