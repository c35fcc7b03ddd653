//! # Visibility function
//!
//! Composition of the propagator and the topocentric transform into the
//! scalar function `elevation(t)` whose sign changes and local maxima the
//! pass search exploits. Stateless; every call is a fresh evaluation.

use crate::constants::{Degree, MJD};
use crate::elements::OrbitalElements;
use crate::observer::Observer;
use crate::propagation::propagate;
use crate::ref_frame::{to_topocentric, LookAngles};
use crate::satpass_errors::SatPassError;

/// Full topocentric look angles (azimuth, elevation, range) of the satellite
/// at instant `t` as seen from `observer`.
pub fn look_angles_at(
    elements: &OrbitalElements,
    observer: &Observer,
    t: MJD,
) -> Result<LookAngles, SatPassError> {
    let state = propagate(elements, t)?;
    Ok(to_topocentric(&state, observer))
}

/// Elevation of the satellite above the observer's horizon at instant `t`,
/// in degrees. The sign of `elevation_at - threshold` over time defines the
/// visibility intervals.
pub fn elevation_at(
    elements: &OrbitalElements,
    observer: &Observer,
    t: MJD,
) -> Result<Degree, SatPassError> {
    Ok(look_angles_at(elements, observer, t)?.elevation)
}

#[cfg(test)]
mod visibility_test {
    use super::*;

    fn leo_elements() -> OrbitalElements {
        OrbitalElements::new(
            60382.91517237,
            15.50352806,
            0.0005935,
            51.6415,
            174.6347,
            283.8887,
            64.7968,
            0.26601e-3,
        )
        .unwrap()
    }

    #[test]
    fn test_elevation_is_deterministic_and_bounded() {
        let elements = leo_elements();
        let observer = Observer::new(40.0, -105.0, 1600.0, None).unwrap();

        for k in 0..50 {
            let t = elements.epoch + k as f64 * 0.013;
            let first = elevation_at(&elements, &observer, t).unwrap();
            let second = elevation_at(&elements, &observer, t).unwrap();
            assert_eq!(first, second);
            assert!((-90.0..=90.0).contains(&first));
        }
    }

    #[test]
    fn test_elevation_matches_look_angles() {
        let elements = leo_elements();
        let observer = Observer::new(40.0, -105.0, 1600.0, None).unwrap();
        let t = elements.epoch + 0.21;

        let elevation = elevation_at(&elements, &observer, t).unwrap();
        let look = look_angles_at(&elements, &observer, t).unwrap();
        assert_eq!(elevation, look.elevation);
        assert!(look.range > 0.0);
        assert!((0.0..360.0).contains(&look.azimuth));
    }
}
