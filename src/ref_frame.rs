//! # Reference frame transforms
//!
//! Rotations between the Earth-centered inertial frame the propagator works
//! in, the Earth-fixed frame the observer sits in, and the observer's local
//! horizon (topocentric) frame.
//!
//! The chain for the visibility geometry is:
//!
//! 1. inertial → Earth-fixed, a single rotation about the pole by the
//!    Greenwich Mean Sidereal Time ([`crate::time::gmst`]);
//! 2. difference with the observer's Earth-fixed position (geodetic
//!    parallax on the WGS-84 ellipsoid);
//! 3. Earth-fixed → local south-east-zenith axes, from which azimuth,
//!    elevation and slant range follow.
//!
//! Polar motion, nutation and precession are ignored: they move the frame by
//! arcseconds, far below the accuracy of mean-element propagation.

use nalgebra::{Matrix3, Rotation3, Vector3};

use std::f64::consts::FRAC_PI_2;

use crate::constants::{
    Degree, Kilometer, Meter, EARTH_EQUATORIAL_RADIUS, EARTH_POLAR_RADIUS, RADEG,
};
use crate::observer::Observer;
use crate::propagation::StateVector;
use crate::time::gmst;

/// Horizontal projection below which the azimuth is considered degenerate (km).
const ZENITH_EPS: f64 = 1e-9;

/// Topocentric look angles of a satellite as seen from an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    /// Compass bearing from true north, clockwise, [0, 360) degrees.
    /// By convention 0.0 when the satellite is at the zenith (azimuth degenerate).
    pub azimuth: Degree,
    /// Angle above the local horizontal plane, [-90, 90] degrees
    pub elevation: Degree,
    /// Slant range in kilometers
    pub range: Kilometer,
}

/// Rotation matrix of an angle `alpha` (radians) around axis `k`
/// (0 = x, 1 = y, 2 = z).
pub(crate) fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Convert geodetic latitude and height into geocentric parallax coordinates.
///
/// Arguments
/// ---------
/// * `lat`: observer geodetic latitude in degrees
/// * `height`: observer ellipsoidal height in meters
///
/// Return
/// ------
/// * `rho_cos_phi`: normalized radius of the observer projected on the equatorial plane
/// * `rho_sin_phi`: normalized radius of the observer projected on the polar axis,
///
/// both in units of the Earth equatorial radius.
pub(crate) fn geodetic_to_parallax(lat: Degree, height: Meter) -> (f64, f64) {
    let lat_rad = lat * RADEG;
    let height_km = height / 1000.0;

    let axis_ratio = EARTH_POLAR_RADIUS / EARTH_EQUATORIAL_RADIUS;
    let u = (lat_rad.sin() * axis_ratio).atan2(lat_rad.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height_km / EARTH_EQUATORIAL_RADIUS) * lat_rad.sin();
    let rho_cos_phi = u.cos() + (height_km / EARTH_EQUATORIAL_RADIUS) * lat_rad.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Earth-fixed position of an observer, in kilometers.
pub(crate) fn observer_ecef(observer: &Observer) -> Vector3<f64> {
    let lon_rad = observer.longitude * RADEG;

    Vector3::new(
        EARTH_EQUATORIAL_RADIUS * observer.rho_cos_phi * lon_rad.cos(),
        EARTH_EQUATORIAL_RADIUS * observer.rho_cos_phi * lon_rad.sin(),
        EARTH_EQUATORIAL_RADIUS * observer.rho_sin_phi,
    )
}

/// Rotate an inertial-frame vector into the Earth-fixed frame at instant `tjm`.
pub(crate) fn inertial_to_ecef(position: &Vector3<f64>, tjm: f64) -> Vector3<f64> {
    rotmt(-gmst(tjm), 2) * position
}

/// Topocentric look angles of an inertial state as seen from `observer` at
/// the state's own epoch.
///
/// The inertial position is rotated into the Earth-fixed frame by the sidereal
/// angle, differenced with the observer position, and expressed in the local
/// south-east-zenith axes:
///
/// * elevation = asin(zenith component / range), in [-90, 90] degrees;
/// * azimuth = atan2(east, north), normalized to [0, 360) degrees.
///
/// Near the zenith the azimuth direction is undefined; when the horizontal
/// projection of the range vector falls below numerical epsilon the azimuth
/// is reported as 0.0 (never NaN).
pub fn to_topocentric(state: &StateVector, observer: &Observer) -> LookAngles {
    let sat_ecef = inertial_to_ecef(&state.position, state.epoch);
    let range_ecef = sat_ecef - observer_ecef(observer);

    // Earth-fixed → south-east-zenith: rotate by the longitude about the
    // pole, then tip the zenith axis onto the site latitude
    let lat_rad = observer.latitude * RADEG;
    let lon_rad = observer.longitude * RADEG;
    let sez = rotmt(-(FRAC_PI_2 - lat_rad), 1) * rotmt(-lon_rad, 2) * range_ecef;

    let range = sez.norm();
    // Clamp against rounding drift past ±1 when the satellite sits at the
    // zenith or nadir
    let elevation = (sez.z / range).clamp(-1.0, 1.0).asin() / RADEG;

    let horizontal = (sez.x * sez.x + sez.y * sez.y).sqrt();
    let azimuth = if horizontal < ZENITH_EPS {
        0.0
    } else {
        // North component is -S in the SEZ triad
        (sez.y.atan2(-sez.x) / RADEG).rem_euclid(360.0)
    };

    LookAngles {
        azimuth,
        elevation,
        range,
    }
}

#[cfg(test)]
mod ref_frame_test {
    use super::*;
    use crate::constants::DPI;

    fn state(position: Vector3<f64>, epoch: f64) -> StateVector {
        StateVector {
            epoch,
            position,
            velocity: Vector3::zeros(),
        }
    }

    #[test]
    fn test_rotmt_z_quarter_turn() {
        let rot = rotmt(std::f64::consts::FRAC_PI_2, 2);
        let v = rot * Vector3::x();
        assert!((v - Vector3::y()).norm() < 1e-15);
    }

    #[test]
    fn test_geodetic_to_parallax() {
        // latitude and height of Pan-STARRS 1, Haleakala
        let (pxy1, pz1) = geodetic_to_parallax(20.707233557, 3067.694);
        assert!((pxy1 - 0.9362410003211518).abs() < 1e-12);
        assert!((pz1 - 0.35154299856304305).abs() < 1e-12);
    }

    #[test]
    fn test_observer_ecef_equator() {
        let observer = Observer::new(0.0, 0.0, 0.0, None).unwrap();
        let ecef = observer_ecef(&observer);
        assert!((ecef - Vector3::new(EARTH_EQUATORIAL_RADIUS, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_zenith_pass_is_degenerate_not_nan() {
        // Satellite straight above a Greenwich-meridian equatorial site at an
        // instant when the sidereal angle is known
        let observer = Observer::new(0.0, 0.0, 0.0, None).unwrap();
        let tjm = 59215.0;
        let theta = gmst(tjm);

        // Place the satellite 400 km above the site, in inertial axes
        let r = EARTH_EQUATORIAL_RADIUS + 400.0;
        let inertial = rotmt(theta, 2) * Vector3::new(r, 0.0, 0.0);

        let look = to_topocentric(&state(inertial, tjm), &observer);
        assert!((look.elevation - 90.0).abs() < 1e-6);
        assert_eq!(look.azimuth, 0.0);
        assert!((look.range - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_cardinal_azimuths_from_equator() {
        let observer = Observer::new(0.0, 0.0, 0.0, None).unwrap();
        let tjm = 59215.0;
        let theta = gmst(tjm);
        let r = EARTH_EQUATORIAL_RADIUS;

        // A point 500 km due north of the site, slightly raised to keep it
        // above the horizon plane
        let ecef = Vector3::new(r, 0.0, 500.0);
        let inertial = rotmt(theta, 2) * ecef;
        let look = to_topocentric(&state(inertial, tjm), &observer);
        assert!((look.azimuth - 0.0).abs() < 1e-6 || (look.azimuth - 360.0).abs() < 1e-6);

        // Due east
        let ecef = Vector3::new(r, 500.0, 0.0);
        let inertial = rotmt(theta, 2) * ecef;
        let look = to_topocentric(&state(inertial, tjm), &observer);
        assert!((look.azimuth - 90.0).abs() < 1e-6);

        // Due south
        let ecef = Vector3::new(r, 0.0, -500.0);
        let inertial = rotmt(theta, 2) * ecef;
        let look = to_topocentric(&state(inertial, tjm), &observer);
        assert!((look.azimuth - 180.0).abs() < 1e-6);

        // Below the horizon plane: negative elevation, no crash
        let ecef = Vector3::new(r - 500.0, 0.0, 0.0);
        let inertial = rotmt(theta, 2) * ecef;
        let look = to_topocentric(&state(inertial, tjm), &observer);
        assert!(look.elevation < 0.0);
    }

    #[test]
    fn test_inertial_to_ecef_is_pure_rotation() {
        let position = Vector3::new(4000.0, -5000.0, 1000.0);
        for tjm in [51544.5, 59215.25, 60382.875] {
            let ecef = inertial_to_ecef(&position, tjm);
            assert!((ecef.norm() - position.norm()).abs() < 1e-9);
            assert!((ecef.z - position.z).abs() < 1e-12);
        }
        // One sidereal rotation earlier the angle differs by ~2π
        let g0 = gmst(59215.0);
        let g1 = gmst(59215.0 + 1.0);
        assert!(((g1 - g0).rem_euclid(DPI) - DPI * 0.00273790934).abs() < 1e-6);
    }
}
