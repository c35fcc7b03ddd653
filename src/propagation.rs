//! # Orbital state propagator
//!
//! Two-body propagation of a Keplerian element set, corrected for the
//! secular drift the Earth's oblateness (J2) imposes on the node, the
//! perigee and the mean anomaly. This is the mean-element model behind every
//! elevation evaluation of the pass search.
//!
//! The model is deterministic and valid for any time offset from the element
//! epoch, but its accuracy degrades as the offset grows: short-period
//! perturbations and drag are not modelled, so predictions from element sets
//! older than a few days drift by whole minutes along track. Callers are
//! expected to check [`crate::elements::OrbitalElements::is_stale`] and flag
//! the results accordingly.

use nalgebra::Vector3;

use crate::constants::{
    Kilometer, KilometerPerSecond, EARTH_EQUATORIAL_RADIUS, GM_EARTH, J2_EARTH, MJD,
    SECONDS_PER_DAY,
};
use crate::elements::OrbitalElements;
use crate::kepler::{eccentric_to_true_anomaly, principal_angle, solve_kepler_equation};
use crate::ref_frame::rotmt;
use crate::satpass_errors::SatPassError;

/// Position and velocity of a satellite at a given instant, in the
/// Earth-centered inertial frame. Produced by [`propagate`], never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    /// Instant of the state (MJD, UTC)
    pub epoch: MJD,
    /// Position in kilometers
    pub position: Vector3<Kilometer>,
    /// Velocity in kilometers per second
    pub velocity: Vector3<KilometerPerSecond>,
}

/// Propagate an element set to instant `t` (MJD, UTC).
///
/// The osculating anomalies are advanced by the mean motion and the J2
/// secular rates, the Kepler equation is solved for the eccentric anomaly,
/// and the perifocal state is rotated into the inertial frame through the
/// node, inclination and perigee angles.
///
/// Arguments
/// ---------
/// * `elements`: the element set to propagate (validated on entry)
/// * `t`: target instant, MJD UTC; may be arbitrarily far from the element
///   epoch (accuracy degrades, see the module doc)
///
/// Return
/// ------
/// * the inertial [`StateVector`] at `t`, or [`SatPassError::InvalidElements`] /
///   [`SatPassError::RootFinding`]
pub fn propagate(elements: &OrbitalElements, t: MJD) -> Result<StateVector, SatPassError> {
    elements.validate()?;

    let dt = (t - elements.epoch) * SECONDS_PER_DAY;

    let n = elements.mean_motion_rad_s();
    let a = elements.semi_major_axis();
    let ecc = elements.eccentricity;
    let inc = elements.inclination;

    // First-order secular J2 rates on node, perigee and mean anomaly (rad/s)
    let one_min_e2 = 1.0 - ecc * ecc;
    let p_ratio = EARTH_EQUATORIAL_RADIUS / (a * one_min_e2);
    let j2_factor = 1.5 * J2_EARTH * p_ratio * p_ratio * n;
    let cos_i = inc.cos();

    let raan_rate = -j2_factor * cos_i;
    let arg_perigee_rate = j2_factor * (2.5 * cos_i * cos_i - 0.5);
    let mean_anomaly_rate = j2_factor * one_min_e2.sqrt() * (1.5 * cos_i * cos_i - 0.5);

    let mean_anomaly = principal_angle(elements.mean_anomaly + (n + mean_anomaly_rate) * dt);
    let raan = principal_angle(elements.ascending_node_longitude + raan_rate * dt);
    let arg_perigee = principal_angle(elements.periapsis_argument + arg_perigee_rate * dt);

    let ecc_anomaly = solve_kepler_equation(mean_anomaly, ecc)?;
    let true_anomaly = eccentric_to_true_anomaly(ecc_anomaly, ecc);

    // Perifocal state
    let r = a * (1.0 - ecc * ecc_anomaly.cos());
    let position_pqw = Vector3::new(r * true_anomaly.cos(), r * true_anomaly.sin(), 0.0);

    let v_factor = (GM_EARTH * a).sqrt() / r;
    let velocity_pqw = Vector3::new(
        -v_factor * ecc_anomaly.sin(),
        v_factor * one_min_e2.sqrt() * ecc_anomaly.cos(),
        0.0,
    );

    // Perifocal → inertial: R3(Ω) R1(i) R3(ω)
    let rot = rotmt(raan, 2) * rotmt(inc, 0) * rotmt(arg_perigee, 2);

    Ok(StateVector {
        epoch: t,
        position: rot * position_pqw,
        velocity: rot * velocity_pqw,
    })
}
