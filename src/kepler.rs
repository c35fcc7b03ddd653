use std::f64::consts::PI;

use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::constants::{Radian, DPI};
use crate::satpass_errors::SatPassError;

/// Principal value of an angle in radians, reduced to [0, 2π).
pub(crate) fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// Solve the elliptic Kepler equation `E - e sin(E) = M` for the eccentric anomaly.
///
/// Uses Newton-Raphson iteration on the residual `R(E) = E - e sin(E) - M`,
/// started from the mean anomaly (a good seed for the low eccentricities of
/// Earth-orbiting satellites).
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly M in radians
/// * `eccentricity`: orbital eccentricity, must be in [0, 1)
///
/// Return
/// ------
/// * the eccentric anomaly E in radians, or a [`SatPassError::RootFinding`]
///   if the iteration does not converge.
pub(crate) fn solve_kepler_equation(
    mean_anomaly: Radian,
    eccentricity: f64,
) -> Result<Radian, SatPassError> {
    let m = principal_angle(mean_anomaly);

    // Residual R(E) and its derivative R'(E)
    let f = |e_anom: f64| -> f64 { e_anom - eccentricity * e_anom.sin() - m };
    let df = |e_anom: f64| -> f64 { 1.0 - eccentricity * e_anom.cos() };

    // Seed with M, nudged toward π for strongly eccentric orbits where the
    // Newton step from M can oscillate
    let x0 = if eccentricity > 0.8 { PI } else { m };

    let mut tol = SimpleConvergency {
        eps: f64::EPSILON * 1e2, // ~2e-14
        max_iter: 50,
    };

    Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
}

/// True anomaly from the eccentric anomaly, via the half-angle identity
/// (numerically robust for all quadrants).
pub(crate) fn eccentric_to_true_anomaly(eccentric_anomaly: Radian, eccentricity: f64) -> Radian {
    let half = eccentric_anomaly / 2.0;
    let nu = 2.0
        * ((1.0 + eccentricity).sqrt() * half.sin()).atan2((1.0 - eccentricity).sqrt() * half.cos());
    principal_angle(nu)
}
