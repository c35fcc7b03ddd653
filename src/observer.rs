use crate::constants::{Degree, Meter};
use crate::ref_frame::geodetic_to_parallax;
use crate::satpass_errors::SatPassError;

/// A ground observer at a fixed geodetic location.
///
/// The geocentric parallax terms (ρ cos φ′, ρ sin φ′, in units of the Earth
/// equatorial radius) are precomputed at construction; together with the
/// longitude they define the observer's Earth-fixed position for the
/// topocentric transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    /// Geodetic latitude in degrees, north positive
    pub latitude: Degree,
    /// Longitude in degrees east of Greenwich
    pub longitude: Degree,
    /// Ellipsoidal height in meters (may be negative for below-sea-level sites)
    pub height: Meter,
    /// rho cos phi'
    pub rho_cos_phi: f64,
    /// rho sin phi'
    pub rho_sin_phi: f64,
    pub name: Option<String>,
}

impl Observer {
    /// Build an observer from geodetic coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `latitude`: geodetic latitude in degrees, must be in [-90, 90]
    /// * `longitude`: degrees east of Greenwich, must be in [-180, 360)
    ///   (both signed and 0–360 conventions are accepted)
    /// * `height`: ellipsoidal height in meters
    /// * `name`: optional site label, used in logs only
    ///
    /// Return
    /// ------
    /// * the observer, or [`SatPassError::InvalidObserver`] for out-of-range coordinates
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        height: Meter,
        name: Option<String>,
    ) -> Result<Observer, SatPassError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SatPassError::InvalidObserver(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..360.0).contains(&longitude) {
            return Err(SatPassError::InvalidObserver(format!(
                "longitude {longitude} outside [-180, 360)"
            )));
        }
        if !height.is_finite() {
            return Err(SatPassError::InvalidObserver(
                "non-finite height".to_string(),
            ));
        }

        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, height);
        Ok(Observer {
            latitude,
            longitude,
            height,
            rho_cos_phi,
            rho_sin_phi,
            name,
        })
    }
}
