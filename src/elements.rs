//! # Orbital element sets
//!
//! Two-line-element style Keplerian elements: the immutable input of the
//! propagator. Elements are constructed either directly from their numeric
//! values (angles in degrees, as element sets publish them) or parsed from a
//! TLE with [`OrbitalElements::from_tle`].
//!
//! An element set carries its own reference epoch. All propagation is
//! expressed as time since that epoch; accuracy degrades as the offset grows,
//! which is why [`OrbitalElements::is_stale`] exists — staleness is a
//! degraded-confidence flag, never an error.

use crate::constants::{Degree, Kilometer, Radian, Seconds, DPI, GM_EARTH, MJD, RADEG, SECONDS_PER_DAY};
use crate::satpass_errors::SatPassError;
use crate::time::tle_epoch_to_mjd;

/// Keplerian orbital elements of an Earth-orbiting satellite.
///
/// Units:
/// * `epoch`: MJD (Modified Julian Date, UTC)
/// * `mean_motion`: revolutions per day
/// * `eccentricity`: unitless, in [0, 1)
/// * `inclination`, `ascending_node_longitude`, `periapsis_argument`,
///   `mean_anomaly`: radians
/// * `drag_term`: B* drag coefficient in 1/earth-radii (carried as supplied,
///   not used by the two-body + J2 secular model)
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalElements {
    pub epoch: MJD,
    pub mean_motion: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub mean_anomaly: Radian,
    pub drag_term: f64,
}

impl OrbitalElements {
    /// Build an element set from its published values, angles in degrees.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: element set epoch (MJD, UTC)
    /// * `mean_motion`: revolutions per day, must be strictly positive
    /// * `eccentricity`: unitless, must be in [0, 1)
    /// * `inclination_deg`, `raan_deg`, `arg_perigee_deg`, `mean_anomaly_deg`: degrees
    /// * `drag_term`: B* coefficient as supplied
    ///
    /// Return
    /// ------
    /// * the validated element set, or [`SatPassError::InvalidElements`]
    pub fn new(
        epoch: MJD,
        mean_motion: f64,
        eccentricity: f64,
        inclination_deg: Degree,
        raan_deg: Degree,
        arg_perigee_deg: Degree,
        mean_anomaly_deg: Degree,
        drag_term: f64,
    ) -> Result<Self, SatPassError> {
        let elements = OrbitalElements {
            epoch,
            mean_motion,
            eccentricity,
            inclination: inclination_deg * RADEG,
            ascending_node_longitude: raan_deg * RADEG,
            periapsis_argument: arg_perigee_deg * RADEG,
            mean_anomaly: mean_anomaly_deg * RADEG,
            drag_term,
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Check the physical validity of the element set.
    ///
    /// The propagator only supports bound elliptic orbits: eccentricity must
    /// lie in [0, 1) and the mean motion must be strictly positive (a
    /// non-positive mean motion means a decayed or unphysical orbit with no
    /// stable propagation).
    pub fn validate(&self) -> Result<(), SatPassError> {
        if !self.eccentricity.is_finite() || !(0.0..1.0).contains(&self.eccentricity) {
            return Err(SatPassError::InvalidElements(format!(
                "eccentricity {} outside [0, 1)",
                self.eccentricity
            )));
        }
        if !self.mean_motion.is_finite() || self.mean_motion <= 0.0 {
            return Err(SatPassError::InvalidElements(format!(
                "non-positive mean motion {} rev/day",
                self.mean_motion
            )));
        }
        if !(0.0..=std::f64::consts::PI).contains(&self.inclination) {
            return Err(SatPassError::InvalidElements(format!(
                "inclination {} rad outside [0, π]",
                self.inclination
            )));
        }
        if !self.epoch.is_finite() {
            return Err(SatPassError::InvalidElements(
                "non-finite epoch".to_string(),
            ));
        }
        Ok(())
    }

    /// Mean motion in radians per second.
    pub fn mean_motion_rad_s(&self) -> f64 {
        self.mean_motion * DPI / SECONDS_PER_DAY
    }

    /// Semi-major axis in kilometers, from the mean motion via Kepler's third law.
    pub fn semi_major_axis(&self) -> Kilometer {
        let n = self.mean_motion_rad_s();
        (GM_EARTH / (n * n)).cbrt()
    }

    /// Orbital period in seconds.
    pub fn orbital_period(&self) -> Seconds {
        SECONDS_PER_DAY / self.mean_motion
    }

    /// Signed age of the element set at instant `t`, in days.
    /// Negative for predictions before the epoch.
    pub fn age_at(&self, t: MJD) -> f64 {
        t - self.epoch
    }

    /// Whether the element set is older than `bound_days` at instant `t`.
    ///
    /// Mean-element propagation error compounds with the element age; past
    /// the bound the prediction still proceeds but results carry a
    /// degraded-confidence flag.
    pub fn is_stale(&self, t: MJD, bound_days: f64) -> bool {
        self.age_at(t).abs() > bound_days
    }

    /// Parse a NORAD two-line element set.
    ///
    /// Both lines are fixed-column records; the modulo-10 checksum in column
    /// 69 of each line is verified. The satellite name line (line 0) is not
    /// part of the input.
    ///
    /// Arguments
    /// ---------
    /// * `line1`: TLE line 1 (`1 25544U 98067A   24077.91517237 ...`)
    /// * `line2`: TLE line 2 (`2 25544  51.6415 174.6347 0005935 ...`)
    ///
    /// Return
    /// ------
    /// * the parsed, validated element set, or [`SatPassError::TleFormat`] /
    ///   [`SatPassError::InvalidElements`]
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self, SatPassError> {
        check_tle_line(line1, '1')?;
        check_tle_line(line2, '2')?;

        let epoch_year: u32 = tle_field(line1, 18, 20)?
            .parse()
            .map_err(|_| tle_error(line1, "epoch year"))?;
        let epoch_day: f64 = tle_field(line1, 20, 32)?
            .parse()
            .map_err(|_| tle_error(line1, "epoch day"))?;
        let drag_term = parse_tle_exponent_field(tle_field(line1, 53, 61)?)
            .ok_or_else(|| tle_error(line1, "B* drag term"))?;

        let inclination_deg: f64 = tle_field(line2, 8, 16)?
            .parse()
            .map_err(|_| tle_error(line2, "inclination"))?;
        let raan_deg: f64 = tle_field(line2, 17, 25)?
            .parse()
            .map_err(|_| tle_error(line2, "RAAN"))?;
        let eccentricity: f64 = format!("0.{}", tle_field(line2, 26, 33)?)
            .parse()
            .map_err(|_| tle_error(line2, "eccentricity"))?;
        let arg_perigee_deg: f64 = tle_field(line2, 34, 42)?
            .parse()
            .map_err(|_| tle_error(line2, "argument of perigee"))?;
        let mean_anomaly_deg: f64 = tle_field(line2, 43, 51)?
            .parse()
            .map_err(|_| tle_error(line2, "mean anomaly"))?;
        let mean_motion: f64 = tle_field(line2, 52, 63)?
            .parse()
            .map_err(|_| tle_error(line2, "mean motion"))?;

        OrbitalElements::new(
            tle_epoch_to_mjd(epoch_year, epoch_day),
            mean_motion,
            eccentricity,
            inclination_deg,
            raan_deg,
            arg_perigee_deg,
            mean_anomaly_deg,
            drag_term,
        )
    }
}

/// Extract a trimmed column range from a TLE line.
fn tle_field(line: &str, start: usize, end: usize) -> Result<&str, SatPassError> {
    line.get(start..end)
        .map(str::trim)
        .ok_or_else(|| SatPassError::TleFormat(format!("line too short: {line:?}")))
}

fn tle_error(line: &str, field: &str) -> SatPassError {
    SatPassError::TleFormat(format!("unparseable {field} in {line:?}"))
}

/// Verify line number, length and the NORAD modulo-10 checksum of a TLE line.
fn check_tle_line(line: &str, expected_number: char) -> Result<(), SatPassError> {
    if !line.is_ascii() || line.len() < 69 {
        return Err(SatPassError::TleFormat(format!(
            "line shorter than 69 ASCII columns: {line:?}"
        )));
    }
    if line.chars().next() != Some(expected_number) {
        return Err(SatPassError::TleFormat(format!(
            "expected line number {expected_number}: {line:?}"
        )));
    }

    // Digits count as their value, minus signs count as 1, all else as 0
    let sum: u32 = line[..68]
        .chars()
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum();
    let checksum = line[68..69]
        .parse::<u32>()
        .map_err(|_| SatPassError::TleFormat(format!("non-numeric checksum: {line:?}")))?;
    if sum % 10 != checksum {
        return Err(SatPassError::TleFormat(format!(
            "checksum mismatch ({} expected, {} found): {line:?}",
            sum % 10,
            checksum
        )));
    }
    Ok(())
}

/// Parse a TLE assumed-decimal-point exponent field (e.g. ` 26601-3` → 0.26601e-3).
fn parse_tle_exponent_field(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0.0);
    }

    let (sign, rest) = match field.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, field.strip_prefix('+').unwrap_or(field)),
    };

    // The exponent sign sits right before the last digit
    let exp_pos = rest.rfind(['-', '+'])?;
    let mantissa: f64 = format!("0.{}", &rest[..exp_pos]).parse().ok()?;
    let exponent: i32 = rest[exp_pos..].parse().ok()?;

    Some(sign * mantissa * 10f64.powi(exponent))
}

#[cfg(test)]
mod elements_test {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   24077.91517237  .00014720  00000+0  26601-3 0  9996";
    const ISS_LINE2: &str =
        "2 25544  51.6415 174.6347 0005935 283.8887  64.7968 15.50352806440713";

    #[test]
    fn test_from_tle_iss() {
        let elements = OrbitalElements::from_tle(ISS_LINE1, ISS_LINE2).unwrap();

        assert_eq!(elements.mean_motion, 15.50352806);
        assert_eq!(elements.eccentricity, 0.0005935);
        assert!((elements.inclination - 51.6415 * RADEG).abs() < 1e-15);
        assert!((elements.ascending_node_longitude - 174.6347 * RADEG).abs() < 1e-15);
        assert!((elements.periapsis_argument - 283.8887 * RADEG).abs() < 1e-15);
        assert!((elements.mean_anomaly - 64.7968 * RADEG).abs() < 1e-15);
        assert!((elements.drag_term - 0.26601e-3).abs() < 1e-12);

        // Epoch: 2024 day 77.91517237
        let expected_epoch = tle_epoch_to_mjd(24, 77.91517237);
        assert_eq!(elements.epoch, expected_epoch);

        // ~92.9 minute LEO period, ~6800 km semi-major axis
        assert!((elements.orbital_period() - 5572.0).abs() < 5.0);
        assert!((elements.semi_major_axis() - 6796.0).abs() < 10.0);
    }

    #[test]
    fn test_checksum_accepts_valid_lines() {
        // Mod-10 over the first 68 columns, '-' counting as 1
        check_tle_line(ISS_LINE1, '1').unwrap();
        check_tle_line(ISS_LINE2, '2').unwrap();
    }

    #[test]
    fn test_from_tle_rejects_corruption() {
        // Wrong line number
        assert!(matches!(
            OrbitalElements::from_tle(ISS_LINE2, ISS_LINE2),
            Err(SatPassError::TleFormat(_))
        ));

        // Truncated line
        assert!(matches!(
            OrbitalElements::from_tle(&ISS_LINE1[..40], ISS_LINE2),
            Err(SatPassError::TleFormat(_))
        ));

        // Flipped digit breaks the checksum
        let corrupted = ISS_LINE2.replacen("51.6415", "51.6416", 1);
        assert!(matches!(
            OrbitalElements::from_tle(ISS_LINE1, &corrupted),
            Err(SatPassError::TleFormat(_))
        ));
    }

    #[test]
    fn test_validate_rejects_hyperbolic() {
        let result = OrbitalElements::new(60382.0, 15.5, 1.2, 51.6, 0.0, 0.0, 0.0, 0.0);
        assert!(matches!(result, Err(SatPassError::InvalidElements(_))));
    }

    #[test]
    fn test_validate_rejects_decayed() {
        let result = OrbitalElements::new(60382.0, 0.0, 0.001, 51.6, 0.0, 0.0, 0.0, 0.0);
        assert!(matches!(result, Err(SatPassError::InvalidElements(_))));

        let result = OrbitalElements::new(60382.0, -2.0, 0.001, 51.6, 0.0, 0.0, 0.0, 0.0);
        assert!(matches!(result, Err(SatPassError::InvalidElements(_))));
    }

    #[test]
    fn test_staleness() {
        let elements =
            OrbitalElements::new(60382.0, 15.5, 0.0005935, 51.6, 0.0, 0.0, 0.0, 0.0).unwrap();

        assert!(!elements.is_stale(60383.0, 3.0));
        assert!(elements.is_stale(60386.5, 3.0));
        // Past predictions age symmetrically
        assert!(elements.is_stale(60378.0, 3.0));
        assert_eq!(elements.age_at(60385.0), 3.0);
    }

    #[test]
    fn test_exponent_field() {
        assert_eq!(parse_tle_exponent_field(" 26601-3"), Some(0.26601e-3));
        assert_eq!(parse_tle_exponent_field("-11606-4"), Some(-0.11606e-4));
        assert_eq!(parse_tle_exponent_field(" 00000+0"), Some(0.0));
        assert_eq!(parse_tle_exponent_field(""), Some(0.0));
        assert_eq!(parse_tle_exponent_field("garbage"), None);
    }
}
