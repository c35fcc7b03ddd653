use hifitime::{Epoch, TimeScale};

use crate::constants::{DPI, MJD, T2000};

/// Convert a [`hifitime::Epoch`] to a Modified Julian Date (UTC days).
pub fn epoch_to_mjd(epoch: Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Convert a Modified Julian Date (UTC days) to a [`hifitime::Epoch`].
pub fn mjd_to_epoch(mjd: MJD) -> Epoch {
    Epoch::from_mjd_utc(mjd)
}

/// Convert a TLE epoch (two-digit year and fractional day of year) to MJD.
///
/// Two-digit years follow the NORAD convention: 57–99 map to 1957–1999,
/// 00–56 map to 2000–2056.
///
/// Arguments
/// ---------
/// * `year`: two-digit year as read from columns 19–20 of TLE line 1
/// * `day_of_year`: fractional day of year (1.0 = January 1, 00:00 UTC)
///
/// Return
/// ------
/// * the element set epoch as a Modified Julian Date (UTC days)
pub fn tle_epoch_to_mjd(year: u32, day_of_year: f64) -> MJD {
    let full_year = if year >= 57 { 1900 + year } else { 2000 + year };
    let jan1 = Epoch::from_gregorian(full_year as i32, 1, 1, 0, 0, 0, 0, TimeScale::UTC);
    jan1.to_mjd_utc_days() + (day_of_year - 1.0)
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula for the mean
/// sidereal time at 0h UT1, plus the fractional-day correction term due to
/// Earth's rotation rate. UTC is used as a stand-in for UT1; the sub-second
/// difference between the two scales is far below the angular accuracy of the
/// mean-element propagation feeding this rotation.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    // Integer MJD at 0h UT1 and Julian centuries since J2000.0
    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1 from the polynomial, converted from seconds to radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // Contribution of the fraction of the day, scaled by the sidereal rate
    let h = (tjm - itjm) * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}
