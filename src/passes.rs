//! # Pass windows
//!
//! The [`Pass`] record packages one visibility interval found by the search:
//! rise, transit (maximum elevation) and set instants with their azimuths,
//! the peak elevation, the duration, and the degraded-confidence flag carried
//! over from stale element sets.
//!
//! Field names and units match the presentation layer downstream: instants
//! serialize as ISO-8601 UTC strings, angles are degrees, the duration is
//! seconds.

use hifitime::Epoch;
use serde::{Serialize, Serializer};

use crate::constants::{Degree, Seconds};
use crate::satpass_errors::SatPassError;
use crate::time::mjd_to_epoch;

fn serialize_iso8601<S: Serializer>(epoch: &Epoch, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&epoch.to_isoformat())
}

/// One satellite pass over an observer. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    /// Rise instant (elevation crosses the threshold upward)
    #[serde(serialize_with = "serialize_iso8601")]
    pub start_time: Epoch,
    /// Transit instant (maximum elevation within the pass)
    #[serde(serialize_with = "serialize_iso8601")]
    pub max_elevation_time: Epoch,
    /// Set instant (elevation crosses the threshold downward)
    #[serde(serialize_with = "serialize_iso8601")]
    pub end_time: Epoch,
    /// Azimuth at rise, degrees clockwise from true north
    pub start_azimuth: Degree,
    /// Peak elevation at transit, degrees
    pub max_elevation: Degree,
    /// Azimuth at set, degrees clockwise from true north
    pub end_azimuth: Degree,
    /// end_time - start_time, in seconds
    pub duration: Seconds,
    /// True when the element set was older than the staleness bound anywhere
    /// in the searched span
    pub degraded_accuracy: bool,
}

/// Inputs of the pass assembler: the refined instants (MJD) and the geometry
/// sampled at each of them. Transient search state, consumed by [`assemble`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowGeometry {
    pub rise: f64,
    pub transit: f64,
    pub set: f64,
    pub rise_azimuth: Degree,
    pub set_azimuth: Degree,
    pub rise_elevation: Degree,
    pub set_elevation: Degree,
    pub transit_elevation: Degree,
}

/// Assemble a [`Pass`] from a refined window, validating the ordering
/// invariant first.
///
/// The checks guard against search-algorithm bugs (a bracketing or refinement
/// step returning instants out of order, or a transit below its endpoints);
/// they should never trigger in correct operation, and a violation surfaces
/// as [`SatPassError::InconsistentWindow`] rather than a silently wrong
/// record.
pub(crate) fn assemble(
    geometry: WindowGeometry,
    degraded_accuracy: bool,
) -> Result<Pass, SatPassError> {
    let WindowGeometry {
        rise,
        transit,
        set,
        rise_azimuth,
        set_azimuth,
        rise_elevation,
        set_elevation,
        transit_elevation,
    } = geometry;

    if !(rise <= transit && transit <= set) {
        return Err(SatPassError::InconsistentWindow(format!(
            "instants out of order: rise {rise}, transit {transit}, set {set}"
        )));
    }

    // Sub-tolerance wiggle at the endpoints is expected; anything beyond it
    // means the maximum search failed
    const ELEVATION_SLACK: Degree = 1e-3;
    if transit_elevation < rise_elevation - ELEVATION_SLACK
        || transit_elevation < set_elevation - ELEVATION_SLACK
    {
        return Err(SatPassError::InconsistentWindow(format!(
            "transit elevation {transit_elevation} below endpoints ({rise_elevation}, {set_elevation})"
        )));
    }

    Ok(Pass {
        start_time: mjd_to_epoch(rise),
        max_elevation_time: mjd_to_epoch(transit),
        end_time: mjd_to_epoch(set),
        start_azimuth: rise_azimuth,
        max_elevation: transit_elevation,
        end_azimuth: set_azimuth,
        duration: (set - rise) * crate::constants::SECONDS_PER_DAY,
        degraded_accuracy,
    })
}
