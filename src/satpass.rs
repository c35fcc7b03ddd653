//! # SatPass: satellite catalog and prediction façade
//!
//! This module defines the [`SatPass`] struct, the entry point that wires the
//! satellite catalog collaborator to the pass search engine:
//!
//! 1. **Catalog registry** — satellite metadata and element sets, registered
//!    from TLEs and looked up by identifier.
//! 2. **Prediction** — [`SatPass::passes_for`] resolves a satellite and runs
//!    [`crate::pass_search::find_passes`] over the requested span.
//!
//! The catalog is an explicit in-memory collaborator: the search engine never
//! touches it, and a missing identifier surfaces as
//! [`SatPassError::SatelliteNotFound`] at this boundary, not inside the core.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use hifitime::Epoch;
//! use satpass::observer::Observer;
//! use satpass::pass_search::SearchConfig;
//! use satpass::satpass::SatPass;
//!
//! let mut satpass = SatPass::new();
//! satpass.add_satellite_from_tle(
//!     "25544",
//!     "ISS (ZARYA)",
//!     Some("ISS".into()),
//!     "1 25544U 98067A   24077.91517237  .00014720  00000+0  26601-3 0  9996",
//!     "2 25544  51.6415 174.6347 0005935 283.8887  64.7968 15.50352806440713",
//! ).unwrap();
//!
//! let observer = Observer::new(40.0, -105.0, 1600.0, None).unwrap();
//! let start = Epoch::from_gregorian_utc(2024, 3, 18, 0, 0, 0, 0);
//! let end = Epoch::from_gregorian_utc(2024, 3, 19, 0, 0, 0, 0);
//! let passes = satpass
//!     .passes_for("25544", &observer, start, end, &SearchConfig::default())
//!     .unwrap();
//! ```

use std::collections::HashMap;

use hifitime::Epoch;
use log::{debug, info};
use serde::Serialize;

use crate::constants::{PassList, SatelliteId};
use crate::elements::OrbitalElements;
use crate::observer::Observer;
use crate::pass_search::{find_passes, SearchConfig};
use crate::satpass_errors::SatPassError;

/// One catalog entry: satellite metadata plus the element set and the raw
/// TLE lines it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteEntry {
    pub name: String,
    pub category: Option<String>,
    pub tle_line1: String,
    pub tle_line2: String,
    #[serde(skip)]
    pub elements: OrbitalElements,
}

/// Satellite catalog and prediction façade.
#[derive(Debug, Clone, Default)]
pub struct SatPass {
    catalog: HashMap<SatelliteId, SatelliteEntry>,
}

impl SatPass {
    pub fn new() -> Self {
        SatPass {
            catalog: HashMap::new(),
        }
    }

    /// Register a satellite from its TLE.
    ///
    /// Arguments
    /// ---------
    /// * `id`: catalog identifier (typically the NORAD number)
    /// * `name`: display name
    /// * `category`: optional grouping label (e.g. "Weather")
    /// * `line1`, `line2`: the two TLE lines
    ///
    /// Return
    /// ------
    /// * `Ok(())`, or a TLE/element validation error. Re-registering an
    ///   existing identifier replaces its entry (element sets are refreshed
    ///   as new TLEs arrive).
    pub fn add_satellite_from_tle(
        &mut self,
        id: &str,
        name: &str,
        category: Option<String>,
        line1: &str,
        line2: &str,
    ) -> Result<(), SatPassError> {
        let elements = OrbitalElements::from_tle(line1, line2)?;
        debug!(
            "registering {id} ({name}), epoch MJD {:.5}, {:.4} rev/day",
            elements.epoch, elements.mean_motion
        );

        let entry = SatelliteEntry {
            name: name.to_string(),
            category,
            tle_line1: line1.to_string(),
            tle_line2: line2.to_string(),
            elements,
        };
        self.catalog.insert(id.to_string(), entry);
        Ok(())
    }

    /// Look up a satellite by identifier.
    pub fn get_satellite(&self, id: &str) -> Option<&SatelliteEntry> {
        self.catalog.get(id)
    }

    /// Number of registered satellites.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Predict the passes of a cataloged satellite over `observer` within
    /// `[start, end]`.
    ///
    /// An unknown identifier is a caller-level precondition failure and
    /// surfaces as [`SatPassError::SatelliteNotFound`]; everything else is
    /// delegated to [`find_passes`].
    pub fn passes_for(
        &self,
        id: &str,
        observer: &Observer,
        start: Epoch,
        end: Epoch,
        config: &SearchConfig,
    ) -> Result<PassList, SatPassError> {
        let entry = self
            .get_satellite(id)
            .ok_or_else(|| SatPassError::SatelliteNotFound(id.to_string()))?;

        let passes = find_passes(&entry.elements, observer, start, end, config)?;
        info!(
            "{} ({id}): {} pass(es) over {} between {start} and {end}",
            entry.name,
            passes.len(),
            observer.name.as_deref().unwrap_or("observer"),
        );
        Ok(passes)
    }
}
