//! # Constants and type definitions for satpass
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `satpass` library.
//!
//! ## Overview
//!
//! - Geophysical constants (WGS-84 Earth figure, gravitational parameter, J2)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds)
//! - Core type aliases used across the crate
//! - Container type for pass prediction results
//!
//! These definitions are used by all main modules, including propagation, frame
//! transforms and the pass window search.

use crate::passes::Pass;
use smallvec::SmallVec;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Earth equatorial radius in kilometers (WGS-84)
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378.137;

/// Earth polar radius in kilometers (WGS-84)
pub const EARTH_POLAR_RADIUS: f64 = 6_356.7523;

/// Earth gravitational parameter GM in km³/s² (WGS-84)
pub const GM_EARTH: f64 = 398_600.4418;

/// Second zonal harmonic of the Earth's gravity field (unnormalized)
pub const J2_EARTH: f64 = 1.082_626_68e-3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Velocity in kilometers per second
pub type KilometerPerSecond = f64;
/// Duration in seconds
pub type Seconds = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

/// Identifier of a satellite in the catalog (NORAD number or free-form string)
pub type SatelliteId = String;

/// A small, inline-optimized container for the passes of a single search.
pub type PassList = SmallVec<[Pass; 8]>;
