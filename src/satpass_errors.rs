use thiserror::Error;

#[derive(Error, Debug)]
pub enum SatPassError {
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("Malformed TLE: {0}")]
    TleFormat(String),

    #[error("Invalid observer location: {0}")]
    InvalidObserver(String),

    #[error("Kepler equation solver failed: {0}")]
    RootFinding(#[from] roots::SearchError),

    #[error("Inconsistent pass window: {0}")]
    InconsistentWindow(String),

    #[error("Satellite not found in catalog: {0}")]
    SatelliteNotFound(String),
}

impl PartialEq for SatPassError {
    fn eq(&self, other: &Self) -> bool {
        use SatPassError::*;
        match (self, other) {
            (InvalidElements(a), InvalidElements(b)) => a == b,
            (TleFormat(a), TleFormat(b)) => a == b,
            (InvalidObserver(a), InvalidObserver(b)) => a == b,
            (InconsistentWindow(a), InconsistentWindow(b)) => a == b,
            (SatelliteNotFound(a), SatelliteNotFound(b)) => a == b,

            // Solver errors carry no comparable payload: equality on variant only
            (RootFinding(_), RootFinding(_)) => true,

            _ => false,
        }
    }
}
