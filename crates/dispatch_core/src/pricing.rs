//! Simple fare quoting.
//!
//! There is no geographic model in scope, so fares are quoted from a
//! caller-declared trip distance rather than computed between positions.

use crate::error::DispatchError;

/// Base fare in currency units (e.g., dollars).
pub const BASE_FARE: f64 = 2.50;

/// Per-kilometer rate in currency units.
pub const PER_KM_RATE: f64 = 1.50;

/// Quote a fare for a declared trip distance.
///
/// Formula: `fare = BASE_FARE + (distance_km * PER_KM_RATE)`
pub fn estimate_fare(distance_km: f64) -> Result<f64, DispatchError> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(DispatchError::Validation(
            "distance must be a non-negative number of kilometers".to_string(),
        ));
    }
    Ok(BASE_FARE + (distance_km * PER_KM_RATE))
}
