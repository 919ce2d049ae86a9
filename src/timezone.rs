//! Effective timezone resolution.
//!
//! Period boundaries are computed in a user's *effective* zone, resolved with
//! a fixed precedence: the user's stored zone if set, else the zone supplied
//! with the request, else the configured default. The order never varies for
//! the same user/request pair, so two calls in the same request can never
//! disagree about which month a hit belongs to.

use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimezoneError {
    #[error("unknown timezone {0:?}")]
    UnknownZone(String),
}

/// Resolve the zone used for period-boundary math.
///
/// A stored zone name that does not resolve is an error, not a fallback:
/// silently dropping to UTC would shift the user's billing boundary by hours
/// without anyone noticing.
pub fn effective_timezone(
    stored: Option<&str>,
    request: Option<Tz>,
    default: Tz,
) -> Result<Tz, TimezoneError> {
    match stored {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| TimezoneError::UnknownZone(name.to_string())),
        None => Ok(request.unwrap_or(default)),
    }
}
