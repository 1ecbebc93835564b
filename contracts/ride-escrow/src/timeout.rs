use crate::entities::{Ride, RideConfig, RideState};
use crate::errors::Error;
use soroban_sdk::Env;

pub fn deadline_after(env: &Env, secs: u64) -> Result<u64, Error> {
    env.ledger()
        .timestamp()
        .checked_add(secs)
        .ok_or(Error::ArithmeticOverflow)
}

/// Returns the start deadline after checking that the latest moment a
/// participant can claim a timeout, `start + end + end` seconds from now,
/// is still a representable timestamp.
pub fn validate_timeouts(env: &Env, config: &RideConfig) -> Result<u64, Error> {
    let start_deadline =
        deadline_after(env, config.start_timeout_secs).map_err(|_| Error::InvalidTimeout)?;
    start_deadline
        .checked_add(config.end_timeout_secs)
        .and_then(|end_deadline| end_deadline.checked_add(config.end_timeout_secs))
        .ok_or(Error::InvalidTimeout)?;
    Ok(start_deadline)
}

/// An unset deadline never passes.
pub fn has_passed(env: &Env, deadline: Option<u64>) -> bool {
    match deadline {
        Some(deadline) => env.ledger().timestamp() >= deadline,
        None => false,
    }
}

pub fn require_passed(env: &Env, deadline: Option<u64>) -> Result<(), Error> {
    if !has_passed(env, deadline) {
        return Err(Error::TimeoutNotYetReached);
    }
    Ok(())
}

/// Deadline of the phase the ride is currently in, if any.
pub fn active_deadline(ride: &Ride) -> Option<u64> {
    match ride.state {
        RideState::Created => ride.start_deadline,
        RideState::Started => ride.end_deadline,
        _ => None,
    }
}

/// When participants may reclaim their stakes without the admin. Unstarted
/// rides share the admin's deadline; started rides give the admin a second
/// `end_timeout_secs` window to arbitrate first. Saturates so the claim
/// always becomes reachable.
pub fn claim_deadline(ride: &Ride, config: &RideConfig) -> Option<u64> {
    match ride.state {
        RideState::Created => ride.start_deadline,
        RideState::Started => ride
            .end_deadline
            .map(|deadline| deadline.saturating_add(config.end_timeout_secs)),
        _ => None,
    }
}
