use crate::entities::{DataKey, RideEvent, RIDE_BUMP_AMOUNT, RIDE_LIFETIME_THRESHOLD};
use soroban_sdk::{symbol_short, Env, Symbol, Vec};

pub const RIDE_TOPIC: Symbol = symbol_short!("ride");

fn kind(event: &RideEvent) -> Symbol {
    match event {
        RideEvent::RideStarted(_) => symbol_short!("started"),
        RideEvent::RideEnded(_) => symbol_short!("ended"),
        RideEvent::AdminInterfereOnStart => symbol_short!("intf_strt"),
        RideEvent::AdminInterfereOnEnd(_) => symbol_short!("intf_end"),
        RideEvent::TimeOut(_) => symbol_short!("timeout"),
    }
}

/// Appends to the ride's event log and publishes on the contract event stream.
pub fn emit(env: &Env, event: RideEvent) {
    let mut log = history(env);
    log.push_back(event.clone());
    env.storage().persistent().set(&DataKey::Events, &log);
    env.storage()
        .persistent()
        .extend_ttl(&DataKey::Events, RIDE_LIFETIME_THRESHOLD, RIDE_BUMP_AMOUNT);

    env.events().publish((RIDE_TOPIC, kind(&event)), event);
}

pub fn history(env: &Env) -> Vec<RideEvent> {
    env.storage()
        .persistent()
        .get(&DataKey::Events)
        .unwrap_or(Vec::new(env))
}
