use soroban_sdk::{contracttype, Address};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const RIDE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const RIDE_LIFETIME_THRESHOLD: u32 = RIDE_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RideState {
    Created,
    Started,
    Ended,
    CancelledByTimeout,
    CancelledByAdmin,
}

impl RideState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RideState::Ended | RideState::CancelledByTimeout | RideState::CancelledByAdmin
        )
    }
}

/// Deployment parameters. Percentages are whole numbers in `[0, 100]`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RideConfig {
    pub fee_percentage: u32,
    pub deposit_percentage: u32,
    /// Seconds after deployment before the admin may cancel an unstarted ride.
    pub start_timeout_secs: u64,
    /// Seconds after the ride starts before the admin may arbitrate its end.
    pub end_timeout_secs: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ride {
    pub admin: Address,
    pub passenger: Address,
    pub driver: Address,
    pub token: Address,
    pub price: i128,
    pub fee: i128,
    pub deposit: i128,
    pub state: RideState,
    pub passenger_started: bool,
    pub driver_started: bool,
    pub passenger_ended: bool,
    pub driver_ended: bool,
    pub start_deadline: Option<u64>,
    pub end_deadline: Option<u64>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Party {
    Passenger,
    Driver,
}

impl Ride {
    /// Resolves a caller to the participant it plays; `None` for anyone else.
    pub fn party_of(&self, caller: &Address) -> Option<Party> {
        if *caller == self.passenger {
            Some(Party::Passenger)
        } else if *caller == self.driver {
            Some(Party::Driver)
        } else {
            None
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RideStarted {
    pub passenger: Address,
    pub driver: Address,
    pub price: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RideEnded {
    pub passenger_payout: i128,
    pub driver_payout: i128,
    pub admin_fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminInterference {
    pub was_passenger_at_location: bool,
    pub was_driver_at_location: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeOutEvent {
    pub on_start: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RideEvent {
    RideStarted(RideStarted),
    RideEnded(RideEnded),
    AdminInterfereOnStart,
    AdminInterfereOnEnd(AdminInterference),
    TimeOut(TimeOutEvent),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Ride,
    Config,
    Events,
}
