use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Error {
    NotDeployed = 1,
    AlreadyDeployed = 2,
    InvalidPercentage = 3,
    InvalidState = 4,
    Unauthorized = 5,
    AlreadyActed = 6,
    TimeoutNotYetReached = 7,
    PriceMismatch = 8,
    InvalidParticipants = 9,
    ArithmeticOverflow = 10,
    InvalidTimeout = 11,
}
