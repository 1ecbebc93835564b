#![no_std]

mod entities;
mod errors;
mod events;
mod fees;
mod ride_contract;
mod timeout;


pub use entities::*;
pub use errors::Error;
pub use ride_contract::{RideEscrowContract, RideEscrowContractClient};
