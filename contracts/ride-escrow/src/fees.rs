use crate::errors::Error;

pub const PERCENT_DIVISOR: i128 = 100;

/// Fee and deposit derived from an agreed ride price.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeeSplit {
    pub price: i128,
    pub fee: i128,
    pub deposit: i128,
}

impl FeeSplit {
    /// What the passenger locks on `start`: the fare plus its deposit.
    pub fn passenger_stake(&self) -> i128 {
        self.price + self.deposit
    }

    pub fn driver_stake(&self) -> i128 {
        self.deposit
    }
}

/// Amounts the contract pays out when a ride reaches a terminal state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Payouts {
    pub passenger: i128,
    pub driver: i128,
    pub admin: i128,
}

impl Payouts {
    pub fn total(&self) -> i128 {
        self.passenger + self.driver + self.admin
    }
}

pub fn validate_percentage(percentage: u32) -> Result<(), Error> {
    if percentage > 100 {
        return Err(Error::InvalidPercentage);
    }
    Ok(())
}

fn percent_of(price: i128, percentage: u32) -> Result<i128, Error> {
    let scaled = price
        .checked_mul(percentage as i128)
        .ok_or(Error::ArithmeticOverflow)?;
    // price is positive here, so integer division floors
    Ok(scaled / PERCENT_DIVISOR)
}

pub fn split(price: i128, fee_percentage: u32, deposit_percentage: u32) -> Result<FeeSplit, Error> {
    validate_percentage(fee_percentage)?;
    validate_percentage(deposit_percentage)?;
    if price <= 0 {
        return Err(Error::InvalidPercentage);
    }

    let fee = percent_of(price, fee_percentage)?;
    let deposit = percent_of(price, deposit_percentage)?;
    // both stakes must stay representable when added up at settlement
    price
        .checked_add(deposit)
        .and_then(|stake| stake.checked_add(deposit))
        .ok_or(Error::ArithmeticOverflow)?;

    Ok(FeeSplit {
        price,
        fee,
        deposit,
    })
}

/// Both parties confirmed the end of the ride.
pub fn completed(split: &FeeSplit) -> Payouts {
    Payouts {
        passenger: split.deposit,
        driver: split.price - split.fee + split.deposit,
        admin: split.fee,
    }
}

/// Returns exactly the stakes that were collected.
pub fn refund(split: &FeeSplit, passenger_paid: bool, driver_paid: bool) -> Payouts {
    Payouts {
        passenger: if passenger_paid {
            split.passenger_stake()
        } else {
            0
        },
        driver: if driver_paid { split.driver_stake() } else { 0 },
        admin: 0,
    }
}

/// Admin settlement after the end deadline. An absent party forfeits its
/// deposit to the present one; the fee is only charged when both were there.
pub fn arbitrated(
    split: &FeeSplit,
    was_passenger_at_location: bool,
    was_driver_at_location: bool,
) -> Payouts {
    match (was_passenger_at_location, was_driver_at_location) {
        (true, true) => completed(split),
        (false, false) => refund(split, true, true),
        (true, false) => Payouts {
            passenger: split.passenger_stake() + split.deposit,
            driver: 0,
            admin: 0,
        },
        (false, true) => Payouts {
            passenger: split.price,
            driver: split.deposit + split.deposit,
            admin: 0,
        },
    }
}
