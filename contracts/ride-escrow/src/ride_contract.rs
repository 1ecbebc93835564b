use crate::entities::*;
use crate::errors::*;
use crate::events;
use crate::fees::{self, FeeSplit, Payouts};
use crate::timeout;
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};

#[contract]
pub struct RideEscrowContract;

#[contractimpl]
impl RideEscrowContract {
    /// Binds the three participants and the deployment configuration to this
    /// contract instance. The start deadline begins counting here.
    pub fn deploy(
        env: Env,
        admin: Address,
        token: Address,
        passenger: Address,
        driver: Address,
        config: RideConfig,
    ) -> Result<Address, Error> {
        admin.require_auth();
        if env.storage().persistent().has(&DataKey::Ride) {
            return Err(Error::AlreadyDeployed);
        }

        fees::validate_percentage(config.fee_percentage)?;
        fees::validate_percentage(config.deposit_percentage)?;
        if admin == passenger || admin == driver || passenger == driver {
            return Err(Error::InvalidParticipants);
        }

        let start_deadline = timeout::validate_timeouts(&env, &config)?;
        let ride = Ride {
            admin,
            passenger,
            driver,
            token,
            price: 0,
            fee: 0,
            deposit: 0,
            state: RideState::Created,
            passenger_started: false,
            driver_started: false,
            passenger_ended: false,
            driver_ended: false,
            start_deadline: Some(start_deadline),
            end_deadline: None,
        };
        Self::save_ride(&env, &ride);
        env.storage().persistent().set(&DataKey::Config, &config);
        env.storage()
            .persistent()
            .extend_ttl(&DataKey::Config, RIDE_LIFETIME_THRESHOLD, RIDE_BUMP_AMOUNT);

        log!(
            &env,
            "Ride deployed with fee {}% and deposit {}%",
            config.fee_percentage,
            config.deposit_percentage
        );
        Ok(env.current_contract_address())
    }

    /// Passenger and driver each call this once with the price they agreed
    /// on. The caller's stake is locked immediately; the ride starts when the
    /// second party arrives.
    pub fn start(env: Env, caller: Address, price: i128) -> Result<(), Error> {
        caller.require_auth();
        let mut ride = Self::load_ride(&env)?;
        let party = Self::participant(&ride, &caller)?;
        if ride.state != RideState::Created {
            return Err(Error::InvalidState);
        }

        let already_started = match party {
            Party::Passenger => ride.passenger_started,
            Party::Driver => ride.driver_started,
        };
        if already_started {
            return Err(Error::AlreadyActed);
        }

        let split = if ride.passenger_started || ride.driver_started {
            if price != ride.price {
                return Err(Error::PriceMismatch);
            }
            Self::split_of(&ride)
        } else {
            let config = Self::load_config(&env)?;
            let split = fees::split(price, config.fee_percentage, config.deposit_percentage)?;
            ride.price = split.price;
            ride.fee = split.fee;
            ride.deposit = split.deposit;
            split
        };

        let stake = match party {
            Party::Passenger => {
                ride.passenger_started = true;
                split.passenger_stake()
            }
            Party::Driver => {
                ride.driver_started = true;
                split.driver_stake()
            }
        };

        let both_started = ride.passenger_started && ride.driver_started;
        if both_started {
            let config = Self::load_config(&env)?;
            ride.state = RideState::Started;
            ride.start_deadline = None;
            ride.end_deadline = Some(timeout::deadline_after(&env, config.end_timeout_secs)?);
        }

        Self::collect(&env, &ride.token, &caller, stake);
        Self::save_ride(&env, &ride);
        log!(&env, "Start confirmed by {}, stake {}", caller, stake);

        if both_started {
            events::emit(
                &env,
                RideEvent::RideStarted(RideStarted {
                    passenger: ride.passenger.clone(),
                    driver: ride.driver.clone(),
                    price: ride.price,
                }),
            );
        }
        Ok(())
    }

    /// Passenger and driver each confirm the ride is over. The second
    /// confirmation settles: driver gets the fare minus the fee, admin the
    /// fee, and both deposits go back.
    pub fn end(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut ride = Self::load_ride(&env)?;
        let party = Self::participant(&ride, &caller)?;
        if ride.state != RideState::Started {
            return Err(Error::InvalidState);
        }

        match party {
            Party::Passenger if ride.passenger_ended => return Err(Error::AlreadyActed),
            Party::Driver if ride.driver_ended => return Err(Error::AlreadyActed),
            Party::Passenger => ride.passenger_ended = true,
            Party::Driver => ride.driver_ended = true,
        }
        log!(&env, "End confirmed by {}", caller);

        if !(ride.passenger_ended && ride.driver_ended) {
            Self::save_ride(&env, &ride);
            return Ok(());
        }

        let payouts = fees::completed(&Self::split_of(&ride));
        ride.state = RideState::Ended;
        ride.end_deadline = None;
        Self::pay_out(&env, &ride, &payouts);
        Self::save_ride(&env, &ride);

        events::emit(
            &env,
            RideEvent::RideEnded(RideEnded {
                passenger_payout: payouts.passenger,
                driver_payout: payouts.driver,
                admin_fee: payouts.admin,
            }),
        );
        Ok(())
    }

    /// Admin cancels a ride that failed to start in time. Every collected
    /// stake is returned and no fee is charged.
    pub fn admin_interfere_start(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut ride = Self::load_ride(&env)?;
        Self::require_admin(&ride, &caller)?;
        if ride.state != RideState::Created {
            return Err(Error::InvalidState);
        }
        timeout::require_passed(&env, ride.start_deadline)?;

        let payouts = fees::refund(
            &Self::split_of(&ride),
            ride.passenger_started,
            ride.driver_started,
        );
        ride.state = RideState::CancelledByAdmin;
        ride.start_deadline = None;
        Self::pay_out(&env, &ride, &payouts);
        Self::save_ride(&env, &ride);

        log!(&env, "Admin cancelled unstarted ride");
        events::emit(&env, RideEvent::AdminInterfereOnStart);
        Ok(())
    }

    /// Admin settles a started ride that was not ended in time, using its
    /// attestation of who showed up at the drop-off location.
    pub fn admin_interfere_end(
        env: Env,
        caller: Address,
        was_passenger_at_location: bool,
        was_driver_at_location: bool,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut ride = Self::load_ride(&env)?;
        Self::require_admin(&ride, &caller)?;
        if ride.state != RideState::Started {
            return Err(Error::InvalidState);
        }
        timeout::require_passed(&env, ride.end_deadline)?;

        let payouts = fees::arbitrated(
            &Self::split_of(&ride),
            was_passenger_at_location,
            was_driver_at_location,
        );
        ride.state = RideState::CancelledByAdmin;
        ride.end_deadline = None;
        Self::pay_out(&env, &ride, &payouts);
        Self::save_ride(&env, &ride);

        log!(
            &env,
            "Admin settled ride: passenger present {}, driver present {}",
            was_passenger_at_location,
            was_driver_at_location
        );
        events::emit(
            &env,
            RideEvent::AdminInterfereOnEnd(AdminInterference {
                was_passenger_at_location,
                was_driver_at_location,
            }),
        );
        Ok(())
    }

    /// Lets a participant recover its stake when the ride timed out and the
    /// admin has not stepped in.
    pub fn claim_timeout(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut ride = Self::load_ride(&env)?;
        Self::participant(&ride, &caller)?;
        let config = Self::load_config(&env)?;
        timeout::require_passed(&env, timeout::claim_deadline(&ride, &config))?;

        let on_start = ride.state == RideState::Created;
        let payouts = fees::refund(
            &Self::split_of(&ride),
            ride.passenger_started,
            ride.driver_started,
        );
        ride.state = RideState::CancelledByTimeout;
        ride.start_deadline = None;
        ride.end_deadline = None;
        Self::pay_out(&env, &ride, &payouts);
        Self::save_ride(&env, &ride);

        log!(&env, "Ride timed out, claimed by {}", caller);
        events::emit(&env, RideEvent::TimeOut(TimeOutEvent { on_start }));
        Ok(())
    }

    pub fn get_ride(env: &Env) -> Result<Ride, Error> {
        Self::load_ride(env)
    }

    pub fn get_config(env: &Env) -> Result<RideConfig, Error> {
        Self::load_config(env)
    }

    pub fn get_state(env: &Env) -> Result<RideState, Error> {
        Ok(Self::load_ride(env)?.state)
    }

    pub fn get_events(env: &Env) -> Vec<RideEvent> {
        events::history(env)
    }

    /// Whether the deadline of the current phase has passed.
    pub fn is_timed_out(env: &Env) -> Result<bool, Error> {
        let ride = Self::load_ride(env)?;
        Ok(timeout::has_passed(env, timeout::active_deadline(&ride)))
    }

    fn load_ride(env: &Env) -> Result<Ride, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Ride)
            .ok_or(Error::NotDeployed)
    }

    fn save_ride(env: &Env, ride: &Ride) {
        env.storage().persistent().set(&DataKey::Ride, ride);
        env.storage()
            .persistent()
            .extend_ttl(&DataKey::Ride, RIDE_LIFETIME_THRESHOLD, RIDE_BUMP_AMOUNT);
    }

    fn load_config(env: &Env) -> Result<RideConfig, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Config)
            .ok_or(Error::NotDeployed)
    }

    /// Terminal rides reject everything; otherwise the caller must be the
    /// passenger or the driver.
    fn participant(ride: &Ride, caller: &Address) -> Result<Party, Error> {
        if ride.state.is_terminal() {
            return Err(Error::InvalidState);
        }
        ride.party_of(caller).ok_or(Error::Unauthorized)
    }

    fn require_admin(ride: &Ride, caller: &Address) -> Result<(), Error> {
        if ride.state.is_terminal() {
            return Err(Error::InvalidState);
        }
        if *caller != ride.admin {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn split_of(ride: &Ride) -> FeeSplit {
        FeeSplit {
            price: ride.price,
            fee: ride.fee,
            deposit: ride.deposit,
        }
    }

    fn collect(env: &Env, asset: &Address, from: &Address, amount: i128) {
        if amount > 0 {
            let token_client = token::Client::new(env, asset);
            token_client.transfer(from, &env.current_contract_address(), &amount);
        }
    }

    fn pay_out(env: &Env, ride: &Ride, payouts: &Payouts) {
        let token_client = token::Client::new(env, &ride.token);
        let contract = env.current_contract_address();
        for (to, amount) in [
            (&ride.passenger, payouts.passenger),
            (&ride.driver, payouts.driver),
            (&ride.admin, payouts.admin),
        ] {
            if amount > 0 {
                token_client.transfer(&contract, to, &amount);
            }
        }
    }
}
