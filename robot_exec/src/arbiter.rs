//! # Actuator Arbiter
//!
//! The arbiter owns every spinner and is the only path through which power demands reach them.
//! Demands come from two sources: [`CmdSource::Direct`] (the driver and the autonomous routines)
//! and [`CmdSource::Sort`] (the colour sort task, running on its own thread).
//!
//! Direct demands are always applied. While the driver holds a claim on a spinner, colour sort
//! demands for it are rejected. Without a claim the last demand wins.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use hw_if::eqpt::spinner::{ActId, SpinnerActuator, MAX_POWER};
use log::{info, trace, warn};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Shared handle to the arbiter. Clones refer to the same actuators.
#[derive(Clone, Default)]
pub struct ActuatorArbiter {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    actuators: HashMap<ActId, Box<dyn SpinnerActuator + Send>>,

    /// Actuators currently claimed by a direct override
    claims: HashSet<ActId>,

    /// Last applied demand for each actuator
    last: HashMap<ActId, (CmdSource, i32)>,

    num_rejected: u64,
}

/// A [`SpinnerActuator`] which routes its demands through the arbiter.
///
/// Handed to code which only knows about spinners, like the colour sort task.
#[derive(Clone)]
pub struct ArbitratedActuator {
    arbiter: ActuatorArbiter,
    id: ActId,
    source: CmdSource,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Where a demand originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmdSource {
    /// Driver control or an autonomous routine
    Direct,

    /// The colour sort task
    Sort,
}

/// What happened to a demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
    /// The demand was sent to the actuator with the given (possibly clamped) power
    Applied(i32),

    /// The actuator is claimed by a direct override
    Rejected,
}

/// Errors which can occur in the [`ActuatorArbiter`]
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ArbiterError {
    #[error("No actuator has been registered for {0:?}")]
    UnknownActuator(ActId),

    #[error("The arbiter lock was poisoned by a panicking thread")]
    Poisoned,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActuatorArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the actuator for `id`, replacing any previous one.
    pub fn register<A>(&self, id: ActId, actuator: A) -> Result<(), ArbiterError>
    where
        A: SpinnerActuator + Send + 'static,
    {
        let mut inner = self.lock()?;
        if inner.actuators.insert(id, Box::new(actuator)).is_some() {
            warn!("Replaced the actuator registered for {:?}", id);
        }
        Ok(())
    }

    /// Send a power demand to an actuator.
    ///
    /// The power is clamped to `[-MAX_POWER, MAX_POWER]`.
    pub fn demand(&self, source: CmdSource, id: ActId, power: i32) -> Result<Demand, ArbiterError> {
        let mut inner = self.lock()?;

        if source == CmdSource::Sort && inner.claims.contains(&id) {
            inner.num_rejected += 1;
            trace!("Rejected {:?} demand of {} for claimed {:?}", source, power, id);
            return Ok(Demand::Rejected);
        }

        let clamped = power.clamp(-MAX_POWER, MAX_POWER);
        if clamped != power {
            warn!("{:?} demand of {} for {:?} clamped to {}", source, power, id, clamped);
        }

        inner
            .actuators
            .get_mut(&id)
            .ok_or(ArbiterError::UnknownActuator(id))?
            .set_power(clamped);
        inner.last.insert(id, (source, clamped));

        Ok(Demand::Applied(clamped))
    }

    /// Claim actuators for a direct override. Colour sort demands for them are rejected until they
    /// are released.
    pub fn claim(&self, ids: &[ActId]) -> Result<(), ArbiterError> {
        let mut inner = self.lock()?;
        for id in ids {
            if inner.claims.insert(*id) {
                info!("Override claimed {:?}", id);
            }
        }
        Ok(())
    }

    /// Release a previous claim. Releasing an unclaimed actuator does nothing.
    pub fn release(&self, ids: &[ActId]) -> Result<(), ArbiterError> {
        let mut inner = self.lock()?;
        for id in ids {
            if inner.claims.remove(id) {
                info!("Override released {:?}", id);
            }
        }
        Ok(())
    }

    pub fn is_claimed(&self, id: ActId) -> Result<bool, ArbiterError> {
        Ok(self.lock()?.claims.contains(&id))
    }

    /// The last demand applied to `id`, if any.
    pub fn last_demand(&self, id: ActId) -> Result<Option<(CmdSource, i32)>, ArbiterError> {
        Ok(self.lock()?.last.get(&id).copied())
    }

    /// Number of colour sort demands rejected so far.
    pub fn num_rejected(&self) -> Result<u64, ArbiterError> {
        Ok(self.lock()?.num_rejected)
    }

    /// Get a [`SpinnerActuator`] handle for `id` which issues demands as `source`.
    pub fn channel(&self, id: ActId, source: CmdSource) -> ArbitratedActuator {
        ArbitratedActuator {
            arbiter: self.clone(),
            id,
            source,
        }
    }

    /// Stop every registered actuator and drop all claims.
    pub fn stop_all(&self) -> Result<(), ArbiterError> {
        let mut inner = self.lock()?;
        inner.claims.clear();

        let ids: Vec<ActId> = inner.actuators.keys().copied().collect();
        for id in ids {
            if let Some(a) = inner.actuators.get_mut(&id) {
                a.set_power(0);
            }
            inner.last.insert(id, (CmdSource::Direct, 0));
        }

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, ArbiterError> {
        self.inner.lock().map_err(|_| ArbiterError::Poisoned)
    }
}

impl SpinnerActuator for ArbitratedActuator {
    fn set_power(&mut self, power: i32) {
        if let Err(e) = self.arbiter.demand(self.source, self.id, power) {
            warn!("Could not send demand to {:?}: {}", self.id, e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Stores the last power it was given.
    #[derive(Clone, Default)]
    struct RecordingMotor(Arc<Mutex<Option<i32>>>);

    impl SpinnerActuator for RecordingMotor {
        fn set_power(&mut self, power: i32) {
            *self.0.lock().unwrap() = Some(power);
        }
    }

    impl RecordingMotor {
        fn get(&self) -> Option<i32> {
            *self.0.lock().unwrap()
        }
    }

    fn arbiter_with_top() -> (ActuatorArbiter, RecordingMotor) {
        let arbiter = ActuatorArbiter::new();
        let motor = RecordingMotor::default();
        arbiter.register(ActId::TopSpinner, motor.clone()).unwrap();
        (arbiter, motor)
    }

    #[test]
    fn test_demands_applied() {
        let (arbiter, motor) = arbiter_with_top();

        assert_eq!(arbiter.demand(CmdSource::Sort, ActId::TopSpinner, 127), Ok(Demand::Applied(127)));
        assert_eq!(motor.get(), Some(127));

        assert_eq!(arbiter.demand(CmdSource::Direct, ActId::TopSpinner, 0), Ok(Demand::Applied(0)));
        assert_eq!(motor.get(), Some(0));
        assert_eq!(
            arbiter.last_demand(ActId::TopSpinner),
            Ok(Some((CmdSource::Direct, 0)))
        );
    }

    #[test]
    fn test_claim_rejects_sort() {
        let (arbiter, motor) = arbiter_with_top();

        arbiter.claim(&[ActId::TopSpinner]).unwrap();
        assert_eq!(arbiter.is_claimed(ActId::TopSpinner), Ok(true));

        assert_eq!(arbiter.demand(CmdSource::Direct, ActId::TopSpinner, -50), Ok(Demand::Applied(-50)));
        assert_eq!(arbiter.demand(CmdSource::Sort, ActId::TopSpinner, 127), Ok(Demand::Rejected));
        assert_eq!(motor.get(), Some(-50));
        assert_eq!(arbiter.num_rejected(), Ok(1));

        arbiter.release(&[ActId::TopSpinner]).unwrap();
        assert_eq!(arbiter.demand(CmdSource::Sort, ActId::TopSpinner, 127), Ok(Demand::Applied(127)));
        assert_eq!(motor.get(), Some(127));
    }

    #[test]
    fn test_clamp() {
        let (arbiter, motor) = arbiter_with_top();

        assert_eq!(arbiter.demand(CmdSource::Direct, ActId::TopSpinner, 300), Ok(Demand::Applied(127)));
        assert_eq!(arbiter.demand(CmdSource::Direct, ActId::TopSpinner, -128), Ok(Demand::Applied(-127)));
        assert_eq!(motor.get(), Some(-127));
    }

    #[test]
    fn test_unknown_actuator() {
        let (arbiter, _) = arbiter_with_top();

        assert_eq!(
            arbiter.demand(CmdSource::Direct, ActId::IntakeRear, 10),
            Err(ArbiterError::UnknownActuator(ActId::IntakeRear))
        );
    }

    #[test]
    fn test_channel() {
        let (arbiter, motor) = arbiter_with_top();
        let mut chan = arbiter.channel(ActId::TopSpinner, CmdSource::Sort);

        chan.set_power(127);
        assert_eq!(motor.get(), Some(127));

        arbiter.claim(&ActId::spinner_ids()).unwrap();
        chan.set_power(0);
        assert_eq!(motor.get(), Some(127));
    }

    #[test]
    fn test_stop_all() {
        let (arbiter, motor) = arbiter_with_top();

        arbiter.demand(CmdSource::Direct, ActId::TopSpinner, 100).unwrap();
        arbiter.claim(&[ActId::TopSpinner]).unwrap();
        arbiter.stop_all().unwrap();

        assert_eq!(motor.get(), Some(0));
        assert_eq!(arbiter.is_claimed(ActId::TopSpinner), Ok(false));
    }
}
