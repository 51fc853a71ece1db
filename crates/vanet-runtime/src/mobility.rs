//! # Mobility
//!
//! Stand-in for the kinematics collaborator: moves vehicles each step and
//! reports proximity. Nothing here touches the authentication core beyond
//! handing new kinematics to `Node::update_kinematics`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vanet_auth::{Kinematics, Position};

/// Lower bound of the per-axis drift factor.
pub const DRIFT_MIN: f64 = -0.1;
/// Upper bound (exclusive) of the per-axis drift factor.
pub const DRIFT_MAX: f64 = 1.1;

/// Produces the next kinematic state of a vehicle.
pub trait MobilityModel: Send {
    fn advance(&mut self, current: Kinematics, dt: f64) -> Kinematics;
}

/// Constant speed with noisy heading: each axis moves by
/// `speed * dt * U(DRIFT_MIN, DRIFT_MAX)`.
#[derive(Debug)]
pub struct RandomDrift {
    rng: StdRng,
}

impl RandomDrift {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl MobilityModel for RandomDrift {
    fn advance(&mut self, current: Kinematics, dt: f64) -> Kinematics {
        let step = current.speed * dt;
        let dx = step * self.rng.gen_range(DRIFT_MIN..DRIFT_MAX);
        let dy = step * self.rng.gen_range(DRIFT_MIN..DRIFT_MAX);
        Kinematics::new(
            current.speed,
            Position::new(current.position.x + dx, current.position.y + dy),
        )
    }
}

/// True when two positions are strictly closer than `threshold`.
pub fn in_collision(a: &Position, b: &Position, threshold: f64) -> bool {
    a.distance_to(b) < threshold
}
