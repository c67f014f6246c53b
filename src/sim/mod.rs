//! Arena simulation
//!
//! All gameplay logic lives here. The module never touches the platform:
//! time comes in through [`TickInput`], randomness from the seeded RNG in
//! [`GameState`], and results go out as [`GameEvent`]s and plain state.

pub mod action;
pub mod autopilot;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod spatial;
pub mod spawner;
pub mod state;
pub mod tick;

pub use action::{Action, ActionOutcome, Actions};
pub use bullet::{Bullet, BulletKind};
pub use collision::Kinematic;
pub use enemy::{Enemy, EnemyBehavior, EnemyKind};
pub use player::{DashPhase, Player};
pub use spatial::{EnemyField, Neighbor, SpatialQuery};
pub use spawner::{SpawnEntry, Spawner};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{PlayerInput, TickInput, TickOutcome, tick};
