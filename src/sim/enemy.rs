//! Enemy variants: steering, ranged attacks and combat reactions
//!
//! Five behaviour classes share one [`Enemy`] struct. Variant state lives in
//! [`EnemyBehavior`]; everything the tick needs goes through the same small
//! capability set (`advance`, `ranged_attack`, `on_area_damage`,
//! `on_player_collision`).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::action::{Action, Actions};
use super::bullet::Bullet;
use super::collision::Kinematic;
use super::spatial::SpatialQuery;
use crate::consts::*;
use crate::{PlayArea, heading_to, unit_from_angle};

// Rewards: (score, power)
const SEEKER_FLASH_REWARD: (u64, u8) = (10, 0);
const SEEKER_CONSUME_REWARD: (u64, u8) = (25, 1);
const FLOCKING_FLASH_REWARD: (u64, u8) = (250, 0);
const ORBITER_FLASH_REWARD: (u64, u8) = (50, 0);
const ORBITER_CONSUME_REWARD: (u64, u8) = (500, 4);
const AMBUSHER_FLASH_REWARD: (u64, u8) = (200, 0);
const AMBUSHER_CONSUME_REWARD: (u64, u8) = (100, MAX_POWER);

/// Enemy variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Red: walks straight at the player and snipes from range
    Seeker,
    /// Green: accelerates at the player, pushes away from other greens
    Flocking,
    /// Pink: drifts behind other enemies, shielded
    AntiGravity,
    /// Yellow: curving pursuit, fires rings at close range
    Orbiter,
    /// Blue: parks on a random point and fires one limited ring, shielded
    Ambusher,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Seeker,
        EnemyKind::Flocking,
        EnemyKind::AntiGravity,
        EnemyKind::Orbiter,
        EnemyKind::Ambusher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Seeker => "seeker",
            EnemyKind::Flocking => "flocking",
            EnemyKind::AntiGravity => "anti_gravity",
            EnemyKind::Orbiter => "orbiter",
            EnemyKind::Ambusher => "ambusher",
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            EnemyKind::Seeker => SEEKER_RADIUS,
            EnemyKind::Flocking => FLOCKING_RADIUS,
            EnemyKind::AntiGravity => ANTI_GRAVITY_RADIUS,
            EnemyKind::Orbiter => ORBITER_RADIUS,
            EnemyKind::Ambusher => AMBUSHER_RADIUS,
        }
    }
}

/// Per-variant state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    Seeker {
        last_shot: f64,
    },
    Flocking {
        vel: Vec2,
        acc: Vec2,
    },
    AntiGravity {
        vel: Vec2,
        acc: Vec2,
        shield: bool,
    },
    Orbiter {
        vel: Vec2,
        last_shot: f64,
    },
    Ambusher {
        target: Vec2,
        arrived: bool,
        fired: bool,
        shield: bool,
    },
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining hit points ("triangle hearts")
    pub hit_points: u8,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    fn with_behavior(id: u32, pos: Vec2, kind: EnemyKind, behavior: EnemyBehavior) -> Self {
        Self {
            id,
            pos,
            radius: kind.radius(),
            hit_points: 1,
            behavior,
        }
    }

    pub fn seeker(id: u32, pos: Vec2) -> Self {
        Self::with_behavior(id, pos, EnemyKind::Seeker, EnemyBehavior::Seeker { last_shot: 0.0 })
    }

    pub fn flocking(id: u32, pos: Vec2) -> Self {
        let mut enemy = Self::with_behavior(
            id,
            pos,
            EnemyKind::Flocking,
            EnemyBehavior::Flocking {
                vel: Vec2::ZERO,
                acc: Vec2::ZERO,
            },
        );
        enemy.hit_points = FLOCKING_HEARTS;
        enemy
    }

    pub fn anti_gravity(id: u32, pos: Vec2) -> Self {
        Self::with_behavior(
            id,
            pos,
            EnemyKind::AntiGravity,
            EnemyBehavior::AntiGravity {
                vel: Vec2::ZERO,
                acc: Vec2::ZERO,
                shield: true,
            },
        )
    }

    pub fn orbiter(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self::with_behavior(id, pos, EnemyKind::Orbiter, EnemyBehavior::Orbiter { vel, last_shot: 0.0 })
    }

    pub fn ambusher(id: u32, pos: Vec2, target: Vec2) -> Self {
        Self::with_behavior(
            id,
            pos,
            EnemyKind::Ambusher,
            EnemyBehavior::Ambusher {
                target,
                arrived: false,
                fired: false,
                shield: true,
            },
        )
    }

    /// Build a freshly spawned enemy, rolling any random initial state
    pub fn spawn(kind: EnemyKind, id: u32, pos: Vec2, area: &PlayArea, rng: &mut impl Rng) -> Self {
        match kind {
            EnemyKind::Seeker => Self::seeker(id, pos),
            EnemyKind::Flocking => Self::flocking(id, pos),
            EnemyKind::AntiGravity => Self::anti_gravity(id, pos),
            EnemyKind::Orbiter => {
                // Independent roll per axis
                let vx = (rng.random::<f32>() * std::f32::consts::TAU).sin() * ORBITER_SPEED;
                let vy = (rng.random::<f32>() * std::f32::consts::TAU).cos() * ORBITER_SPEED;
                Self::orbiter(id, pos, Vec2::new(vx, vy))
            }
            EnemyKind::Ambusher => {
                let margin = (1.0 - AMBUSHER_TARGET_SPAN) / 2.0;
                let target = Vec2::new(
                    area.min.x + margin * area.size.x + AMBUSHER_TARGET_SPAN * area.size.x * rng.random::<f32>(),
                    area.min.y + margin * area.size.y + AMBUSHER_TARGET_SPAN * area.size.y * rng.random::<f32>(),
                );
                Self::ambusher(id, pos, target)
            }
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self.behavior {
            EnemyBehavior::Seeker { .. } => EnemyKind::Seeker,
            EnemyBehavior::Flocking { .. } => EnemyKind::Flocking,
            EnemyBehavior::AntiGravity { .. } => EnemyKind::AntiGravity,
            EnemyBehavior::Orbiter { .. } => EnemyKind::Orbiter,
            EnemyBehavior::Ambusher { .. } => EnemyKind::Ambusher,
        }
    }

    /// Shield state for shielded variants
    pub fn shield(&self) -> Option<bool> {
        match self.behavior {
            EnemyBehavior::AntiGravity { shield, .. } | EnemyBehavior::Ambusher { shield, .. } => Some(shield),
            _ => None,
        }
    }

    /// Ambush point, if this is an ambusher
    pub fn ambush_target(&self) -> Option<Vec2> {
        match self.behavior {
            EnemyBehavior::Ambusher { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Current velocity for variants that carry one
    pub fn velocity(&self) -> Vec2 {
        match self.behavior {
            EnemyBehavior::Flocking { vel, .. }
            | EnemyBehavior::AntiGravity { vel, .. }
            | EnemyBehavior::Orbiter { vel, .. } => vel,
            _ => Vec2::ZERO,
        }
    }

    /// Move one step toward (or around) `target`.
    ///
    /// `field` is a read-only view of the other enemies; it may still contain
    /// this enemy, which is skipped by id.
    pub fn advance(&mut self, field: &impl SpatialQuery, target: Vec2, dt: f32) {
        let id = self.id;
        let pos = self.pos;
        match &mut self.behavior {
            EnemyBehavior::Seeker { .. } => {
                let (dir, _) = heading_to(pos, target);
                self.pos += dir * SEEKER_SPEED * dt;
            }
            EnemyBehavior::Flocking { vel, acc } => {
                let (dir, _) = heading_to(pos, target);
                let mut a = dir * FLOCKING_ACC_LIMIT;

                for other in field.within_radius(id, pos, FLOCKING_REPULSION_RADIUS) {
                    if other.kind != EnemyKind::Flocking {
                        continue;
                    }
                    let away = pos - other.pos;
                    let dist = away.length();
                    if dist > 0.0 {
                        let force = FLOCKING_REPULSION_STRENGTH / (dist * dist);
                        a += away / dist * force;
                    }
                }

                *acc = a;
                *vel = (*vel + a * dt).clamp_length_max(FLOCKING_VEL_LIMIT);
                self.pos += *vel * dt;
            }
            EnemyBehavior::AntiGravity { vel, acc, .. } => {
                *acc = anti_gravity_acceleration(id, pos, field, target);
                *vel += *acc * ANTI_GRAVITY_ACC_STRENGTH * dt;
                *vel *= ANTI_GRAVITY_DAMPING;
                self.pos += *vel * dt;
            }
            EnemyBehavior::Orbiter { vel, .. } => {
                let blend = (target - pos) * ORBITER_TARGET_BLEND + *vel * (1.0 - ORBITER_TARGET_BLEND);
                let len = blend.length();
                if len > 0.0 {
                    *vel = blend / len * ORBITER_SPEED;
                }
                self.pos += *vel * dt;
            }
            EnemyBehavior::Ambusher { target: point, arrived, .. } => {
                if *arrived {
                    return;
                }
                let (dir, dist) = heading_to(pos, *point);
                if dist < AMBUSHER_SNAP_DISTANCE {
                    *arrived = true;
                    self.pos = *point;
                } else {
                    self.pos += dir * AMBUSHER_SPEED * dt;
                }
            }
        }
    }

    /// Bullets fired this frame at `target`. `now` is game time in ms.
    pub fn ranged_attack(&mut self, target: Vec2, now: f64) -> Vec<Bullet> {
        let pos = self.pos;
        match &mut self.behavior {
            EnemyBehavior::Seeker { last_shot } => {
                let (dir, dist) = heading_to(pos, target);
                if dist >= SEEKER_MIN_SHOOT_DISTANCE && now - *last_shot >= SEEKER_SHOOT_INTERVAL_MS {
                    *last_shot = now;
                    return vec![Bullet::linear(pos, dir * SEEKER_BULLET_SPEED, EnemyKind::Seeker)];
                }
                Vec::new()
            }
            EnemyBehavior::Orbiter { vel, last_shot } => {
                let dist = pos.distance(target);
                if (ORBITER_SHOOT_MIN_DISTANCE..=ORBITER_SHOOT_MAX_DISTANCE).contains(&dist)
                    && now - *last_shot >= ORBITER_SHOOT_COOLDOWN_MS
                {
                    *last_shot = now;
                    return ring(ORBITER_BULLETS_PER_SHOT)
                        .map(|dir| Bullet::linear(pos, dir * ORBITER_BULLET_SPEED + *vel, EnemyKind::Orbiter))
                        .collect();
                }
                Vec::new()
            }
            EnemyBehavior::Ambusher { arrived, fired, .. } => {
                if *arrived && !*fired {
                    *fired = true;
                    return ring(AMBUSHER_BULLETS_PER_SHOT)
                        .map(|dir| {
                            Bullet::radial_limited(
                                pos,
                                dir * AMBUSHER_BULLET_SPEED,
                                pos,
                                AMBUSHER_BULLET_RADIUS,
                                EnemyKind::Ambusher,
                            )
                        })
                        .collect();
                }
                Vec::new()
            }
            EnemyBehavior::Flocking { .. } | EnemyBehavior::AntiGravity { .. } => Vec::new(),
        }
    }

    /// Reaction to the player's flash
    pub fn on_area_damage(&mut self, damage: u8) -> Actions {
        match self.kind() {
            EnemyKind::AntiGravity => {
                if self.drop_shield() {
                    Vec::new()
                } else {
                    vec![Action::REMOVE]
                }
            }
            EnemyKind::Ambusher => {
                if self.drop_shield() {
                    Vec::new()
                } else {
                    vec![reward(AMBUSHER_FLASH_REWARD)]
                }
            }
            EnemyKind::Seeker => self.take_hit(damage, SEEKER_FLASH_REWARD),
            EnemyKind::Flocking => self.take_hit(damage, FLOCKING_FLASH_REWARD),
            EnemyKind::Orbiter => self.take_hit(damage, ORBITER_FLASH_REWARD),
        }
    }

    /// Reaction to touching a player
    pub fn on_player_collision(&self) -> Actions {
        match self.behavior {
            EnemyBehavior::Seeker { .. } => vec![reward(SEEKER_CONSUME_REWARD)],
            EnemyBehavior::Flocking { .. } => vec![Action::HealthDelta(-1), Action::REMOVE],
            EnemyBehavior::AntiGravity { shield, .. } => {
                if shield {
                    vec![Action::HealthDelta(-1), Action::REMOVE]
                } else {
                    vec![Action::HealthDelta(1), Action::REMOVE]
                }
            }
            EnemyBehavior::Orbiter { .. } => vec![reward(ORBITER_CONSUME_REWARD)],
            EnemyBehavior::Ambusher { shield, .. } => {
                if shield {
                    vec![Action::HealthDelta(-1), Action::REMOVE]
                } else {
                    vec![reward(AMBUSHER_CONSUME_REWARD)]
                }
            }
        }
    }

    /// Drop a raised shield; false if there was none to drop
    fn drop_shield(&mut self) -> bool {
        match &mut self.behavior {
            EnemyBehavior::AntiGravity { shield, .. } | EnemyBehavior::Ambusher { shield, .. } if *shield => {
                *shield = false;
                true
            }
            _ => false,
        }
    }

    fn take_hit(&mut self, damage: u8, (score, power): (u64, u8)) -> Actions {
        self.hit_points = self.hit_points.saturating_sub(damage);
        if self.hit_points == 0 {
            vec![Action::ScoreAndRemove { score, power }]
        } else {
            Vec::new()
        }
    }
}

impl Kinematic for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

fn reward((score, power): (u64, u8)) -> Action {
    Action::ScoreAndRemove { score, power }
}

/// `n` unit vectors evenly spaced by angle, starting along +x
fn ring(n: usize) -> impl Iterator<Item = Vec2> {
    (0..n).map(move |i| unit_from_angle(i as f32 / n as f32 * std::f32::consts::TAU))
}

/// Flanking force for an anti-gravity enemy.
///
/// Each neighbour is looked at through a point pushed a quarter of its own
/// player offset further from the player. The closest three of those points
/// attract, unless they belong to another anti-gravity enemy or sit closer
/// than 50px, in which case they repel at half weight. A small term pushes
/// away from the player. Only the upper bound of the acceleration is limited.
fn anti_gravity_acceleration(id: u32, pos: Vec2, field: &impl SpatialQuery, target: Vec2) -> Vec2 {
    let mut candidates: Vec<(bool, f32, Vec2)> = field
        .neighbors(id)
        .into_iter()
        .filter_map(|n| {
            let biased = n.pos + (n.pos - target) / ANTI_GRAVITY_PLAYER_OFFSET_DIVISOR;
            let delta = biased - pos;
            let dist = delta.length();
            (dist > 0.0).then_some((n.kind == EnemyKind::AntiGravity, dist, delta))
        })
        .collect();
    candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut pull = Vec2::ZERO;
    let mut weight = 0.0;
    for &(same_kind, dist, delta) in candidates.iter().take(ANTI_GRAVITY_NEIGHBORS) {
        if same_kind || dist < ANTI_GRAVITY_CLOSE_DISTANCE {
            pull -= delta / dist;
            weight += 0.5;
        } else {
            pull += delta / dist;
            weight += 1.0;
        }
    }
    if weight > 0.0 {
        pull /= weight;
    }

    let (to_player, dist_to_player) = heading_to(pos, target);
    let to_player = if dist_to_player > ANTI_GRAVITY_PLAYER_DEADZONE {
        to_player
    } else {
        Vec2::ZERO
    };

    let raw = pull * 2.0 - to_player * ANTI_GRAVITY_AVOID_PLAYER;
    Vec2::new(raw.x.min(ANTI_GRAVITY_ACC_LIMIT), raw.y.min(ANTI_GRAVITY_ACC_LIMIT))
}
