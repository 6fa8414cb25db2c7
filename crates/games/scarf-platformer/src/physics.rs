use serde::{Deserialize, Serialize};

use scarf_core::events::WallSide;
use scarf_core::input::InputSnapshot;
use scarf_core::math::{Rect, Vec2};

use crate::collision::{CollisionSide, CollisionSystem};
use crate::config::{MAX_RESOURCE, NinjaPhysicsConfig};
use crate::sensor::{self, WallContact};
use crate::state::MovementState;

/// What happened during one [`NinjaPlayer::step`]. Scenes turn this into
/// gameplay events; the player itself keeps no history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub jumped: bool,
    pub wall_jumped: Option<WallSide>,
    pub dashed: bool,
    pub climb_started: bool,
    /// Downward speed at the moment of touching down, if this step landed.
    pub landed: Option<f32>,
    pub wall_slide_started: Option<WallSide>,
    pub collisions: usize,
}

/// The ninja's kinematic body, resource pools and movement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NinjaPlayer {
    /// Top-left corner of the body. Authoritative.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Accumulated for one step, then reset to zero.
    pub acceleration: Vec2,
    pub size: Vec2,
    pub stamina: f32,
    pub chakra: f32,
    pub state: MovementState,
    pub on_ground: bool,
    /// Wall on the left, from collisions or the proximity probe.
    pub wall_left: bool,
    /// Wall on the right, from collisions or the proximity probe.
    pub wall_right: bool,
    /// Walls reported by this step's collision corrections alone.
    pub contact: WallContact,
    /// Facing: -1 left, +1 right.
    pub direction: i8,
    pub dash_cooldown: f32,
    pub wall_slide_timer: f32,
    pub physics: NinjaPhysicsConfig,
}

impl NinjaPlayer {
    pub fn new(spawn_x: f32, spawn_y: f32) -> Self {
        Self::with_config(spawn_x, spawn_y, NinjaPhysicsConfig::default())
    }

    pub fn with_config(spawn_x: f32, spawn_y: f32, physics: NinjaPhysicsConfig) -> Self {
        Self {
            position: Vec2::new(spawn_x, spawn_y),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            size: Vec2::new(physics.player_width, physics.player_height),
            stamina: MAX_RESOURCE,
            chakra: MAX_RESOURCE,
            state: MovementState::Normal,
            on_ground: false,
            wall_left: false,
            wall_right: false,
            contact: WallContact::default(),
            direction: 1,
            dash_cooldown: 0.0,
            wall_slide_timer: 0.0,
            physics,
        }
    }

    /// Snapshot of the current bounding box.
    pub fn get_rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub fn near_wall(&self) -> bool {
        self.wall_left || self.wall_right
    }

    /// Advance one simulation step.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot, world: &CollisionSystem) {
        self.step(dt, input, world);
    }

    /// Advance one simulation step and report what happened.
    ///
    /// `dt` is used as-is; callers that can stall should split long frames.
    /// A non-finite or negative `dt` leaves the player untouched.
    pub fn step(&mut self, dt: f32, input: &InputSnapshot, world: &CollisionSystem) -> StepReport {
        let mut report = StepReport::default();
        if !dt.is_finite() || dt < 0.0 {
            tracing::debug!(dt, "Skipping step with invalid dt");
            return report;
        }

        let was_on_ground = self.on_ground;
        let prev_state = self.state;

        self.process_inputs(input, dt, &mut report);
        self.integrate(dt);
        self.position += self.velocity * dt;

        let fall_speed = self.velocity.y;
        report.collisions = self.resolve_collisions(world);
        self.detect_walls(world);
        self.update_wall_slide(dt);
        self.limit_velocity();
        self.update_resources(dt);

        if self.dash_cooldown > 0.0 {
            self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        }

        if self.on_ground && !was_on_ground {
            report.landed = Some(fall_speed.max(0.0));
        }
        if self.state == MovementState::WallSliding && prev_state != MovementState::WallSliding {
            report.wall_slide_started = Some(if self.wall_left {
                WallSide::Left
            } else {
                WallSide::Right
            });
        }
        report
    }

    fn process_inputs(&mut self, input: &InputSnapshot, dt: f32, report: &mut StepReport) {
        let accel = self.physics.horizontal_acceleration;
        if self.state.steerable() {
            if input.left {
                self.acceleration.x -= accel;
                self.direction = -1;
            }
            if input.right {
                self.acceleration.x += accel;
                self.direction = 1;
            }
        }

        if self.state == MovementState::Climbing {
            self.stamina = (self.stamina - self.physics.wall_run_cost * dt).max(0.0);
            if self.stamina <= 0.0 {
                self.state = MovementState::Normal;
            } else if input.up {
                self.velocity.y = -self.physics.climb_velocity;
            } else if input.down {
                self.velocity.y = self.physics.climb_velocity;
            } else {
                self.velocity.y = 0.0;
            }
        }

        if input.jump_pressed {
            if self.on_ground {
                report.jumped = self.try_jump();
            } else if let Some(side) = self.try_wall_jump() {
                report.wall_jumped = Some(side);
            }
        }

        if input.up && self.try_start_climb() {
            report.climb_started = true;
        }

        if input.dash {
            report.dashed = self.try_dash();
        }

        if input.glide && self.stamina > 0.0 && !self.on_ground {
            self.glide(dt);
        } else if self.state == MovementState::Gliding {
            self.state = MovementState::Normal;
        }

        if input.slide && self.on_ground {
            self.state = MovementState::Sliding;
        } else if self.state == MovementState::Sliding && (!input.slide || !self.on_ground) {
            self.state = MovementState::Normal;
        }
    }

    /// Ground jump. Only fires while standing on something.
    pub fn try_jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity.y = self.physics.jump_velocity;
        self.on_ground = false;
        true
    }

    /// Jump away from an adjacent wall while airborne. Costs stamina.
    /// Returns the side of the wall that was pushed off.
    pub fn try_wall_jump(&mut self) -> Option<WallSide> {
        if self.on_ground || !self.near_wall() || self.stamina <= 0.0 {
            return None;
        }
        self.stamina = (self.stamina - self.physics.wall_jump_cost).max(0.0);
        self.velocity.y = self.physics.wall_jump_velocity;

        let side = if self.wall_left {
            self.velocity.x = self.physics.wall_jump_horizontal_velocity;
            self.direction = 1;
            WallSide::Left
        } else {
            self.velocity.x = -self.physics.wall_jump_horizontal_velocity;
            self.direction = -1;
            WallSide::Right
        };

        self.state = MovementState::Normal;
        self.wall_slide_timer = 0.0;
        Some(side)
    }

    /// Dash in the facing direction. No-op unless the cooldown has elapsed
    /// and there is enough chakra.
    pub fn try_dash(&mut self) -> bool {
        if self.dash_cooldown > 0.0 || self.chakra < self.physics.dash_cost {
            return false;
        }
        self.chakra = (self.chakra - self.physics.dash_cost).max(0.0);
        self.velocity = Vec2::new(f32::from(self.direction), 0.0) * self.physics.dash_velocity;
        self.state = MovementState::Dashing;
        self.dash_cooldown = self.physics.dash_cooldown;
        true
    }

    /// Grab an adjacent wall while airborne. Needs more stamina than one
    /// second of climbing costs.
    pub fn try_start_climb(&mut self) -> bool {
        if self.on_ground
            || !self.near_wall()
            || matches!(
                self.state,
                MovementState::Climbing | MovementState::Dashing
            )
            || self.stamina <= self.physics.wall_run_cost
        {
            return false;
        }
        self.state = MovementState::Climbing;
        self.velocity.y = 0.0;
        self.wall_slide_timer = 0.0;
        true
    }

    fn glide(&mut self, dt: f32) {
        self.state = MovementState::Gliding;
        self.stamina = (self.stamina - self.physics.glide_cost * dt).max(0.0);
        if self.velocity.y > 0.0 {
            self.velocity.y *= self.physics.glide_fall_damping;
        }
    }

    fn integrate(&mut self, dt: f32) {
        self.acceleration.y += self.physics.gravity * self.state.gravity_scale(&self.physics);

        self.velocity += self.acceleration * dt;
        self.acceleration = Vec2::ZERO;

        // Friction is a per-step multiplier, applied regardless of input.
        let friction = if self.on_ground {
            if self.state == MovementState::Sliding {
                self.physics.slide_friction
            } else {
                self.physics.ground_friction
            }
        } else {
            self.physics.air_friction
        };
        self.velocity.x *= friction;
    }

    /// Apply every correction from the collision system, in order. Returns
    /// the number of collisions resolved.
    fn resolve_collisions(&mut self, world: &CollisionSystem) -> usize {
        let collisions = world.detect_collisions(&self.get_rect());

        self.on_ground = false;
        self.wall_left = false;
        self.wall_right = false;
        self.contact = WallContact::default();

        for collision in &collisions {
            self.position += collision.correction;

            match collision.side {
                CollisionSide::Top => {
                    self.on_ground = true;
                    self.velocity.y = 0.0;
                    if self.state != MovementState::Sliding {
                        self.state = MovementState::Normal;
                    }
                    self.wall_slide_timer = 0.0;
                },
                CollisionSide::Bottom => {
                    self.velocity.y = 0.0;
                },
                CollisionSide::Left => {
                    self.contact.right = true;
                    self.velocity.x = self.velocity.x.min(0.0);
                },
                CollisionSide::Right => {
                    self.contact.left = true;
                    self.velocity.x = self.velocity.x.max(0.0);
                },
            }
        }

        self.wall_left = self.contact.left;
        self.wall_right = self.contact.right;
        collisions.len()
    }

    /// Proximity probes, only while airborne. They can add a wall the
    /// collision pass did not report but never clear one it did.
    fn detect_walls(&mut self, world: &CollisionSystem) {
        if !self.on_ground {
            let sensed = sensor::sense_walls(&self.get_rect(), world, &self.physics);
            self.wall_left |= sensed.left;
            self.wall_right |= sensed.right;
        }

        if self.state == MovementState::Climbing && !self.near_wall() {
            self.state = MovementState::Normal;
            self.velocity.y = 0.0;
        }
    }

    fn update_wall_slide(&mut self, dt: f32) {
        if self.near_wall() && !self.on_ground && self.state != MovementState::Climbing {
            if self.state != MovementState::WallSliding {
                self.state = MovementState::WallSliding;
                self.wall_slide_timer = 0.0;
            }

            self.wall_slide_timer += dt;
            let slide_speed = (self.physics.wall_slide_acceleration * self.wall_slide_timer)
                .min(self.physics.max_wall_slide_velocity);
            if self.velocity.y > 0.0 {
                self.velocity.y = slide_speed;
            }

            // Hug the wall: no velocity further into it.
            if self.wall_left {
                self.velocity.x = self.velocity.x.max(0.0);
            } else if self.wall_right {
                self.velocity.x = self.velocity.x.min(0.0);
            }
        } else if self.state == MovementState::WallSliding {
            self.state = MovementState::Normal;
            self.wall_slide_timer = 0.0;
        }
    }

    fn limit_velocity(&mut self) {
        let max_x = self.physics.max_velocity_x;
        let max_y = self.physics.max_velocity_y;
        self.velocity.x = self.velocity.x.clamp(-max_x, max_x);
        self.velocity.y = self.velocity.y.clamp(-max_y, max_y);
    }

    fn update_resources(&mut self, dt: f32) {
        let stamina_rate = if self.on_ground || self.state == MovementState::WallSliding {
            self.physics.stamina_regen
        } else {
            self.physics.air_stamina_regen
        };
        self.stamina = (self.stamina + stamina_rate * dt).clamp(0.0, MAX_RESOURCE);
        self.chakra = (self.chakra + self.physics.chakra_regen * dt).clamp(0.0, MAX_RESOURCE);
    }
}
