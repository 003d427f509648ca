//! # Point-Mass World
//!
//! Semi-implicit Euler integration with per-step damping, impulse-based
//! collision response between agents, static obstacles and the boundary.

use std::collections::BTreeMap;

use control::{Action, ActionSpace, AgentDescriptor, EnvError, Environment, Scene, Shape, Step};
use glam::Vec2;

use crate::layout::{Layout, Obstacle, AGENT_RADIUS, WORLD_EXTENT};
use crate::ScenarioConfig;

/// Integration time step.
const DT: f32 = 0.1;
/// Velocity retained after each step.
const DAMPING_FACTOR: f32 = 0.75;
/// Force applied by a full-strength action.
const ACTION_FORCE: f32 = 1.0;
/// Bounciness of all contacts.
const RESTITUTION: f32 = 0.5;
/// An agent closer than this to its goal has reached it.
const GOAL_TOLERANCE: f32 = AGENT_RADIUS;

const POSITION_CORRECTION_PERCENT: f32 = 0.8;
const POSITION_CORRECTION_SLOP: f32 = 0.001;

const OBSTACLE_COLOR: [f32; 3] = [0.45, 0.45, 0.45];
const PALETTE: [[f32; 3]; 6] = [
    [0.35, 0.35, 0.85],
    [0.85, 0.35, 0.35],
    [0.35, 0.75, 0.35],
    [0.85, 0.75, 0.25],
    [0.65, 0.35, 0.85],
    [0.25, 0.75, 0.85],
];

/// A dynamic circular body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
}

impl Body {
    #[must_use]
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: AGENT_RADIUS,
            mass: 1.0,
        }
    }
}

/// Builds the initial layout of a scenario.
pub type LayoutFn = fn(usize, &mut fastrand::Rng) -> Layout;

/// A multi-agent scenario implementing [`Environment`].
#[derive(Debug)]
pub struct World {
    build: LayoutFn,
    config: ScenarioConfig,
    rng: fastrand::Rng,
    agents: Vec<AgentDescriptor>,
    bodies: Vec<Body>,
    goals: Vec<Vec2>,
    obstacles: Vec<Obstacle>,
    distances: Vec<f32>,
    reached: Vec<bool>,
    steps: u32,
}

impl World {
    /// Creates a world laid out by `build` and resets it.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] for zero agents or a zero step horizon.
    pub fn new(build: LayoutFn, config: &ScenarioConfig) -> Result<Self, EnvError> {
        if config.n_agents == 0 {
            return Err(EnvError::Config("at least one agent is required".into()));
        }
        if config.max_steps == 0 {
            return Err(EnvError::Config("max_steps must be positive".into()));
        }
        let agents = (0..config.n_agents)
            .map(|i| AgentDescriptor::new(format!("agent_{i}"), PALETTE[i % PALETTE.len()]))
            .collect();
        let mut world = Self {
            build,
            config: config.clone(),
            rng: fastrand::Rng::with_seed(config.seed),
            agents,
            bodies: Vec::new(),
            goals: Vec::new(),
            obstacles: Vec::new(),
            distances: Vec::new(),
            reached: Vec::new(),
            steps: 0,
        };
        world.reset()?;
        Ok(world)
    }

    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[must_use]
    pub fn goals(&self) -> &[Vec2] {
        &self.goals
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    fn observation(&self, agent: usize) -> Vec<f32> {
        let body = &self.bodies[agent];
        let to_goal = self.goals[agent] - body.pos;
        vec![body.pos.x, body.pos.y, body.vel.x, body.vel.y, to_goal.x, to_goal.y]
    }

    fn force(&self, agent: usize, action: &Action) -> Result<Vec2, EnvError> {
        let space = self.action_space();
        match (space, action) {
            (ActionSpace::Discrete, Action::Discrete(a)) => {
                Ok(Vec2::from_array(a.direction()) * ACTION_FORCE)
            }
            (ActionSpace::Continuous, Action::Continuous(u)) => {
                let clamped = Vec2::from_array(*u).clamp(Vec2::NEG_ONE, Vec2::ONE);
                Ok(if clamped.is_finite() { clamped * ACTION_FORCE } else { Vec2::ZERO })
            }
            _ => Err(EnvError::ActionKind {
                agent,
                expected: space.name(),
                got: action.kind(),
            }),
        }
    }

    fn integrate(&mut self, forces: &[Vec2]) {
        for (body, force) in self.bodies.iter_mut().zip(forces) {
            body.vel += *force / body.mass * DT;
            body.pos += body.vel * DT;
            body.vel *= DAMPING_FACTOR;
        }
    }

    fn resolve_collisions(&mut self) {
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (head, tail) = self.bodies.split_at_mut(j);
                resolve_body_pair(&mut head[i], &mut tail[0]);
            }
        }
        for body in &mut self.bodies {
            for obstacle in &self.obstacles {
                resolve_body_obstacle(body, obstacle);
            }
            resolve_boundary(body, WORLD_EXTENT);
        }
    }
}

impl Environment for World {
    fn reset(&mut self) -> Result<(), EnvError> {
        let layout = (self.build)(self.config.n_agents, &mut self.rng);
        if layout.starts.len() != self.config.n_agents
            || layout.goals.len() != self.config.n_agents
        {
            return Err(EnvError::Config(format!(
                "layout placed {} agents and {} goals for {} agents",
                layout.starts.len(),
                layout.goals.len(),
                self.config.n_agents
            )));
        }
        self.bodies = layout.starts.iter().copied().map(Body::at).collect();
        self.goals = layout.goals;
        self.obstacles = layout.obstacles;
        self.distances = self
            .bodies
            .iter()
            .zip(&self.goals)
            .map(|(body, goal)| body.pos.distance(*goal))
            .collect();
        self.reached = vec![false; self.config.n_agents];
        self.steps = 0;
        tracing::debug!("World reset with {} agents", self.bodies.len());
        Ok(())
    }

    fn step(&mut self, actions: &[Action]) -> Result<Step, EnvError> {
        if actions.len() != self.agents.len() {
            return Err(EnvError::ActionCount {
                expected: self.agents.len(),
                got: actions.len(),
            });
        }
        let forces = actions
            .iter()
            .enumerate()
            .map(|(agent, action)| self.force(agent, action))
            .collect::<Result<Vec<_>, _>>()?;

        self.integrate(&forces);
        self.resolve_collisions();
        self.steps += 1;

        let mut rewards = Vec::with_capacity(self.bodies.len());
        let mut info = Vec::with_capacity(self.bodies.len());
        for agent in 0..self.bodies.len() {
            let distance = self.bodies[agent].pos.distance(self.goals[agent]);
            rewards.push(self.distances[agent] - distance);
            self.distances[agent] = distance;
            if distance < GOAL_TOLERANCE {
                self.reached[agent] = true;
            }
            info.push(BTreeMap::from([
                ("distance".to_owned(), distance),
                ("reached".to_owned(), f32::from(u8::from(self.reached[agent]))),
            ]));
        }

        let done = self.reached.iter().all(|r| *r) || self.steps >= self.config.max_steps;
        let observations = (0..self.bodies.len()).map(|a| self.observation(a)).collect();

        Ok(Step {
            observations,
            rewards,
            dones: vec![done; self.bodies.len()],
            info,
        })
    }

    fn agent_count(&self) -> usize {
        self.agents.len()
    }

    fn continuous_actions(&self) -> bool {
        self.config.continuous_actions
    }

    fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    fn scene(&self, selected: usize) -> Scene {
        let mut shapes = Vec::with_capacity(self.obstacles.len() + 2 * self.bodies.len());
        shapes.extend(self.obstacles.iter().map(|o| Shape {
            position: o.pos.to_array(),
            radius: o.radius,
            color: OBSTACLE_COLOR,
            hollow: false,
        }));
        shapes.extend(self.goals.iter().zip(&self.agents).map(|(goal, agent)| Shape {
            position: goal.to_array(),
            radius: GOAL_TOLERANCE,
            color: agent.color,
            hollow: true,
        }));
        let first_agent = shapes.len();
        shapes.extend(self.bodies.iter().zip(&self.agents).map(|(body, agent)| Shape {
            position: body.pos.to_array(),
            radius: body.radius,
            color: agent.color,
            hollow: false,
        }));
        Scene {
            extent: WORLD_EXTENT,
            shapes,
            highlighted: (selected < self.bodies.len()).then_some(first_agent + selected),
        }
    }
}

/// Impulse response plus penetration correction between two bodies.
fn resolve_body_pair(a: &mut Body, b: &mut Body) {
    let delta = b.pos - a.pos;
    let min_distance = a.radius + b.radius;
    let distance_squared = delta.length_squared();
    if distance_squared >= min_distance * min_distance {
        return;
    }
    let distance = distance_squared.sqrt();
    let normal = if distance > 0.0001 { delta / distance } else { Vec2::Y };
    let depth = min_distance - distance;
    let inv_mass_sum = 1.0 / a.mass + 1.0 / b.mass;

    let velocity_along_normal = (b.vel - a.vel).dot(normal);
    if velocity_along_normal < 0.0 {
        let j = -(1.0 + RESTITUTION) * velocity_along_normal / inv_mass_sum;
        let impulse = normal * j;
        a.vel -= impulse / a.mass;
        b.vel += impulse / b.mass;
    }

    let correction_depth = (depth - POSITION_CORRECTION_SLOP).max(0.0);
    let correction = normal * (correction_depth / inv_mass_sum * POSITION_CORRECTION_PERCENT);
    a.pos -= correction / a.mass;
    b.pos += correction / b.mass;
}

/// Response against an immovable obstacle.
fn resolve_body_obstacle(body: &mut Body, obstacle: &Obstacle) {
    let delta = body.pos - obstacle.pos;
    let min_distance = body.radius + obstacle.radius;
    let distance = delta.length();
    if distance >= min_distance {
        return;
    }
    let normal = if distance > 0.0001 { delta / distance } else { Vec2::Y };
    let velocity_along_normal = body.vel.dot(normal);
    if velocity_along_normal < 0.0 {
        body.vel -= normal * (1.0 + RESTITUTION) * velocity_along_normal;
    }
    body.pos = obstacle.pos + normal * min_distance;
}

/// Keeps a body inside the square `[-extent, extent]^2`.
fn resolve_boundary(body: &mut Body, extent: f32) {
    let limit = extent - body.radius;
    if body.pos.x.abs() > limit {
        body.pos.x = body.pos.x.clamp(-limit, limit);
        body.vel.x *= -RESTITUTION;
    }
    if body.pos.y.abs() > limit {
        body.pos.y = body.pos.y.clamp(-limit, limit);
        body.vel.y *= -RESTITUTION;
    }
}
