//! Initial placement of agents, goals and obstacles for each scenario.

use glam::Vec2;

/// Half-width of the square world.
pub const WORLD_EXTENT: f32 = 1.0;
/// Radius of every agent body.
pub const AGENT_RADIUS: f32 = 0.05;

/// Margin kept between spawned entities and the boundary.
const SPAWN_MARGIN: f32 = 0.15;
/// Attempts to find a non-overlapping random spot before accepting overlap.
const MAX_PLACEMENT_TRIES: usize = 100;

/// A static circular obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
}

/// Starting state of a scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub starts: Vec<Vec2>,
    pub goals: Vec<Vec2>,
    pub obstacles: Vec<Obstacle>,
}

/// Agents in a row at the top, goals straight below them, obstacles between.
pub fn waterfall(n_agents: usize, _rng: &mut fastrand::Rng) -> Layout {
    let top = WORLD_EXTENT - SPAWN_MARGIN - 0.05;
    let span = 2.0 * (WORLD_EXTENT - SPAWN_MARGIN - 0.05);
    #[allow(clippy::cast_precision_loss)]
    let columns: Vec<f32> = (0..n_agents)
        .map(|i| -span / 2.0 + span * (i as f32 + 0.5) / n_agents as f32)
        .collect();

    Layout {
        starts: columns.iter().map(|x| Vec2::new(*x, top)).collect(),
        goals: columns.iter().map(|x| Vec2::new(*x, -top)).collect(),
        obstacles: vec![
            Obstacle {
                pos: Vec2::new(-0.4, 0.1),
                radius: 0.12,
            },
            Obstacle {
                pos: Vec2::new(0.4, 0.1),
                radius: 0.12,
            },
            Obstacle {
                pos: Vec2::new(0.0, -0.25),
                radius: 0.12,
            },
        ],
    }
}

/// Agents and goals scattered uniformly, without obstacles.
pub fn navigation(n_agents: usize, rng: &mut fastrand::Rng) -> Layout {
    let mut taken = Vec::with_capacity(2 * n_agents);
    let starts = (0..n_agents).map(|_| place(rng, &mut taken)).collect();
    let goals = (0..n_agents).map(|_| place(rng, &mut taken)).collect();
    Layout {
        starts,
        goals,
        obstacles: Vec::new(),
    }
}

fn place(rng: &mut fastrand::Rng, taken: &mut Vec<Vec2>) -> Vec2 {
    let limit = WORLD_EXTENT - SPAWN_MARGIN;
    let min_spacing = 3.0 * AGENT_RADIUS;
    let mut candidate = Vec2::ZERO;
    for _ in 0..MAX_PLACEMENT_TRIES {
        candidate = Vec2::new(
            (rng.f32() * 2.0 - 1.0) * limit,
            (rng.f32() * 2.0 - 1.0) * limit,
        );
        if taken.iter().all(|p| p.distance(candidate) >= min_spacing) {
            break;
        }
    }
    taken.push(candidate);
    candidate
}
