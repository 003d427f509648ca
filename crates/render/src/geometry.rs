//! CPU-side tessellation of scenes and text lines into colored triangles.
//!
//! Everything the viewer draws goes through a single triangle-list pipeline,
//! so discs, rings, the world border and overlay glyphs all end up as
//! [`Vertex`] triples in clip space.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use control::{Scene, Shape, TextLine};
use glam::Vec2;

use crate::font::{self, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Segments used to approximate a circle.
pub const CIRCLE_SEGMENTS: usize = 24;
/// Vertices emitted for the world border.
pub const BORDER_VERTICES: usize = 4 * 6;

/// Ring thickness as a fraction of the radius.
const RING_WIDTH: f32 = 0.3;
/// Radius of the selection ring relative to the highlighted shape.
const HIGHLIGHT_SCALE: f32 = 1.45;
const HIGHLIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const BORDER_COLOR: [f32; 3] = [0.35, 0.35, 0.4];
/// Border thickness as a fraction of the world extent.
const BORDER_WIDTH: f32 = 0.01;

const TEXT_COLOR: [f32; 3] = [0.92, 0.92, 0.92];
/// Distance in pixels between the window edge and the overlay.
const TEXT_MARGIN: f32 = 8.0;
const LINE_SPACING: f32 = 1.3;
const TAB_WIDTH: usize = 4;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
/// Vertex format consumed by `shader.wgsl`.
pub struct Vertex {
    /// Clip-space position.
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Maps world coordinates into clip space, letterboxing so the square world
/// keeps its aspect ratio in any window shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    scale: Vec2,
}

impl Projection {
    pub fn new(extent: f32, width: u32, height: u32) -> Self {
        let extent = if extent > 0.0 { extent } else { 1.0 };
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let scale = if aspect >= 1.0 {
            Vec2::new(1.0 / (extent * aspect), 1.0 / extent)
        } else {
            Vec2::new(1.0 / extent, aspect / extent)
        };
        Self { scale }
    }

    pub fn to_clip(&self, world: Vec2) -> [f32; 2] {
        (world * self.scale).to_array()
    }
}

/// Growable vertex list rebuilt every frame.
#[derive(Debug, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends the world border, every shape in draw order and the selection
    /// ring around the highlighted shape.
    pub fn push_scene(&mut self, scene: &Scene, width: u32, height: u32) {
        let projection = Projection::new(scene.extent, width, height);
        self.push_border(&projection, scene.extent);
        for shape in &scene.shapes {
            if shape.hollow {
                self.push_ring(&projection, shape, shape.radius, shape.color);
            } else {
                self.push_disc(&projection, shape);
            }
        }
        if let Some(shape) = scene.highlighted.and_then(|i| scene.shapes.get(i)) {
            self.push_ring(&projection, shape, shape.radius * HIGHLIGHT_SCALE, HIGHLIGHT_COLOR);
        }
    }

    /// Appends glyph quads for every line. Line `index` 0 sits at the bottom
    /// of the window and higher indices stack upward.
    pub fn push_text(&mut self, lines: &[TextLine], width: u32, height: u32) {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let to_clip = |x: f32, y: f32| [x / w * 2.0 - 1.0, y / h * 2.0 - 1.0];

        for line in lines {
            let size = line.font_size.max(1) as f32;
            let cell = size / GLYPH_HEIGHT as f32;
            let baseline = TEXT_MARGIN + line.index as f32 * size * LINE_SPACING;

            for (column, c) in expand_tabs(&line.message).enumerate() {
                let left = TEXT_MARGIN + (column * GLYPH_ADVANCE) as f32 * cell;
                for gx in 0..GLYPH_WIDTH {
                    for gy in 0..GLYPH_HEIGHT {
                        if !font::is_lit(c, gx, gy) {
                            continue;
                        }
                        let x = left + gx as f32 * cell;
                        let y = baseline + (GLYPH_HEIGHT - 1 - gy) as f32 * cell;
                        self.quad(to_clip(x, y), to_clip(x + cell, y + cell), TEXT_COLOR);
                    }
                }
            }
        }
    }

    fn push_border(&mut self, projection: &Projection, extent: f32) {
        let e = extent;
        let t = extent * BORDER_WIDTH;
        let edges = [
            (Vec2::new(-e, -e), Vec2::new(e, -e + t)),
            (Vec2::new(-e, e - t), Vec2::new(e, e)),
            (Vec2::new(-e, -e), Vec2::new(-e + t, e)),
            (Vec2::new(e - t, -e), Vec2::new(e, e)),
        ];
        for (min, max) in edges {
            self.quad(projection.to_clip(min), projection.to_clip(max), BORDER_COLOR);
        }
    }

    fn push_disc(&mut self, projection: &Projection, shape: &Shape) {
        let center = Vec2::from(shape.position);
        let c = projection.to_clip(center);
        for (a, b) in circle_edges(center, shape.radius) {
            self.triangle(c, projection.to_clip(a), projection.to_clip(b), shape.color);
        }
    }

    fn push_ring(&mut self, projection: &Projection, shape: &Shape, radius: f32, color: [f32; 3]) {
        let center = Vec2::from(shape.position);
        let outer = circle_edges(center, radius);
        let inner = circle_edges(center, radius * (1.0 - RING_WIDTH));
        for ((o0, o1), (i0, i1)) in outer.zip(inner) {
            let [o0, o1, i0, i1] = [o0, o1, i0, i1].map(|p| projection.to_clip(p));
            self.triangle(o0, o1, i1, color);
            self.triangle(o0, i1, i0, color);
        }
    }

    fn quad(&mut self, min: [f32; 2], max: [f32; 2], color: [f32; 3]) {
        let (a, b, c, d) = (min, [max[0], min[1]], max, [min[0], max[1]]);
        self.triangle(a, b, c, color);
        self.triangle(a, c, d, color);
    }

    fn triangle(&mut self, a: [f32; 2], b: [f32; 2], c: [f32; 2], color: [f32; 3]) {
        self.vertices.extend([a, b, c].map(|position| Vertex { position, color }));
    }
}

/// Consecutive point pairs around a circle.
fn circle_edges(center: Vec2, radius: f32) -> impl Iterator<Item = (Vec2, Vec2)> {
    let point = move |i: usize| {
        let angle = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
        center + Vec2::from_angle(angle) * radius
    };
    (0..CIRCLE_SEGMENTS).map(move |i| (point(i), point(i + 1)))
}

fn expand_tabs(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(|c| {
        let (c, n) = if c == '\t' { (' ', TAB_WIDTH) } else { (c, 1) };
        std::iter::repeat(c).take(n)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(hollow: bool) -> Shape {
        Shape {
            position: [0.5, -0.5],
            radius: 0.1,
            color: [1.0, 0.0, 0.0],
            hollow,
        }
    }

    fn scene(shapes: Vec<Shape>, highlighted: Option<usize>) -> Scene {
        Scene {
            extent: 1.0,
            shapes,
            highlighted,
        }
    }

    #[test]
    fn square_viewport_maps_extent_to_unit_clip() {
        let projection = Projection::new(2.0, 600, 600);
        assert_eq!(projection.to_clip(Vec2::new(2.0, -2.0)), [1.0, -1.0]);
    }

    #[test]
    fn wide_viewport_letterboxes_horizontally() {
        let projection = Projection::new(1.0, 800, 400);
        assert_eq!(projection.to_clip(Vec2::new(1.0, 1.0)), [0.5, 1.0]);
        let tall = Projection::new(1.0, 400, 800);
        assert_eq!(tall.to_clip(Vec2::new(1.0, 1.0)), [1.0, 0.5]);
    }

    #[test]
    fn filled_and_hollow_shapes_have_expected_vertex_counts() {
        let mut mesh = Mesh::new();
        mesh.push_scene(&scene(vec![shape(false)], None), 100, 100);
        assert_eq!(mesh.len(), BORDER_VERTICES + 3 * CIRCLE_SEGMENTS);

        mesh.clear();
        mesh.push_scene(&scene(vec![shape(true)], None), 100, 100);
        assert_eq!(mesh.len(), BORDER_VERTICES + 6 * CIRCLE_SEGMENTS);
    }

    #[test]
    fn highlight_adds_a_white_ring() {
        let mut mesh = Mesh::new();
        mesh.push_scene(&scene(vec![shape(false)], Some(0)), 100, 100);
        assert_eq!(mesh.len(), BORDER_VERTICES + 9 * CIRCLE_SEGMENTS);
        assert!(mesh.vertices().last().is_some_and(|v| v.color == HIGHLIGHT_COLOR));
    }

    #[test]
    fn out_of_range_highlight_is_ignored() {
        let mut mesh = Mesh::new();
        mesh.push_scene(&scene(vec![shape(false)], Some(3)), 100, 100);
        assert_eq!(mesh.len(), BORDER_VERTICES + 3 * CIRCLE_SEGMENTS);
    }

    #[test]
    fn text_quads_stay_on_screen_and_stack_upward() {
        let mut line = TextLine::new(0);
        line.set_text("Rew: 0.125", 15);
        let mut above = TextLine::new(1);
        above.set_text("Rew: 0.125", 15);

        let mut low = Mesh::new();
        low.push_text(&[line], 640, 480);
        let mut high = Mesh::new();
        high.push_text(&[above], 640, 480);

        assert!(!low.is_empty());
        assert_eq!(low.len(), high.len());
        assert!(low
            .vertices()
            .iter()
            .all(|v| v.position.iter().all(|p| (-1.0..=1.0).contains(p))));
        let top = |m: &Mesh| m.vertices().iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!(top(&high) > top(&low));
    }

    #[test]
    fn period_lights_four_cells() {
        let mut line = TextLine::new(0);
        line.set_text(".", 8);
        let mut mesh = Mesh::new();
        mesh.push_text(&[line], 100, 100);
        assert_eq!(mesh.len(), 4 * 6);
    }

    #[test]
    fn tabs_expand_to_spaces() {
        assert_eq!(expand_tabs("\t\tx").collect::<String>(), "        x");
    }
}
