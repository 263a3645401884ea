//! Procedural meshes.
//!
//! Generated meshes are centered on the origin with their axis along +Y and
//! both ends capped. Triangles wind counter-clockwise seen from outside.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::error::{Result, SceneError};
use crate::transform::Transform;

/// Object-space triangle mesh with the pose it is drawn at.
#[derive(Debug, Clone, Default)]
pub struct IndexedVertexPositions {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
    /// Model-to-world pose.
    pub transform: Transform,
}

impl IndexedVertexPositions {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn check_params(segments: u32, height: f32, radius: f32) -> Result<()> {
    if segments < 3 {
        return Err(SceneError::InvalidMesh(format!(
            "need at least 3 segments, got {segments}"
        )));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(SceneError::InvalidMesh(format!(
            "height must be positive, got {height}"
        )));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SceneError::InvalidMesh(format!(
            "radius must be positive, got {radius}"
        )));
    }
    Ok(())
}

fn ring(segments: u32, y: f32, radius: f32) -> impl Iterator<Item = Vec3> {
    (0..segments).map(move |i| {
        let angle = TAU * i as f32 / segments as f32;
        Vec3::new(radius * angle.cos(), y, -radius * angle.sin())
    })
}

/// Generates a cone with its base at `-height / 2` and apex at `+height / 2`.
pub fn generate_cone(segments: u32, height: f32, radius: f32) -> Result<IndexedVertexPositions> {
    check_params(segments, height, radius)?;
    let half = height * 0.5;

    // ring, then apex, then base center
    let mut positions: Vec<Vec3> = ring(segments, -half, radius).collect();
    let apex = segments;
    let base = segments + 1;
    positions.push(Vec3::new(0.0, half, 0.0));
    positions.push(Vec3::new(0.0, -half, 0.0));

    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[i, next, apex]);
        indices.extend_from_slice(&[i, base, next]);
    }

    Ok(IndexedVertexPositions {
        positions,
        indices,
        transform: Transform::default(),
    })
}

/// Generates a capped cylinder spanning `-height / 2..=height / 2` along Y.
pub fn generate_cylinder(
    segments: u32,
    height: f32,
    radius: f32,
) -> Result<IndexedVertexPositions> {
    check_params(segments, height, radius)?;
    let half = height * 0.5;

    // bottom ring, top ring, bottom center, top center
    let mut positions: Vec<Vec3> = ring(segments, -half, radius)
        .chain(ring(segments, half, radius))
        .collect();
    let bottom = 2 * segments;
    let top = bottom + 1;
    positions.push(Vec3::new(0.0, -half, 0.0));
    positions.push(Vec3::new(0.0, half, 0.0));

    let mut indices = Vec::with_capacity(segments as usize * 12);
    for i in 0..segments {
        let next = (i + 1) % segments;
        let (b0, b1) = (i, next);
        let (t0, t1) = (i + segments, next + segments);
        indices.extend_from_slice(&[b0, b1, t1]);
        indices.extend_from_slice(&[b0, t1, t0]);
        indices.extend_from_slice(&[b0, bottom, b1]);
        indices.extend_from_slice(&[t0, t1, top]);
    }

    Ok(IndexedVertexPositions {
        positions,
        indices,
        transform: Transform::default(),
    })
}
