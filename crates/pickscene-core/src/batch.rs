//! CPU-side staging for batched draws.
//!
//! A [`DrawBatch`] collects the draw requests of one shader configuration for
//! one pass. Each request carries request-local indices; when the batch is
//! taken for flushing those indices are offset into one shared vertex array,
//! so the whole pass costs a single indexed draw. Per-object identity survives
//! the merge through the object id tag every vertex carries.
//!
//! Requests are keyed by [`ObjectId`]. Queuing an id a second time before the
//! flush replaces that request's geometry but keeps its place in the draw
//! order, so the order of first submission is what the GPU sees.

use std::collections::HashMap;

use glam::Vec3;

use crate::error::BatchError;
use crate::object::ObjectId;
use crate::vertex::{ColoredVertex, ObjectIdVertex};

/// Where one request landed inside a [`PreparedBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    /// The object the request was queued for.
    pub object_id: ObjectId,
    /// 1-based position of the request in the flush.
    pub draw_id: u32,
    /// Offset of the request's first vertex in the shared vertex array.
    pub base_vertex: u32,
    /// Number of vertices the request contributed.
    pub vertex_count: u32,
    /// Offset of the request's first index in the shared index array.
    pub first_index: u32,
    /// Number of indices the request contributed.
    pub index_count: u32,
}

/// Counters describing one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Requests drawn.
    pub requests: usize,
    /// Vertices uploaded.
    pub vertices: usize,
    /// Indices uploaded.
    pub indices: usize,
    /// GPU draw calls issued.
    pub draw_calls: u32,
}

/// Everything queued since the last flush, merged into shared arrays.
#[derive(Debug, Clone)]
pub struct PreparedBatch<V> {
    /// All vertices in queue order.
    pub vertices: Vec<V>,
    /// All indices, already offset into `vertices`.
    pub indices: Vec<u32>,
    /// One entry per request, in draw order.
    pub ranges: Vec<DrawRange>,
}

impl<V> PreparedBatch<V> {
    /// Returns true if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Stats for flushing this batch with `draw_calls` GPU calls.
    pub fn stats(&self, draw_calls: u32) -> FlushStats {
        FlushStats {
            requests: self.ranges.len(),
            vertices: self.vertices.len(),
            indices: self.indices.len(),
            draw_calls,
        }
    }
}

#[derive(Debug, Clone)]
struct StagedRequest<V> {
    object_id: ObjectId,
    vertices: Vec<V>,
    indices: Vec<u32>,
}

/// Per-pass accumulation of draw requests for one vertex format.
#[derive(Debug, Clone)]
pub struct DrawBatch<V> {
    requests: Vec<StagedRequest<V>>,
    slots: HashMap<ObjectId, usize>,
}

impl<V> Default for DrawBatch<V> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<V: Copy> DrawBatch<V> {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing has been queued since the last flush.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Number of queued requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Total queued vertices.
    pub fn vertex_count(&self) -> usize {
        self.requests.iter().map(|r| r.vertices.len()).sum()
    }

    /// Total queued indices.
    pub fn index_count(&self) -> usize {
        self.requests.iter().map(|r| r.indices.len()).sum()
    }

    /// Object ids in draw order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.requests.iter().map(|r| r.object_id)
    }

    /// Drops everything queued without drawing it.
    pub fn clear(&mut self) {
        self.requests.clear();
        self.slots.clear();
    }

    /// Merges everything queued into shared arrays and empties the batch.
    pub fn take(&mut self) -> PreparedBatch<V> {
        let mut prepared = PreparedBatch {
            vertices: Vec::with_capacity(self.vertex_count()),
            indices: Vec::with_capacity(self.index_count()),
            ranges: Vec::with_capacity(self.requests.len()),
        };

        for (slot, request) in self.requests.drain(..).enumerate() {
            let base_vertex = prepared.vertices.len() as u32;
            let first_index = prepared.indices.len() as u32;
            prepared
                .indices
                .extend(request.indices.iter().map(|i| i + base_vertex));
            prepared.ranges.push(DrawRange {
                object_id: request.object_id,
                draw_id: slot as u32 + 1,
                base_vertex,
                vertex_count: request.vertices.len() as u32,
                first_index,
                index_count: request.indices.len() as u32,
            });
            prepared.vertices.extend(request.vertices);
        }
        self.slots.clear();

        prepared
    }

    /// Stages already-validated geometry. `build` receives the request's draw id.
    fn stage(&mut self, object_id: ObjectId, indices: &[u32], build: impl FnOnce(u32) -> Vec<V>) {
        let slot = match self.slots.get(&object_id) {
            Some(&slot) => {
                log::trace!("replacing queued draw for object {object_id}");
                slot
            }
            None => {
                self.requests.push(StagedRequest {
                    object_id,
                    vertices: Vec::new(),
                    indices: Vec::new(),
                });
                let slot = self.requests.len() - 1;
                self.slots.insert(object_id, slot);
                slot
            }
        };

        let request = &mut self.requests[slot];
        request.vertices = build(slot as u32 + 1);
        request.indices = indices.to_vec();
    }
}

impl DrawBatch<ObjectIdVertex> {
    /// Queues an id-pass draw.
    ///
    /// # Panics
    ///
    /// Panics if the request is malformed (see [`Self::try_queue_draw`]).
    pub fn queue_draw(
        &mut self,
        object_id: ObjectId,
        indices: &[u32],
        positions: &[Vec3],
        object_id_tags: &[u32],
    ) {
        if let Err(e) = self.try_queue_draw(object_id, indices, positions, object_id_tags) {
            panic!("draw batch: {e}");
        }
    }

    /// Queues an id-pass draw, returning an error instead of panicking on a
    /// malformed request.
    pub fn try_queue_draw(
        &mut self,
        object_id: ObjectId,
        indices: &[u32],
        positions: &[Vec3],
        object_id_tags: &[u32],
    ) -> Result<(), BatchError> {
        validate_request(object_id, indices, positions.len(), &[], object_id_tags)?;
        let tag = object_id.get();
        self.stage(object_id, indices, |draw_id| {
            positions
                .iter()
                .map(|&p| ObjectIdVertex::new(p, tag, draw_id))
                .collect()
        });
        Ok(())
    }
}

impl DrawBatch<ColoredVertex> {
    /// Queues a colored draw.
    ///
    /// # Panics
    ///
    /// Panics if the request is malformed (see [`Self::try_queue_draw`]).
    pub fn queue_draw(
        &mut self,
        object_id: ObjectId,
        indices: &[u32],
        positions: &[Vec3],
        colors: &[Vec3],
        object_id_tags: &[u32],
    ) {
        if let Err(e) = self.try_queue_draw(object_id, indices, positions, colors, object_id_tags)
        {
            panic!("draw batch: {e}");
        }
    }

    /// Queues a colored draw, returning an error instead of panicking on a
    /// malformed request.
    pub fn try_queue_draw(
        &mut self,
        object_id: ObjectId,
        indices: &[u32],
        positions: &[Vec3],
        colors: &[Vec3],
        object_id_tags: &[u32],
    ) -> Result<(), BatchError> {
        validate_request(
            object_id,
            indices,
            positions.len(),
            &[("colors", colors.len())],
            object_id_tags,
        )?;
        let tag = object_id.get();
        self.stage(object_id, indices, |_| {
            positions
                .iter()
                .zip(colors)
                .map(|(&p, &c)| ColoredVertex::new(p, c, tag))
                .collect()
        });
        Ok(())
    }
}

/// Checks one request against the batch contract.
fn validate_request(
    object_id: ObjectId,
    indices: &[u32],
    vertex_count: usize,
    attributes: &[(&'static str, usize)],
    object_id_tags: &[u32],
) -> Result<(), BatchError> {
    for &(attribute, actual) in attributes
        .iter()
        .chain(std::iter::once(&("object_id_tags", object_id_tags.len())))
    {
        if actual != vertex_count {
            return Err(BatchError::AttributeLengthMismatch {
                attribute,
                expected: vertex_count,
                actual,
            });
        }
    }

    if let Some((vertex, &found)) = object_id_tags
        .iter()
        .enumerate()
        .find(|&(_, &tag)| tag != object_id.get())
    {
        return Err(BatchError::ObjectIdTagMismatch {
            vertex,
            expected: object_id.get(),
            found,
        });
    }

    if indices.len() % 3 != 0 {
        return Err(BatchError::IncompleteTriangle(indices.len()));
    }

    if let Some((position, &value)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= vertex_count)
    {
        return Err(BatchError::IndexOutOfRange {
            position,
            value,
            vertex_count,
        });
    }

    Ok(())
}
