//! The selectable objects, their transform table and the current selection.

use glam::Vec3;
use pickscene_core::{
    generate_cone, generate_cylinder, ColoredVertex, DrawBatch, IndexedVertexPositions, ObjectId,
    ObjectIdVertex, ObjectRegistry, Options, Palette, SceneObject, SelectionController,
    TransformMatrixTable,
};

use crate::error::Result;

/// Everything the frame loop draws and picks from.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Registered objects.
    pub registry: ObjectRegistry,
    /// CPU copy of the per-object matrices.
    pub table: TransformMatrixTable,
    /// Click-to-select state.
    pub selection: SelectionController,
}

impl Scene {
    /// Creates an empty scene holding selected objects `reach` units away.
    pub fn new(reach: f32) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            table: TransformMatrixTable::new(),
            selection: SelectionController::new(reach),
        }
    }

    /// A cone and a cylinder side by side in front of the default camera.
    pub fn demo(options: &Options, palette: &Palette) -> Result<Self> {
        let mut scene = Self::new(options.reach);

        let mut cone = generate_cone(10, 1.0, 0.25)?;
        cone.transform.translation = Vec3::new(-1.0, 0.0, -3.0);
        cone.transform.set_euler_angles(Vec3::new(0.3, 0.2, 0.1));
        scene.add("cone", cone, palette.bisque4)?;

        let mut cylinder = generate_cylinder(10, 1.0, 0.25)?;
        cylinder.transform.translation = Vec3::new(1.0, 0.0, -3.0);
        scene.add("cylinder", cylinder, palette.orange)?;

        Ok(scene)
    }

    /// Registers an object and writes its pose into the table.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        mesh: IndexedVertexPositions,
        color: Vec3,
    ) -> Result<ObjectId> {
        let matrix = mesh.transform.to_matrix();
        let id = self.registry.insert(name, mesh, color)?;
        self.table.set(id, matrix);
        Ok(id)
    }

    /// Removes an object, dropping the selection if it was held.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.registry.remove(id)?;
        self.selection.forget(id);
        self.table.reset(id);
        Some(removed)
    }

    /// Copies every object's pose into the table.
    pub fn sync_table(&mut self) {
        self.registry.sync_table(&mut self.table);
    }

    /// Queues every object into the id-pass batch.
    pub fn queue_id_pass(&self, batch: &mut DrawBatch<ObjectIdVertex>) {
        for object in self.registry.iter() {
            batch.queue_draw(
                object.id(),
                &object.mesh.indices,
                &object.mesh.positions,
                &object.object_id_tags(),
            );
        }
    }

    /// Queues every object into the colored batch.
    pub fn queue_colored(&self, batch: &mut DrawBatch<ColoredVertex>) {
        for object in self.registry.iter() {
            batch.queue_draw(
                object.id(),
                &object.mesh.indices,
                &object.mesh.positions,
                &object.vertex_colors(),
                &object.object_id_tags(),
            );
        }
    }
}
