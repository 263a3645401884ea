//! Object registry for managing selectable scene objects.

use glam::Vec3;

use crate::error::{Result, SceneError};
use crate::matrix_table::{TransformMatrixTable, CAPACITY};
use crate::mesh::IndexedVertexPositions;
use crate::object::{ObjectId, SceneObject};

/// Arena of scene objects indexed by [`ObjectId`].
///
/// Ids are handed out sequentially starting at 1. A removed id is not handed
/// out again, so a stale id can never alias a newer object.
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    slots: Vec<Option<SceneObject>>,
    next_id: u32,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            // slot 0 stays empty forever
            slots: vec![None],
            next_id: ObjectId::FIRST.get(),
        }
    }

    /// Registers an object and returns its id.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        mesh: IndexedVertexPositions,
        color: Vec3,
    ) -> Result<ObjectId> {
        if self.next_id as usize >= CAPACITY {
            return Err(SceneError::RegistryFull {
                capacity: CAPACITY - 1,
            });
        }
        let id = ObjectId::new(self.next_id)?;
        self.next_id += 1;

        let object = SceneObject::new(id, name, mesh, color);
        log::debug!("registered object {id} ({})", object.name());
        self.slots.push(Some(object));
        Ok(id)
    }

    /// Gets an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Gets a mutable reference to an object by id.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Like [`Self::get_mut`], but reports a missing object as an error.
    pub fn try_get_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.get_mut(id).ok_or(SceneError::UnknownObject(id.get()))
    }

    /// Checks if an object is registered under `id`.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Removes an object. Its id is retired.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.slots.get_mut(id.index()).and_then(Option::take);
        if removed.is_some() {
            log::debug!("removed object {id}");
        }
        removed
    }

    /// Iterates over registered objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Iterates mutably over registered objects in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Returns the number of registered objects.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Writes every object's current pose into its table slot.
    pub fn sync_table(&self, table: &mut TransformMatrixTable) {
        for object in self.iter() {
            table.set(object.id(), object.transform().to_matrix());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generate_cylinder;
    use glam::Mat4;

    fn mesh() -> IndexedVertexPositions {
        generate_cylinder(4, 1.0, 0.5).unwrap()
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut registry = ObjectRegistry::new();
        let a = registry.insert("a", mesh(), Vec3::ONE).unwrap();
        let b = registry.insert("b", mesh(), Vec3::ONE).unwrap();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(registry.get(b).unwrap().name(), "b");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut registry = ObjectRegistry::new();
        let a = registry.insert("a", mesh(), Vec3::ONE).unwrap();
        assert!(registry.remove(a).is_some());
        assert!(!registry.contains(a));
        assert!(registry.remove(a).is_none());

        let b = registry.insert("b", mesh(), Vec3::ONE).unwrap();
        assert_ne!(a, b);
        assert!(registry.get(a).is_none());
        assert!(matches!(
            registry.try_get_mut(a),
            Err(SceneError::UnknownObject(1))
        ));
    }

    #[test]
    fn test_registry_full() {
        let mut registry = ObjectRegistry::new();
        for _ in 1..CAPACITY {
            registry
                .insert("o", IndexedVertexPositions::default(), Vec3::ONE)
                .unwrap();
        }
        assert!(matches!(
            registry.insert("extra", IndexedVertexPositions::default(), Vec3::ONE),
            Err(SceneError::RegistryFull { .. })
        ));
        assert_eq!(registry.iter().last().unwrap().id(), ObjectId::LAST);
    }

    #[test]
    fn test_sync_table() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert("a", mesh(), Vec3::ONE).unwrap();
        registry.get_mut(id).unwrap().transform_mut().translation = Vec3::new(0.0, 0.0, -3.0);

        let mut table = TransformMatrixTable::new();
        registry.sync_table(&mut table);
        assert_eq!(
            table.get(id),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0))
        );
        assert_eq!(table.as_slice()[0], Mat4::IDENTITY);
    }
}
