use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Unique identifier for an entity in the world.
///
/// Ids are handed out in increasing order, so ordering by id is spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

type Storage = BTreeMap<EntityId, Box<dyn Any>>;

/// Entity container with typed component storage.
///
/// - Entities are identified by `EntityId`
/// - Components are stored in type-based maps keyed by `EntityId`
/// - Iteration over a component type is in spawn order, so a level plays
///   back the same way every run
pub struct World {
    next_id: u32,
    alive: BTreeSet<EntityId>,
    storages: HashMap<TypeId, Storage>,
}

impl World {
    /// Create a new, empty world.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            alive: BTreeSet::new(),
            storages: HashMap::new(),
        }
    }

    /// Spawn a new entity and return its `EntityId`.
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    /// Despawn an entity, removing it and all of its components.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }

        for storage in self.storages.values_mut() {
            storage.remove(&entity);
        }

        true
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    /// Number of alive entities.
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Returns true if there are no entities in the world.
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Insert a component of type `T` for an entity, overwriting any existing component of that type.
    pub fn insert<T: Any>(&mut self, entity: EntityId, component: T) {
        self.storages
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(entity, Box::new(component));
    }

    /// Remove and return a component of type `T` for an entity, if it exists.
    pub fn remove<T: Any>(&mut self, entity: EntityId) -> Option<T> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .remove(&entity)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Get an immutable reference to a component of type `T` for an entity.
    pub fn get<T: Any>(&self, entity: EntityId) -> Option<&T> {
        self.storages
            .get(&TypeId::of::<T>())?
            .get(&entity)
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Get a mutable reference to a component of type `T` for an entity.
    pub fn get_mut<T: Any>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .get_mut(&entity)
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Returns true if the entity has a component of type `T`.
    pub fn has<T: Any>(&self, entity: EntityId) -> bool {
        self.storages
            .get(&TypeId::of::<T>())
            .is_some_and(|storage| storage.contains_key(&entity))
    }

    /// Iterate over all entities that have a component of type `T`.
    ///
    /// Returns a vector of `(EntityId, &T)` pairs in spawn order.
    pub fn query<T: Any>(&self) -> Vec<(EntityId, &T)> {
        let Some(storage) = self.storages.get(&TypeId::of::<T>()) else {
            return Vec::new();
        };

        storage
            .iter()
            .filter_map(|(&entity, boxed)| boxed.downcast_ref::<T>().map(|comp| (entity, comp)))
            .collect()
    }

    /// Ids of all entities with a component of type `T`, in spawn order.
    ///
    /// Useful for mutating components one entity at a time while other
    /// components are read.
    pub fn query_ids<T: Any>(&self) -> Vec<EntityId> {
        self.storages
            .get(&TypeId::of::<T>())
            .map(|storage| storage.keys().copied().collect())
            .unwrap_or_default()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
