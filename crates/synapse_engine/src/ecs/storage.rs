//! Sparse per-kind component storage

use std::collections::HashMap;

use super::entity::Entity;

/// Sparse map from entity id to one component value
///
/// Every component kind gets its own independent store. All operations are
/// O(1) amortized except the enumerations, which are O(n) in the number of
/// held components. Enumeration order is unspecified but stable for a store
/// that has not been mutated in between.
#[derive(Debug)]
pub struct ComponentStore<T> {
    components: HashMap<Entity, T>,
}

impl<T> ComponentStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    /// Attach a component to an entity, replacing any existing value
    pub fn add(&mut self, entity: Entity, component: T) {
        self.components.insert(entity, component);
    }

    /// Get the component for an entity
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    /// Get the component for an entity mutably
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(&entity)
    }

    /// Detach the component from an entity
    ///
    /// Returns `true` if a component was actually removed.
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.components.remove(&entity).is_some()
    }

    /// Check whether an entity holds this component
    pub fn has(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    /// All entities holding this component
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.components.keys().copied()
    }

    /// All component values
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.components.values()
    }

    /// All (entity, component) pairs
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(entity, value)| (*entity, value))
    }

    /// All (entity, component) pairs, components mutable
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.components
            .iter_mut()
            .map(|(entity, value)| (*entity, value))
    }

    /// Remove every component
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Number of held components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the store holds no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: u64) -> Entity {
        Entity::new(id)
    }

    #[test]
    fn test_add_get_remove() {
        let mut store = ComponentStore::new();
        store.add(entity(1), 42);

        assert_eq!(store.get(entity(1)), Some(&42));
        assert!(store.has(entity(1)));
        assert!(store.remove(entity(1)));
        assert_eq!(store.get(entity(1)), None);
    }

    #[test]
    fn test_add_overwrites() {
        let mut store = ComponentStore::new();
        store.add(entity(1), "first");
        store.add(entity(1), "second");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(entity(1)), Some(&"second"));
    }

    #[test]
    fn test_remove_missing_reports_false() {
        let mut store: ComponentStore<u8> = ComponentStore::new();
        assert!(!store.remove(entity(7)));
    }

    #[test]
    fn test_get_mut_mutates_in_place() {
        let mut store = ComponentStore::new();
        store.add(entity(3), 1.0_f64);

        if let Some(value) = store.get_mut(entity(3)) {
            *value += 0.5;
        }
        assert_eq!(store.get(entity(3)), Some(&1.5));
    }

    #[test]
    fn test_enumerations_cover_all_pairs() {
        let mut store = ComponentStore::new();
        store.add(entity(1), 10);
        store.add(entity(2), 20);
        store.add(entity(3), 30);

        let mut entities: Vec<u64> = store.entities().map(Entity::id).collect();
        entities.sort_unstable();
        assert_eq!(entities, vec![1, 2, 3]);

        let mut pairs: Vec<(u64, i32)> = store.iter().map(|(e, v)| (e.id(), *v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(1, 10), (2, 20), (3, 30)]);

        let total: i32 = store.values().sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn test_clear_empties_the_store() {
        let mut store = ComponentStore::new();
        store.add(entity(1), ());
        store.add(entity(2), ());
        store.clear();

        assert!(store.is_empty());
        assert!(!store.has(entity(1)));
    }
}
