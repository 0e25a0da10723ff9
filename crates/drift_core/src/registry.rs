//! Body registry: the live set of spheres
//!
//! The registry owns both the physics world and the visual scene so that a
//! sphere's body and visual are always inserted and removed together. There
//! is no way to add or drop one half of an entity from outside this module.

use crate::math::Vec3;
use crate::physics::{BodyDesc, BodyHandle, PhysicsWorld};
use crate::scene::{Scene, Visual, VisualHandle};
use crate::transition::ScaleTransition;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Stable identity of a live sphere. Never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One sphere: paired visual and physics handles plus its animated scale.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    visual: VisualHandle,
    body: BodyHandle,
    scale: f32,
    transition: Option<ScaleTransition>,
    /// Set once a scale-out has been started; the sphere is removed at this time
    retire_at: Option<Duration>,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn visual(&self) -> VisualHandle {
        self.visual
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Current animated scale in [0, 1]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn transition(&self) -> Option<&ScaleTransition> {
        self.transition.as_ref()
    }

    pub fn retire_at(&self) -> Option<Duration> {
        self.retire_at
    }

    pub fn is_retiring(&self) -> bool {
        self.retire_at.is_some()
    }

    pub(crate) fn start_transition(&mut self, transition: ScaleTransition) {
        self.transition = Some(transition);
    }

    pub(crate) fn mark_retiring(&mut self, at: Duration) {
        self.retire_at = Some(at);
    }

    /// Evaluate the running transition at `now`. Returns the new scale when
    /// it changed. Finished transitions are dropped.
    pub(crate) fn advance_transition(&mut self, now: Duration) -> Option<f32> {
        let transition = self.transition?;
        let scale = transition.scale_at(now);
        if transition.is_finished(now) {
            self.transition = None;
        }
        if scale == self.scale {
            return None;
        }
        self.scale = scale;
        Some(scale)
    }
}

pub struct Registry {
    entities: Vec<Entity>,
    /// Position of each live id in `entities`
    index: HashMap<EntityId, usize>,
    physics: PhysicsWorld,
    scene: Scene,
    next_id: u64,
}

impl Registry {
    pub fn new(physics: PhysicsWorld) -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
            physics,
            scene: Scene::new(),
            next_id: 1,
        }
    }

    /// Register a body and its visual as one entity.
    ///
    /// The visual's scale is overwritten with `scale`.
    pub fn insert(&mut self, body: BodyDesc, mut visual: Visual, scale: f32) -> EntityId {
        let scale = scale.clamp(0.0, 1.0);
        visual.scale = scale;

        let body = self.physics.add_body(body);
        let visual = self.scene.add(visual);

        let id = EntityId(self.next_id);
        self.next_id += 1;

        self.index.insert(id, self.entities.len());
        self.entities.push(Entity {
            id,
            visual,
            body,
            scale,
            transition: None,
            retire_at: None,
        });
        id
    }

    /// Remove an entity and release both of its handles. O(1).
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    /// Swap-remove the entity at `index`; order is not preserved.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Entity> {
        if index >= self.entities.len() {
            return None;
        }
        let entity = self.entities.swap_remove(index);
        self.index.remove(&entity.id);
        if let Some(moved) = self.entities.get(index) {
            self.index.insert(moved.id, index);
        }
        self.physics.remove_body(entity.body);
        self.scene.remove(entity.visual);
        Some(entity)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(self.index_of(id)?)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.index_of(id)?;
        self.entities.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the physics world for stepping and forces.
    ///
    /// Bodies must not be added or removed through this reference.
    pub(crate) fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Entities, physics world and scene borrowed together for per-entity updates.
    pub(crate) fn parts_mut(&mut self) -> (&mut [Entity], &mut PhysicsWorld, &mut Scene) {
        (&mut self.entities, &mut self.physics, &mut self.scene)
    }

    /// Body position of an entity
    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        let entity = self.get(id)?;
        self.physics.body(entity.body).map(|b| b.position)
    }

    /// True when every entity has both handles live and neither world holds
    /// anything the registry does not know about.
    pub fn is_consistent(&self) -> bool {
        self.physics.len() == self.entities.len()
            && self.scene.len() == self.entities.len()
            && self.index.len() == self.entities.len()
            && self.entities.iter().enumerate().all(|(i, e)| {
                self.index.get(&e.id) == Some(&i)
                    && self.physics.contains(e.body)
                    && self.scene.get(e.visual).is_some()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::math::Quat;
    use crate::scene::Rgb;

    fn registry() -> Registry {
        Registry::new(PhysicsWorld::new(&PhysicsConfig::default()))
    }

    fn body(x: f32) -> BodyDesc {
        BodyDesc {
            position: Vec3::new(x, 0.0, 0.0),
            mass: 1.0,
            radius: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    fn visual() -> Visual {
        Visual {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 1.0,
            radius: 1.0,
            color: Rgb {
                r: 1.0,
                g: 1.0,
                b: 1.0,
            },
        }
    }

    #[test]
    fn insert_and_remove_pair_both_worlds() {
        let mut registry = registry();
        let a = registry.insert(body(0.0), visual(), 1.0);
        let b = registry.insert(body(10.0), visual(), 0.0);
        assert_eq!(registry.len(), 2);
        assert!(registry.is_consistent());
        assert_eq!(registry.get(b).unwrap().scale(), 0.0);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.physics().len(), 1);
        assert_eq!(registry.scene().len(), 1);
        assert!(registry.is_consistent());
        assert_eq!(registry.position(b), Some(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut registry = registry();
        let a = registry.insert(body(0.0), visual(), 1.0);
        registry.remove(a);
        let b = registry.insert(body(0.0), visual(), 1.0);
        assert_ne!(a, b);
        assert!(registry.get(a).is_none());
    }

    #[test]
    fn swap_remove_keeps_others_reachable() {
        let mut registry = registry();
        let ids: Vec<_> = (0..5)
            .map(|i| registry.insert(body(i as f32 * 3.0), visual(), 1.0))
            .collect();
        let removed = registry.remove_at(0).unwrap();
        assert_eq!(removed.id(), ids[0]);
        for id in &ids[1..] {
            assert_eq!(registry.get(*id).unwrap().id(), *id);
        }
        assert_eq!(registry.index_of(ids[4]), Some(0));
        assert!(registry.is_consistent());

        assert!(registry.remove(ids[4]));
        assert!(registry.remove(ids[2]));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(ids[1]).unwrap().id(), ids[1]);
        assert_eq!(registry.get(ids[3]).unwrap().id(), ids[3]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn out_of_range_removal_is_refused() {
        let mut registry = registry();
        registry.insert(body(0.0), visual(), 1.0);
        assert!(registry.remove_at(1).is_none());
        assert!(registry.remove_at(usize::MAX).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.is_consistent());
    }

    #[test]
    fn finished_transition_is_dropped() {
        let mut registry = registry();
        let id = registry.insert(body(0.0), visual(), 0.0);
        let entity = registry.get_mut(id).unwrap();
        entity.start_transition(ScaleTransition::new(
            0.0,
            1.0,
            Duration::ZERO,
            Duration::from_millis(500),
        ));
        assert_eq!(entity.advance_transition(Duration::from_millis(250)), Some(0.5));
        assert_eq!(entity.advance_transition(Duration::from_millis(600)), Some(1.0));
        assert!(entity.transition().is_none());
        assert_eq!(entity.advance_transition(Duration::from_millis(700)), None);
    }
}
