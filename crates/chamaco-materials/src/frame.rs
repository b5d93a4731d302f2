//! Per-frame refresh of time, pointer and viewport uniforms.
//!
//! The host render loop calls [`update`] (or [`FrameDriver::tick`]) once per
//! frame on a single thread. Only uniforms a material already declares are
//! touched; nothing is inserted.

use glam::Vec2;

use crate::builder::MaterialInstance;
use crate::params::{FrameUniform, UniformValue};

// ---------------------------------------------------------------------------
// FrameState
// ---------------------------------------------------------------------------

/// One frame of host input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// Seconds since the host clock started.
    pub elapsed: f32,
    /// Pointer in normalized device coordinates, `[-1, 1]` on both axes.
    pub pointer: Vec2,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl FrameState {
    pub fn new(elapsed: f32, pointer: Vec2, viewport: Vec2) -> Self {
        Self {
            elapsed,
            pointer,
            viewport,
        }
    }

    /// Pointer scaled into pixel space.
    pub fn pointer_pixels(&self) -> Vec2 {
        self.pointer * self.viewport
    }
}

impl MaterialInstance {
    /// Refresh this instance's frame uniforms. No-op once detached.
    pub fn apply_frame(&mut self, frame: &FrameState) {
        if !self.attached {
            return;
        }
        if self.animate {
            self.params
                .refresh(FrameUniform::Time, UniformValue::Float(frame.elapsed));
        }
        self.params
            .refresh(FrameUniform::Mouse, UniformValue::Vec2(frame.pointer_pixels()));
        self.params
            .refresh(FrameUniform::Resolution, UniformValue::Vec2(frame.viewport));
    }
}

/// Refresh `instance` for one frame.
pub fn update(instance: &mut MaterialInstance, elapsed: f32, pointer: Vec2, viewport: Vec2) {
    instance.apply_frame(&FrameState::new(elapsed, pointer, viewport));
}

// ---------------------------------------------------------------------------
// FrameDriver
// ---------------------------------------------------------------------------

/// Handle to a material slot inside a [`FrameDriver`].
///
/// Slots are recycled, but each reuse bumps the slot's generation, so a stale
/// id never reaches a later drawable's material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawableId {
    index: usize,
    generation: u32,
}

impl DrawableId {
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    instance: Option<MaterialInstance>,
}

/// Owns the material of every live drawable and refreshes them each frame.
///
/// Removed drawables free their slot for the next insert; updating a removed
/// id is a no-op.
#[derive(Debug, Default)]
pub struct FrameDriver {
    slots: Vec<Slot>,
    /// Indices of empty slots ready for reuse.
    free: Vec<usize>,
    live: usize,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a material and return its drawable handle.
    pub fn insert(&mut self, instance: MaterialInstance) -> DrawableId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.instance = Some(instance);
            return DrawableId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            instance: Some(instance),
        });
        DrawableId {
            index,
            generation: 0,
        }
    }

    /// Remove a drawable's material, returning it detached.
    ///
    /// A slot whose generation counter is exhausted is retired instead of
    /// recycled.
    pub fn remove(&mut self, id: DrawableId) -> Option<MaterialInstance> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?;
        let mut instance = slot.instance.take()?;
        instance.detach();
        self.live -= 1;

        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free.push(id.index);
        }
        Some(instance)
    }

    pub fn get(&self, id: DrawableId) -> Option<&MaterialInstance> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.instance.as_ref())
    }

    fn get_mut(&mut self, id: DrawableId) -> Option<&mut MaterialInstance> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.instance.as_mut())
    }

    /// Refresh a single drawable. Unknown or removed ids are ignored.
    pub fn update(&mut self, id: DrawableId, frame: &FrameState) {
        if let Some(instance) = self.get_mut(id) {
            instance.apply_frame(frame);
        }
    }

    /// Refresh every live drawable.
    pub fn tick(&mut self, frame: &FrameState) {
        for instance in self.slots.iter_mut().filter_map(|slot| slot.instance.as_mut()) {
            instance.apply_frame(frame);
        }
    }

    /// Iterate over live drawables.
    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &MaterialInstance)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.instance.as_ref().map(|m| {
                let id = DrawableId {
                    index,
                    generation: slot.generation,
                };
                (id, m)
            })
        })
    }

    /// Number of live drawables.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots allocated, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MaterialBuilder;
    use crate::kind::MaterialKind;

    const EPS: f32 = 1e-4;

    fn cube() -> MaterialInstance {
        MaterialBuilder::new(MaterialKind::CubeMapped).build().unwrap()
    }

    #[test]
    fn test_update_sets_time_mouse_and_resolution() {
        let mut m = cube();
        update(&mut m, 12.5, Vec2::new(0.2, -0.1), Vec2::new(800.0, 600.0));

        let p = m.params();
        assert_eq!(p.get_float("u_time"), Some(12.5));
        let mouse = p.get_vec2("u_mouse").unwrap();
        assert!((mouse.x - 160.0).abs() < EPS, "{mouse:?}");
        assert!((mouse.y + 60.0).abs() < EPS, "{mouse:?}");
        assert_eq!(p.get_vec2("u_resolution"), Some(Vec2::new(800.0, 600.0)));
    }

    #[test]
    fn test_update_does_not_insert_missing_keys() {
        let mut clay = MaterialBuilder::new(MaterialKind::Clay).build().unwrap();
        let before: Vec<String> = clay.params().names().map(str::to_string).collect();

        update(&mut clay, 3.0, Vec2::new(0.5, 0.5), Vec2::new(100.0, 100.0));

        let after: Vec<String> = clay.params().names().map(str::to_string).collect();
        assert_eq!(before, after);
        assert_eq!(clay.params().get_float("uTime"), Some(3.0));
        assert!(!clay.params().contains("uMouse"));
    }

    #[test]
    fn test_static_material_is_untouched() {
        let mut gradient = MaterialBuilder::new(MaterialKind::Gradient).build().unwrap();
        let before = gradient.params().clone();
        update(&mut gradient, 9.0, Vec2::ONE, Vec2::splat(512.0));
        assert_eq!(gradient.params(), &before);
    }

    #[test]
    fn test_non_animated_material_keeps_time() {
        let mut m = MaterialBuilder::new(MaterialKind::CubeMapped)
            .animate(false)
            .build()
            .unwrap();
        update(&mut m, 5.0, Vec2::ZERO, Vec2::new(640.0, 480.0));
        assert_eq!(m.params().get_float("u_time"), Some(0.0));
        assert_eq!(m.params().get_vec2("u_resolution"), Some(Vec2::new(640.0, 480.0)));
    }

    #[test]
    fn test_detached_instance_is_noop() {
        let mut m = cube();
        m.detach();
        update(&mut m, 1.0, Vec2::ONE, Vec2::ONE);
        assert_eq!(m.params(), &MaterialKind::CubeMapped.defaults());
    }

    #[test]
    fn test_driver_ticks_each_drawable_independently() {
        let mut driver = FrameDriver::new();
        let a = driver.insert(cube());
        let b = driver.insert(cube());

        driver.update(a, &FrameState::new(1.0, Vec2::ZERO, Vec2::ONE));
        assert_eq!(driver.get(a).unwrap().params().get_float("u_time"), Some(1.0));
        assert_eq!(driver.get(b).unwrap().params().get_float("u_time"), Some(0.0));

        driver.tick(&FrameState::new(2.0, Vec2::ZERO, Vec2::ONE));
        assert_eq!(driver.get(a).unwrap().params().get_float("u_time"), Some(2.0));
        assert_eq!(driver.get(b).unwrap().params().get_float("u_time"), Some(2.0));
    }

    #[test]
    fn test_driver_update_after_remove_is_noop() {
        let mut driver = FrameDriver::new();
        let a = driver.insert(cube());
        let removed = driver.remove(a).unwrap();
        assert!(!removed.is_attached());

        driver.update(a, &FrameState::new(4.0, Vec2::ONE, Vec2::ONE));
        driver.tick(&FrameState::new(4.0, Vec2::ONE, Vec2::ONE));
        assert!(driver.get(a).is_none());
        assert!(driver.remove(a).is_none());
        assert!(driver.is_empty());
        assert_eq!(driver.slot_count(), 1);
    }

    #[test]
    fn test_reinserted_drawable_gets_fresh_id() {
        let mut driver = FrameDriver::new();
        let a = driver.insert(cube());
        driver.remove(a);
        let b = driver.insert(cube());
        assert_ne!(a, b);
        assert_eq!(driver.len(), 1);
        assert_eq!(driver.iter().map(|(id, _)| id).collect::<Vec<_>>(), [b]);
    }

    #[test]
    fn test_insert_remove_cycles_reuse_one_slot() {
        let mut driver = FrameDriver::new();
        for _ in 0..10_000 {
            let id = driver.insert(cube());
            assert!(driver.remove(id).is_some());
        }
        assert!(driver.is_empty());
        assert_eq!(driver.slot_count(), 1);
    }

    #[test]
    fn test_stale_id_cannot_reach_new_occupant() {
        let mut driver = FrameDriver::new();
        let stale = driver.insert(cube());
        driver.remove(stale);
        let fresh = driver.insert(cube());
        assert_eq!(fresh.index(), stale.index());
        assert_ne!(fresh.generation(), stale.generation());

        driver.update(stale, &FrameState::new(6.0, Vec2::ZERO, Vec2::ONE));
        assert!(driver.get(stale).is_none());
        assert!(driver.remove(stale).is_none());
        assert_eq!(driver.get(fresh).unwrap().params().get_float("u_time"), Some(0.0));
        assert_eq!(driver.len(), 1);
    }
}
