//! Entity store
//!
//! Owns the three entity collections. The asset watcher appends from its own
//! thread while the frame loop iterates and mutates, so every collection sits
//! behind its own mutex. Each lock is held for at most one pass over its
//! collection.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::IVec2;

use super::state::{Bubble, BubbleId, Direction, Fish, Sprite, SpriteId};
use crate::assets::Image;

/// Sprites in back-to-front draw order plus a name index
#[derive(Debug, Default)]
pub struct SpriteLayer {
    sprites: Vec<Sprite>,
    names: HashSet<String>,
}

impl SpriteLayer {
    pub fn iter(&self) -> std::slice::Iter<'_, Sprite> {
        self.sprites.iter()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    /// Topmost sprite whose opaque pixels cover `point`, skipping `excluded`
    pub fn topmost_at(&self, point: IVec2, excluded: &HashSet<SpriteId>) -> Option<SpriteId> {
        // Sprites are stored back to front, so search from the end.
        self.sprites
            .iter()
            .rev()
            .filter(|s| !excluded.contains(&s.id))
            .find(|s| s.contains(point))
            .map(|s| s.id)
    }

    /// Move a sprite to the end of draw order (topmost). Returns false if unknown.
    pub fn promote(&mut self, id: SpriteId) -> bool {
        match self.sprites.iter().position(|s| s.id == id) {
            Some(index) => {
                let sprite = self.sprites.remove(index);
                self.sprites.push(sprite);
                true
            }
            None => false,
        }
    }

    /// Ids in draw order
    pub fn order(&self) -> Vec<SpriteId> {
        self.sprites.iter().map(|s| s.id).collect()
    }
}

/// Fish in insertion order plus a name index
#[derive(Debug, Default)]
pub struct School {
    fishes: Vec<Fish>,
    names: HashSet<String>,
}

impl School {
    pub fn iter(&self) -> std::slice::Iter<'_, Fish> {
        self.fishes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Fish> {
        self.fishes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.fishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fishes.is_empty()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&Fish> {
        self.fishes.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Default)]
pub struct EntityStore {
    sprites: Mutex<SpriteLayer>,
    bubbles: Mutex<Vec<Bubble>>,
    fishes: Mutex<School>,
    next_sprite_id: AtomicU32,
    next_bubble_id: AtomicU64,
}

/// A poisoned lock still guards a structurally valid collection
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprites(&self) -> MutexGuard<'_, SpriteLayer> {
        lock(&self.sprites)
    }

    pub fn bubbles(&self) -> MutexGuard<'_, Vec<Bubble>> {
        lock(&self.bubbles)
    }

    pub fn fishes(&self) -> MutexGuard<'_, School> {
        lock(&self.fishes)
    }

    pub fn has_sprite(&self, name: &str) -> bool {
        self.sprites().contains_name(name)
    }

    pub fn has_fish(&self, name: &str) -> bool {
        self.fishes().contains_name(name)
    }

    /// Append a sprite on top of draw order unless one with `name` exists.
    /// The existing sprite is left untouched in that case.
    pub fn register_sprite_if_absent(
        &self,
        name: &str,
        image: Image,
        pos: IVec2,
    ) -> Option<SpriteId> {
        let mut layer = self.sprites();
        if layer.names.contains(name) {
            return None;
        }
        let id = SpriteId(self.next_sprite_id.fetch_add(1, Ordering::Relaxed) + 1);
        layer.names.insert(name.to_string());
        layer.sprites.push(Sprite {
            id,
            name: name.to_string(),
            image,
            pos,
        });
        Some(id)
    }

    /// Append a fish unless one with the same name exists. Returns true if added.
    pub fn register_fish_if_absent(&self, fish: Fish) -> bool {
        let mut school = self.fishes();
        if school.names.contains(&fish.name) {
            return false;
        }
        school.names.insert(fish.name.clone());
        school.fishes.push(fish);
        true
    }

    pub fn spawn_bubble(
        &self,
        pos: IVec2,
        direction: Direction,
        speed: i32,
        scale: f32,
    ) -> BubbleId {
        let id = BubbleId(self.next_bubble_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.bubbles().push(Bubble {
            id,
            pos,
            direction,
            speed,
            scale,
        });
        id
    }

    /// Remove a bubble by identity. Returns false if it was already gone.
    pub fn remove_bubble(&self, id: BubbleId) -> bool {
        let mut bubbles = self.bubbles();
        let before = bubbles.len();
        bubbles.retain(|b| b.id != id);
        bubbles.len() != before
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites().len()
    }

    pub fn bubble_count(&self) -> usize {
        self.bubbles().len()
    }

    pub fn fish_count(&self) -> usize {
        self.fishes().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use image::{Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_register_sprite_is_idempotent() {
        let store = EntityStore::new();
        let first =
            store.register_sprite_if_absent("rock.png", Image::solid(10, 10), IVec2::new(5, 5));
        assert!(first.is_some());

        let second =
            store.register_sprite_if_absent("rock.png", Image::solid(20, 20), IVec2::new(99, 99));
        assert!(second.is_none());
        assert_eq!(store.sprite_count(), 1);

        let layer = store.sprites();
        let rock = layer.iter().next().unwrap();
        assert_eq!(rock.pos, IVec2::new(5, 5));
        assert_eq!(rock.image.width(), 10);
    }

    #[test]
    fn test_register_fish_is_idempotent() {
        let store = EntityStore::new();
        let viewport = Viewport::new(400, 300);
        let mut rng = Pcg32::seed_from_u64(1);
        let nemo = Fish::random("nemo.png", Image::solid(20, 10), &viewport, &mut rng);
        let original_pos = nemo.pos;
        assert!(store.register_fish_if_absent(nemo));

        let again = Fish::random("nemo.png", Image::solid(20, 10), &viewport, &mut rng);
        assert!(!store.register_fish_if_absent(again));
        assert_eq!(store.fish_count(), 1);
        assert_eq!(store.fishes().get("nemo.png").unwrap().pos, original_pos);
    }

    #[test]
    fn test_sprites_keep_insertion_order() {
        let store = EntityStore::new();
        let a = store.register_sprite_if_absent("a", Image::solid(1, 1), IVec2::ZERO).unwrap();
        let b = store.register_sprite_if_absent("b", Image::solid(1, 1), IVec2::ZERO).unwrap();
        let c = store.register_sprite_if_absent("c", Image::solid(1, 1), IVec2::ZERO).unwrap();
        assert_eq!(store.sprites().order(), vec![a, b, c]);

        assert!(store.sprites().promote(a));
        assert_eq!(store.sprites().order(), vec![b, c, a]);
        assert!(!store.sprites().promote(SpriteId(999)));
    }

    #[test]
    fn test_topmost_hit_wins() {
        let store = EntityStore::new();
        let below = store
            .register_sprite_if_absent("below", Image::solid(50, 50), IVec2::ZERO)
            .unwrap();
        let above = store
            .register_sprite_if_absent("above", Image::solid(20, 20), IVec2::new(10, 10))
            .unwrap();

        let layer = store.sprites();
        let none = HashSet::new();
        assert_eq!(layer.topmost_at(IVec2::new(15, 15), &none), Some(above));
        assert_eq!(layer.topmost_at(IVec2::new(40, 40), &none), Some(below));
        assert_eq!(layer.topmost_at(IVec2::new(60, 60), &none), None);

        let held: HashSet<SpriteId> = [above].into_iter().collect();
        assert_eq!(layer.topmost_at(IVec2::new(15, 15), &held), Some(below));
    }

    #[test]
    fn test_transparent_pixels_are_not_hit() {
        let store = EntityStore::new();
        let mut pixels = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        pixels.put_pixel(2, 2, Rgba([0, 0, 0, 255]));
        store.register_sprite_if_absent("ring", Image::from_rgba(pixels), IVec2::new(100, 100));

        let layer = store.sprites();
        let none = HashSet::new();
        assert!(layer.topmost_at(IVec2::new(102, 102), &none).is_some());
        assert!(layer.topmost_at(IVec2::new(105, 105), &none).is_none());
    }

    #[test]
    fn test_remove_bubble_by_id() {
        let store = EntityStore::new();
        let a = store.spawn_bubble(IVec2::new(100, 600), Direction::Positive, 1, 1.0);
        let b = store.spawn_bubble(IVec2::new(100, 600), Direction::Negative, 2, 0.7);
        assert_ne!(a, b);
        assert!(store.remove_bubble(a));
        assert!(!store.remove_bubble(a));
        assert_eq!(store.bubble_count(), 1);
        assert_eq!(store.bubbles()[0].id, b);
    }

    #[test]
    fn test_concurrent_registration() {
        use std::sync::Arc;

        let store = Arc::new(EntityStore::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    // Every thread races on the same 50 names
                    for i in 0..50 {
                        let name = format!("s{i}");
                        store.register_sprite_if_absent(&name, Image::solid(1, 1), IVec2::ZERO);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.sprite_count(), 50);
    }
}
