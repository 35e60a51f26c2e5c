//! Shader program identity and uniform locations.
//!
//! Programs are owned outside the pipeline. The pipeline only needs a stable
//! key for caching ([`ProgramId`]) and a way to resolve a uniform by name
//! ([`ShaderProgram::uniform_location`]). Ids carry a generation counter so a
//! slot that is released and handed out again never aliases the old program.

/// Generation-checked identifier of a shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ProgramId {
    /// Slot index inside the owning [`ProgramArena`].
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// A resolved uniform handle.
///
/// Mirrors the fixed-function convention where a lookup for an undeclared
/// uniform yields `-1` instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    /// Location returned for uniforms the program does not declare.
    pub const INVALID: UniformLocation = UniformLocation(-1);

    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

/// The part of a linked shader program the pipeline talks to.
pub trait ShaderProgram {
    /// Stable identity used as the uniform cache key.
    fn id(&self) -> ProgramId;

    /// Resolves a uniform by name, returning [`UniformLocation::INVALID`] when
    /// the program does not declare it.
    fn uniform_location(&self, name: &str) -> UniformLocation;
}

/// Allocates [`ProgramId`]s with generation counters.
///
/// Released slots are reused, but with a bumped generation, so ids from before
/// the release compare unequal to the new ones.
#[derive(Debug, Default)]
pub struct ProgramArena {
    generations: Vec<u32>,
    live: Vec<bool>,
    free: Vec<u32>,
}

impl ProgramArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh id, reusing a released slot when one is available.
    pub fn allocate(&mut self) -> ProgramId {
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.live[slot] = true;
            return ProgramId {
                index,
                generation: self.generations[slot],
            };
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.live.push(true);
        ProgramId {
            index,
            generation: 0,
        }
    }

    /// Retires an id. Returns `false` if it was already stale.
    pub fn release(&mut self, id: ProgramId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let slot = id.index as usize;
        self.live[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(id.index);
        true
    }

    /// Whether `id` refers to a program that has not been released.
    pub fn is_live(&self, id: ProgramId) -> bool {
        let slot = id.index as usize;
        slot < self.generations.len() && self.live[slot] && self.generations[slot] == id.generation
    }

    /// Number of live programs.
    pub fn len(&self) -> usize {
        self.live.iter().filter(|&&live| live).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_slot_gets_new_generation() {
        let mut arena = ProgramArena::new();
        let first = arena.allocate();
        assert!(arena.release(first));

        let second = arena.allocate();
        assert_eq!(second.index(), first.index());
        assert_ne!(second, first);
        assert_eq!(second.generation(), first.generation() + 1);
        assert!(!arena.is_live(first));
        assert!(arena.is_live(second));
    }

    #[test]
    fn double_release_is_rejected() {
        let mut arena = ProgramArena::new();
        let id = arena.allocate();
        assert!(arena.release(id));
        assert!(!arena.release(id));
        assert!(arena.is_empty());
    }

    #[test]
    fn fresh_ids_use_new_slots() {
        let mut arena = ProgramArena::new();
        let a = arena.allocate();
        let b = arena.allocate();
        assert_ne!(a.index(), b.index());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn invalid_location_is_not_valid() {
        assert!(!UniformLocation::INVALID.is_valid());
        assert!(UniformLocation(0).is_valid());
    }
}
