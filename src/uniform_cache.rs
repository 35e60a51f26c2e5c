//! Memoized uniform locations per shader program.
//!
//! Entries are stored in a dense vector indexed by [`ProgramId::index`]. Each
//! entry remembers the generation it was filled for; a lookup with a different
//! generation throws the entry away first, so a program slot that was
//! destroyed and reused is always resolved again.

use crate::config::UniformNames;
use crate::program::{ProgramId, ShaderProgram, UniformLocation};

/// The matrix uniforms the pipeline uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixUniform {
    ModelView,
    Projection,
    Normal,
}

impl MatrixUniform {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            MatrixUniform::ModelView => 0,
            MatrixUniform::Projection => 1,
            MatrixUniform::Normal => 2,
        }
    }

    /// The configured uniform name for this matrix.
    pub fn name(self, names: &UniformNames) -> &str {
        match self {
            MatrixUniform::ModelView => &names.model_view,
            MatrixUniform::Projection => &names.projection,
            MatrixUniform::Normal => &names.normal,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    generation: u32,
    /// `None` until resolved; a resolved miss is stored as `INVALID`.
    locations: [Option<UniformLocation>; MatrixUniform::COUNT],
}

impl CacheEntry {
    fn new(generation: u32) -> Self {
        Self {
            generation,
            locations: [None; MatrixUniform::COUNT],
        }
    }
}

/// Per-(uniform, program) location cache.
#[derive(Debug, Default)]
pub struct UniformCache {
    entries: Vec<Option<CacheEntry>>,
    report_missing: bool,
}

impl UniformCache {
    pub fn new(report_missing: bool) -> Self {
        Self {
            entries: Vec::new(),
            report_missing,
        }
    }

    /// Returns the location of `uniform` in `program`, querying the program
    /// only the first time.
    pub fn resolve(
        &mut self,
        program: &dyn ShaderProgram,
        uniform: MatrixUniform,
        names: &UniformNames,
    ) -> UniformLocation {
        let id = program.id();
        let report_missing = self.report_missing;
        let entry = self.entry_mut(id);

        if let Some(location) = entry.locations[uniform.index()] {
            return location;
        }

        let name = uniform.name(names);
        let location = program.uniform_location(name);
        if location.is_valid() {
            tracing::debug!(
                "Resolved uniform '{}' in program {}:{} to {}",
                name,
                id.index,
                id.generation,
                location.0
            );
        } else if report_missing {
            tracing::warn!(
                "Program {}:{} does not declare uniform '{}'",
                id.index,
                id.generation,
                name
            );
        }

        entry.locations[uniform.index()] = Some(location);
        location
    }

    fn entry_mut(&mut self, id: ProgramId) -> &mut CacheEntry {
        let slot = id.index as usize;
        if slot >= self.entries.len() {
            self.entries.resize(slot + 1, None);
        }

        let stale = matches!(&self.entries[slot], Some(entry) if entry.generation != id.generation);
        if stale {
            tracing::debug!("Discarding stale uniform cache entry for slot {}", slot);
            self.entries[slot] = None;
        }
        self.entries[slot].get_or_insert_with(|| CacheEntry::new(id.generation))
    }

    /// Drops every cached location of `id`. Returns whether anything was
    /// cached for it.
    pub fn invalidate(&mut self, id: ProgramId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.entries[id.index as usize] = None;
        tracing::debug!("Invalidated uniform cache for program {}:{}", id.index, id.generation);
        true
    }

    /// Whether any location is cached for `id`.
    pub fn contains(&self, id: ProgramId) -> bool {
        matches!(
            self.entries.get(id.index as usize),
            Some(Some(entry)) if entry.generation == id.generation
        )
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
