//! String vertex cache
//!
//! Maps a string's exact bytes to a previously allocated fixed-capacity
//! vertex buffer. The cache saves the allocation, never the layout:
//! every draw rewrites the buffer's contents from slot zero, so a hit
//! reuses storage, not stale vertices.
//!
//! Entries live in an insertion-ordered arena and are never evicted;
//! buffer handles stay valid as the arena grows. Lookup is backed by a
//! hash map over the owned key bytes, which preserves the exact-match
//! semantics of a linear scan since keys are unique by construction.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::constants::STRING_VERTEX_CAPACITY;
use crate::gpu::{Gpu, VertexBufferId};

struct StringEntry {
    key: Vec<u8>,
    buffer: VertexBufferId,
}

/// Insertion-ordered cache of per-string vertex buffers
pub struct StringCache {
    entries: Vec<StringEntry>,
    index: HashMap<Vec<u8>, usize>,
    /// Optional entry-count ceiling; `None` grows without bound
    limit: Option<usize>,
    allocations: usize,
}

impl StringCache {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            limit,
            allocations: 0,
        }
    }

    /// Fetch the vertex buffer for `text`, allocating one on first
    /// sight of the bytes.
    ///
    /// Every buffer holds [`STRING_VERTEX_CAPACITY`] vertices of
    /// DMA-coherent storage. Returns `None` when the configured entry
    /// ceiling refuses a new string; allocation failure itself is
    /// unrecoverable and propagates.
    pub fn acquire<G: Gpu>(&mut self, gpu: &mut G, text: &[u8]) -> Result<Option<VertexBufferId>> {
        if let Some(&i) = self.index.get(text) {
            return Ok(Some(self.entries[i].buffer));
        }

        if let Some(limit) = self.limit {
            if self.entries.len() >= limit {
                warn!("String cache limit ({}) reached, dropping draw", limit);
                return Ok(None);
            }
        }

        let buffer = gpu
            .create_vertex_buffer(STRING_VERTEX_CAPACITY)
            .context("Failed to allocate string vertex buffer")?;
        self.allocations += 1;

        let key = text.to_vec();
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(StringEntry { key, buffer });

        debug!(
            "String cache grew to {} entries ({} bytes key)",
            self.entries.len(),
            text.len()
        );
        Ok(Some(buffer))
    }

    /// Number of distinct strings cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vertex buffer allocations performed so far
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Key bytes of an entry, in insertion order
    pub fn key_at(&self, index: usize) -> &[u8] {
        &self.entries[index].key
    }

    /// Release every cached vertex buffer
    pub fn destroy<G: Gpu>(self, gpu: &mut G) {
        for entry in self.entries {
            gpu.delete_vertex_buffer(entry.buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::SheetImage;
    use crate::gpu::{Sampling, TexEnv, TextureId, Vertex, VertexAttr};

    /// Counts allocations, discards everything else
    struct NullGpu {
        buffers_created: usize,
        buffers_deleted: usize,
    }

    impl NullGpu {
        fn new() -> Self {
            Self {
                buffers_created: 0,
                buffers_deleted: 0,
            }
        }
    }

    impl Gpu for NullGpu {
        fn create_texture(
            &mut self,
            _image: &SheetImage<'_>,
            _sampling: Sampling,
        ) -> Result<TextureId> {
            Ok(TextureId(0))
        }
        fn delete_texture(&mut self, _texture: TextureId) {}
        fn bind_texture(&mut self, _unit: u32, _texture: TextureId) {}
        fn set_tex_env(&mut self, _env: &TexEnv) {}
        fn set_projection(&mut self, _matrix: &[f32; 16]) {}
        fn configure_attrs(&mut self, _attrs: &[VertexAttr]) {}
        fn create_vertex_buffer(&mut self, _capacity: usize) -> Result<VertexBufferId> {
            let id = VertexBufferId(self.buffers_created as u32);
            self.buffers_created += 1;
            Ok(id)
        }
        fn delete_vertex_buffer(&mut self, _buffer: VertexBufferId) {
            self.buffers_deleted += 1;
        }
        fn bind_vertex_buffer(&mut self, _buffer: VertexBufferId) {}
        fn write_vertices(&mut self, _buffer: VertexBufferId, _first: usize, _vertices: &[Vertex]) {
        }
        fn draw_strip(&mut self, _first: usize, _count: usize) {}
    }

    #[test]
    fn test_same_bytes_reuse_buffer() {
        let mut gpu = NullGpu::new();
        let mut cache = StringCache::new(None);

        let a = cache.acquire(&mut gpu, b"score: 100").unwrap().unwrap();
        let b = cache.acquire(&mut gpu, b"score: 100").unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.allocation_count(), 1);
        assert_eq!(gpu.buffers_created, 1);
    }

    #[test]
    fn test_distinct_bytes_distinct_entries() {
        let mut gpu = NullGpu::new();
        let mut cache = StringCache::new(None);

        let a = cache.acquire(&mut gpu, b"score: 100").unwrap().unwrap();
        let b = cache.acquire(&mut gpu, b"score: 101").unwrap().unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.allocation_count(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut gpu = NullGpu::new();
        let mut cache = StringCache::new(None);

        cache.acquire(&mut gpu, b"first").unwrap();
        cache.acquire(&mut gpu, b"second").unwrap();
        cache.acquire(&mut gpu, b"first").unwrap();
        assert_eq!(cache.key_at(0), b"first");
        assert_eq!(cache.key_at(1), b"second");
    }

    #[test]
    fn test_limit_refuses_new_strings() {
        let mut gpu = NullGpu::new();
        let mut cache = StringCache::new(Some(1));

        assert!(cache.acquire(&mut gpu, b"kept").unwrap().is_some());
        assert!(cache.acquire(&mut gpu, b"refused").unwrap().is_none());
        // Cached strings keep working at the ceiling
        assert!(cache.acquire(&mut gpu, b"kept").unwrap().is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_destroy_releases_buffers() {
        let mut gpu = NullGpu::new();
        let mut cache = StringCache::new(None);
        cache.acquire(&mut gpu, b"a").unwrap();
        cache.acquire(&mut gpu, b"b").unwrap();
        cache.destroy(&mut gpu);
        assert_eq!(gpu.buffers_deleted, 2);
    }
}
