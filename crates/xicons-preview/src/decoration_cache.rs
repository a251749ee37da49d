//
// decoration_cache.rs
//
// Per-editor decoration caches and the scan-cycle diff algorithm
//

use std::collections::HashMap;

use dashmap::DashMap;

use crate::host::EditorHost;
use crate::types::{CacheKey, DecorationHandle, DecorationRequest, EditorId};

/// Per-editor decoration caches keyed by editor identity.
///
/// Each editor owns one `CacheKey -> DecorationHandle` map, replaced
/// wholesale on every scan cycle — never patched incrementally. Every handle
/// in a map corresponds to a decoration currently rendered in that editor or
/// one whose removal is in flight; a handle is never shared across keys or
/// editors.
#[derive(Debug, Default)]
pub struct DecorationCaches {
    caches: DashMap<EditorId, HashMap<CacheKey, DecorationHandle>>,
}

impl DecorationCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile one editor's cache against the requests of a scan cycle.
    ///
    /// Requests whose key exists in the old map reuse its handle: no new
    /// allocation, no re-fetch, no visual change. New keys get a fresh
    /// handle from the host and are returned as misses for the caller to
    /// resolve asynchronously. Old keys absent from the new map have their
    /// handle cleared exactly once before the replacement is stored.
    ///
    /// The editor's cache entry stays locked for the duration, so membership
    /// checks from in-flight resolutions never observe a half-built map.
    pub fn reconcile(
        &self,
        host: &dyn EditorHost,
        editor: EditorId,
        requests: &[DecorationRequest],
    ) -> Vec<(DecorationRequest, DecorationHandle)> {
        let mut entry = self.caches.entry(editor).or_default();
        let old_map = std::mem::take(entry.value_mut());

        let mut new_map: HashMap<CacheKey, DecorationHandle> = HashMap::new();
        let mut misses = Vec::new();

        for request in requests {
            if new_map.contains_key(&request.cache_key) {
                // Two requests with an identical key are the same visual
                // decoration; the first occurrence wins.
                continue;
            }
            if let Some(handle) = old_map.get(&request.cache_key) {
                new_map.insert(request.cache_key.clone(), handle.clone());
            } else {
                let handle = host.create_decoration();
                new_map.insert(request.cache_key.clone(), handle.clone());
                misses.push((request.clone(), handle));
            }
        }

        for (key, handle) in &old_map {
            if !new_map.contains_key(key) {
                host.clear_decoration(editor, handle);
            }
        }

        log::trace!(
            "reconciled editor {:?}: {} reused, {} new, {} cleared",
            editor,
            new_map.len() - misses.len(),
            misses.len(),
            old_map.len() + misses.len() - new_map.len(),
        );

        *entry.value_mut() = new_map;
        misses
    }

    /// Whether `handle` is still the current occupant of `key` in the
    /// editor's cache. Late-arriving resolutions check this before applying
    /// so a key dropped by a newer cycle cannot resurrect a stale
    /// decoration.
    pub fn is_current(&self, editor: EditorId, key: &CacheKey, handle: &DecorationHandle) -> bool {
        self.caches
            .get(&editor)
            .map_or(false, |map| map.get(key) == Some(handle))
    }

    /// Drop all cache state for a closed editor. The handles become
    /// unreachable with it; no memory is retained for closed editors.
    pub fn remove_editor(&self, editor: EditorId) {
        self.caches.remove(&editor);
    }

    /// Cloned view of an editor's current cache, for tests and diagnostics.
    pub fn snapshot(&self, editor: EditorId) -> Option<HashMap<CacheKey, DecorationHandle>> {
        self.caches.get(&editor).map(|map| map.clone())
    }

    /// Number of editors with cache state.
    pub fn editor_count(&self) -> usize {
        self.caches.len()
    }
}
