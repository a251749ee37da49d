//
// engine.rs
//
// Event-driven entry point: debounced scans fanned out per visible editor
//

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use url::Url;

use crate::config::PreviewConfig;
use crate::debounce::ScanDebouncer;
use crate::decoration_cache::DecorationCaches;
use crate::host::{EditorHost, IconResolver};
use crate::render::make_decoration_render;
use crate::scanner::collect_icon_matches;
use crate::types::{make_cache_key, DecorationHandle, DecorationRequest, EditorId, Range};

/// The scan-and-decoration engine.
///
/// One instance serves a whole host session. Change and visibility events
/// are debounced per document URI; the cycle that eventually runs is
/// synchronous except for the asynchronous icon resolutions it spawns for
/// cache misses. Cycles for the same URI are serialized by the debouncer,
/// so two diff cycles for one editor can never interleave.
pub struct PreviewEngine<H: EditorHost + 'static> {
    inner: Arc<EngineInner<H>>,
}

struct EngineInner<H> {
    host: Arc<H>,
    resolver: Arc<dyn IconResolver>,
    config: PreviewConfig,
    caches: DecorationCaches,
    debouncer: ScanDebouncer,
}

impl<H: EditorHost + 'static> PreviewEngine<H> {
    pub fn new(host: Arc<H>, resolver: Arc<dyn IconResolver>, config: PreviewConfig) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                host,
                resolver,
                config,
                caches: DecorationCaches::new(),
                debouncer: ScanDebouncer::new(),
            }),
        }
    }

    /// Initial activation: schedule a scan for every visible document.
    pub fn activate(&self) {
        for uri in self.inner.host.visible_documents() {
            self.schedule_scan(uri);
        }
    }

    /// A document's text changed.
    pub fn document_changed(&self, uri: &Url) {
        self.schedule_scan(uri.clone());
    }

    /// The active editor changed to one showing this document.
    pub fn active_editor_changed(&self, uri: &Url) {
        self.schedule_scan(uri.clone());
    }

    /// An editor was closed; its cache must not outlive it.
    pub fn editor_closed(&self, editor: EditorId) {
        self.inner.caches.remove_editor(editor);
    }

    /// Cancel all pending scans (host shutdown).
    pub fn shutdown(&self) {
        self.inner.debouncer.cancel_all();
    }

    /// Run one scan cycle immediately, bypassing the debounce window.
    /// Returns the resolution tasks spawned for cache misses so callers
    /// (tests, mainly) can await quiescence.
    pub fn scan_now(&self, uri: &Url) -> Vec<JoinHandle<()>> {
        self.inner.run_scan_cycle(uri)
    }

    /// Debounced scheduling: a burst of events for one URI coalesces into a
    /// single cycle after the quiescence window.
    fn schedule_scan(&self, uri: Url) {
        let inner = self.inner.clone();
        let ticket = inner.debouncer.schedule(uri.clone());
        let debounce_ms = inner.config.debounce_ms;

        tokio::spawn(async move {
            tokio::select! {
                _ = ticket.token.cancelled() => { return; }
                _ = tokio::time::sleep(Duration::from_millis(debounce_ms)) => {}
            }
            // A change event may land between the window elapsing and this
            // claim; only the task still registered for the URI runs.
            if !inner.debouncer.complete(&uri, ticket.generation) {
                return;
            }
            // Resolution tasks are fire-and-forget on this path.
            let _ = inner.run_scan_cycle(&uri);
        });
    }

    /// Cached decorations for one editor, for diagnostics.
    pub fn cache_snapshot(
        &self,
        editor: EditorId,
    ) -> Option<std::collections::HashMap<String, DecorationHandle>> {
        self.inner.caches.snapshot(editor)
    }
}

impl<H: EditorHost + 'static> EngineInner<H> {
    /// One scan cycle: match imports, resolve ranges, and reconcile each
    /// visible editor's cache. Synchronous apart from the spawned
    /// resolutions.
    fn run_scan_cycle(self: &Arc<Self>, uri: &Url) -> Vec<JoinHandle<()>> {
        let started = Instant::now();
        let mut tasks = Vec::new();

        for editor in self.host.visible_editors(uri) {
            let Some(text) = self.host.document_text(uri) else {
                continue;
            };
            let requests = self.build_requests(editor, uri, &text);
            let misses = self.caches.reconcile(self.host.as_ref(), editor, &requests);
            for (request, handle) in misses {
                tasks.push(self.spawn_resolution(request, handle));
            }
        }

        log::debug!("scan cycle for {} took {:?}", uri, started.elapsed());
        tasks
    }

    /// Build the editor-scoped decoration requests for a document snapshot,
    /// converting byte offsets to positions at the host seam.
    fn build_requests(&self, editor: EditorId, uri: &Url, text: &str) -> Vec<DecorationRequest> {
        collect_icon_matches(text, self.config.scan_strategy)
            .into_iter()
            .map(|m| {
                let range = Range::new(
                    self.host.position_at(uri, m.start_offset),
                    self.host.position_at(uri, m.end_offset),
                );
                let cache_key = make_cache_key(&range, &m.icon_name);
                DecorationRequest {
                    editor,
                    range,
                    icon_name: m.icon_name,
                    icon_package_name: m.icon_package_name,
                    cache_key,
                }
            })
            .collect()
    }

    /// Fire-and-forget resolution for a cache miss. An empty result leaves
    /// the handle allocated but invisible; a late result whose handle is no
    /// longer current is discarded rather than resurrecting a stale
    /// decoration.
    fn spawn_resolution(
        self: &Arc<Self>,
        request: DecorationRequest,
        handle: DecorationHandle,
    ) -> JoinHandle<()> {
        let inner = self.clone();
        tokio::spawn(async move {
            let image_url = inner
                .resolver
                .resolve_icon(&request.icon_name, &request.icon_package_name)
                .await;
            if image_url.is_empty() {
                return;
            }
            if !inner
                .caches
                .is_current(request.editor, &request.cache_key, &handle)
            {
                log::trace!(
                    "dropping stale resolution for '{}' in editor {:?}",
                    request.icon_name,
                    request.editor
                );
                return;
            }
            let spec = make_decoration_render(&image_url);
            inner
                .host
                .apply_decoration(request.editor, &handle, request.range, &spec);
        })
    }
}
