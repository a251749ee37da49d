//
// test_utils.rs
//
// In-memory fake host and resolver for tests and benchmarks
//

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;
use url::Url;

use crate::host::{EditorHost, IconResolver};
use crate::render::RenderSpec;
use crate::types::{DecorationHandle, EditorId, Position, Range};

/// Convert a byte offset into a zero-based line/character position the way
/// an editor host would.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let clamped = offset.min(text.len());
    let before = &text[..clamped];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    Position::new(line, (clamped - line_start) as u32)
}

/// A decoration event recorded by the fake host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Applied {
        editor: EditorId,
        handle: DecorationHandle,
        range: Range,
    },
    Cleared {
        editor: EditorId,
        handle: DecorationHandle,
    },
}

/// In-memory editor host: documents, editors, and a recorded decoration log.
#[derive(Debug, Default)]
pub struct FakeHost {
    documents: RwLock<HashMap<Url, String>>,
    editors: RwLock<Vec<(EditorId, Url)>>,
    next_handle: AtomicU64,
    events: Mutex<Vec<HostEvent>>,
    /// Visually applied decorations: (editor, handle) -> (range, before style)
    visuals: Mutex<HashMap<(EditorId, DecorationHandle), (Range, String)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_document(&self, uri: Url, text: &str) {
        self.documents.write().unwrap().insert(uri, text.to_string());
    }

    /// Replace a document's text, simulating an edit.
    pub fn set_document_text(&self, uri: &Url, text: &str) {
        self.documents.write().unwrap().insert(uri.clone(), text.to_string());
    }

    pub fn add_editor(&self, editor: EditorId, uri: Url) {
        self.editors.write().unwrap().push((editor, uri));
    }

    pub fn remove_editor(&self, editor: EditorId) {
        self.editors.write().unwrap().retain(|(id, _)| *id != editor);
    }

    /// Total decoration handles allocated so far.
    pub fn created_count(&self) -> u64 {
        self.next_handle.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn cleared_events(&self) -> Vec<HostEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::Cleared { .. }))
            .collect()
    }

    /// How many times a specific handle was cleared in an editor.
    pub fn clear_count(&self, editor: EditorId, handle: &DecorationHandle) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(e, HostEvent::Cleared { editor: e2, handle: h } if *e2 == editor && h == handle)
            })
            .count()
    }

    /// Decorations currently visible in an editor.
    pub fn applied_visuals(&self, editor: EditorId) -> Vec<(DecorationHandle, Range, String)> {
        let mut out: Vec<_> = self
            .visuals
            .lock()
            .unwrap()
            .iter()
            .filter(|((e, _), _)| *e == editor)
            .map(|((_, h), (range, style))| (h.clone(), *range, style.clone()))
            .collect();
        out.sort_by_key(|(h, _, _)| h.id());
        out
    }
}

impl EditorHost for FakeHost {
    fn document_text(&self, uri: &Url) -> Option<String> {
        self.documents.read().unwrap().get(uri).cloned()
    }

    fn position_at(&self, uri: &Url, offset: usize) -> Position {
        let documents = self.documents.read().unwrap();
        let text = documents.get(uri).map(String::as_str).unwrap_or("");
        offset_to_position(text, offset)
    }

    fn visible_editors(&self, uri: &Url) -> Vec<EditorId> {
        self.editors
            .read()
            .unwrap()
            .iter()
            .filter(|(_, u)| u == uri)
            .map(|(id, _)| *id)
            .collect()
    }

    fn visible_documents(&self) -> Vec<Url> {
        let mut uris: Vec<Url> = Vec::new();
        for (_, uri) in self.editors.read().unwrap().iter() {
            if !uris.contains(uri) {
                uris.push(uri.clone());
            }
        }
        uris
    }

    fn create_decoration(&self) -> DecorationHandle {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        DecorationHandle::new(id)
    }

    fn apply_decoration(
        &self,
        editor: EditorId,
        handle: &DecorationHandle,
        range: Range,
        spec: &RenderSpec,
    ) {
        self.events.lock().unwrap().push(HostEvent::Applied {
            editor,
            handle: handle.clone(),
            range,
        });
        self.visuals
            .lock()
            .unwrap()
            .insert((editor, handle.clone()), (range, spec.before_style.clone()));
    }

    fn clear_decoration(&self, editor: EditorId, handle: &DecorationHandle) {
        self.events.lock().unwrap().push(HostEvent::Cleared {
            editor,
            handle: handle.clone(),
        });
        self.visuals.lock().unwrap().remove(&(editor, handle.clone()));
    }
}

/// Scripted icon resolver. Unknown icons resolve to an empty string; a held
/// resolver blocks every call until released, for ordering-race tests.
#[derive(Debug)]
pub struct FakeResolver {
    responses: RwLock<HashMap<(String, String), String>>,
    calls: Mutex<Vec<(String, String)>>,
    release_tx: watch::Sender<bool>,
}

impl Default for FakeResolver {
    fn default() -> Self {
        let (release_tx, _) = watch::channel(true);
        Self {
            responses: RwLock::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            release_tx,
        }
    }
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, icon_name: &str, package_name: &str, data_url: &str) {
        self.responses.write().unwrap().insert(
            (icon_name.to_string(), package_name.to_string()),
            data_url.to_string(),
        );
    }

    /// Block subsequent resolutions until `release` is called.
    pub fn hold(&self) {
        self.release_tx.send_replace(false);
    }

    pub fn release(&self) {
        self.release_tx.send_replace(true);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IconResolver for FakeResolver {
    async fn resolve_icon(&self, icon_name: &str, package_name: &str) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((icon_name.to_string(), package_name.to_string()));

        let mut release_rx = self.release_tx.subscribe();
        while !*release_rx.borrow() {
            if release_rx.changed().await.is_err() {
                break;
            }
        }

        self.responses
            .read()
            .unwrap()
            .get(&(icon_name.to_string(), package_name.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
