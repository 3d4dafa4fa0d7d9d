// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing session over one owner's maps.
//!
//! [`Editor`] glues the pieces together: edits run as [`GraphOp`]s against the current history
//! entry, changed documents are pushed to [`HistoryStack`] and scheduled for saving through
//! [`Autosave`], and map switches go through [`MapCatalog`]. Selection, clipboard, drag and
//! viewport are session state and are never persisted.

use std::time::Instant;

use chrono::Utc;

use crate::autosave::Autosave;
use crate::catalog::{CatalogError, CatalogInit, DocumentSource, MapCatalog};
use crate::config::EditorConfig;
use crate::drag::DragSession;
use crate::format::{export_json, import_json, ImportError};
use crate::history::HistoryStack;
use crate::model::{
    Connection, ConnectionId, ConnectionPatch, MapId, Node, NodeId, NodePatch, OwnerId, Point,
    Snapshot, Style, DEFAULT_NODE_TEXT,
};
use crate::ops::{self, Clipboard, Direction, EditDelta, EditRejected, GraphOp, SiblingMove};
use crate::store::Storage;

mod viewport;

pub use viewport::{Viewport, MAX_SCALE, MIN_SCALE, ZOOM_STEP};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Rejected(#[from] EditRejected),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
    #[error("export failed: {0}")]
    Export(#[source] serde_json::Error),
}

#[derive(Debug)]
pub struct Editor<S> {
    catalog: MapCatalog<S>,
    config: EditorConfig,
    history: HistoryStack<Snapshot>,
    source: DocumentSource,
    selection: Vec<NodeId>,
    clipboard: Option<Clipboard>,
    drag: Option<DragSession>,
    viewport: Viewport,
    autosave: Autosave,
    /// The current document differs from what was last written.
    dirty: bool,
}

impl<S: Storage> Editor<S> {
    /// Opens the owner's catalog and loads the active map.
    pub fn open(storage: S, owner: OwnerId, config: EditorConfig) -> Result<Self, EditorError> {
        let (catalog, init) = MapCatalog::open(storage, owner)?;
        match &init {
            CatalogInit::Existing => tracing::debug!("catalog loaded"),
            CatalogInit::Migrated { map_id } => tracing::info!(%map_id, "legacy document migrated"),
            CatalogInit::Created { map_id } => tracing::info!(%map_id, "first map created"),
        }

        let loaded = catalog.load_map_payload(catalog.current_map_id())?;
        Ok(Self {
            history: HistoryStack::with_capacity(loaded.snapshot, config.history_capacity),
            source: loaded.source,
            autosave: Autosave::new(config.autosave_delay),
            catalog,
            config,
            selection: Vec::new(),
            clipboard: None,
            drag: None,
            viewport: Viewport::default(),
            dirty: false,
        })
    }

    pub fn catalog(&self) -> &MapCatalog<S> {
        &self.catalog
    }

    pub fn into_storage(self) -> S {
        self.catalog.into_storage()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn current_map_id(&self) -> &MapId {
        self.catalog.current_map_id()
    }

    /// How the current map's document was obtained when it was loaded.
    pub fn document_source(&self) -> &DocumentSource {
        &self.source
    }

    /// The committed document.
    pub fn snapshot(&self) -> &Snapshot {
        self.history.current()
    }

    /// Nodes as displayed: the drag preview while a drag is in progress.
    pub fn nodes(&self) -> &[Node] {
        match &self.drag {
            Some(drag) => drag.preview(),
            None => &self.snapshot().nodes,
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.snapshot().connections
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// When the pending autosave is due, if one is scheduled.
    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    // Selection

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Replaces the selection. Ids not in the document are dropped.
    pub fn select(&mut self, node_ids: impl IntoIterator<Item = NodeId>) {
        let snapshot = self.history.current();
        let mut selection: Vec<NodeId> = Vec::new();
        for node_id in node_ids {
            if snapshot.node(&node_id).is_some() && !selection.contains(&node_id) {
                selection.push(node_id);
            }
        }
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Moves a single selection to the neighbour in `direction`. Returns the new selection.
    pub fn navigate(&mut self, direction: Direction) -> Option<NodeId> {
        let [current] = self.selection.as_slice() else {
            return None;
        };
        let target = ops::neighbor(&self.snapshot().nodes, current, direction)?;
        self.selection = vec![target.clone()];
        Some(target)
    }

    // Edits

    /// Adds a node. Without a parent it lands in the middle of the viewport.
    pub fn add_node(
        &mut self,
        parent_id: Option<&NodeId>,
        text: Option<&str>,
    ) -> Result<NodeId, EditRejected> {
        let position = match parent_id {
            Some(_) => None,
            None => Some(self.viewport_center()),
        };
        let (created, _) = self.commit(GraphOp::AddNode {
            parent_id: parent_id.cloned(),
            text: text.unwrap_or(DEFAULT_NODE_TEXT).to_owned(),
            position,
        })?;
        self.select_created(created)
    }

    pub fn add_child_node(&mut self, parent_id: &NodeId) -> Result<NodeId, EditRejected> {
        let (created, _) = self.commit(GraphOp::AddChildNode {
            parent_id: parent_id.clone(),
            text: DEFAULT_NODE_TEXT.to_owned(),
            placement: self.config.child_placement,
        })?;
        self.select_created(created)
    }

    /// Adds a node next to `node_id`: under the same parent, or under `node_id` itself when it
    /// is a root.
    pub fn add_sibling_node(&mut self, node_id: &NodeId) -> Result<NodeId, EditRejected> {
        let node = self
            .snapshot()
            .node(node_id)
            .ok_or_else(|| EditRejected::UnknownNode {
                node_id: node_id.clone(),
            })?;
        let parent_id = node.parent_id.clone().unwrap_or_else(|| node_id.clone());
        self.add_child_node(&parent_id)
    }

    /// Child of the single selected node, or of the first root when nothing is selected.
    pub fn insert_child(&mut self) -> Result<NodeId, EditRejected> {
        let parent_id = match self.selection.as_slice() {
            [selected] => selected.clone(),
            [] => self
                .snapshot()
                .root()
                .map(|root| root.id.clone())
                .ok_or(EditRejected::EmptySelection)?,
            _ => return Err(EditRejected::EmptySelection),
        };
        self.add_child_node(&parent_id)
    }

    /// Sibling of the single selected node; a free-standing node otherwise.
    pub fn insert_sibling(&mut self) -> Result<NodeId, EditRejected> {
        match self.selection.as_slice() {
            [selected] => {
                let selected = selected.clone();
                self.add_sibling_node(&selected)
            }
            _ => self.add_node(None, None),
        }
    }

    pub fn update_node(&mut self, node_id: &NodeId, patch: NodePatch) -> Result<(), EditRejected> {
        self.commit(GraphOp::UpdateNode {
            node_id: node_id.clone(),
            patch,
        })
        .map(drop)
    }

    pub fn update_nodes_style(
        &mut self,
        node_ids: &[NodeId],
        style: Style,
    ) -> Result<(), EditRejected> {
        self.commit(GraphOp::UpdateNodesStyle {
            node_ids: node_ids.to_vec(),
            style,
        })
        .map(drop)
    }

    /// Styles every selected node.
    pub fn style_selection(&mut self, style: Style) -> Result<(), EditRejected> {
        let node_ids = self.selection.clone();
        self.update_nodes_style(&node_ids, style)
    }

    /// Deletes the selected nodes with their subtrees and clears the selection.
    pub fn delete_selected(&mut self) -> Result<(), EditRejected> {
        self.commit(GraphOp::DeleteNodes {
            node_ids: self.selection.clone(),
        })?;
        self.selection.clear();
        Ok(())
    }

    pub fn toggle_detached(&mut self, node_id: &NodeId) -> Result<(), EditRejected> {
        self.commit(GraphOp::ToggleDetached {
            node_id: node_id.clone(),
        })
        .map(drop)
    }

    pub fn add_connection(
        &mut self,
        from: &NodeId,
        to: &NodeId,
    ) -> Result<ConnectionId, EditRejected> {
        let (_, delta) = self.commit(GraphOp::AddConnection {
            from: from.clone(),
            to: to.clone(),
        })?;
        delta
            .added_connections
            .into_iter()
            .next()
            .ok_or(EditRejected::EmptySelection)
    }

    pub fn update_connection(
        &mut self,
        connection_id: &ConnectionId,
        patch: ConnectionPatch,
    ) -> Result<(), EditRejected> {
        self.commit(GraphOp::UpdateConnection {
            connection_id: connection_id.clone(),
            patch,
        })
        .map(drop)
    }

    pub fn delete_connection(&mut self, connection_id: &ConnectionId) -> Result<(), EditRejected> {
        self.commit(GraphOp::DeleteConnection {
            connection_id: connection_id.clone(),
        })
        .map(drop)
    }

    pub fn reorder_sibling(
        &mut self,
        node_id: &NodeId,
        direction: SiblingMove,
    ) -> Result<(), EditRejected> {
        self.commit(GraphOp::ReorderSibling {
            node_id: node_id.clone(),
            direction,
        })
        .map(drop)
    }

    /// Lays out the tree under `root_id`, or under the primary root.
    pub fn auto_layout(&mut self, root_id: Option<&NodeId>) -> Result<(), EditRejected> {
        let root_id = match root_id {
            Some(root_id) => root_id.clone(),
            None => self
                .snapshot()
                .root()
                .map(|root| root.id.clone())
                .ok_or(EditRejected::EmptySelection)?,
        };
        self.commit(GraphOp::AutoLayout {
            root_id,
            spacing: self.config.layout_spacing,
        })
        .map(drop)
    }

    // Clipboard

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    /// Copies the selected nodes. Returns how many were copied; an empty selection keeps the
    /// previous clipboard.
    pub fn copy(&mut self) -> usize {
        match ops::copy_nodes(self.snapshot(), &self.selection) {
            Some(clipboard) => {
                let count = clipboard.nodes.len();
                self.clipboard = Some(clipboard);
                count
            }
            None => 0,
        }
    }

    /// Copy followed by delete. The copy stays even when the delete is rejected.
    pub fn cut(&mut self) -> Result<usize, EditRejected> {
        let count = self.copy();
        if count == 0 {
            return Err(EditRejected::EmptySelection);
        }
        self.delete_selected()?;
        Ok(count)
    }

    /// Pastes the clipboard offset from the originals and selects the copies.
    pub fn paste(&mut self) -> Result<Vec<NodeId>, EditRejected> {
        let clipboard = self.clipboard.clone().ok_or(EditRejected::EmptySelection)?;
        let (created, _) = self.commit(GraphOp::Paste {
            clipboard,
            offset: self.config.paste_offset,
        })?;
        self.selection = created.clone();
        Ok(created)
    }

    // Drag

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts dragging `node_id` from screen position `pointer` and selects it.
    pub fn begin_drag(&mut self, node_id: &NodeId, pointer: Point) -> bool {
        match DragSession::begin(node_id, pointer, self.history.current()) {
            Some(session) => {
                self.selection = vec![node_id.clone()];
                self.drag = Some(session);
                true
            }
            None => false,
        }
    }

    /// Moves the dragged node; `propagate` carries direct children along.
    pub fn drag_to(&mut self, pointer: Point, propagate: bool) -> bool {
        let scale = self.viewport.scale;
        match self.drag.as_mut() {
            Some(session) => {
                session.move_to(pointer, scale, propagate);
                true
            }
            None => false,
        }
    }

    /// Ends the drag. Returns `true` when the move was committed as one history entry.
    pub fn end_drag(&mut self) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        match session.end(self.history.current()) {
            Some(next) => {
                self.record(next);
                true
            }
            None => false,
        }
    }

    // History

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.drag = None;
        if self.history.undo().is_none() {
            return false;
        }
        self.after_replay();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.drag = None;
        if self.history.redo().is_none() {
            return false;
        }
        self.after_replay();
        true
    }

    // Viewport

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn set_viewport(&mut self, scale: f64, offset: Point) {
        self.viewport.set(scale, offset);
    }

    /// World position under the middle of the view; parent-less nodes are added here.
    pub fn viewport_center(&self) -> Point {
        self.viewport.center()
    }

    pub fn fit_to_screen(&mut self) {
        let snapshot = self.history.current();
        self.viewport.fit(&snapshot.nodes);
    }

    // Persistence

    /// Saves if the autosave deadline has passed. Returns whether a save happened.
    pub fn tick(&mut self, now: Instant) -> Result<bool, EditorError> {
        if !self.autosave.take_due(now) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Saves pending changes now.
    pub fn flush(&mut self) -> Result<(), EditorError> {
        self.autosave.cancel();
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    /// Saves the current map, then activates and loads `map_id` with a fresh history.
    pub fn switch_map(&mut self, map_id: &MapId) -> Result<(), EditorError> {
        if self.catalog.current_map_id() == map_id {
            return Ok(());
        }
        self.flush()?;
        self.catalog.switch_map(map_id)?;
        self.load_current()
    }

    /// Creates an empty map and switches to it.
    pub fn create_map(&mut self, name: &str) -> Result<MapId, EditorError> {
        self.flush()?;
        let map_id = self.catalog.create_map(name)?;
        self.load_current()?;
        Ok(map_id)
    }

    /// Stores the current document as a new map and continues editing there. The previous map
    /// keeps what it had at its last save.
    pub fn save_as(&mut self, name: &str) -> Result<MapId, EditorError> {
        let map_id = self
            .catalog
            .create_map_with_payload(name, self.history.current())?;
        self.autosave.cancel();
        self.dirty = false;
        self.source = DocumentSource::Stored;
        Ok(map_id)
    }

    pub fn rename_map(&mut self, map_id: &MapId, name: &str) -> Result<(), EditorError> {
        self.catalog.rename_map(map_id, name)?;
        Ok(())
    }

    /// Deletes a map. Deleting the active map drops its unsaved changes and loads the map that
    /// becomes active.
    pub fn delete_map(&mut self, map_id: &MapId) -> Result<(), EditorError> {
        let was_current = self.catalog.current_map_id() == map_id;
        self.catalog.delete_map(map_id)?;
        if was_current {
            self.autosave.cancel();
            self.dirty = false;
            self.load_current()?;
        }
        Ok(())
    }

    /// The current document as a pretty-printed export file.
    pub fn export_document(&self) -> Result<String, EditorError> {
        export_json(self.history.current(), Utc::now()).map_err(EditorError::Export)
    }

    /// Replaces the current document with an imported one, as a single undoable edit.
    pub fn import_document(&mut self, raw: &str) -> Result<(), EditorError> {
        let snapshot = import_json(raw)?;
        self.commit(GraphOp::Replace { snapshot })?;
        self.selection.clear();
        Ok(())
    }

    /// Applies `op` to the current document. Edits that change nothing are not recorded.
    fn commit(&mut self, op: GraphOp) -> Result<(Vec<NodeId>, EditDelta), EditRejected> {
        let applied = ops::apply(self.history.current(), &op).map_err(|err| {
            tracing::debug!(%err, "edit rejected");
            err
        })?;
        if applied.delta.is_empty() {
            tracing::trace!("edit changed nothing");
        } else {
            tracing::trace!(delta = ?applied.delta, "edit applied");
            self.record(applied.snapshot);
        }
        Ok((applied.created, applied.delta))
    }

    fn record(&mut self, snapshot: Snapshot) {
        if self.drag.take().is_some() {
            tracing::debug!("drag abandoned by an edit");
        }
        self.history.push(snapshot);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.autosave.arm(Instant::now());
    }

    fn select_created(&mut self, created: Vec<NodeId>) -> Result<NodeId, EditRejected> {
        let first = created.first().cloned().ok_or(EditRejected::EmptySelection)?;
        self.selection = created;
        Ok(first)
    }

    fn after_replay(&mut self) {
        let snapshot = self.history.current();
        self.selection.retain(|node_id| snapshot.node(node_id).is_some());
        self.mark_dirty();
        self.history.settle();
    }

    fn save(&mut self) -> Result<(), EditorError> {
        let map_id = self.catalog.current_map_id().clone();
        let snapshot = self.history.current();
        match self.catalog.save_map_payload(&map_id, snapshot) {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!(%map_id, nodes = snapshot.nodes.len(), "map saved");
                Ok(())
            }
            Err(err) => {
                tracing::error!(%map_id, %err, "saving map failed");
                Err(err.into())
            }
        }
    }

    fn load_current(&mut self) -> Result<(), EditorError> {
        let loaded = self
            .catalog
            .load_map_payload(self.catalog.current_map_id())?;
        self.history.reset(loaded.snapshot);
        self.source = loaded.source;
        self.selection.clear();
        self.drag = None;
        self.autosave.cancel();
        self.dirty = false;
        Ok(())
    }
}
