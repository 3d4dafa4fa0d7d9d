// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line-oriented command surface over an [`Editor`].
//!
//! One command per line. Node, connection and map references accept a full id or any unique id
//! prefix; `.` names the single selected node. Map references also accept the map name.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde_json::Value;

use crate::editor::{Editor, EditorError};
use crate::format::{default_export_filename, to_tree, unreachable_nodes, TreeNode};
use crate::model::{ConnectionId, ConnectionPatch, MapId, NodeId, NodePatch, Point, Style};
use crate::ops::{Direction, EditRejected, SiblingMove};
use crate::store::Storage;

pub const HELP: &str = "\
show                         outline of the current map
maps                         list maps (* = active)
new-map <name>               create an empty map and switch to it
save-as <name>               copy the current document into a new map
rename-map <map> <name>      rename a map
delete-map <map>             delete a map
switch <map>                 switch to another map
select [<node>...]           set (or clear) the selection
add [<text>]                 free-standing node in the middle of the view
child                        child of the selection (or of the root)
sibling                      sibling of the selection
text <node> <text>           set node text
move <node> <x> <y>          set node position
parent <node> <parent|->     re-parent (or detach from) a node
detach <node>                toggle whether a node follows its parent
style <key>=<value>...       merge style keys into the selected nodes
delete                       delete the selection with its subtrees
connect <node> <node>        add a free connection
label <conn> [<text>]        set or clear a connection label
disconnect <conn>            remove a connection
up | down | left | right     move the selection through the tree
raise <node> | lower <node>  reorder among siblings
layout [<root>]              tidy the tree under a root
copy | cut | paste           clipboard
drag <node> <dx> <dy> [solo] move a node (with its children unless solo)
undo | redo                  history
zoom in|out|reset|fit        viewport
export [<path>]              write the document as JSON
import <path>                replace the document from a JSON file
save                         write pending changes now
quit                         save and exit";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("{0}")]
    Usage(String),
    #[error("no {kind} matches {reference:?}")]
    Unknown { kind: &'static str, reference: String },
    #[error("{reference:?} matches more than one {kind}")]
    Ambiguous { kind: &'static str, reference: String },
    #[error(transparent)]
    Rejected(#[from] EditRejected),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn usage(message: impl Into<String>) -> ShellError {
    ShellError::Usage(message.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomCommand {
    In,
    Out,
    Reset,
    Fit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Show,
    Maps,
    NewMap(String),
    SaveAs(String),
    RenameMap { map: String, name: String },
    DeleteMap(String),
    Switch(String),
    Select(Vec<String>),
    Add(Option<String>),
    Child,
    Sibling,
    Text { node: String, text: String },
    Move { node: String, x: f64, y: f64 },
    Parent { node: String, parent: Option<String> },
    Detach(String),
    Style(Style),
    Delete,
    Connect { from: String, to: String },
    Label { connection: String, text: Option<String> },
    Disconnect(String),
    Navigate(Direction),
    Reorder { node: String, direction: SiblingMove },
    Layout(Option<String>),
    Copy,
    Cut,
    Paste,
    Drag { node: String, delta: Point, solo: bool },
    Undo,
    Redo,
    Zoom(ZoomCommand),
    Export(Option<PathBuf>),
    Import(PathBuf),
    Save,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// Splits off the first word; the remainder keeps its inner spacing.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim()),
        None => (input, ""),
    }
}

fn required<'a>(word: &'a str, what: &str) -> Result<&'a str, ShellError> {
    if word.is_empty() {
        return Err(usage(format!("missing {what}")));
    }
    Ok(word)
}

fn number(raw: &str, what: &str) -> Result<f64, ShellError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| usage(format!("{what} must be a number, got {raw:?}")))?;
    if !value.is_finite() {
        return Err(usage(format!("{what} must be finite")));
    }
    Ok(value)
}

fn optional_text(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_owned())
}

fn parse_style(rest: &str) -> Result<Style, ShellError> {
    let mut style = Style::new();
    for pair in rest.split_whitespace() {
        let (key, raw) = pair
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| usage(format!("expected key=value, got {pair:?}")))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        style.insert(key.to_owned(), value);
    }
    if style.is_empty() {
        return Err(usage("style needs at least one key=value"));
    }
    Ok(style)
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ShellError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = split_word(line);

    let command = match word {
        "help" | "?" => Command::Help,
        "show" | "ls" => Command::Show,
        "maps" => Command::Maps,
        "new-map" => Command::NewMap(required(rest, "map name")?.to_owned()),
        "save-as" => Command::SaveAs(required(rest, "map name")?.to_owned()),
        "rename-map" => {
            let (map, name) = split_word(rest);
            Command::RenameMap {
                map: required(map, "map")?.to_owned(),
                name: required(name, "map name")?.to_owned(),
            }
        }
        "delete-map" => Command::DeleteMap(required(rest, "map")?.to_owned()),
        "switch" => Command::Switch(required(rest, "map")?.to_owned()),
        "select" => Command::Select(rest.split_whitespace().map(str::to_owned).collect()),
        "add" => Command::Add(optional_text(rest)),
        "child" | "tab" => Command::Child,
        "sibling" | "enter" => Command::Sibling,
        "text" => {
            let (node, text) = split_word(rest);
            Command::Text {
                node: required(node, "node")?.to_owned(),
                text: required(text, "text")?.to_owned(),
            }
        }
        "move" => {
            let mut words = rest.split_whitespace();
            let node = required(words.next().unwrap_or(""), "node")?.to_owned();
            let x = number(required(words.next().unwrap_or(""), "x")?, "x")?;
            let y = number(required(words.next().unwrap_or(""), "y")?, "y")?;
            Command::Move { node, x, y }
        }
        "parent" => {
            let (node, parent) = split_word(rest);
            let parent = required(parent, "parent (or -)")?;
            Command::Parent {
                node: required(node, "node")?.to_owned(),
                parent: (parent != "-").then(|| parent.to_owned()),
            }
        }
        "detach" => Command::Detach(required(rest, "node")?.to_owned()),
        "style" => Command::Style(parse_style(rest)?),
        "delete" | "del" => Command::Delete,
        "connect" => {
            let (from, to) = split_word(rest);
            Command::Connect {
                from: required(from, "source node")?.to_owned(),
                to: required(to, "target node")?.to_owned(),
            }
        }
        "label" => {
            let (connection, text) = split_word(rest);
            Command::Label {
                connection: required(connection, "connection")?.to_owned(),
                text: optional_text(text),
            }
        }
        "disconnect" => Command::Disconnect(required(rest, "connection")?.to_owned()),
        "up" => Command::Navigate(Direction::Up),
        "down" => Command::Navigate(Direction::Down),
        "left" => Command::Navigate(Direction::Left),
        "right" => Command::Navigate(Direction::Right),
        "raise" => Command::Reorder {
            node: required(rest, "node")?.to_owned(),
            direction: SiblingMove::Earlier,
        },
        "lower" => Command::Reorder {
            node: required(rest, "node")?.to_owned(),
            direction: SiblingMove::Later,
        },
        "layout" => Command::Layout(optional_text(rest)),
        "copy" => Command::Copy,
        "cut" => Command::Cut,
        "paste" => Command::Paste,
        "drag" => {
            let words: Vec<&str> = rest.split_whitespace().collect();
            let (node, dx, dy, solo) = match words.as_slice() {
                [node, dx, dy] => (*node, *dx, *dy, false),
                [node, dx, dy, "solo"] => (*node, *dx, *dy, true),
                _ => return Err(usage("usage: drag <node> <dx> <dy> [solo]")),
            };
            Command::Drag {
                node: node.to_owned(),
                delta: Point::new(number(dx, "dx")?, number(dy, "dy")?),
                solo,
            }
        }
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "zoom" => Command::Zoom(match rest {
            "in" | "+" => ZoomCommand::In,
            "out" | "-" => ZoomCommand::Out,
            "reset" => ZoomCommand::Reset,
            "fit" => ZoomCommand::Fit,
            _ => return Err(usage("usage: zoom in|out|reset|fit")),
        }),
        "export" => Command::Export(optional_text(rest).map(PathBuf::from)),
        "import" => Command::Import(PathBuf::from(required(rest, "path")?)),
        "save" => Command::Save,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(usage(format!("unknown command {word:?} (try `help`)"))),
    };
    Ok(Some(command))
}

/// Resolves `reference` against `candidates`: exact match first, then a unique prefix.
fn resolve<'a>(
    kind: &'static str,
    reference: &str,
    candidates: impl Iterator<Item = &'a str> + Clone,
) -> Result<&'a str, ShellError> {
    if let Some(exact) = candidates.clone().find(|id| *id == reference) {
        return Ok(exact);
    }
    let mut matches = candidates.filter(|id| id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (Some(_), Some(_)) => Err(ShellError::Ambiguous {
            kind,
            reference: reference.to_owned(),
        }),
        (None, _) => Err(ShellError::Unknown {
            kind,
            reference: reference.to_owned(),
        }),
    }
}

fn node_ref<S: Storage>(editor: &Editor<S>, reference: &str) -> Result<NodeId, ShellError> {
    if reference == "." {
        return match editor.selection() {
            [selected] => Ok(selected.clone()),
            _ => Err(usage("`.` needs exactly one selected node")),
        };
    }
    let ids = editor.snapshot().nodes.iter().map(|node| node.id.as_str());
    let found = resolve("node", reference, ids)?;
    NodeId::new(found).map_err(|_| usage("invalid node id"))
}

fn connection_ref<S: Storage>(
    editor: &Editor<S>,
    reference: &str,
) -> Result<ConnectionId, ShellError> {
    let ids = editor.connections().iter().map(|conn| conn.id.as_str());
    let found = resolve("connection", reference, ids)?;
    ConnectionId::new(found).map_err(|_| usage("invalid connection id"))
}

fn map_ref<S: Storage>(editor: &Editor<S>, reference: &str) -> Result<MapId, ShellError> {
    let maps = editor.catalog().maps();
    if let Some(entry) = maps.iter().find(|entry| entry.name == reference) {
        return Ok(entry.id.clone());
    }
    let found = resolve("map", reference, maps.iter().map(|entry| entry.id.as_str()))?;
    MapId::new(found).map_err(|_| usage("invalid map id"))
}

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn write_subtree(out: &mut String, tree: &TreeNode, depth: usize, selection: &[NodeId]) {
    let node = &tree.node;
    let marker = if selection.contains(&node.id) { '*' } else { '-' };
    let detached = if node.is_detached { " detached" } else { "" };
    let _ = writeln!(
        out,
        "{:indent$}{marker} {} [{}] ({}, {}){detached}",
        "",
        node.text,
        short(node.id.as_str()),
        node.x,
        node.y,
        indent = depth * 2,
    );
    for child in &tree.children {
        write_subtree(out, child, depth + 1, selection);
    }
}

/// Indented outline of the current document followed by its free connections.
pub fn render_outline<S: Storage>(editor: &Editor<S>) -> String {
    let mut out = String::new();
    let nodes = editor.nodes();
    for tree in to_tree(nodes) {
        write_subtree(&mut out, &tree, 0, editor.selection());
    }
    let stranded = unreachable_nodes(nodes);
    if !stranded.is_empty() {
        let _ = writeln!(out, "({} nodes unreachable from any root)", stranded.len());
    }
    for conn in editor.connections() {
        let label = conn.text.as_deref().unwrap_or("");
        let _ = writeln!(
            out,
            "~ [{}] {} -> {} {label}",
            short(conn.id.as_str()),
            short(conn.from.as_str()),
            short(conn.to.as_str()),
        );
    }
    out
}

fn render_maps<S: Storage>(editor: &Editor<S>) -> String {
    let mut out = String::new();
    for entry in editor.catalog().maps() {
        let marker = if entry.id == *editor.current_map_id() {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{marker} {} [{}] updated {}",
            entry.name,
            short(entry.id.as_str()),
            entry.updated_at.format("%Y-%m-%d %H:%M"),
        );
    }
    out
}

fn created(node_id: &NodeId) -> String {
    format!("created [{}]", short(node_id.as_str()))
}

fn done(flag: bool, yes: &str, no: &str) -> String {
    let message = if flag { yes } else { no };
    message.to_owned()
}

/// Runs one command against `editor`.
pub fn execute<S: Storage>(
    editor: &mut Editor<S>,
    command: Command,
) -> Result<Outcome, ShellError> {
    let message = match command {
        Command::Help => HELP.to_owned(),
        Command::Show => render_outline(editor),
        Command::Maps => render_maps(editor),
        Command::NewMap(name) => {
            let map_id = editor.create_map(&name)?;
            format!("switched to new map [{}]", short(map_id.as_str()))
        }
        Command::SaveAs(name) => {
            let map_id = editor.save_as(&name)?;
            format!("saved as [{}]", short(map_id.as_str()))
        }
        Command::RenameMap { map, name } => {
            let map_id = map_ref(editor, &map)?;
            editor.rename_map(&map_id, &name)?;
            "renamed".to_owned()
        }
        Command::DeleteMap(map) => {
            let map_id = map_ref(editor, &map)?;
            editor.delete_map(&map_id)?;
            "deleted".to_owned()
        }
        Command::Switch(map) => {
            let map_id = map_ref(editor, &map)?;
            editor.switch_map(&map_id)?;
            render_outline(editor)
        }
        Command::Select(references) => {
            let node_ids = references
                .iter()
                .map(|reference| node_ref(editor, reference))
                .collect::<Result<Vec<_>, _>>()?;
            editor.select(node_ids);
            format!("{} selected", editor.selection().len())
        }
        Command::Add(text) => created(&editor.add_node(None, text.as_deref())?),
        Command::Child => created(&editor.insert_child()?),
        Command::Sibling => created(&editor.insert_sibling()?),
        Command::Text { node, text } => {
            let node_id = node_ref(editor, &node)?;
            editor.update_node(&node_id, NodePatch::text(text))?;
            String::new()
        }
        Command::Move { node, x, y } => {
            let node_id = node_ref(editor, &node)?;
            editor.update_node(&node_id, NodePatch::position(Point::new(x, y)))?;
            String::new()
        }
        Command::Parent { node, parent } => {
            let node_id = node_ref(editor, &node)?;
            let parent_id = parent
                .map(|parent| node_ref(editor, &parent))
                .transpose()?;
            let patch = NodePatch {
                parent_id: Some(parent_id),
                ..NodePatch::default()
            };
            editor.update_node(&node_id, patch)?;
            String::new()
        }
        Command::Detach(node) => {
            let node_id = node_ref(editor, &node)?;
            editor.toggle_detached(&node_id)?;
            String::new()
        }
        Command::Style(style) => {
            editor.style_selection(style)?;
            String::new()
        }
        Command::Delete => {
            editor.delete_selected()?;
            String::new()
        }
        Command::Connect { from, to } => {
            let from = node_ref(editor, &from)?;
            let to = node_ref(editor, &to)?;
            let connection_id = editor.add_connection(&from, &to)?;
            format!("connected [{}]", short(connection_id.as_str()))
        }
        Command::Label { connection, text } => {
            let connection_id = connection_ref(editor, &connection)?;
            editor.update_connection(&connection_id, ConnectionPatch::label(text))?;
            String::new()
        }
        Command::Disconnect(connection) => {
            let connection_id = connection_ref(editor, &connection)?;
            editor.delete_connection(&connection_id)?;
            String::new()
        }
        Command::Navigate(direction) => match editor.navigate(direction) {
            Some(node_id) => {
                let text = editor
                    .snapshot()
                    .node(&node_id)
                    .map(|node| node.text.clone())
                    .unwrap_or_default();
                format!("* {text} [{}]", short(node_id.as_str()))
            }
            None => "no node in that direction".to_owned(),
        },
        Command::Reorder { node, direction } => {
            let node_id = node_ref(editor, &node)?;
            editor.reorder_sibling(&node_id, direction)?;
            String::new()
        }
        Command::Layout(root) => {
            let root_id = root.map(|root| node_ref(editor, &root)).transpose()?;
            editor.auto_layout(root_id.as_ref())?;
            String::new()
        }
        Command::Copy => format!("{} copied", editor.copy()),
        Command::Cut => format!("{} cut", editor.cut()?),
        Command::Paste => format!("{} pasted", editor.paste()?.len()),
        Command::Drag { node, delta, solo } => {
            let node_id = node_ref(editor, &node)?;
            if !editor.begin_drag(&node_id, Point::ORIGIN) {
                return Err(EditRejected::UnknownNode { node_id }.into());
            }
            let scale = editor.viewport().scale;
            editor.drag_to(delta.scaled(scale), !solo);
            done(editor.end_drag(), "moved", "nothing moved")
        }
        Command::Undo => done(editor.undo(), "undone", "nothing to undo"),
        Command::Redo => done(editor.redo(), "redone", "nothing to redo"),
        Command::Zoom(zoom) => {
            match zoom {
                ZoomCommand::In => editor.viewport_mut().zoom_in(),
                ZoomCommand::Out => editor.viewport_mut().zoom_out(),
                ZoomCommand::Reset => editor.viewport_mut().reset(),
                ZoomCommand::Fit => editor.fit_to_screen(),
            }
            format!("zoom {:.0}%", editor.viewport().scale * 100.0)
        }
        Command::Export(path) => {
            let raw = editor.export_document()?;
            let path = path.unwrap_or_else(|| {
                PathBuf::from(default_export_filename(chrono::Local::now().date_naive()))
            });
            std::fs::write(&path, raw).map_err(|source| ShellError::Io {
                path: path.clone(),
                source,
            })?;
            format!("exported to {}", path.display())
        }
        Command::Import(path) => {
            let raw = std::fs::read_to_string(&path).map_err(|source| ShellError::Io {
                path: path.clone(),
                source,
            })?;
            editor.import_document(&raw)?;
            format!("imported {} nodes", editor.snapshot().nodes.len())
        }
        Command::Save => {
            editor.flush()?;
            "saved".to_owned()
        }
        Command::Quit => {
            editor.flush()?;
            return Ok(Outcome::Quit);
        }
    };
    Ok(Outcome::Continue(message))
}
