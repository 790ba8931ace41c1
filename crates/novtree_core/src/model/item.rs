//! Project item domain model.
//!
//! # Responsibility
//! - Define the concrete record for folders, documents and notes.
//! - Define the packed record form used for project save/load.
//!
//! # Invariants
//! - `handle`, `parent` and `root` are only written through the tree.
//! - Packed records keep enum values as upper-case names.

use crate::model::handle::Handle;
use crate::tree::links::TreeLinks;
use crate::tree::TreeItem;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural type of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    NoType,
    /// Top-level item anchoring one subtree.
    Root,
    Folder,
    File,
}

/// Category tag of an item; inherited from the item's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemClass {
    NoClass,
    Novel,
    Plot,
    Character,
    World,
    Timeline,
    Object,
    Entity,
    Custom,
    Archive,
    Template,
    Trash,
}

impl ItemClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoClass => "NO_CLASS",
            Self::Novel => "NOVEL",
            Self::Plot => "PLOT",
            Self::Character => "CHARACTER",
            Self::World => "WORLD",
            Self::Timeline => "TIMELINE",
            Self::Object => "OBJECT",
            Self::Entity => "ENTITY",
            Self::Custom => "CUSTOM",
            Self::Archive => "ARCHIVE",
            Self::Template => "TEMPLATE",
            Self::Trash => "TRASH",
        }
    }

    /// Whether novel documents may live in a subtree of this class.
    pub fn allows_documents(&self) -> bool {
        matches!(self, Self::Novel | Self::Archive | Self::Trash)
    }
}

/// Layout of a file item, deciding which word-count bucket it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemLayout {
    NoLayout,
    Document,
    Note,
}

impl ItemLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoLayout => "NO_LAYOUT",
            Self::Document => "DOCUMENT",
            Self::Note => "NOTE",
        }
    }
}

/// One folder, document or note of a writing project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    handle: Option<Handle>,
    parent: Option<Handle>,
    root: Option<Handle>,
    /// User-facing label.
    pub name: String,
    pub kind: ItemType,
    pub class: ItemClass,
    pub layout: ItemLayout,
    /// Status label key, if any.
    pub status: Option<String>,
    /// Importance label key, if any.
    pub importance: Option<String>,
    /// Included in builds when `true`.
    pub active: bool,
    /// Expanded in tree views when `true`.
    pub expanded: bool,
    /// Top heading level found in the document text, e.g. `H2`.
    pub heading: String,
    pub char_count: u32,
    pub word_count: u32,
    pub para_count: u32,
    initial_count: u32,
}

impl ProjectItem {
    /// Creates an unattached item. Layout starts as `NoLayout`.
    pub fn new(name: impl Into<String>, kind: ItemType, class: ItemClass) -> Self {
        Self {
            handle: None,
            parent: None,
            root: None,
            name: name.into(),
            kind,
            class,
            layout: ItemLayout::NoLayout,
            status: None,
            importance: None,
            active: true,
            expanded: false,
            heading: String::new(),
            char_count: 0,
            word_count: 0,
            para_count: 0,
            initial_count: 0,
        }
    }

    /// Convenience constructor for a root item of `class`.
    pub fn root_folder(name: impl Into<String>, class: ItemClass) -> Self {
        Self::new(name, ItemType::Root, class)
    }

    pub fn with_layout(mut self, layout: ItemLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_word_count(mut self, word_count: u32) -> Self {
        self.word_count = word_count;
        self
    }

    /// Updates all text counters at once.
    pub fn set_counts(&mut self, char_count: u32, word_count: u32, para_count: u32) {
        self.char_count = char_count;
        self.word_count = word_count;
        self.para_count = para_count;
    }

    /// Word count recorded when the project was loaded.
    pub fn initial_count(&self) -> u32 {
        self.initial_count
    }

    /// Words written since the project was loaded.
    pub fn session_words(&self) -> i64 {
        i64::from(self.word_count) - i64::from(self.initial_count)
    }

    pub fn is_file(&self) -> bool {
        self.kind == ItemType::File
    }
}

impl TreeLinks for ProjectItem {
    fn set_handle(&mut self, handle: Option<Handle>) {
        self.handle = handle;
    }

    fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    fn set_root(&mut self, root: Option<Handle>) {
        self.root = root;
    }
}

impl TreeItem for ProjectItem {
    fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    fn parent(&self) -> Option<&Handle> {
        self.parent.as_ref()
    }

    fn root(&self) -> Option<&Handle> {
        self.root.as_ref()
    }

    fn item_type(&self) -> ItemType {
        self.kind
    }

    fn item_class(&self) -> ItemClass {
        self.class
    }

    fn item_layout(&self) -> ItemLayout {
        self.layout
    }

    fn item_name(&self) -> &str {
        self.name.as_str()
    }

    fn word_count(&self) -> u32 {
        self.word_count
    }

    fn set_class_defaults(&mut self, root_class: ItemClass) {
        if self.parent.is_some() {
            self.class = root_class;
        }
        if !self.is_file() {
            return;
        }
        if self.layout == ItemLayout::NoLayout {
            self.layout = if root_class.allows_documents() {
                ItemLayout::Document
            } else {
                ItemLayout::Note
            };
        } else if !root_class.allows_documents() {
            self.layout = ItemLayout::Note;
        }
    }

    fn save_initial_count(&mut self) {
        self.initial_count = self.word_count;
    }

    fn pack(&self) -> ItemRecord {
        ItemRecord {
            handle: self.handle.as_ref().map(|value| value.as_str().to_string()),
            parent: self.parent.as_ref().map(|value| value.as_str().to_string()),
            root: self.root.as_ref().map(|value| value.as_str().to_string()),
            name: self.name.clone(),
            kind: self.kind,
            class: self.class,
            layout: self.layout,
            status: self.status.clone(),
            importance: self.importance.clone(),
            active: self.active,
            expanded: self.expanded,
            heading: self.heading.clone(),
            char_count: self.char_count,
            word_count: self.word_count,
            para_count: self.para_count,
        }
    }

    fn unpack(record: ItemRecord) -> Result<Self, ItemRecordError> {
        let handle_text = record.handle.ok_or(ItemRecordError::MissingHandle)?;
        let handle = Handle::parse(handle_text.as_str())
            .ok_or(ItemRecordError::InvalidHandle(handle_text))?;
        let parent = match record.parent {
            Some(value) => Some(
                Handle::parse(value.as_str()).ok_or(ItemRecordError::InvalidHandle(value))?,
            ),
            None => None,
        };

        Ok(Self {
            handle: Some(handle),
            parent,
            // Root is a cache; a stale or malformed value is simply recomputed.
            root: record.root.as_deref().and_then(Handle::parse),
            name: record.name,
            kind: record.kind,
            class: record.class,
            layout: record.layout,
            status: record.status,
            importance: record.importance,
            active: record.active,
            expanded: record.expanded,
            heading: record.heading,
            char_count: record.char_count,
            word_count: record.word_count,
            para_count: record.para_count,
            initial_count: 0,
        })
    }
}

/// Packed, order-independent form of one item as stored in project files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub root: Option<String>,
    pub name: String,
    /// Serialized as `type` to match the project file schema.
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub class: ItemClass,
    pub layout: ItemLayout,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "import")]
    pub importance: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub char_count: u32,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub para_count: u32,
}

/// Errors converting a packed record back into an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRecordError {
    /// Record carries no handle.
    MissingHandle,
    /// Record handle or parent handle is malformed.
    InvalidHandle(String),
}

impl Display for ItemRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHandle => write!(f, "item record has no handle"),
            Self::InvalidHandle(value) => write!(f, "item record has invalid handle `{value}`"),
        }
    }
}

impl Error for ItemRecordError {}

#[cfg(test)]
mod tests {
    use super::{ItemClass, ItemLayout, ItemRecordError, ItemType, ProjectItem};
    use crate::model::handle::Handle;
    use crate::tree::links::TreeLinks;
    use crate::tree::TreeItem;

    fn handle(value: &str) -> Handle {
        Handle::parse(value).expect("valid test handle")
    }

    #[test]
    fn new_item_has_no_identity() {
        let item = ProjectItem::new("Scene", ItemType::File, ItemClass::Novel);
        assert!(item.handle().is_none());
        assert!(item.parent().is_none());
        assert!(item.root().is_none());
        assert_eq!(item.layout, ItemLayout::NoLayout);
        assert!(item.active);
    }

    #[test]
    fn class_defaults_pick_layout_from_root_class() {
        let mut scene = ProjectItem::new("Scene", ItemType::File, ItemClass::NoClass);
        scene.set_parent(Some(handle("0000000000001")));
        scene.set_class_defaults(ItemClass::Novel);
        assert_eq!(scene.class, ItemClass::Novel);
        assert_eq!(scene.layout, ItemLayout::Document);

        let mut person = ProjectItem::new("Jane", ItemType::File, ItemClass::NoClass)
            .with_layout(ItemLayout::Document);
        person.set_parent(Some(handle("0000000000002")));
        person.set_class_defaults(ItemClass::Character);
        assert_eq!(person.class, ItemClass::Character);
        assert_eq!(person.layout, ItemLayout::Note);
    }

    #[test]
    fn class_defaults_leave_root_class_and_folders_alone() {
        let mut root = ProjectItem::root_folder("Novel", ItemClass::Novel);
        root.set_class_defaults(ItemClass::Plot);
        assert_eq!(root.class, ItemClass::Novel);
        assert_eq!(root.layout, ItemLayout::NoLayout);
    }

    #[test]
    fn unpack_requires_valid_handle() {
        let mut record = ProjectItem::new("Scene", ItemType::File, ItemClass::Novel).pack();
        assert_eq!(
            ProjectItem::unpack(record.clone()).unwrap_err(),
            ItemRecordError::MissingHandle
        );

        record.handle = Some("xyz".to_string());
        assert_eq!(
            ProjectItem::unpack(record).unwrap_err(),
            ItemRecordError::InvalidHandle("xyz".to_string())
        );
    }

    #[test]
    fn save_initial_count_sets_session_baseline() {
        let mut item =
            ProjectItem::new("Scene", ItemType::File, ItemClass::Novel).with_word_count(120);
        item.save_initial_count();
        item.word_count = 150;
        assert_eq!(item.initial_count(), 120);
        assert_eq!(item.session_words(), 30);
    }
}
