//! Handle-indexed project item tree.
//!
//! # Responsibility
//! - Own the handle -> item map, the display order and the root set.
//! - Enforce structural invariants under insert/remove/reorder/duplicate.
//! - Provide bounded upward traversal and the packed save/load form.
//!
//! # Invariants
//! - The order list and the item map always hold the same handle set.
//! - At most one trash root exists.
//! - Upward walks are bounded by `MAX_DEPTH`; overflow is fatal.

mod item_tree;
mod toc;

pub use item_tree::{ItemTree, MAX_DEPTH, MAX_HANDLE_ATTEMPTS};
pub use toc::TOC_MIN_WIDTH;

use crate::model::handle::Handle;
use crate::model::item::{ItemClass, ItemLayout, ItemRecord, ItemRecordError, ItemType};

pub(crate) mod links {
    use crate::model::handle::Handle;

    /// Structural links written only by the tree.
    ///
    /// Not nameable outside the crate, so an item's handle, parent and root
    /// cannot be rewritten behind the tree's back.
    pub trait TreeLinks {
        fn set_handle(&mut self, handle: Option<Handle>);
        fn set_parent(&mut self, parent: Option<Handle>);
        fn set_root(&mut self, root: Option<Handle>);
    }
}

/// Field subset of an item record the tree reads and writes.
///
/// Everything else on the record is opaque to the tree. Sealed: only
/// records defined in this crate implement it.
pub trait TreeItem: Clone + links::TreeLinks {
    fn handle(&self) -> Option<&Handle>;
    fn parent(&self) -> Option<&Handle>;
    fn root(&self) -> Option<&Handle>;
    fn item_type(&self) -> ItemType;
    fn item_class(&self) -> ItemClass;
    fn item_layout(&self) -> ItemLayout;
    fn item_name(&self) -> &str;
    fn word_count(&self) -> u32;
    /// Applies defaults derived from the class of the item's root.
    fn set_class_defaults(&mut self, root_class: ItemClass);
    /// Records the current counts as the change-tracking baseline.
    fn save_initial_count(&mut self);
    fn pack(&self) -> ItemRecord;
    fn unpack(record: ItemRecord) -> Result<Self, ItemRecordError>;

    fn is_root_type(&self) -> bool {
        self.item_type() == ItemType::Root
    }
}
