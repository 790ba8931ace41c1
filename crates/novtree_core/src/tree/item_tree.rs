//! Item tree state and structural operations.

use crate::model::handle::{Handle, HandleGenerator, RandomHandleGenerator};
use crate::model::item::{ItemClass, ItemLayout, ItemRecord, ItemType, ProjectItem};
use crate::project::ChangeSink;
use crate::tree::TreeItem;
use log::{debug, error, info, warn};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Maximum number of parent hops an upward walk may take.
pub const MAX_DEPTH: usize = 1000;
/// Maximum number of draws when generating a fresh handle.
pub const MAX_HANDLE_ATTEMPTS: usize = 1000;

/// Handle-indexed forest of project items.
///
/// Items are owned by the tree and addressed by `Handle`. Display order is
/// an explicit list, independent of the parent/child structure.
pub struct ItemTree<I: TreeItem = ProjectItem> {
    project: Arc<dyn ChangeSink>,
    handle_source: Box<dyn HandleGenerator>,
    items: HashMap<Handle, I>,
    order: Vec<Handle>,
    roots: HashSet<Handle>,
    trash_root: Option<Handle>,
    archive_root: Option<Handle>,
    tree_changed: bool,
}

/// Result of one bounded upward walk.
struct AncestorWalk {
    /// Visited handles, starting at the walk origin.
    path: Vec<Handle>,
    /// `true` when the walk ended on a parentless item.
    reached_root: bool,
}

impl<I: TreeItem> ItemTree<I> {
    /// Creates an empty tree reporting changes to `project`.
    pub fn new(project: Arc<dyn ChangeSink>) -> Self {
        Self::with_handle_generator(project, Box::new(RandomHandleGenerator))
    }

    /// Creates an empty tree drawing new handles from `handle_source`.
    pub fn with_handle_generator(
        project: Arc<dyn ChangeSink>,
        handle_source: Box<dyn HandleGenerator>,
    ) -> Self {
        Self {
            project,
            handle_source,
            items: HashMap::new(),
            order: Vec::new(),
            roots: HashSet::new(),
            trash_root: None,
            archive_root: None,
            tree_changed: false,
        }
    }

    /// Drops all items and slots. Does not notify the project.
    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
        self.roots.clear();
        self.trash_root = None;
        self.archive_root = None;
        self.tree_changed = false;
    }

    /// Returns a copy of all handles in display order.
    pub fn handles(&self) -> Vec<Handle> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, handle: &Handle) -> bool {
        self.items.contains_key(handle)
    }

    /// Iterates items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &I> + '_ {
        self.order
            .iter()
            .filter_map(move |handle| self.items.get(handle))
    }

    /// Whether the structure changed since the flag was last cleared.
    pub fn tree_changed(&self) -> bool {
        self.tree_changed
    }

    /// Sets the change flag; raising it notifies the project.
    pub fn set_tree_changed(&mut self, state: bool) {
        self.tree_changed = state;
        if state {
            self.project.mark_changed();
        }
    }

    /// Adds an item to the end of the display order.
    ///
    /// Malformed `handle`/`parent` text is treated as absent. Without a
    /// handle a fresh one is generated.
    ///
    /// Returns `false` without changing anything when the handle is taken
    /// or when `item` would be a second trash root.
    pub fn append(&mut self, handle: Option<&str>, parent: Option<&str>, mut item: I) -> bool {
        let parent = parent.and_then(Handle::parse);
        let handle = match handle.and_then(Handle::parse) {
            Some(handle) => handle,
            None => self.make_handle(),
        };

        if self.items.contains_key(&handle) {
            warn!(
                "event=tree_append module=tree status=rejected error_code=duplicate_handle handle={}",
                handle
            );
            return false;
        }

        debug!(
            "event=tree_append module=tree status=start handle={} parent={}",
            handle,
            display_handle(parent.as_ref())
        );

        if let Some(existing) = self.trash_conflict(&handle, &item) {
            error!(
                "event=tree_append module=tree status=rejected error_code=duplicate_trash_root handle={} existing={}",
                handle, existing
            );
            return false;
        }
        self.track_root(&handle, &item);

        item.set_handle(Some(handle.clone()));
        item.set_parent(parent);

        self.items.insert(handle.clone(), item);
        self.order.push(handle);
        self.set_tree_changed(true);
        true
    }

    /// Copies the item at `source` under the same parent with a new handle.
    ///
    /// Returns the new item, or `None` when the source is unknown or the
    /// copy was rejected.
    pub fn duplicate(&mut self, source: &Handle) -> Option<&I> {
        let mut copy = self.get(source)?.clone();
        let parent = copy.parent().map(|value| value.as_str().to_string());
        copy.set_handle(None);

        if !self.append(None, parent.as_deref(), copy) {
            return None;
        }

        let new_handle = self.order.last()?;
        info!(
            "event=tree_duplicate module=tree status=ok source={} handle={}",
            source, new_handle
        );
        self.items.get(new_handle)
    }

    /// Removes one item. Children are left untouched.
    ///
    /// Returns `false`, logging a warning, when the handle is unknown.
    pub fn remove(&mut self, handle: &Handle) -> bool {
        let position = self.order.iter().position(|value| value == handle);
        let Some(position) = position.filter(|_| self.items.contains_key(handle)) else {
            warn!(
                "event=tree_remove module=tree status=skipped error_code=item_not_found handle={}",
                handle
            );
            return false;
        };

        self.order.remove(position);
        self.items.remove(handle);
        self.release_root(handle);

        self.set_tree_changed(true);
        true
    }

    /// Returns the item for `handle`, logging an error when there is none.
    pub fn lookup(&self, handle: Option<&Handle>) -> Option<&I> {
        if let Some(item) = handle.and_then(|value| self.items.get(value)) {
            return Some(item);
        }
        error!(
            "event=tree_lookup module=tree status=error error_code=item_not_found handle={}",
            display_handle(handle)
        );
        None
    }

    pub fn get(&self, handle: &Handle) -> Option<&I> {
        self.lookup(Some(handle))
    }

    /// Applies `edit` to a copy of one item and stores the result.
    ///
    /// The root set and the trash/archive slots follow the edited kind and
    /// class. Returns `false` without changing anything when the handle is
    /// unknown or the edit would create a second trash root.
    pub fn edit_item<F>(&mut self, handle: &Handle, edit: F) -> bool
    where
        F: FnOnce(&mut I),
    {
        let Some(mut item) = self.get(handle).cloned() else {
            return false;
        };
        edit(&mut item);

        if let Some(existing) = self.trash_conflict(handle, &item) {
            error!(
                "event=tree_edit module=tree status=rejected error_code=duplicate_trash_root handle={} existing={}",
                handle, existing
            );
            return false;
        }

        self.release_root(handle);
        self.track_root(handle, &item);
        self.items.insert(handle.clone(), item);
        self.set_tree_changed(true);
        debug!("event=tree_edit module=tree status=ok handle={handle}");
        true
    }

    /// Recomputes the root handle and class defaults of one item.
    ///
    /// Returns `false` when the item or one of its ancestors is missing.
    ///
    /// # Panics
    /// Panics when the parent chain exceeds `MAX_DEPTH` hops.
    pub fn update_item_data(&mut self, handle: &Handle) -> bool {
        let walk = self.walk_ancestors(handle);
        if !walk.reached_root {
            return false;
        }
        let Some(root_handle) = walk.path.last() else {
            return false;
        };
        let Some(root_class) = self.items.get(root_handle).map(TreeItem::item_class) else {
            return false;
        };
        let root_handle = root_handle.clone();

        match self.items.get_mut(handle) {
            Some(item) => {
                item.set_root(Some(root_handle));
                item.set_class_defaults(root_class);
                true
            }
            None => false,
        }
    }

    /// Returns the handles from `handle` up to its root.
    ///
    /// Stops early at a missing ancestor; an unknown `handle` yields an
    /// empty path.
    ///
    /// # Panics
    /// Panics when the parent chain exceeds `MAX_DEPTH` hops.
    pub fn item_path(&self, handle: &Handle) -> Vec<Handle> {
        self.walk_ancestors(handle).path
    }

    /// Returns whether the item exists and is of `item_type`.
    pub fn check_type(&self, handle: &Handle, item_type: ItemType) -> bool {
        self.get(handle)
            .map(|item| item.item_type() == item_type)
            .unwrap_or(false)
    }

    /// Returns the set of classes used by root items.
    pub fn root_classes(&self) -> BTreeSet<ItemClass> {
        self.iter_roots(None)
            .map(|(_, item)| item.item_class())
            .collect()
    }

    /// Iterates root items in display order, optionally of one class only.
    pub fn iter_roots(
        &self,
        class: Option<ItemClass>,
    ) -> impl Iterator<Item = (&Handle, &I)> + '_ {
        self.order
            .iter()
            .filter(move |handle| self.roots.contains(*handle))
            .filter_map(move |handle| self.items.get(handle).map(|item| (handle, item)))
            .filter(move |(_, item)| class.map_or(true, |value| item.item_class() == value))
    }

    /// Returns the first root of `class` in display order.
    pub fn find_root(&self, class: ItemClass) -> Option<Handle> {
        self.iter_roots(Some(class))
            .next()
            .map(|(handle, _)| handle.clone())
    }

    /// Whether the item is, or is filed in, the trash.
    ///
    /// Unknown handles count as trashed.
    pub fn is_trash(&self, handle: &Handle) -> bool {
        let Some(item) = self.get(handle) else {
            return true;
        };
        if item.item_class() == ItemClass::Trash {
            return true;
        }
        match &self.trash_root {
            Some(trash) => {
                handle == trash || item.parent() == Some(trash) || item.root() == Some(trash)
            }
            None => false,
        }
    }

    pub fn trash_root(&self) -> Option<&Handle> {
        self.trash_root.as_ref()
    }

    pub fn archive_root(&self) -> Option<&Handle> {
        self.archive_root.as_ref()
    }

    /// Replaces the display order.
    ///
    /// Unknown and repeated handles are dropped; existing handles missing
    /// from `new_order` keep their relative order at the end. Each mismatch
    /// is logged.
    pub fn set_order(&mut self, new_order: &[Handle]) {
        let mut seen = HashSet::with_capacity(new_order.len());
        let mut next_order = Vec::with_capacity(self.order.len());

        for handle in new_order {
            if !self.items.contains_key(handle) {
                error!(
                    "event=tree_order module=tree status=error error_code=unknown_handle handle={}",
                    handle
                );
                continue;
            }
            if !seen.insert(handle.clone()) {
                warn!(
                    "event=tree_order module=tree status=warn error_code=repeated_handle handle={}",
                    handle
                );
                continue;
            }
            next_order.push(handle.clone());
        }

        for handle in &self.order {
            if !seen.contains(handle) {
                warn!(
                    "event=tree_order module=tree status=warn error_code=missing_handle handle={}",
                    handle
                );
                next_order.push(handle.clone());
            }
        }

        self.order = next_order;
        self.set_tree_changed(true);
        debug!("event=tree_order module=tree status=ok items={}", self.order.len());
    }

    /// Packs all items in display order.
    pub fn pack(&self) -> Vec<ItemRecord> {
        self.iter().map(TreeItem::pack).collect()
    }

    /// Replaces the tree content with `records`, in the given order.
    ///
    /// Stored handles and parents are kept. Records that cannot be restored
    /// are skipped with a warning; records the tree refuses (taken handle,
    /// second trash root) are counted as rejected.
    pub fn unpack(&mut self, records: Vec<ItemRecord>) {
        self.clear();
        let total = records.len();
        let mut skipped = 0_usize;
        let mut rejected = 0_usize;
        for record in records {
            let mut item = match I::unpack(record) {
                Ok(item) => item,
                Err(err) => {
                    warn!(
                        "event=tree_unpack module=tree status=skipped error_code=invalid_record error={}",
                        err
                    );
                    skipped += 1;
                    continue;
                }
            };
            let handle = item.handle().map(|value| value.as_str().to_string());
            let parent = item.parent().map(|value| value.as_str().to_string());
            item.save_initial_count();
            if !self.append(handle.as_deref(), parent.as_deref(), item) {
                rejected += 1;
            }
        }
        info!(
            "event=tree_unpack module=tree status=ok records={} items={} skipped={} rejected={}",
            total,
            self.order.len(),
            skipped,
            rejected
        );
    }

    /// Sums word counts as `(novel_words, note_words)`.
    ///
    /// Items without a layout count towards neither total.
    pub fn sum_words(&self) -> (u64, u64) {
        let mut novel_words = 0_u64;
        let mut note_words = 0_u64;
        for item in self.iter() {
            match item.item_layout() {
                ItemLayout::NoLayout => {}
                ItemLayout::Note => note_words += u64::from(item.word_count()),
                ItemLayout::Document => novel_words += u64::from(item.word_count()),
            }
        }
        (novel_words, note_words)
    }

    fn walk_ancestors(&self, handle: &Handle) -> AncestorWalk {
        let mut path = Vec::new();
        let Some(mut item) = self.get(handle) else {
            return AncestorWalk {
                path,
                reached_root: false,
            };
        };
        path.push(handle.clone());

        for _ in 0..=MAX_DEPTH {
            let Some(parent) = item.parent() else {
                return AncestorWalk {
                    path,
                    reached_root: true,
                };
            };
            let Some(next) = self.get(parent) else {
                return AncestorWalk {
                    path,
                    reached_root: false,
                };
            };
            path.push(parent.clone());
            item = next;
        }

        critical_error(&format!(
            "parent chain of item {handle} exceeds {MAX_DEPTH} hops"
        ))
    }

    /// Returns the current trash root when `item` would become a second one.
    fn trash_conflict(&self, handle: &Handle, item: &I) -> Option<&Handle> {
        if !item.is_root_type() || item.item_class() != ItemClass::Trash {
            return None;
        }
        self.trash_root.as_ref().filter(|existing| *existing != handle)
    }

    /// Records `handle` in the root set and slots when `item` is a root.
    fn track_root(&mut self, handle: &Handle, item: &I) {
        if !item.is_root_type() {
            return;
        }
        match item.item_class() {
            ItemClass::Trash => {
                debug!("event=tree_slot module=tree slot=trash handle={handle}");
                self.trash_root = Some(handle.clone());
            }
            ItemClass::Archive => {
                debug!("event=tree_slot module=tree slot=archive handle={handle}");
                self.archive_root = Some(handle.clone());
            }
            _ => {}
        }
        self.roots.insert(handle.clone());
    }

    fn release_root(&mut self, handle: &Handle) {
        self.roots.remove(handle);
        if self.trash_root.as_ref() == Some(handle) {
            self.trash_root = None;
        }
        if self.archive_root.as_ref() == Some(handle) {
            self.archive_root = None;
        }
    }

    fn make_handle(&mut self) -> Handle {
        for _ in 0..MAX_HANDLE_ATTEMPTS {
            let handle = self.handle_source.next_handle();
            if !self.items.contains_key(&handle) {
                return handle;
            }
            warn!(
                "event=handle_generate module=tree status=retry error_code=handle_collision handle={}",
                handle
            );
        }
        critical_error(&format!(
            "no unique handle after {MAX_HANDLE_ATTEMPTS} attempts"
        ))
    }
}

impl<I: TreeItem> Debug for ItemTree<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemTree")
            .field("items", &self.order.len())
            .field("roots", &self.roots.len())
            .field("trash_root", &self.trash_root)
            .field("archive_root", &self.archive_root)
            .field("tree_changed", &self.tree_changed)
            .finish()
    }
}

fn display_handle(handle: Option<&Handle>) -> &str {
    handle.map(Handle::as_str).unwrap_or("none")
}

fn critical_error(details: &str) -> ! {
    error!("event=tree_integrity module=tree status=fatal error={details}");
    panic!("critical internal error: {details}");
}
