//! CLI smoke entry point.
//!
//! # Responsibility
//! - Build a small sample project tree through `novtree_core`.
//! - Print word totals, item paths and the packed form for quick checks.
//!
//! Usage: `novtree_cli [PROJECT_DIR]`. With a project dir, a `ToC.txt` is
//! written there as well.

use log::info;
use novtree_core::{
    default_log_level, init_logging, Handle, ItemClass, ItemLayout, ItemTree, ItemType,
    ProjectChangeFlag, ProjectItem, ProjectStorage, TreeItem,
};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let log_dir = std::env::temp_dir().join("novtree-cli-logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        eprintln!("logging disabled: {err}");
    }

    let project = Arc::new(ProjectChangeFlag::new());
    let mut tree: ItemTree = ItemTree::new(project.clone());
    let Some(scene) = build_sample(&mut tree) else {
        eprintln!("failed to build sample tree");
        return ExitCode::FAILURE;
    };

    for handle in tree.handles() {
        tree.update_item_data(&handle);
    }

    let (novel_words, note_words) = tree.sum_words();
    println!("novtree_core version={}", novtree_core::core_version());
    println!("items={} changes={}", tree.len(), project.notifications());
    println!("novel_words={novel_words} note_words={note_words}");

    let path = tree
        .item_path(&scene)
        .iter()
        .filter_map(|handle| tree.lookup(Some(handle)))
        .map(|item| item.item_name().to_string())
        .collect::<Vec<_>>();
    println!("path={}", path.join(" <- "));

    match serde_json::to_string_pretty(&tree.pack()) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("failed to pack tree: {err}");
            return ExitCode::FAILURE;
        }
    }

    if let Some(project_dir) = std::env::args().nth(1) {
        let storage = ProjectStorage::new(project_dir);
        if !tree.write_toc(&storage) {
            eprintln!("failed to write table of contents");
            return ExitCode::FAILURE;
        }
        info!("event=cli_toc module=cli status=ok");
    }

    ExitCode::SUCCESS
}

/// Builds a novel with one chapter, a character note and a trash folder.
///
/// Returns the handle of the sample scene.
fn build_sample(tree: &mut ItemTree) -> Option<Handle> {
    let novel = append_last(tree, None, ProjectItem::root_folder("Novel", ItemClass::Novel))?;
    let chapter = append_last(
        tree,
        Some(&novel),
        ProjectItem::new("Chapter One", ItemType::Folder, ItemClass::NoClass),
    )?;
    let scene = append_last(
        tree,
        Some(&chapter),
        ProjectItem::new("Arrival", ItemType::File, ItemClass::NoClass).with_word_count(1250),
    )?;

    let characters = append_last(
        tree,
        None,
        ProjectItem::root_folder("Characters", ItemClass::Character),
    )?;
    append_last(
        tree,
        Some(&characters),
        ProjectItem::new("Jane Doe", ItemType::File, ItemClass::NoClass)
            .with_layout(ItemLayout::Note)
            .with_word_count(310),
    )?;
    append_last(tree, None, ProjectItem::root_folder("Trash", ItemClass::Trash))?;

    Some(scene)
}

fn append_last(tree: &mut ItemTree, parent: Option<&Handle>, item: ProjectItem) -> Option<Handle> {
    if tree.append(None, parent.map(Handle::as_str), item) {
        tree.handles().pop()
    } else {
        None
    }
}
