//! Table of contents projection of the item tree.
//!
//! The file is a convenience listing for people browsing the project folder
//! by hand; nothing reads it back.

use crate::storage::{ProjectStorage, TOC_FILE_NAME};
use crate::tree::{ItemTree, TreeItem};
use log::{error, info};
use std::fs;

/// Minimum width of the separator rule under the header.
pub const TOC_MIN_WIDTH: usize = 62;

impl<I: TreeItem> ItemTree<I> {
    /// Writes `ToC.txt` listing every item that has a content file.
    ///
    /// Returns `false` when the project folders are missing or the file
    /// cannot be written. Tree state is never affected.
    pub fn write_toc(&self, storage: &ProjectStorage) -> bool {
        let content_path = storage.content_path();
        let runtime_path = storage.runtime_path();
        if !content_path.is_dir() || !runtime_path.is_dir() {
            error!(
                "event=toc_write module=tree status=error error_code=missing_project_dir path={}",
                storage.project_path().display()
            );
            return false;
        }

        let mut lines = Vec::new();
        for item in self.iter() {
            let Some(handle) = item.handle() else {
                continue;
            };
            if !storage.document_path(handle).is_file() {
                continue;
            }
            lines.push(toc_line(
                ProjectStorage::relative_document_path(handle)
                    .display()
                    .to_string()
                    .as_str(),
                item.item_class().as_str(),
                item.item_layout().as_str(),
                item.item_name(),
            ));
        }

        let toc_path = runtime_path.join(TOC_FILE_NAME);
        match fs::write(&toc_path, render_toc(&lines)) {
            Ok(()) => {
                info!(
                    "event=toc_write module=tree status=ok entries={}",
                    lines.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=toc_write module=tree status=error error_code=write_failed path={} error={}",
                    toc_path.display(),
                    err
                );
                false
            }
        }
    }
}

fn toc_line(path: &str, class: &str, layout: &str, name: &str) -> String {
    format!("{path:<25}  {class:<9}  {layout:<8}  {name}")
}

fn render_toc(lines: &[String]) -> String {
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(TOC_MIN_WIDTH);

    let mut text = String::new();
    text.push('\n');
    text.push_str("Table of Contents\n");
    text.push_str("=================\n");
    text.push('\n');
    text.push_str(&toc_line("File Name", "Class", "Layout", "Document Label"));
    text.push('\n');
    text.push_str(&"-".repeat(width));
    text.push('\n');
    text.push_str(&lines.join("\n"));
    text.push('\n');
    text
}
