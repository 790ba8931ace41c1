use log::{LevelFilter, Log, Metadata, Record};
use novtree_core::{Handle, ItemClass, ItemTree, ProjectChangeFlag, ProjectItem};
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

/// Keeps every log line together with the thread that emitted it.
struct CaptureLogger {
    lines: Mutex<Vec<(ThreadId, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((
                thread::current().id(),
                format!("{} {}", record.level(), record.args()),
            ));
        }
    }

    fn flush(&self) {}
}

static LOGGER: Lazy<CaptureLogger> = Lazy::new(|| CaptureLogger {
    lines: Mutex::new(Vec::new()),
});

/// Lines logged so far by the calling test's thread.
fn captured_lines() -> Vec<String> {
    let current = thread::current().id();
    LOGGER
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|(thread, _)| *thread == current)
        .map(|(_, line)| line.clone())
        .collect()
}

fn install_logger() {
    if log::set_logger(&*LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

fn h(bits: u64) -> Handle {
    Handle::from_bits(bits)
}

fn sample_tree() -> ItemTree {
    let mut tree: ItemTree = ItemTree::new(Arc::new(ProjectChangeFlag::new()));
    for (bits, name, class) in [
        (1, "Novel", ItemClass::Novel),
        (2, "Plot", ItemClass::Plot),
        (3, "Trash", ItemClass::Trash),
    ] {
        assert!(tree.append(
            Some(h(bits).as_str()),
            None,
            ProjectItem::root_folder(name, class)
        ));
    }
    tree
}

#[test]
fn set_order_logs_each_dropped_unknown_handle() {
    install_logger();
    let mut tree = sample_tree();

    tree.set_order(&[h(3), h(0xbad), h(2), h(1)]);

    assert_eq!(tree.handles(), vec![h(3), h(2), h(1)]);
    let lines = captured_lines();
    let dropped = lines
        .iter()
        .filter(|line| line.contains("error_code=unknown_handle"))
        .collect::<Vec<_>>();
    assert_eq!(dropped.len(), 1);
    assert!(dropped[0].starts_with("ERROR"));
    assert!(dropped[0].contains("handle=0000000000bad"));
}

#[test]
fn set_order_logs_repeated_and_omitted_handles() {
    install_logger();
    let mut tree = sample_tree();

    tree.set_order(&[h(2), h(2)]);

    assert_eq!(tree.handles(), vec![h(2), h(1), h(3)]);
    let lines = captured_lines();
    assert!(lines
        .iter()
        .any(|line| line.contains("error_code=repeated_handle handle=0000000000002")));
    assert_eq!(
        lines
            .iter()
            .filter(|line| line.contains("error_code=missing_handle"))
            .count(),
        2
    );
}

#[test]
fn unpack_summary_reports_rejected_records() {
    install_logger();
    let source = sample_tree();
    let mut records = source.pack();
    let mut second_trash = records[2].clone();
    second_trash.handle = Some(h(4).as_str().to_string());
    records.push(second_trash);
    records.push(records[0].clone());
    let mut broken = records[1].clone();
    broken.handle = Some("broken".to_string());
    records.push(broken);

    let mut tree: ItemTree = ItemTree::new(Arc::new(ProjectChangeFlag::new()));
    tree.unpack(records);

    assert_eq!(tree.len(), 3);
    let lines = captured_lines();
    let summary = lines
        .iter()
        .find(|line| line.contains("event=tree_unpack module=tree status=ok"))
        .expect("unpack summary logged");
    assert!(summary.contains("records=6 items=3 skipped=1 rejected=2"));
}
