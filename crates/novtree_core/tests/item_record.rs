use novtree_core::{
    Handle, ItemClass, ItemLayout, ItemRecord, ItemTree, ItemType, ProjectChangeFlag,
    ProjectItem, TreeItem,
};
use std::sync::Arc;

#[test]
fn record_serialization_uses_project_file_names() {
    let mut item = ProjectItem::new("Chapter One", ItemType::File, ItemClass::Novel)
        .with_layout(ItemLayout::Document);
    item.set_counts(5400, 1000, 30);
    item.importance = Some("i000002".to_string());
    item.heading = "H2".to_string();

    let mut tree: ItemTree = ItemTree::new(Arc::new(ProjectChangeFlag::new()));
    assert!(tree.append(Some("a1b2c3d4e5f60"), Some("0000000000001"), item));
    let item = tree.get(&Handle::from_bits(0xa1b2c3d4e5f60)).unwrap().clone();

    let json = serde_json::to_value(item.pack()).unwrap();
    assert_eq!(json["handle"], "a1b2c3d4e5f60");
    assert_eq!(json["parent"], "0000000000001");
    assert_eq!(json["root"], serde_json::Value::Null);
    assert_eq!(json["type"], "FILE");
    assert_eq!(json["class"], "NOVEL");
    assert_eq!(json["layout"], "DOCUMENT");
    assert_eq!(json["import"], "i000002");
    assert_eq!(json["word_count"], 1000);
    assert_eq!(json["heading"], "H2");

    let decoded: ItemRecord = serde_json::from_value(json).unwrap();
    let restored = ProjectItem::unpack(decoded).unwrap();
    assert_eq!(restored.handle(), item.handle());
    assert_eq!(restored.parent(), item.parent());
    assert_eq!(restored.char_count, 5400);
    assert_eq!(restored.para_count, 30);
}

#[test]
fn minimal_record_fills_defaults() {
    let value = serde_json::json!({
        "handle": "0000000000001",
        "name": "Novel",
        "type": "ROOT",
        "class": "NOVEL",
        "layout": "NO_LAYOUT"
    });

    let record: ItemRecord = serde_json::from_value(value).unwrap();
    assert_eq!(record.parent, None);
    assert_eq!(record.word_count, 0);
    assert!(!record.active);

    let item = ProjectItem::unpack(record).unwrap();
    assert!(item.is_root_type());
}

#[test]
fn unknown_enum_value_is_rejected() {
    let value = serde_json::json!({
        "handle": "0000000000001",
        "name": "Novel",
        "type": "ROOT",
        "class": "POETRY",
        "layout": "NO_LAYOUT"
    });

    assert!(serde_json::from_value::<ItemRecord>(value).is_err());
}

#[test]
fn handle_serializes_as_plain_string() {
    let handle = Handle::parse("00000000000ff").unwrap();
    assert_eq!(serde_json::to_value(&handle).unwrap(), "00000000000ff");
    assert!(serde_json::from_value::<Handle>(serde_json::json!("XYZ")).is_err());
}

#[test]
fn packed_tree_survives_json_round_trip() {
    let mut tree: ItemTree = ItemTree::new(Arc::new(ProjectChangeFlag::new()));
    assert!(tree.append(
        Some("0000000000001"),
        None,
        ProjectItem::root_folder("Novel", ItemClass::Novel)
    ));
    assert!(tree.append(
        Some("0000000000002"),
        Some("0000000000001"),
        ProjectItem::new("Scene", ItemType::File, ItemClass::Novel).with_word_count(42)
    ));

    let text = serde_json::to_string(&tree.pack()).unwrap();
    let records: Vec<ItemRecord> = serde_json::from_str(&text).unwrap();

    let mut restored: ItemTree = ItemTree::new(Arc::new(ProjectChangeFlag::new()));
    restored.unpack(records);
    assert_eq!(restored.handles(), tree.handles());
    assert_eq!(restored.sum_words(), (0, 0));
    assert!(restored.update_item_data(&Handle::from_bits(2)));
    assert_eq!(restored.sum_words(), (42, 0));
}
