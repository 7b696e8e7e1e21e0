mod common;

use deepscan_engine as ds;
use ds::PreviewStore;

#[test]
fn preview_file_named_by_sniffed_format() {
    let store = ds::TempDirPreviews::new().unwrap();
    let bytes = common::make_test_jpeg_bytes();

    // claimed type disagrees with the bytes; the bytes win for the extension
    let preview = store.create(&bytes, "image/png").unwrap();
    let path = preview.location().to_path_buf();
    assert!(path.starts_with(store.dir()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
    assert_eq!(std::fs::read(&path).unwrap(), bytes);

    store.release(preview);
    assert!(!path.exists());
}

#[test]
fn previews_get_distinct_ids() {
    let store = ds::TempDirPreviews::new().unwrap();
    let a = store.create(b"????", "image/webp").unwrap();
    let b = store.create(b"????", "image/x-custom").unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.location().extension().and_then(|e| e.to_str()), Some("webp"));
    assert!(b.location().extension().is_none());
    store.release(a);
    store.release(b);
}

#[test]
fn workflow_removes_preview_file_on_clear() {
    let config = ds::DetectionConfig::default();
    let sink = std::sync::Arc::new(ds::RecordingSink::new());
    let previews = std::sync::Arc::new(ds::TempDirPreviews::new().unwrap());
    let mut workflow = ds::DetectionWorkflow::new(ds::ScriptedClassifier::new(), config, sink, previews.clone());

    workflow.select_file(common::jpeg_candidate()).unwrap();
    let path = workflow.preview().unwrap().location().to_path_buf();
    assert!(path.exists());

    workflow.clear();
    assert!(!path.exists());
}
