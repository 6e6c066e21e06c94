//! Integration tests for editor crate

use odt_document::{Document, DocumentSignal, StyleFamily};
use odt_editor::ops::{AddCursor, AddCursorSpec, MoveCursor, MoveCursorSpec};
use odt_editor::{
    load_log, EditorError, ImageController, ListController, ListType, OpError, OperationSpec,
    Session, SessionContext,
};
use std::sync::{Arc, Mutex};

fn join(session: &mut Session, member: &str, position: usize) {
    session
        .enqueue(vec![
            Box::new(
                AddCursor::init(AddCursorSpec {
                    memberid: member.to_string(),
                    timestamp: None,
                })
                .unwrap(),
            ),
            Box::new(
                MoveCursor::init(MoveCursorSpec {
                    memberid: member.to_string(),
                    timestamp: None,
                    position,
                    length: 0,
                })
                .unwrap(),
            ),
        ])
        .unwrap();
}

#[test]
fn test_remote_member_converges_by_replaying_log() -> anyhow::Result<()> {
    let base = Document::from_paragraphs(&["Shopping", "Milk", "Eggs"]);
    let mut local = Session::with_clock(base.clone(), || 1_000);
    let mut remote = Session::with_clock(base, || 2_000);

    join(&mut local, "alice", 9);
    let lists = ListController::new(SessionContext::new("alice"));
    lists.add_list(&mut local, ListType::Number)?;
    lists.add_list(&mut local, ListType::Bullet)?;

    // Specs travel as JSON
    let wire = serde_json::to_string(local.operation_log())?;
    let specs: Vec<OperationSpec> = serde_json::from_str(&wire)?;
    remote.replay(specs)?;

    assert_eq!(local.document().to_json()?, remote.document().to_json()?);
    assert_eq!(local.operation_log(), remote.operation_log());
    Ok(())
}

#[test]
fn test_log_carries_implicit_style_before_list() {
    let mut session = Session::with_clock(Document::new(), || 5);
    let lists = ListController::new(SessionContext::new("alice"));

    lists.add_list(&mut session, ListType::Bullet).unwrap();

    let log = serde_json::to_value(session.operation_log()).unwrap();
    assert_eq!(log[0]["optype"], "AddStyle");
    assert_eq!(log[0]["styleName"], "L1");
    assert_eq!(log[0]["styleFamily"], "list");
    assert_eq!(log[0]["isAutomaticStyle"], true);
    assert_eq!(log[0]["timestamp"], 5);
    assert_eq!(log[1]["optype"], "CreateList");
    assert_eq!(log[1]["memberid"], "alice");
    assert_eq!(log[1]["listType"], "bullet");
    assert_eq!(log[1]["position"], 0);
}

#[test]
fn test_concurrent_style_allocation_rejects_late_batch() {
    // Both members allocate L1 against the same base state
    let base = Document::from_paragraphs(&["a", "b"]);
    let mut alice = Session::with_clock(base.clone(), || 1);
    let mut bob = Session::with_clock(base, || 2);

    ListController::new(SessionContext::new("alice"))
        .add_list(&mut alice, ListType::Bullet)
        .unwrap();
    ListController::new(SessionContext::new("bob"))
        .add_list(&mut bob, ListType::Number)
        .unwrap();

    let bobs_batch = bob.operation_log().to_vec();
    let before = alice.document().to_json().unwrap();

    let err = alice.replay(bobs_batch).unwrap_err();

    assert!(matches!(err.op_error(), Some(OpError::Conflict(_))));
    assert_eq!(alice.document().to_json().unwrap(), before);
}

#[test]
fn test_signals_arrive_after_commit_in_order() {
    let mut session = Session::with_clock(Document::from_paragraphs(&["text"]), || 9);
    let received = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&received);
    session.subscribe(None, move |signal| sink.lock().unwrap().push(signal.clone()));
    let paragraphs = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&paragraphs);
    let id = session.subscribe(Some("paragraph/changed"), move |_| {
        *counter.lock().unwrap() += 1
    });

    ListController::new(SessionContext::new("alice"))
        .add_list(&mut session, ListType::Number)
        .unwrap();

    let received = received.lock().unwrap().clone();
    let names: Vec<_> = received.iter().map(DocumentSignal::name).collect();
    assert_eq!(
        names,
        vec!["style/added", "paragraph/changed", "operations/executed"]
    );
    assert_eq!(
        received[1],
        DocumentSignal::ParagraphChanged {
            paragraph: session.document().paragraphs()[0],
            member_id: "alice".to_string(),
            timestamp: Some(9),
        }
    );
    assert_eq!(
        received[2],
        DocumentSignal::OperationsExecuted {
            first_sequence: 0,
            count: 2
        }
    );
    assert_eq!(*paragraphs.lock().unwrap(), 1);

    assert!(session.unsubscribe(id));
}

#[test]
fn test_document_and_log_persist_to_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let doc_path = dir.path().join("doc.json");
    let log_path = dir.path().join("ops.json");

    Document::from_paragraphs(&["Intro", "Body"]).save(&doc_path)?;

    let mut session = Session::with_clock(Document::load(&doc_path)?, || 3);
    join(&mut session, "alice", 6);
    ListController::new(SessionContext::new("alice")).add_list(&mut session, ListType::Bullet)?;
    session.save_log(&log_path)?;
    session.document().save(&doc_path)?;

    let mut fresh = Session::new(Document::from_paragraphs(&["Intro", "Body"]));
    fresh.replay(load_log(&log_path)?)?;

    let saved = Document::load(&doc_path)?;
    assert_eq!(saved.to_json()?, fresh.document().to_json()?);
    assert_eq!(saved.lists().len(), 1);
    Ok(())
}

#[test]
fn test_image_batch_is_self_contained() {
    let mut session = Session::with_clock(Document::from_paragraphs(&["Hello"]), || 11);
    join(&mut session, "alice", 2);
    let mut images = ImageController::new(SessionContext::new("alice"));

    let report = images
        .insert_image(&mut session, "image/png", "iVBORw0KGgo=", 378.0, 189.0)
        .unwrap();

    let optypes: Vec<_> = report.applied.iter().map(OperationSpec::optype).collect();
    assert_eq!(optypes, vec!["SetBlob", "AddStyle", "AddStyle", "InsertImage"]);

    let doc = session.document();
    assert!(doc.common_styles().contains("Graphics", StyleFamily::Graphic));
    assert_eq!(doc.length(), 6);
    assert_eq!(doc.cursor("alice").map(|cursor| cursor.position), Some(3));

    match report.applied.last() {
        Some(OperationSpec::InsertImage(spec)) => {
            assert_eq!(spec.position, 2);
            assert_eq!(spec.frame_width, "10cm");
            assert_eq!(spec.frame_height, "5cm");
            assert!(spec.filename.starts_with("Pictures/img"));
            assert!(spec.filename.ends_with(".png"));
            assert!(doc.blob(&spec.filename).is_some());
        }
        other => panic!("expected InsertImage, got {:?}", other),
    }

    // The common Graphics style is only added once
    let report = images
        .insert_image(&mut session, "image/gif", "R0lGODlh", 10.0, 10.0)
        .unwrap();
    let optypes: Vec<_> = report.applied.iter().map(OperationSpec::optype).collect();
    assert_eq!(optypes, vec!["SetBlob", "AddStyle", "InsertImage"]);
    assert_eq!(session.document().frame_names().len(), 2);
}

#[test]
fn test_image_scaled_to_page_content() {
    let mut session = Session::with_clock(Document::new(), || 1);
    let mut images = ImageController::new(SessionContext::new("bob"))
        .with_page_content_size(odt_editor::controllers::ContentSize::new(378.0, 1000.0));

    let report = images
        .insert_image(&mut session, "image/jpeg", "/9j/", 756.0, 378.0)
        .unwrap();

    match report.applied.last() {
        Some(OperationSpec::InsertImage(spec)) => {
            assert_eq!(spec.frame_width, "10cm");
            assert_eq!(spec.frame_height, "5cm");
            assert!(spec.filename.ends_with(".jpg"));
        }
        other => panic!("expected InsertImage, got {:?}", other),
    }
}

#[test]
fn test_unsupported_image_type_enqueues_nothing() {
    let mut session = Session::new(Document::new());
    let mut images = ImageController::new(SessionContext::new("bob"));

    let err = images
        .insert_image(&mut session, "image/tiff", "AAAA", 10.0, 10.0)
        .unwrap_err();

    assert!(matches!(err, EditorError::Operation(OpError::Validation(_))));
    assert!(session.operation_log().is_empty());
}
