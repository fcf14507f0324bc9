use std::error::Error;
use std::path::{Path, PathBuf};

use notify::Event;
use notify::event::{
    CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode,
};
use watcherd::watch::{EventMask, classify, parse_events, session::classify_event};

type TestResult = Result<(), Box<dyn Error>>;

const ATOMIC_TOKENS: &[&str] = &[
    "access",
    "attribute_change",
    "write_close",
    "nowrite_close",
    "create",
    "delete",
    "self_delete",
    "modify",
    "self_move",
    "move_from",
    "move_to",
    "open",
];

#[test]
fn translation_is_idempotent() -> TestResult {
    assert_eq!(
        parse_events(["create", "create"]),
        parse_events(["create"])
    );
    assert_eq!(
        parse_events(["all", "create", "all"]),
        parse_events(["all"])
    );
    Ok(())
}

#[test]
fn move_composite_equals_its_constituents() -> TestResult {
    assert_eq!(
        parse_events(["move"]),
        parse_events(["move_from", "move_to"])
    );
    Ok(())
}

#[test]
fn close_composite_equals_its_constituents() -> TestResult {
    assert_eq!(
        parse_events(["close"]),
        parse_events(["write_close", "nowrite_close"])
    );
    Ok(())
}

#[test]
fn all_composite_is_union_of_atomic_tokens() -> TestResult {
    assert_eq!(
        parse_events(["all"]),
        parse_events(ATOMIC_TOKENS.iter().copied())
    );
    assert_eq!(parse_events(["all"]), EventMask::all());
    Ok(())
}

#[test]
fn unrecognized_tokens_are_ignored() -> TestResult {
    assert_eq!(
        parse_events(["create", "frobnicate", "modify"]),
        parse_events(["create", "modify"])
    );
    Ok(())
}

#[test]
fn tokens_are_whitespace_trimmed() -> TestResult {
    assert_eq!(parse_events([" create ", "\tmodify"]), parse_events(["create", "modify"]));
    Ok(())
}

#[test]
fn empty_input_yields_empty_mask() -> TestResult {
    assert!(parse_events(std::iter::empty::<&str>()).is_empty());
    assert!(parse_events(["", "nonsense"]).is_empty());
    Ok(())
}

#[test]
fn token_names_round_trip_through_translation() -> TestResult {
    for token in ATOMIC_TOKENS {
        let mask = parse_events([*token]);
        assert_eq!(mask.iter().count(), 1, "token {token} is atomic");
        assert_eq!(mask.token_name(), *token);
    }
    Ok(())
}

#[test]
fn removal_of_root_classifies_as_self_delete() -> TestResult {
    let kind = EventKind::Remove(RemoveKind::Folder);
    assert_eq!(classify(kind, true), Some(EventMask::DELETE_SELF));
    assert_eq!(classify(kind, false), Some(EventMask::DELETE));
    Ok(())
}

#[test]
fn paired_rename_splits_into_from_and_to() -> TestResult {
    let root = Path::new("/watched");
    let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
        .add_path(PathBuf::from("/watched/old.txt"))
        .add_path(PathBuf::from("/watched/new.txt"));

    let classified = classify_event(&event, root);
    assert_eq!(
        classified,
        vec![
            (EventMask::MOVED_FROM, PathBuf::from("/watched/old.txt")),
            (EventMask::MOVED_TO, PathBuf::from("/watched/new.txt")),
        ]
    );
    Ok(())
}

#[test]
fn catch_all_kinds_are_skipped() -> TestResult {
    let root = Path::new("/watched");
    let event = Event::new(EventKind::Any).add_path(PathBuf::from("/watched/x"));
    assert!(classify_event(&event, root).is_empty());
    Ok(())
}

#[test]
fn create_event_classifies_per_path() -> TestResult {
    let root = Path::new("/watched");
    let event = Event::new(EventKind::Create(CreateKind::File))
        .add_path(PathBuf::from("/watched/a"))
        .add_path(PathBuf::from("/watched/b"));

    let classified = classify_event(&event, root);
    assert_eq!(classified.len(), 2);
    assert!(classified.iter().all(|(kind, _)| *kind == EventMask::CREATE));
    Ok(())
}
