use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use watcherd::config::JobConfig;
use watcherd::watch::{parse_events, prune_excluded, spawn_session};

type TestResult = Result<(), Box<dyn Error>>;

fn job(name: &str, root: &Path, command: &str) -> JobConfig {
    JobConfig {
        name: name.to_string(),
        watch_path: root.to_path_buf(),
        recursive: false,
        autoadd: false,
        event_mask: parse_events(["create"]),
        excluded: None,
        include_extensions: Some(BTreeSet::from([".txt".to_string()])),
        exclude_extensions: None,
        command: command.to_string(),
    }
}

async fn wait_for(path: &Path, timeout: Duration) -> bool {
    let mut waited = Duration::ZERO;
    let step = Duration::from_millis(100);
    while waited < timeout {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(step).await;
        waited += step;
    }
    path.exists()
}

#[tokio::test(flavor = "multi_thread")]
async fn create_event_runs_the_templated_command() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("watched");
    fs::create_dir(&root)?;

    let session = spawn_session(job(
        "touch-marker",
        &root,
        "touch ${filename}.seen",
    ))?;

    // Give the subscription a moment to settle.
    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::File::create(root.join("a.txt"))?;

    let marker = root.join("a.txt.seen");
    let appeared = wait_for(&marker, Duration::from_secs(10)).await;
    session.stop();

    assert!(appeared, "command side effect did not appear");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn filtered_extensions_do_not_dispatch() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("watched");
    fs::create_dir(&root)?;

    let session = spawn_session(job(
        "txt-only",
        &root,
        "touch ${filename}.seen",
    ))?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::File::create(root.join("b.csv"))?;

    let marker = root.join("b.csv.seen");
    let appeared = wait_for(&marker, Duration::from_secs(2)).await;
    session.stop();

    assert!(!appeared, "filtered path must not run a command");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn events_outside_the_mask_do_not_dispatch() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("watched");
    fs::create_dir(&root)?;
    fs::write(root.join("c.txt"), "seed")?;

    // Mask covers deletes only; a modify must not fire.
    let mut delete_job = job("delete-only", &root, "touch ${filename}.gone");
    delete_job.event_mask = parse_events(["delete"]);
    let session = spawn_session(delete_job)?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::write(root.join("c.txt"), "changed")?;
    let modify_marker = root.join("c.txt.gone");
    assert!(!wait_for(&modify_marker, Duration::from_secs(2)).await);

    fs::remove_file(root.join("c.txt"))?;
    let appeared = wait_for(&modify_marker, Duration::from_secs(10)).await;
    session.stop();

    assert!(appeared, "masked delete should dispatch");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn recursive_session_sees_subdirectory_events() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("watched");
    let sub = root.join("nested").join("deeper");
    fs::create_dir_all(&sub)?;

    let mut recursive_job = job("recursive", &root, "touch ${filename}.seen");
    recursive_job.recursive = true;
    let session = spawn_session(recursive_job)?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::File::create(sub.join("d.txt"))?;

    let marker = sub.join("d.txt.seen");
    let appeared = wait_for(&marker, Duration::from_secs(10)).await;
    session.stop();

    assert!(appeared, "event below the root did not dispatch");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn autoadd_registers_subdirectories_created_after_start() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("watched");
    fs::create_dir(&root)?;

    let mut autoadd_job = job("autoadd", &root, "touch ${filename}.seen");
    autoadd_job.recursive = true;
    autoadd_job.autoadd = true;
    let session = spawn_session(autoadd_job)?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    let fresh = root.join("fresh");
    fs::create_dir(&fresh)?;
    // Let the auto-add register the new directory before using it.
    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::File::create(fresh.join("e.txt"))?;

    let marker = fresh.join("e.txt.seen");
    let appeared = wait_for(&marker, Duration::from_secs(10)).await;
    session.stop();

    assert!(appeared, "file in a post-start subdirectory did not dispatch");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn autoadd_registers_subdirectories_moved_into_the_tree() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("watched");
    fs::create_dir(&root)?;
    let staged = dir.path().join("staged");
    fs::create_dir(&staged)?;

    let mut autoadd_job = job("autoadd-move", &root, "touch ${filename}.seen");
    autoadd_job.recursive = true;
    autoadd_job.autoadd = true;
    let session = spawn_session(autoadd_job)?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    let moved = root.join("staged");
    fs::rename(&staged, &moved)?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::File::create(moved.join("f.txt"))?;

    let marker = moved.join("f.txt.seen");
    let appeared = wait_for(&marker, Duration::from_secs(10)).await;
    session.stop();

    assert!(appeared, "file in a moved-in subdirectory did not dispatch");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn root_removal_renders_watched_as_the_root_itself() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("watched");
    fs::create_dir(&root)?;

    let mut self_job = job("self-delete", &root, "touch ${watched}.gone");
    self_job.include_extensions = None;
    self_job.event_mask = parse_events(["self_delete"]);
    let session = spawn_session(self_job)?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::remove_dir(&root)?;

    // ${watched} must be the watched directory itself, so the marker lands
    // next to it, not next to its parent.
    let marker = dir.path().join("watched.gone");
    let appeared = wait_for(&marker, Duration::from_secs(10)).await;
    session.stop();

    assert!(appeared, "root removal did not render the watched directory");
    Ok(())
}

#[test]
fn prune_removes_registered_dirs_under_excluded_prefixes() -> TestResult {
    let mut dirs: BTreeSet<PathBuf> = [
        "/srv/media",
        "/srv/media/incoming",
        "/srv/media/incoming/tmp",
        "/srv/media/library",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    let excluded: BTreeSet<PathBuf> =
        [PathBuf::from("/srv/media/incoming")].into_iter().collect();

    let pruned = prune_excluded(&mut dirs, &excluded);

    assert_eq!(pruned.len(), 2);
    assert!(dirs.contains(Path::new("/srv/media")));
    assert!(dirs.contains(Path::new("/srv/media/library")));
    assert!(!dirs.contains(Path::new("/srv/media/incoming")));
    assert!(!dirs.contains(Path::new("/srv/media/incoming/tmp")));
    Ok(())
}
