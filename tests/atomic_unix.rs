#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::tempdir;

use durable_write::write_atomically;

fn mode_of(path: &std::path::Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

#[test]
fn final_permissions_match_request_regardless_of_umask() {
    let td = tempdir().unwrap();
    for mode in [0o600, 0o640, 0o644, 0o755] {
        let target = td.path().join(format!("m{mode:o}"));
        write_atomically(&target, b"perm", mode).unwrap();
        assert_eq!(mode_of(&target), mode, "mode {mode:o}");
    }
}

#[test]
fn replacement_takes_new_mode_not_old() {
    let td = tempdir().unwrap();
    let target = td.path().join("secret.env");
    fs::write(&target, b"old").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

    write_atomically(&target, b"TOKEN=abc\n", 0o600).unwrap();

    assert_eq!(mode_of(&target), 0o600);
    assert_eq!(fs::read(&target).unwrap(), b"TOKEN=abc\n");
}

#[test]
fn replacement_changes_inode() {
    use std::os::unix::fs::MetadataExt;
    let td = tempdir().unwrap();
    let target = td.path().join("inode.txt");
    fs::write(&target, b"before").unwrap();
    let before = fs::metadata(&target).unwrap().ino();

    write_atomically(&target, b"after", 0o644).unwrap();

    let after = fs::metadata(&target).unwrap().ino();
    assert_ne!(before, after, "rename should swap in a new inode");
}

#[test]
fn unwritable_directory_fails_without_touching_target() {
    // root bypasses directory permissions
    if unsafe { libc::geteuid() } == 0 {
        return;
    }
    let td = tempdir().unwrap();
    let dir = td.path().join("locked");
    fs::create_dir(&dir).unwrap();
    let target = dir.join("keep.txt");
    fs::write(&target, b"original").unwrap();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o500)).unwrap();

    let err = write_atomically(&target, b"new", 0o644).unwrap_err();

    fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)).unwrap();
    assert_eq!(err.step(), Some(durable_write::Step::CreateTemp));
    assert!(err.to_string().contains("permission denied"), "got: {err}");
    assert_eq!(fs::read(&target).unwrap(), b"original");
}
