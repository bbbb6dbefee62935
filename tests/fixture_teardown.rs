use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Mutex;

use temp_fixture::TempDirectoryFixture;


#[test]
pub fn close_removes_root_and_all_contents() {
    let fixture = TempDirectoryFixture::new().unwrap();
    let root_path = fixture.root_path().to_path_buf();

    fixture.new_file_with_contents("a/b/c.txt", "contents").unwrap();
    fixture.new_directory("empty-directory").unwrap();

    fixture.close().unwrap();

    assert!(
        !root_path.exists(),
        "expected fixture root {} to be removed after close",
        root_path.display()
    );
}


#[test]
pub fn drop_removes_root() {
    let root_path;

    {
        let fixture = TempDirectoryFixture::new().unwrap();
        root_path = fixture.root_path().to_path_buf();

        fixture.new_file("left-behind.txt").unwrap();
    }

    assert!(
        !root_path.exists(),
        "expected fixture root {} to be removed on drop",
        root_path.display()
    );
}


#[test]
pub fn teardown_runs_when_the_test_body_panics() {
    let recorded_root_path: Mutex<Option<PathBuf>> = Mutex::new(None);

    let panic_result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        let fixture = TempDirectoryFixture::new().unwrap();

        *recorded_root_path.lock().unwrap() = Some(fixture.root_path().to_path_buf());
        fixture.new_file("partial-state.txt").unwrap();

        panic!("simulated assertion failure");
    }));

    assert!(panic_result.is_err());

    let root_path = recorded_root_path.into_inner().unwrap().unwrap();
    assert!(
        !root_path.exists(),
        "expected fixture root {} to be removed on the panic path",
        root_path.display()
    );
}


#[test]
pub fn close_succeeds_when_root_was_already_removed() {
    let fixture = TempDirectoryFixture::new().unwrap();

    std::fs::remove_dir_all(fixture.root_path()).unwrap();

    // Teardown of an already-missing root is idempotent.
    fixture.close().unwrap();
}


#[test]
pub fn teardown_removes_read_only_files() {
    let fixture = TempDirectoryFixture::new().unwrap();
    let root_path = fixture.root_path().to_path_buf();

    let file_path = fixture
        .new_file_with_contents("locked/read-only.txt", "do not modify")
        .unwrap();

    let mut permissions = std::fs::metadata(&file_path).unwrap().permissions();
    permissions.set_readonly(true);
    std::fs::set_permissions(&file_path, permissions).unwrap();

    fixture.close().unwrap();

    assert!(!root_path.exists());
}


#[cfg(unix)]
#[test]
pub fn teardown_does_not_follow_symlinks_out_of_the_root() {
    let target_fixture = TempDirectoryFixture::new().unwrap();
    let target_file_path = target_fixture
        .new_file_with_contents("data/important.txt", "must survive")
        .unwrap();
    let target_directory_path = target_fixture.root_path().join("data");

    let linking_fixture = TempDirectoryFixture::new().unwrap();
    std::os::unix::fs::symlink(
        &target_directory_path,
        linking_fixture.root_path().join("directory-link"),
    )
    .unwrap();
    std::os::unix::fs::symlink(
        &target_file_path,
        linking_fixture.root_path().join("file-link"),
    )
    .unwrap();

    linking_fixture.close().unwrap();

    // Only the links themselves were removed.
    assert!(target_directory_path.is_dir());
    assert_eq!(
        std::fs::read_to_string(&target_file_path).unwrap(),
        "must survive"
    );

    target_fixture.close().unwrap();
}


#[cfg(unix)]
#[test]
pub fn teardown_removes_broken_symlinks() {
    let fixture = TempDirectoryFixture::new().unwrap();
    let root_path = fixture.root_path().to_path_buf();

    std::os::unix::fs::symlink(
        fixture.root_path().join("never-created.txt"),
        fixture.root_path().join("dangling-link"),
    )
    .unwrap();

    fixture.close().unwrap();

    assert!(!root_path.exists());
}
