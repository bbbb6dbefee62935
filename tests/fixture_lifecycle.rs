use std::collections::HashSet;
use std::path::PathBuf;

use assert_matches::assert_matches;
use temp_fixture::error::FixtureSetupError;
use temp_fixture::TempDirectoryFixture;


#[test]
pub fn root_exists_and_is_empty_after_setup() {
    let fixture = TempDirectoryFixture::new().unwrap();

    let root_path = fixture.root_path();

    assert!(
        root_path.is_absolute(),
        "expected an absolute root path, got {}",
        root_path.display()
    );
    assert!(root_path.is_dir());

    let entry_count = std::fs::read_dir(root_path).unwrap().count();
    assert_eq!(
        entry_count, 0,
        "expected a freshly set up root to be empty, found {} entries",
        entry_count
    );

    fixture.close().unwrap();
}


#[test]
pub fn concurrently_created_fixtures_have_distinct_roots() {
    const FIXTURE_THREADS: usize = 8;

    let join_handles: Vec<_> = (0..FIXTURE_THREADS)
        .map(|_| {
            std::thread::spawn(|| -> PathBuf {
                let fixture = TempDirectoryFixture::new().unwrap();

                let root_path = fixture.root_path().to_path_buf();
                fixture.close().unwrap();

                root_path
            })
        })
        .collect();

    let root_paths: Vec<PathBuf> = join_handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let distinct_root_paths: HashSet<&PathBuf> = root_paths.iter().collect();
    assert_eq!(
        distinct_root_paths.len(),
        FIXTURE_THREADS,
        "expected {} distinct fixture roots, got {}",
        FIXTURE_THREADS,
        distinct_root_paths.len()
    );
}


#[test]
pub fn sequentially_created_fixtures_have_distinct_roots() {
    let first_fixture = TempDirectoryFixture::new().unwrap();
    let second_fixture = TempDirectoryFixture::new().unwrap();

    assert_ne!(first_fixture.root_path(), second_fixture.root_path());

    second_fixture.close().unwrap();
    first_fixture.close().unwrap();
}


#[test]
pub fn parent_directory_override_is_respected() {
    let outer_fixture = TempDirectoryFixture::new().unwrap();

    let inner_fixture = TempDirectoryFixture::new_in(outer_fixture.root_path()).unwrap();

    assert!(
        inner_fixture.root_path().starts_with(outer_fixture.root_path()),
        "expected inner root {} to live under {}",
        inner_fixture.root_path().display(),
        outer_fixture.root_path().display()
    );

    inner_fixture.close().unwrap();
    outer_fixture.close().unwrap();
}


#[test]
pub fn fail_setup_when_parent_directory_does_not_exist() {
    let fixture = TempDirectoryFixture::new().unwrap();
    let missing_parent_path = fixture.root_path().join("no-such-directory");

    let setup_result = TempDirectoryFixture::new_in(&missing_parent_path);

    let setup_error = setup_result.unwrap_err();
    assert_matches!(
        setup_error,
        FixtureSetupError::ParentDirectoryNotFound { .. },
        "expected ParentDirectoryNotFound, got {}",
        setup_error
    );

    fixture.close().unwrap();
}


#[test]
pub fn fail_setup_when_parent_path_is_a_file() {
    let fixture = TempDirectoryFixture::new().unwrap();
    let file_path = fixture.new_file("not-a-directory.txt").unwrap();

    let setup_result = TempDirectoryFixture::new_in(&file_path);

    let setup_error = setup_result.unwrap_err();
    assert_matches!(
        setup_error,
        FixtureSetupError::ParentPathNotADirectory { .. },
        "expected ParentPathNotADirectory, got {}",
        setup_error
    );

    fixture.close().unwrap();
}
