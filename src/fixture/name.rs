use rand::distributions::Alphanumeric;
use rand::Rng;

/// All fixture roots share this prefix, which makes stray directories
/// from e.g. a `SIGKILL`-ed test run easy to recognize in the system
/// temporary directory.
const ROOT_NAME_PREFIX: &str = "tf";

const RANDOM_SUFFIX_LENGTH: usize = 12;


/// Generates a fresh candidate name for a fixture root directory,
/// e.g. `tf.41672.jM1xZq0bTunw`.
///
/// The process ID keeps roots from different test processes apart;
/// the random suffix keeps roots from threads within one process apart.
/// Collisions are still possible in principle, which is why root creation
/// uses `create_dir` and retries with a fresh name on `AlreadyExists`.
pub(crate) fn unique_root_directory_name() -> String {
    let random_suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LENGTH)
        .map(char::from)
        .collect();

    format!(
        "{}.{}.{}",
        ROOT_NAME_PREFIX,
        std::process::id(),
        random_suffix
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_carry_the_prefix_and_process_id() {
        let name = unique_root_directory_name();

        let expected_prefix = format!("{}.{}.", ROOT_NAME_PREFIX, std::process::id());
        assert!(
            name.starts_with(&expected_prefix),
            "expected name starting with {}, got {}",
            expected_prefix,
            name
        );
        assert_eq!(name.len(), expected_prefix.len() + RANDOM_SUFFIX_LENGTH);
    }

    #[test]
    fn generated_names_differ_between_calls() {
        let first = unique_root_directory_name();
        let second = unique_root_directory_name();

        assert_ne!(first, second);
    }
}
