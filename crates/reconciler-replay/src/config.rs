use std::path::Path;

/// Loads `.env` from the crate directory, then from the working directory.
/// Existing environment variables win.
pub fn init() {
    dotenvy::from_path(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/.env"))).ok();
    dotenvy::dotenv().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tolerates_missing_env_files_and_keeps_existing_vars() {
        let before = std::env::var_os("PATH");
        init();
        init();
        assert_eq!(std::env::var_os("PATH"), before);
    }
}
