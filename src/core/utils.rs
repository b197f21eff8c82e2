use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".ledger_core";
const CONFIG_FILE: &str = "config.json";
pub const HOME_ENV: &str = "LEDGER_CORE_HOME";

/// Returns the application data directory, defaulting to `~/.ledger_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Resolves `file` against `base` unless it is already absolute.
pub fn resolve_in(base: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_files_resolve_under_base() {
        let base = Path::new("/data/ledger");
        assert_eq!(
            resolve_in(base, Path::new("transactions.json")),
            PathBuf::from("/data/ledger/transactions.json")
        );
        assert_eq!(
            resolve_in(base, Path::new("/tmp/other.json")),
            PathBuf::from("/tmp/other.json")
        );
    }
}
