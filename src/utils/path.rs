use std::path::{Path, PathBuf};

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("se", "legacyflow", "LegacyFlow")
}

/// Hämta konfigurationskatalog
pub fn get_config_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Hämta sökväg till inställningsfilen
pub fn get_settings_path() -> PathBuf {
    settings_path_in(&get_config_dir())
}

pub fn settings_path_in(dir: &Path) -> PathBuf {
    dir.join("settings.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_in() {
        let path = settings_path_in(Path::new("/tmp/lf"));
        assert_eq!(path, PathBuf::from("/tmp/lf/settings.toml"));
    }

    #[test]
    fn test_settings_file_name() {
        assert!(get_settings_path().ends_with("settings.toml"));
    }
}
