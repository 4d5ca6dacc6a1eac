use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Refuse to overwrite an existing file unless `force`, and create missing parent directories.
pub fn prepare_output(path: &Path, force: bool) -> Result<()> {
    if path.is_dir() {
        anyhow::bail!("Output path is a directory: {}", path.display());
    }
    if path.exists() && !force {
        anyhow::bail!("Output file already exists (use --force to overwrite): {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Lower-cased file extension, or an empty string.
pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");
        fs::write(&path, "{}").unwrap();
        assert!(prepare_output(&path, false).is_err());
        assert!(prepare_output(&path, true).is_ok());
    }

    #[test]
    fn missing_parents_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/out.kmz");
        prepare_output(&path, false).unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension(Path::new("Fields.SHP")), "shp");
        assert_eq!(extension(Path::new("noext")), "");
    }
}
