//! Static asset mirroring and generated stylesheets.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use easel_markdown::{HighlightOptions, Highlighter};

use crate::builder::BuildError;

/// Mirror `src` into `dest`: any previous copy is removed first, then the
/// whole tree is copied. Files deleted from `src` disappear from `dest`.
pub fn mirror_dir(src: &Path, dest: &Path) -> Result<(), BuildError> {
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| BuildError::Mirror(e.to_string()))?;
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| BuildError::Mirror(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BuildError::Mirror(e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::Mirror(e.to_string()))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| BuildError::Mirror(e.to_string()))?;
            copied += 1;
        }
    }

    tracing::debug!("mirrored {} asset files into {}", copied, dest.display());
    Ok(())
}

/// Write the light and dark highlight stylesheets into `static_out`.
///
/// The CSS depends only on the configured theme names, never on the page
/// content, so these files are stable across rebuilds.
pub fn write_highlight_stylesheets(
    highlighter: &Highlighter,
    options: &HighlightOptions,
    static_out: &Path,
) -> Result<(), BuildError> {
    fs::create_dir_all(static_out).map_err(|e| BuildError::Write {
        path: static_out.to_path_buf(),
        message: e.to_string(),
    })?;

    for (theme, filename) in [
        (&options.light_theme, &options.light_stylesheet),
        (&options.dark_theme, &options.dark_stylesheet),
    ] {
        let css = highlighter.theme_css(theme)?;
        let path = static_out.join(filename);
        fs::write(&path, css).map_err(|e| BuildError::Write {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!("wrote highlight stylesheet {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mirrors_a_tree() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("static");
        fs::create_dir_all(src.join("css")).unwrap();
        fs::write(src.join("css/style.css"), "body {}").unwrap();
        fs::write(src.join("logo.svg"), "<svg/>").unwrap();

        let dest = dir.path().join("out");
        mirror_dir(&src, &dest).unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("css/style.css")).unwrap(),
            "body {}"
        );
        assert!(dest.join("logo.svg").exists());
    }

    #[test]
    fn mirror_removes_stale_files() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("static");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("new.css"), "x").unwrap();

        let dest = dir.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.css"), "y").unwrap();

        mirror_dir(&src, &dest).unwrap();

        assert!(dest.join("new.css").exists());
        assert!(!dest.join("stale.css").exists());
    }

    #[test]
    fn writes_both_stylesheets() {
        let dir = tempdir().unwrap();
        let options = HighlightOptions::default();
        let highlighter = Highlighter::new(options.clone());

        write_highlight_stylesheets(&highlighter, &options, dir.path()).unwrap();

        let light = fs::read_to_string(dir.path().join("pygments-light.css")).unwrap();
        let dark = fs::read_to_string(dir.path().join("pygments-dark.css")).unwrap();
        assert!(light.contains("color"));
        assert_ne!(light, dark);
    }

    #[test]
    fn unknown_theme_fails() {
        let dir = tempdir().unwrap();
        let options = HighlightOptions {
            light_theme: "missing".to_string(),
            ..Default::default()
        };
        let highlighter = Highlighter::new(options.clone());

        let err = write_highlight_stylesheets(&highlighter, &options, dir.path()).unwrap_err();
        assert!(matches!(err, BuildError::Stylesheet(_)));
    }
}
