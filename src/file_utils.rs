use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extension of caption files
pub const CAPTION_EXTENSION: &str = "vtt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path `<stem>.vtt` for a caption export
    pub fn caption_output_path<P: AsRef<Path>>(output_dir: P, stem: &str) -> PathBuf {
        output_dir.as_ref().join(format!("{}.{}", stem, CAPTION_EXTENSION))
    }

    /// Where a rewritten copy of `input` goes: `output` itself, or
    /// `<output>/<input stem>.vtt` when `output` is an existing directory
    pub fn resolve_output_path<P: AsRef<Path>>(output: P, input: &Path, fallback_stem: &str) -> PathBuf {
        let output = output.as_ref();
        if !Self::dir_exists(output) {
            return output.to_path_buf();
        }

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy())
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback_stem.into());
        Self::caption_output_path(output, &stem)
    }

    /// Find caption files under a directory, or the file itself if `path` is one
    pub fn find_caption_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let entry_path = entry.path();

            if entry_path.is_file() && Self::is_caption_file(entry_path) {
                result.push(entry_path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Whether the path has the caption extension
    pub fn is_caption_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(CAPTION_EXTENSION))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
