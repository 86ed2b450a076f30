use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const DATABASE_FILE: &str = "schools.db";
const WORKBOOK_FILE: &str = "data.xlsx";

/// Directory holding the live database and the last uploaded workbook
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let root = match custom_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "schoolmap")
                    .context("Could not determine data directory")?;
                proj_dirs.data_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create data directory: {:?}", root))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.root.join(WORKBOOK_FILE)
    }

    pub fn has_data(&self) -> bool {
        self.database_path().exists()
    }

    /// Remove leftovers of an interrupted commit
    pub fn clean_staging(&self) -> Result<()> {
        for live in [self.database_path(), self.workbook_path()] {
            let staged = staging_path(&live);
            if staged.exists() {
                log::warn!("removing stale staging file {:?}", staged);
                fs::remove_file(&staged)?;
            }
        }
        Ok(())
    }
}

/// Sibling path a file is written to before being renamed over `path`
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
