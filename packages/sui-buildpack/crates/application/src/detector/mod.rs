use anyhow::Result;
use domain::entities::Detection;
use std::path::Path;

pub mod sui;

pub use self::sui::SuiDetector;

/// The common interface for project detectors
pub trait ProjectDetector {
    /// Inspect an application directory. `Err` is reserved for failures
    /// that are not a plain "this is not my kind of project".
    fn detect(&self, app_dir: &Path) -> Result<Detection>;
}
