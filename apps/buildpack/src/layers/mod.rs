mod downloads;
mod sui;

pub use self::downloads::DownloadsLayer;
pub use self::sui::SuiLayer;
