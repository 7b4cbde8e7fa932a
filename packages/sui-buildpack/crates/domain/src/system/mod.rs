pub mod locate;
pub mod platform;
pub mod version;

pub use locate::find_executable;
pub use platform::{Architecture, PlatformDetector};
pub use version::ToolVersion;
