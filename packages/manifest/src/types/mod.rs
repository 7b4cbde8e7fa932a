pub mod dependencies;
pub mod package;

pub use dependencies::*;
pub use package::*;
