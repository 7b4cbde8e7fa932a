pub mod adapters;
pub mod archive;
pub mod cache;

pub use adapters::SystemCommandRunner;
pub use cache::DependencyCache;
