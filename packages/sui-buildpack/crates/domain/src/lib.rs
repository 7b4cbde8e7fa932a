pub mod config;
pub mod entities;
pub mod error;
pub mod ports;
pub mod system;

pub use config::{ConfigurationResolver, DeployConfig, Secret};
pub use entities::*;
pub use error::{BuildpackError, ErrorKind, ErrorKindExt, Result};
pub use ports::CommandRunner;
