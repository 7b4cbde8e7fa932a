//! Sui buildpack: detection, toolchain provisioning and deploy wallet setup
//! for Move packages, split into domain, infrastructure and application
//! layers.

pub use application;
pub use domain;
pub use infrastructure;
