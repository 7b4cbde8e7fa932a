pub mod build_plan;
pub mod dependency;
pub mod process;
pub mod toolchain;
pub mod wallet;

pub use build_plan::*;
pub use dependency::*;
pub use process::*;
pub use toolchain::*;
pub use wallet::*;
