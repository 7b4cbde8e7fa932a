pub mod detector;
pub mod install_service;
pub mod process_types;
pub mod wallet_service;

pub use detector::{ProjectDetector, SuiDetector};
pub use install_service::{Contribution, Provisioner};
pub use process_types::build_process_types;
pub use wallet_service::{FaucetOutcome, WalletService, WalletStage};
