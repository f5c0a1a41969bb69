pub mod descriptor;
pub mod ethereum;
pub mod traits;

pub use ethereum::ContractClient;
pub use traits::{CallStatus, SubmittedCall, TokenLedger, TokenMetadata};
