//! 寄付用の未署名 Bitcoin トランザクション (PSBT) を構築するライブラリ。
//!
//! 署名・ブロードキャスト・鍵管理は行わない。

pub mod cli;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fee;
pub mod gateway;
pub mod selection;
pub mod transaction;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use error::{AppError, GatewayError};
pub use fee::FeeEstimator;
pub use gateway::{ChainGateway, EsploraGateway};
pub use transaction::TransactionBuilder;
pub use types::{FeeRate, Network};
