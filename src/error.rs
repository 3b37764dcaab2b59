use std::path::PathBuf;
use bitcoin::Txid;
use bitcoin::address::ParseError as BitcoinAddressError;
use bitcoin::consensus::encode::Error as BitcoinEncodeError;
use bitcoin::psbt::Error as PsbtError;
use thiserror::Error;

/// チェーンデータ取得 (Esplora等) の境界で発生するエラー
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("不明なネットワークが指定されました: {0}")]
    UnknownNetwork(String),

    #[error("HTTPリクエストに失敗しました URL: {url}, 詳細: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("上流APIがエラーステータスを返しました URL: {url}, ステータス: {status}")]
    Status { url: String, status: u16 },

    #[error("トランザクションが見つかりません: {0}")]
    TransactionNotFound(Txid),

    #[error("上流APIのレスポンスが不正です URL: {url}, 詳細: {reason}")]
    MalformedResponse { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSONパースエラー ファイル: {file_path:?}, 詳細: {source}")]
    JsonParse {
        file_path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("設定値が不正です: {0}")]
    InvalidConfig(String),

    #[error("無効な送金額です (1 sat 以上を指定してください): {0}")]
    InvalidAmount(i64),

    #[error("資金不足: 利用可能な総額 {available} sats, 要求額 {required} sats")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("チェーンデータ取得エラー: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Bitcoinアドレスエラー: {0}")]
    BitcoinAddress(#[from] BitcoinAddressError),

    #[error("Bitcoinコンセンサスエンコードエラー: {0}")]
    BitcoinConsensus(#[from] BitcoinEncodeError),

    #[error("前トランザクションが参照先と一致しません: 期待 {expected}:{vout}, 取得 {actual}")]
    PriorTransactionMismatch {
        expected: Txid,
        vout: u32,
        actual: Txid,
    },

    #[error("PSBT構築エラー: {0}")]
    Psbt(#[from] PsbtError),
}
