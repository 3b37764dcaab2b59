use std::fs;
use std::path::Path;
use serde::Deserialize;
use crate::error::AppError;
use crate::types::{FeeRate, Network};

pub const DEFAULT_MAINNET_API_URL: &str = "https://blockstream.info/api";
pub const DEFAULT_TESTNET_API_URL: &str = "https://blockstream.info/testnet/api";
pub const DEFAULT_FALLBACK_FEE_RATE: f64 = FeeRate::DEFAULT_FALLBACK.sats_per_vb();
pub const DEFAULT_CONFIRMATION_TARGET: u16 = 1;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub mainnet_api_url: String,
    pub testnet_api_url: String,
    /// 手数料推定が失敗したときに使う手数料率 (sats/vB)
    pub fallback_fee_rate: f64,
    /// 手数料推定で要求する承認目標ブロック数
    pub confirmation_target: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mainnet_api_url: DEFAULT_MAINNET_API_URL.to_string(),
            testnet_api_url: DEFAULT_TESTNET_API_URL.to_string(),
            fallback_fee_rate: DEFAULT_FALLBACK_FEE_RATE,
            confirmation_target: DEFAULT_CONFIRMATION_TARGET,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("設定ファイルの読み込みに失敗しました: {:?}", path);
            AppError::Io(e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            log::error!("設定ファイルのパースに失敗しました。");
            AppError::JsonParse {
                file_path: path.to_path_buf(),
                source: e,
            }
        })
    }

    pub fn api_url(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet_api_url,
            Network::Testnet => &self.testnet_api_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"fallbackFeeRate": 12.5}"#).unwrap();
        assert_eq!(
            config,
            AppConfig {
                fallback_fee_rate: 12.5,
                ..AppConfig::default()
            }
        );
    }

    #[test]
    fn api_url_follows_network() {
        let config: AppConfig =
            serde_json::from_str(r#"{"testnetApiUrl": "http://localhost:3002"}"#).unwrap();
        assert_eq!(config.api_url(Network::Testnet), "http://localhost:3002");
        assert_eq!(config.api_url(Network::Mainnet), DEFAULT_MAINNET_API_URL);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = AppConfig::load(Path::new("/nonexistent/donation-config.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
