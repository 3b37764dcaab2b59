use std::collections::BTreeMap;
use std::future::Future;
use bitcoin::{Amount, Txid};
use reqwest::StatusCode;
use serde::Deserialize;
use crate::config::AppConfig;
use crate::error::GatewayError;
use crate::types::{Network, UnspentOutput};

/// UTXO・前トランザクション・手数料推定を取得する外部データ源。
///
/// タイムアウトやリトライが必要な場合は実装側で行う。
pub trait ChainGateway {
    /// アドレスの UTXO 一覧。空の一覧はエラーではない。
    fn list_unspent_outputs(
        &self,
        network: Network,
        address: &str,
    ) -> impl Future<Output = Result<Vec<UnspentOutput>, GatewayError>> + Send;

    /// UTXO を生成したトランザクションの生バイト列
    fn fetch_transaction_bytes(
        &self,
        network: Network,
        txid: Txid,
    ) -> impl Future<Output = Result<Vec<u8>, GatewayError>> + Send;

    /// 承認目標ブロック数 -> 手数料率 (sats/vB)
    fn fetch_fee_estimates(
        &self,
        network: Network,
    ) -> impl Future<Output = Result<BTreeMap<u16, f64>, GatewayError>> + Send;
}

#[derive(Deserialize, Debug)]
struct EsploraUtxo {
    txid: Txid,
    vout: u32,
    value: u64,
}

impl From<EsploraUtxo> for UnspentOutput {
    fn from(utxo: EsploraUtxo) -> Self {
        UnspentOutput {
            txid: utxo.txid,
            vout: utxo.vout,
            value: Amount::from_sat(utxo.value),
        }
    }
}

/// Esplora 互換 REST API を使う ChainGateway 実装
#[derive(Debug, Clone)]
pub struct EsploraGateway {
    client: reqwest::Client,
    mainnet_url: String,
    testnet_url: String,
}

impl EsploraGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            mainnet_url: config.api_url(Network::Mainnet).to_string(),
            testnet_url: config.api_url(Network::Testnet).to_string(),
        }
    }

    fn url(&self, network: Network, path: &str) -> String {
        let base = match network {
            Network::Mainnet => &self.mainnet_url,
            Network::Testnet => &self.testnet_url,
        };
        format!("{}/{}", base.trim_end_matches('/'), path)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, GatewayError> {
        log::debug!("GET {}", url);
        self.client.get(url).send().await.map_err(|source| GatewayError::Http {
            url: url.to_string(),
            source,
        })
    }
}

fn require_success(url: &str, response: &reqwest::Response) -> Result<(), GatewayError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(GatewayError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn malformed(url: &str, reason: impl ToString) -> GatewayError {
    GatewayError::MalformedResponse {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

impl ChainGateway for EsploraGateway {
    async fn list_unspent_outputs(
        &self,
        network: Network,
        address: &str,
    ) -> Result<Vec<UnspentOutput>, GatewayError> {
        let url = self.url(network, &format!("address/{}/utxo", address));
        let response = self.get(&url).await?;
        require_success(&url, &response)?;

        let utxos: Vec<EsploraUtxo> = response.json().await.map_err(|e| malformed(&url, e))?;
        log::debug!("{} 件の UTXO を取得しました: {}", utxos.len(), address);
        Ok(utxos.into_iter().map(UnspentOutput::from).collect())
    }

    async fn fetch_transaction_bytes(
        &self,
        network: Network,
        txid: Txid,
    ) -> Result<Vec<u8>, GatewayError> {
        let url = self.url(network, &format!("tx/{}/hex", txid));
        let response = self.get(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::TransactionNotFound(txid));
        }
        require_success(&url, &response)?;

        let body = response.text().await.map_err(|source| GatewayError::Http {
            url: url.clone(),
            source,
        })?;
        hex::decode(body.trim()).map_err(|e| malformed(&url, e))
    }

    async fn fetch_fee_estimates(
        &self,
        network: Network,
    ) -> Result<BTreeMap<u16, f64>, GatewayError> {
        let url = self.url(network, "fee-estimates");
        let response = self.get(&url).await?;
        require_success(&url, &response)?;

        response.json().await.map_err(|e| malformed(&url, e))
    }
}
