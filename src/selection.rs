use bitcoin::Amount;
use futures::future::try_join_all;
use crate::error::{AppError, GatewayError};
use crate::gateway::ChainGateway;
use crate::types::{CandidateInput, Network, UnspentOutput, checked_sum};

/// UTXO 一覧の合計額が u64 に収まらない場合、その一覧は不正な応答とみなす
pub(crate) fn unspent_total_overflow(count: usize) -> GatewayError {
    GatewayError::MalformedResponse {
        url: "address/utxo".to_string(),
        reason: format!("{} 件の UTXO の合計額がオーバーフローしました", count),
    }
}

/// 利用可能な UTXO を取得順のまますべて選択し、それぞれの前トランザクションを取得する。
///
/// 入力数やおつりの最小化は行わない。前トランザクションの取得は並行に行い、
/// どれか一つでも失敗した時点で全体を失敗とする。結果の順序は `available` と同じ。
pub async fn select_inputs<G: ChainGateway>(
    gateway: &G,
    network: Network,
    available: &[UnspentOutput],
    target: Amount,
) -> Result<Vec<CandidateInput>, AppError> {
    if available.is_empty() {
        log::info!("利用可能な UTXO がありません。");
        return Err(AppError::InsufficientFunds {
            available: 0,
            required: target.to_sat(),
        });
    }

    let total = checked_sum(available.iter().map(|utxo| utxo.value))
        .ok_or_else(|| unspent_total_overflow(available.len()))?
        .to_sat();
    if total < target.to_sat() {
        return Err(AppError::InsufficientFunds {
            available: total,
            required: target.to_sat(),
        });
    }
    log::debug!("{} 件の UTXO を選択しました (合計 {} sats)", available.len(), total);

    let fetches = available.iter().map(|utxo| async move {
        let prior_transaction = gateway.fetch_transaction_bytes(network, utxo.txid).await?;
        log::debug!(
            "前トランザクション取得: txid={}, vout={}, {} bytes",
            utxo.txid,
            utxo.vout,
            prior_transaction.len()
        );
        Ok::<_, GatewayError>(CandidateInput {
            utxo: *utxo,
            prior_transaction,
        })
    });

    Ok(try_join_all(fetches).await?)
}
