use bitcoin::Amount;
use crate::encoder;
use crate::error::AppError;
use crate::fee::FeeEstimator;
use crate::gateway::ChainGateway;
use crate::selection::{select_inputs, unspent_total_overflow};
use crate::types::{DraftTransaction, Network, TransactionOutput};

// 固定重みによるサイズ見積もり (署名後の正確なサイズではない)
const INPUT_VBYTES: usize = 180;
const OUTPUT_VBYTES: usize = 34;
const ESTIMATED_OUTPUT_COUNT: usize = 2;
const OVERHEAD_VBYTES: usize = 10;

/// `input_count` 個の入力と、送金先・おつりの二出力を想定した推定 vsize
pub fn estimate_vsize(input_count: usize) -> usize {
    input_count * INPUT_VBYTES + ESTIMATED_OUTPUT_COUNT * OUTPUT_VBYTES + OVERHEAD_VBYTES - input_count
}

pub struct TransactionBuilder<G> {
    gateway: G,
    fee_estimator: FeeEstimator,
}

impl<G: ChainGateway> TransactionBuilder<G> {
    pub fn new(gateway: G, fee_estimator: FeeEstimator) -> Self {
        Self {
            gateway,
            fee_estimator,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// `sender` の UTXO から `recipient` へ `amount_sats` を支払う未署名 PSBT を base64 で返す。
    pub async fn prepare_donation(
        &self,
        network: &str,
        sender: &str,
        recipient: &str,
        amount_sats: i64,
    ) -> Result<String, AppError> {
        log::info!("トランザクション構築処理を開始します。");

        let amount = u64::try_from(amount_sats)
            .ok()
            .filter(|sats| *sats > 0)
            .map(Amount::from_sat)
            .ok_or(AppError::InvalidAmount(amount_sats))?;
        let network: Network = network.parse()?;

        let available = self.gateway.list_unspent_outputs(network, sender).await?;
        let inputs = select_inputs(&self.gateway, network, &available, amount).await?;

        let mut draft = DraftTransaction {
            inputs,
            outputs: vec![TransactionOutput {
                address: recipient.to_string(),
                value: amount,
            }],
        };

        let vsize = estimate_vsize(draft.inputs.len());
        let fee_rate = self.fee_estimator.estimate_fee_rate(&self.gateway, network).await;
        let fee = fee_rate.fee(vsize);
        log::debug!("推定vsize: {} vB, 手数料率: {}, 計算された手数料: {}", vsize, fee_rate, fee);

        let total_input = draft
            .total_input_value()
            .ok_or_else(|| unspent_total_overflow(draft.inputs.len()))?;
        let change = amount
            .checked_add(fee)
            .and_then(|spent| total_input.checked_sub(spent))
            .unwrap_or(Amount::ZERO);

        if change > Amount::ZERO {
            log::debug!("おつり発生: {}, おつりアドレス: {}", change, sender);
            draft.outputs.push(TransactionOutput {
                address: sender.to_string(),
                value: change,
            });
        } else {
            let surplus = total_input.checked_sub(amount).unwrap_or(Amount::ZERO);
            log::info!("おつりは発生しません。余剰 {} は手数料に含まれます。", surplus);
        }

        if let Some(effective_fee) = draft
            .total_output_value()
            .and_then(|total_output| total_input.checked_sub(total_output))
        {
            log::debug!("入力合計: {}, 実質手数料: {}", total_input, effective_fee);
        }

        let psbt = encoder::encode(&draft, network)?;
        log::info!(
            "未署名トランザクションの生成に成功しました (入力 {} 件, 出力 {} 件)。",
            draft.inputs.len(),
            draft.outputs.len()
        );
        Ok(psbt)
    }
}
