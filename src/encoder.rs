use std::str::FromStr;
use base64::Engine;
use bitcoin::absolute::LockTime;
use bitcoin::consensus::deserialize;
use bitcoin::psbt::Psbt;
use bitcoin::transaction::Version;
use bitcoin::{Address, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness};
use crate::error::AppError;
use crate::types::{DraftTransaction, Network};

pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// 下書きを未署名の PSBT に変換する。
///
/// 各入力には前トランザクション全体 (non-witness UTXO) を添付する。署名・finalize は行わない。
pub fn build_psbt(draft: &DraftTransaction, network: Network) -> Result<Psbt, AppError> {
    let bitcoin_network = network.bitcoin_network();

    let mut inputs = Vec::with_capacity(draft.inputs.len());
    let mut prior_transactions = Vec::with_capacity(draft.inputs.len());
    for candidate in &draft.inputs {
        let prior: Transaction = deserialize(&candidate.prior_transaction)?;
        let actual = prior.compute_txid();
        let spent_output = prior.output.get(candidate.utxo.vout as usize);
        if actual != candidate.utxo.txid
            || spent_output.map(|output| output.value) != Some(candidate.utxo.value)
        {
            return Err(AppError::PriorTransactionMismatch {
                expected: candidate.utxo.txid,
                vout: candidate.utxo.vout,
                actual,
            });
        }

        inputs.push(TxIn {
            previous_output: candidate.utxo.out_point(),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        });
        prior_transactions.push(prior);
    }

    let mut outputs = Vec::with_capacity(draft.outputs.len());
    for output in &draft.outputs {
        let address = Address::from_str(&output.address)
            .and_then(|addr| addr.require_network(bitcoin_network))?;
        log::debug!("出力追加: address={}, value={}", output.address, output.value);
        outputs.push(TxOut {
            value: output.value,
            script_pubkey: address.script_pubkey(),
        });
    }

    let transaction = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: inputs,
        output: outputs,
    };

    let mut psbt = Psbt::from_unsigned_tx(transaction)?;
    for (psbt_input, prior) in psbt.inputs.iter_mut().zip(prior_transactions) {
        psbt_input.non_witness_utxo = Some(prior);
    }
    Ok(psbt)
}

/// 下書きを base64 の PSBT 文字列にする。同じ下書きからは常に同じ文字列が得られる。
pub fn encode(draft: &DraftTransaction, network: Network) -> Result<String, AppError> {
    let psbt = build_psbt(draft, network)?;
    Ok(base64_encode(&psbt.serialize()))
}
