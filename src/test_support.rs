use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode;
use bitcoin::transaction::Version;
use bitcoin::{Address, Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use crate::error::GatewayError;
use crate::gateway::ChainGateway;
use crate::types::{Network, UnspentOutput};

pub const SENDER: &str = "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx";
pub const RECIPIENT: &str = "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7";

/// `values` を `address` に支払う前トランザクションを作る。`salt` で txid を変える。
pub fn funding_transaction(address: &str, values: &[u64], salt: u32) -> Transaction {
    let script_pubkey = Address::from_str(address)
        .unwrap()
        .assume_checked()
        .script_pubkey();
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::from_consensus(salt),
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        }],
        output: values
            .iter()
            .map(|value| TxOut {
                value: Amount::from_sat(*value),
                script_pubkey: script_pubkey.clone(),
            })
            .collect(),
    }
}

/// 呼び出し回数を記録するインメモリの ChainGateway
#[derive(Default)]
pub struct MockGateway {
    pub utxos: Vec<UnspentOutput>,
    pub transactions: HashMap<Txid, Vec<u8>>,
    pub fee_estimates: Option<BTreeMap<u16, f64>>,
    pub fail_listing: bool,
    /// txid ごとに、取得完了までにランタイムへ制御を返す回数
    pub fetch_yields: HashMap<Txid, usize>,
    pub completed_fetches: Mutex<Vec<Txid>>,
    pub list_calls: AtomicUsize,
    pub transaction_calls: AtomicUsize,
    pub fee_calls: AtomicUsize,
}

impl MockGateway {
    pub fn with_fee_rate(rate: f64) -> Self {
        Self {
            fee_estimates: Some(BTreeMap::from([(1, rate), (6, rate / 2.0)])),
            ..Self::default()
        }
    }

    /// `transaction` の全出力を UTXO として登録する
    pub fn fund(&mut self, transaction: &Transaction) {
        let txid = transaction.compute_txid();
        for (vout, output) in transaction.output.iter().enumerate() {
            self.utxos.push(UnspentOutput {
                txid,
                vout: vout as u32,
                value: output.value,
            });
        }
        self.transactions.insert(txid, encode::serialize(transaction));
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.transaction_calls.load(Ordering::SeqCst)
            + self.fee_calls.load(Ordering::SeqCst)
    }
}

impl ChainGateway for MockGateway {
    async fn list_unspent_outputs(
        &self,
        _network: Network,
        _address: &str,
    ) -> Result<Vec<UnspentOutput>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(GatewayError::Status {
                url: "mock://utxo".to_string(),
                status: 503,
            });
        }
        Ok(self.utxos.clone())
    }

    async fn fetch_transaction_bytes(
        &self,
        _network: Network,
        txid: Txid,
    ) -> Result<Vec<u8>, GatewayError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        for _ in 0..self.fetch_yields.get(&txid).copied().unwrap_or(0) {
            tokio::task::yield_now().await;
        }
        self.completed_fetches.lock().unwrap().push(txid);
        self.transactions
            .get(&txid)
            .cloned()
            .ok_or(GatewayError::TransactionNotFound(txid))
    }

    async fn fetch_fee_estimates(
        &self,
        _network: Network,
    ) -> Result<BTreeMap<u16, f64>, GatewayError> {
        self.fee_calls.fetch_add(1, Ordering::SeqCst);
        self.fee_estimates.clone().ok_or(GatewayError::Status {
            url: "mock://fee-estimates".to_string(),
            status: 500,
        })
    }
}
