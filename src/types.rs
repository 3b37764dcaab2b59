use std::fmt;
use std::str::FromStr;
use bitcoin::{Amount, Network as BitcoinNetwork, OutPoint, Txid};
use crate::error::GatewayError;

/// 対応ネットワーク (mainnet / testnet の二択)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn bitcoin_network(self) -> BitcoinNetwork {
        match self {
            Network::Mainnet => BitcoinNetwork::Bitcoin,
            Network::Testnet => BitcoinNetwork::Testnet,
        }
    }
}

impl FromStr for Network {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            _ => Err(GatewayError::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    pub value: Amount,
}

impl UnspentOutput {
    pub fn out_point(&self) -> OutPoint {
        OutPoint::new(self.txid, self.vout)
    }
}

/// UTXO と、それを生成した前トランザクションの生バイト列の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInput {
    pub utxo: UnspentOutput,
    pub prior_transaction: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub address: String,
    pub value: Amount,
}

/// 未署名トランザクションの下書き。入力は選択順、出力は送金先が先頭でおつりが二番目。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftTransaction {
    pub inputs: Vec<CandidateInput>,
    pub outputs: Vec<TransactionOutput>,
}

impl DraftTransaction {
    pub fn total_input_value(&self) -> Option<Amount> {
        checked_sum(self.inputs.iter().map(|input| input.utxo.value))
    }

    pub fn total_output_value(&self) -> Option<Amount> {
        checked_sum(self.outputs.iter().map(|output| output.value))
    }
}

/// 金額の合計。u64 を超える場合は None。
pub fn checked_sum(values: impl IntoIterator<Item = Amount>) -> Option<Amount> {
    values.into_iter().try_fold(Amount::ZERO, Amount::checked_add)
}

/// sats/vB 単位の手数料率。常に正の有限値。
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeeRate(f64);

impl TryFrom<f64> for FeeRate {
    type Error = String;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(format!("無効な手数料率: {}", rate));
        }
        Ok(Self(rate))
    }
}

impl FeeRate {
    pub const DEFAULT_FALLBACK: FeeRate = FeeRate(50.0);

    pub const fn sats_per_vb(&self) -> f64 {
        self.0
    }

    pub fn fee(&self, vsize: usize) -> Amount {
        #[allow(clippy::cast_possible_truncation)]
        #[allow(clippy::cast_sign_loss)]
        Amount::from_sat((self.0 * vsize as f64).round() as u64)
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sats/vB", self.0)
    }
}
