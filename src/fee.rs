use crate::config::AppConfig;
use crate::error::AppError;
use crate::gateway::ChainGateway;
use crate::types::{FeeRate, Network};

/// 手数料率の推定。取得に失敗しても代替値を返し、エラーにはならない。
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeeEstimator {
    fallback: FeeRate,
    confirmation_target: u16,
}

impl Default for FeeEstimator {
    fn default() -> Self {
        Self::new(FeeRate::DEFAULT_FALLBACK, 1)
    }
}

impl FeeEstimator {
    pub fn new(fallback: FeeRate, confirmation_target: u16) -> Self {
        Self {
            fallback,
            confirmation_target,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let fallback = FeeRate::try_from(config.fallback_fee_rate).map_err(AppError::InvalidConfig)?;
        Ok(Self::new(fallback, config.confirmation_target))
    }

    pub fn fallback(&self) -> FeeRate {
        self.fallback
    }

    pub async fn estimate_fee_rate<G: ChainGateway>(&self, gateway: &G, network: Network) -> FeeRate {
        let estimates = match gateway.fetch_fee_estimates(network).await {
            Ok(estimates) => estimates,
            Err(e) => {
                log::warn!("手数料推定の取得に失敗したため代替値 {} を使用します: {}", self.fallback, e);
                return self.fallback;
            }
        };

        let Some(rate) = estimates.get(&self.confirmation_target) else {
            log::warn!(
                "承認目標 {} ブロックの手数料推定がないため代替値 {} を使用します。",
                self.confirmation_target,
                self.fallback
            );
            return self.fallback;
        };

        match FeeRate::try_from(*rate) {
            Ok(fee_rate) => {
                log::debug!("推定手数料率: {} (承認目標 {} ブロック)", fee_rate, self.confirmation_target);
                fee_rate
            }
            Err(e) => {
                log::warn!("{} のため代替値 {} を使用します。", e, self.fallback);
                self.fallback
            }
        }
    }
}
