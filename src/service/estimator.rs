use crate::error::EstimateError;
use crate::models::{Estimate, EstimateDocument, ProjectConfiguration, PublicEstimate};
use crate::rates::RateStore;
use crate::service::pricing::PricingEngine;
use std::sync::Arc;

/// 估价服务: 每次请求取费率表快照，交给计价引擎
pub struct EstimatorService {
    rates: Arc<RateStore>,
}

impl EstimatorService {
    pub fn new(rates: Arc<RateStore>) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateStore {
        &self.rates
    }

    pub fn estimate(&self, config: &ProjectConfiguration) -> Result<Estimate, EstimateError> {
        let engine = PricingEngine::new(self.rates.snapshot());

        match engine.estimate(config) {
            Ok(estimate) => {
                tracing::info!(
                    "Estimate computed: package={}, bhk={}, lines={}, rates={}",
                    config.package,
                    config.bhk.label(),
                    estimate.lines.len(),
                    estimate.rate_version
                );
                Ok(estimate)
            }
            Err(e) => {
                if let EstimateError::MissingRate { .. } = e {
                    tracing::error!(
                        "Rate table {} is missing an entry, needs operator attention: {}",
                        engine.rates().version,
                        e
                    );
                }
                Err(e)
            }
        }
    }

    /// 对外接口: 仅分类区间与总价区间
    pub fn public_estimate(
        &self,
        config: &ProjectConfiguration,
    ) -> Result<PublicEstimate, EstimateError> {
        self.estimate(config).map(|e| e.public_view())
    }

    /// 估价单: 逐项金额 + 不含费率的说明
    pub fn document(
        &self,
        config: &ProjectConfiguration,
    ) -> Result<EstimateDocument, EstimateError> {
        self.estimate(config).map(|e| e.document())
    }
}
