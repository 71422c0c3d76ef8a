use crate::error::EstimateError;
use crate::rates::table::RateTable;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

/// 当前生效的费率表
///
/// 每个请求通过 [`RateStore::snapshot`] 取一次快照；替换是整表原子替换，
/// 进行中的计算看到的始终是同一版本。
pub struct RateStore {
    current: ArcSwap<RateTable>,
}

impl RateStore {
    pub fn new(table: RateTable) -> Result<Self, EstimateError> {
        table.validate()?;
        info!("Rate table {} loaded", table.version);
        Ok(Self {
            current: ArcSwap::from_pointee(table),
        })
    }

    pub fn snapshot(&self) -> Arc<RateTable> {
        self.current.load_full()
    }

    pub fn version(&self) -> String {
        self.current.load().version.clone()
    }

    /// 校验通过后整表替换，失败时保持原表不变
    pub fn replace(&self, table: RateTable) -> Result<Arc<RateTable>, EstimateError> {
        table.validate()?;
        let next = Arc::new(table);
        let previous = self.current.swap(next.clone());
        info!("Rate table replaced: {} -> {}", previous.version, next.version);
        Ok(next)
    }
}
