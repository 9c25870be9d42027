//! On-demand kline history for charting clients

use std::sync::Arc;

use tracing::debug;

use crate::error::ChartError;
use crate::models::candle::Klines;
use crate::models::period::Resolution;
use crate::models::symbol::SymbolCatalog;
use crate::services::bucketing;
use crate::services::store::{ChartStore, TimeWindow};

#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn ChartStore>,
    catalog: Arc<SymbolCatalog>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn ChartStore>, catalog: Arc<SymbolCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Bucket the trades strictly between `from` and `to`.
    ///
    /// The last bar is stamped with `to`: charting clients treat it as the
    /// current, still-forming bar.
    pub async fn history(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<Klines, ChartError> {
        let info = self.catalog.get(symbol)?;
        let resolution = Resolution::from_udf(resolution)?;

        let trades = self
            .store
            .find_trades(&info.pair, TimeWindow::open(from, to))
            .await?;

        let mut klines = bucketing::bucketize(&trades, &info.pair, resolution, from, to);
        if let Some(last) = klines.candles.last_mut() {
            last.t = to;
        }

        debug!(
            symbol = %symbol,
            resolution = %resolution,
            interval = resolution.interval(),
            from = from,
            to = to,
            trades = trades.len(),
            bars = klines.candles.len(),
            "History query completed"
        );

        Ok(klines)
    }
}
