use std::collections::BTreeMap;

use aml_console_core::{DateRange, FalsePositiveRate, HeatmapEntry, HeatmapKind, RiskHeatmap, RiskTrends};

use crate::{ApiRequest, ComplianceClient, Error};

impl ComplianceClient {
    /// Per-customer or per-merchant case counts and average risk score.
    pub async fn risk_heatmap(
        &self,
        kind: HeatmapKind,
        range: &DateRange,
    ) -> Result<RiskHeatmap, Error> {
        let request = ApiRequest::get(format!("analytics/risk/heatmap/{}", kind.as_str()))
            .query_pairs(range.query());
        let entries: BTreeMap<String, HeatmapEntry> = self.fetch(request).await?;
        Ok(RiskHeatmap::new(kind, entries))
    }

    pub async fn risk_trends(&self, range: &DateRange) -> Result<RiskTrends, Error> {
        self.fetch(ApiRequest::get("analytics/risk/trends").query_pairs(range.query()))
            .await
    }

    pub async fn false_positive_rate(&self, range: &DateRange) -> Result<FalsePositiveRate, Error> {
        self.fetch(
            ApiRequest::get("analytics/risk/false-positive-rate").query_pairs(range.query()),
        )
        .await
    }
}
