use aml_console_core::{
    DeclineReport, MonitoredTransaction, MonitoringStats, MonitoringSummary, RecentActivity,
    RiskDistribution, RiskIndicator, SarSummary, TransactionFilter,
};

use crate::{ApiRequest, ComplianceClient, Error};

impl ComplianceClient {
    /// Live feed; filters are always sent, unset ones as `All`.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<MonitoredTransaction>, Error> {
        self.fetch_list(ApiRequest::get("monitoring/transactions").query_pairs(filter.query()))
            .await
    }

    pub async fn monitoring_stats(&self) -> Result<MonitoringStats, Error> {
        self.fetch(ApiRequest::get("monitoring/dashboard/stats"))
            .await
    }

    pub async fn risk_distribution(&self) -> Result<RiskDistribution, Error> {
        self.fetch(ApiRequest::get("monitoring/risk-distribution"))
            .await
    }

    pub async fn risk_indicators(&self) -> Result<Vec<RiskIndicator>, Error> {
        self.fetch_list(ApiRequest::get("monitoring/risk-indicators"))
            .await
    }

    pub async fn recent_activity(&self) -> Result<Vec<RecentActivity>, Error> {
        self.fetch_list(ApiRequest::get("monitoring/recent-activity"))
            .await
    }

    pub async fn monitoring_sars(&self) -> Result<Vec<SarSummary>, Error> {
        self.fetch_list(ApiRequest::get("monitoring/sars"))
            .await
    }

    pub async fn decline_report(&self) -> Result<DeclineReport, Error> {
        self.fetch(ApiRequest::get("monitoring/reports/declines"))
            .await
    }

    pub async fn monitoring_summary(&self) -> Result<MonitoringSummary, Error> {
        self.fetch(ApiRequest::get("monitoring/reports/summary"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use aml_console_core::TransactionFilter;

    use crate::testing;

    #[tokio::test]
    async fn feed_query_defaults_to_all() {
        let (client, seen) = testing::client(200, "[]");
        client
            .list_transactions(&TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(
            seen.last().uri(),
            "monitoring/transactions?riskLevel=All&decision=All&limit=100"
        );

        let filter = TransactionFilter {
            risk_level: Some("HIGH".into()),
            decision: Some("DECLINED".into()),
            limit: 25,
        };
        client.list_transactions(&filter).await.unwrap();
        assert_eq!(
            seen.last().uri(),
            "monitoring/transactions?riskLevel=HIGH&decision=DECLINED&limit=25"
        );
    }

    #[tokio::test]
    async fn stats_parse() {
        let (client, seen) =
            testing::client(200, r#"{"totalMonitored":1200,"flagged":"36","blocked":4}"#);
        let stats = client.monitoring_stats().await.unwrap();
        assert_eq!(stats.flagged, Some(36.0));
        assert_eq!(seen.last().path, "monitoring/dashboard/stats");
    }

    #[tokio::test]
    async fn malformed_body_is_deserialization_error() {
        let (client, _) = testing::client(200, "<html>login</html>");
        let err = client.monitoring_summary().await.unwrap_err();
        assert!(matches!(err, crate::Error::Deserialization(_)));
    }
}
