use aml_console_core::{
    CountryCompliance, GlobalLimit, GlobalLimitRequest, LimitStatus, LimitsDashboardStats,
    MerchantLimit, RiskThreshold, StatusUpdate, VelocityRule,
};

use crate::{ApiRequest, ComplianceClient, Error, Method, to_body};

impl ComplianceClient {
    pub async fn limits_stats(&self) -> Result<LimitsDashboardStats, Error> {
        self.fetch(ApiRequest::get("limits/dashboard/stats")).await
    }

    pub async fn merchant_limits(&self) -> Result<Vec<MerchantLimit>, Error> {
        self.fetch_list(ApiRequest::get("limits/merchant")).await
    }

    pub async fn global_limits(&self) -> Result<Vec<GlobalLimit>, Error> {
        self.fetch_list(ApiRequest::get("limits/global")).await
    }

    pub async fn create_global_limit(&self, limit: &GlobalLimitRequest) -> Result<(), Error> {
        self.command(Method::Post, "limits/global".to_owned(), Some(to_body(limit)?))
            .await
    }

    pub async fn update_global_limit(
        &self,
        id: i64,
        limit: &GlobalLimitRequest,
    ) -> Result<(), Error> {
        self.command(Method::Put, format!("limits/global/{id}"), Some(to_body(limit)?))
            .await
    }

    pub async fn delete_global_limit(&self, id: i64) -> Result<(), Error> {
        self.command(Method::Delete, format!("limits/global/{id}"), None)
            .await
    }

    pub async fn risk_thresholds(&self) -> Result<Vec<RiskThreshold>, Error> {
        self.fetch_list(ApiRequest::get("limits/risk-thresholds"))
            .await
    }

    pub async fn velocity_rules(&self) -> Result<Vec<VelocityRule>, Error> {
        self.fetch_list(ApiRequest::get("limits/velocity-rules"))
            .await
    }

    pub async fn delete_velocity_rule(&self, id: i64) -> Result<(), Error> {
        self.command(Method::Delete, format!("limits/velocity-rules/{id}"), None)
            .await
    }

    pub async fn set_velocity_rule_status(&self, id: i64, status: LimitStatus) -> Result<(), Error> {
        self.command(
            Method::Patch,
            format!("limits/velocity-rules/{id}"),
            Some(to_body(&StatusUpdate { status })?),
        )
        .await
    }

    pub async fn country_compliance(&self) -> Result<Vec<CountryCompliance>, Error> {
        self.fetch_list(ApiRequest::get("limits/country-compliance"))
            .await
    }
}
