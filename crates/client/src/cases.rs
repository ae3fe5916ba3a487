use aml_console_core::{ActivityPage, Case, CaseTimeline, NetworkGraph};
use serde_json::json;

use crate::{ApiRequest, ComplianceClient, Error, Method};

impl ComplianceClient {
    /// List cases, optionally filtered by status (`ESCALATED`, `NEW`, ...).
    ///
    /// A blank status is the same as no filter.
    pub async fn list_cases(&self, status: Option<&str>) -> Result<Vec<Case>, Error> {
        let mut request = ApiRequest::get("compliance/cases");
        if let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) {
            request = request.query("status", status);
        }
        self.fetch_list(request).await
    }

    pub async fn get_case(&self, id: i64) -> Result<Case, Error> {
        self.fetch(ApiRequest::get(format!("compliance/cases/{id}")))
            .await
    }

    pub async fn case_timeline(&self, id: i64) -> Result<CaseTimeline, Error> {
        self.fetch(ApiRequest::get(format!("cases/{id}/timeline")))
            .await
    }

    /// One page of the case's activity log.
    pub async fn case_activities(
        &self,
        id: i64,
        page: u32,
        size: u32,
    ) -> Result<ActivityPage, Error> {
        let request = ApiRequest::get(format!("cases/{id}/activities"))
            .query("page", page.to_string())
            .query("size", size.to_string());
        self.fetch(request).await
    }

    /// Entities linked to the case, `depth` hops out.
    pub async fn case_network(&self, id: i64, depth: u32) -> Result<NetworkGraph, Error> {
        let request =
            ApiRequest::get(format!("cases/{id}/network")).query("depth", depth.to_string());
        self.fetch(request).await
    }

    pub async fn escalate_case(&self, id: i64, reason: &str) -> Result<(), Error> {
        self.command(
            Method::Post,
            format!("cases/{id}/escalate"),
            Some(json!({ "reason": reason })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;

    #[tokio::test]
    async fn list_cases_sends_status_filter() {
        let (client, seen) = testing::client(200, r#"[{"id":1,"status":"ESCALATED"}]"#);
        let cases = client.list_cases(Some("ESCALATED")).await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(seen.last().uri(), "compliance/cases?status=ESCALATED");

        client.list_cases(Some("  ")).await.unwrap();
        assert_eq!(seen.last().uri(), "compliance/cases");
    }

    #[tokio::test]
    async fn activities_and_network_queries() {
        let (client, seen) = testing::client(200, r#"{"content":[],"totalElements":0}"#);
        client.case_activities(7, 0, 20).await.unwrap();
        assert_eq!(seen.last().uri(), "cases/7/activities?page=0&size=20");

        let (client, seen) = testing::client(200, r#"{"nodes":[],"edges":[]}"#);
        client.case_network(7, 2).await.unwrap();
        assert_eq!(seen.last().uri(), "cases/7/network?depth=2");
    }

    #[tokio::test]
    async fn escalate_posts_reason() {
        let (client, seen) = testing::client(200, "");
        client.escalate_case(12, "Structuring pattern").await.unwrap();
        let req = seen.last();
        assert_eq!(req.method, crate::Method::Post);
        assert_eq!(req.path, "cases/12/escalate");
        assert_eq!(
            req.body,
            Some(serde_json::json!({"reason": "Structuring pattern"}))
        );
    }

    #[tokio::test]
    async fn non_2xx_is_http_error() {
        let (client, _) = testing::client(404, r#"{"message":"Case not found"}"#);
        let err = client.get_case(99).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404: Case not found");
    }
}
