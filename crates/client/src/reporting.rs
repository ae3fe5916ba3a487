use aml_console_core::{DateRange, RegulatoryReport, RegulatoryReportKind};

use crate::{ApiRequest, ComplianceClient, Error};

impl ComplianceClient {
    /// Generate a CTR, LCTR or IFTR report for the window.
    pub async fn regulatory_report(
        &self,
        kind: RegulatoryReportKind,
        range: &DateRange,
    ) -> Result<RegulatoryReport, Error> {
        let request = ApiRequest::get(format!("reporting/regulatory/{}", kind.path()))
            .query_pairs(range.query());
        self.fetch(request).await
    }
}
