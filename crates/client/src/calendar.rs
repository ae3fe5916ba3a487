use aml_console_core::{Deadline, NewDeadline};

use crate::{ApiRequest, ComplianceClient, Error, Method, to_body};

impl ComplianceClient {
    /// Deadlines due within `days_ahead` days.
    pub async fn upcoming_deadlines(&self, days_ahead: u32) -> Result<Vec<Deadline>, Error> {
        let request = ApiRequest::get("compliance/calendar/upcoming")
            .query("daysAhead", days_ahead.to_string());
        self.fetch_list(request).await
    }

    pub async fn overdue_deadlines(&self) -> Result<Vec<Deadline>, Error> {
        self.fetch_list(ApiRequest::get("compliance/calendar/overdue"))
            .await
    }

    pub async fn create_deadline(&self, deadline: &NewDeadline) -> Result<(), Error> {
        self.command(
            Method::Post,
            "compliance/calendar/deadlines".to_owned(),
            Some(to_body(deadline)?),
        )
        .await
    }

    pub async fn complete_deadline(&self, id: i64) -> Result<(), Error> {
        self.command(
            Method::Post,
            format!("compliance/calendar/deadlines/{id}/complete"),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use aml_console_core::NewDeadline;
    use chrono::NaiveDate;

    use crate::{Method, testing};

    #[tokio::test]
    async fn upcoming_sends_horizon() {
        let (client, seen) = testing::client(
            200,
            r#"[{"id":1,"deadlineType":"CTR","deadlineDate":[2024,4,1,0,0]}]"#,
        );
        let deadlines = client.upcoming_deadlines(30).await.unwrap();
        assert_eq!(deadlines[0].type_label(), "CTR");
        assert_eq!(seen.last().uri(), "compliance/calendar/upcoming?daysAhead=30");
    }

    #[tokio::test]
    async fn create_and_complete() {
        let (client, seen) = testing::client(200, "{}");
        let due = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        client
            .create_deadline(&NewDeadline::new(Some("SAR_FILING"), Some("Q1 SARs"), due, None))
            .await
            .unwrap();
        let sent = seen.last();
        assert_eq!(sent.path, "compliance/calendar/deadlines");
        let body = sent.body.unwrap();
        assert_eq!(body["deadlineDate"], "2024-04-30T00:00:00");
        assert_eq!(body["jurisdiction"], "US");

        client.complete_deadline(9).await.unwrap();
        let sent = seen.last();
        assert_eq!(
            (sent.method, sent.path.as_str()),
            (Method::Post, "compliance/calendar/deadlines/9/complete")
        );
    }
}
