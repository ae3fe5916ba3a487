use aml_console_core::{CaseQueue, NewQueue, QueueToggle};

use crate::{ApiRequest, ComplianceClient, Error, Method, to_body};

impl ComplianceClient {
    /// All case queues with their pending counts.
    pub async fn queue_overview(&self) -> Result<Vec<CaseQueue>, Error> {
        self.fetch_list(ApiRequest::get("cases/queues/overview"))
            .await
    }

    pub async fn create_queue(&self, queue: &NewQueue) -> Result<(), Error> {
        self.command(Method::Post, "cases/queues".to_owned(), Some(to_body(queue)?))
            .await
    }

    pub async fn set_queue_enabled(&self, id: i64, enabled: bool) -> Result<(), Error> {
        self.command(
            Method::Patch,
            format!("cases/queues/{id}"),
            Some(to_body(&QueueToggle { enabled })?),
        )
        .await
    }

    /// Run auto-assignment for one queue.
    pub async fn process_queue(&self, id: i64) -> Result<(), Error> {
        self.command(Method::Post, format!("cases/queues/{id}/process"), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use aml_console_core::NewQueue;

    use crate::{Method, testing};

    #[tokio::test]
    async fn overview_tolerates_non_array() {
        let (client, _) = testing::client(200, r#"{"error":"none"}"#);
        assert!(client.queue_overview().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_patches_enabled_flag() {
        let (client, seen) = testing::client(200, "{}");
        client.set_queue_enabled(5, false).await.unwrap();
        let req = seen.last();
        assert_eq!(req.method, Method::Patch);
        assert_eq!(req.path, "cases/queues/5");
        assert_eq!(req.body, Some(serde_json::json!({"enabled": false})));
    }

    #[tokio::test]
    async fn create_and_process() {
        let (client, seen) = testing::client(201, "{}");
        let queue = NewQueue {
            queue_name: "Sanctions".into(),
            target_role: "ANALYST".into(),
            enabled: true,
            ..NewQueue::default()
        };
        client.create_queue(&queue).await.unwrap();
        assert_eq!(seen.last().body.unwrap()["queueName"], "Sanctions");

        client.process_queue(5).await.unwrap();
        let req = seen.last();
        assert_eq!((req.method, req.path.as_str()), (Method::Post, "cases/queues/5/process"));
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn create_failure_carries_backend_message() {
        let (client, _) = testing::client(400, r#"{"message":"Queue name already exists"}"#);
        let err = client.create_queue(&NewQueue::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 400: Queue name already exists");
    }
}
