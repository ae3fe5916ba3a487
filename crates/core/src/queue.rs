//! Case work queues and their auto-assignment settings.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseQueue {
    pub id: i64,
    #[serde(default)]
    pub queue_name: String,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub min_priority: Option<String>,
    #[serde(default)]
    pub max_queue_size: Option<u64>,
    #[serde(default)]
    pub auto_assign: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub queued_new_count: u64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<Timestamp>,
}

/// Totals across the overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub queues: usize,
    pub enabled: usize,
    pub auto_assign: usize,
    pub queued: u64,
}

impl QueueStats {
    pub fn compute(queues: &[CaseQueue]) -> Self {
        queues.iter().fold(Self::default(), |mut acc, q| {
            acc.queues += 1;
            acc.enabled += usize::from(q.enabled);
            acc.auto_assign += usize::from(q.auto_assign);
            acc.queued += q.queued_new_count;
            acc
        })
    }
}

/// Body of `POST cases/queues`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQueue {
    pub queue_name: String,
    pub target_role: String,
    pub min_priority: Option<String>,
    pub max_queue_size: Option<u64>,
    pub auto_assign: bool,
    pub enabled: bool,
}

impl NewQueue {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.queue_name.trim().is_empty() {
            missing.push("queueName");
        }
        if self.target_role.trim().is_empty() {
            missing.push("targetRole");
        }
        missing
    }
}

/// Body of `PATCH cases/queues/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueToggle {
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals() {
        let queues: Vec<CaseQueue> = serde_json::from_str(
            r#"[{"id":1,"queueName":"High risk","enabled":true,"autoAssign":true,"queuedNewCount":4},
                {"id":2,"queueName":"Backlog","enabled":false,"queuedNewCount":11}]"#,
        )
        .unwrap();
        assert_eq!(
            QueueStats::compute(&queues),
            QueueStats {
                queues: 2,
                enabled: 1,
                auto_assign: 1,
                queued: 15,
            }
        );
    }

    #[test]
    fn new_queue_validation() {
        assert_eq!(NewQueue::default().missing_fields(), ["queueName", "targetRole"]);
        let q = NewQueue {
            queue_name: "Sanctions".into(),
            target_role: "SENIOR_ANALYST".into(),
            ..NewQueue::default()
        };
        assert!(q.missing_fields().is_empty());
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["minPriority"], serde_json::Value::Null);
        assert_eq!(json["queueName"], "Sanctions");
    }
}
