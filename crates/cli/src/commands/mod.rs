pub mod analytics;
pub mod calendar;
pub mod cases;
pub mod limits;
pub mod monitoring;
pub mod queues;
pub mod reports;
pub mod view;
