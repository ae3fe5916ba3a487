//! AML compliance console
//!
//! The controller behind the compliance back-office dashboard. A [`Console`]
//! owns the client, the current [`ViewState`] and a set of [`Panels`]; page
//! loaders fetch one resource each and commit the rendered result to its
//! panel, and actions send one mutating request and then re-fetch what they
//! changed.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use aml_console::{Console, ConsoleConfig, PanelId, RefreshLoop, View};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aml_console::ConsoleError> {
//!     let config = ConsoleConfig::new("http://localhost:8080/api/v1").with_xsrf_token("3f0c...");
//!     let console = Arc::new(Console::from_config(config)?);
//!
//!     console.switch_view(View::Limits).await;
//!     println!("{}", console.render().to_text());
//!
//!     // Keep the limits figures fresh while the view is open.
//!     let refresh = RefreshLoop::spawn(&console);
//!     tokio::signal::ctrl_c().await.ok();
//!     refresh.shutdown().await;
//!     let _ = console.panel(PanelId::LimitsStats);
//!     Ok(())
//! }
//! ```
//!
//! Overlapping loads of one panel never interleave: each load takes a
//! ticket before it is sent, and only the most recently issued ticket may
//! commit.

mod config;
mod console;
mod error;
pub mod pages;
pub mod panel;
mod refresh;
pub mod view;

pub use config::ConsoleConfig;
pub use console::{Console, visible_panels};
pub use error::ConsoleError;
pub use panel::{Notice, NoticeKind, Panel, PanelData, PanelId, PanelState, Panels, Rendered, Ticket};
pub use refresh::{RefreshLoop, limits_due, live_feed_due};
pub use view::{CaseTab, LimitsTab, MonitoringTab, Tab, TabBar, View, ViewState};

pub use aml_console_core::export::Download;
