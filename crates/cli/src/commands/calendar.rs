use aml_console::{Console, PanelId, View};
use aml_console_core::NewDeadline;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::OutputFormat;
use crate::output::{print_panels, print_view};

#[derive(Args, Debug)]
pub struct CalendarArgs {
    #[command(subcommand)]
    pub command: CalendarCommand,
}

#[derive(Subcommand, Debug)]
pub enum CalendarCommand {
    /// Month grid with upcoming and overdue deadlines.
    Show {
        /// Month to show, `YYYY-MM`; the current month when omitted.
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
        /// Select this day in the detail panel, `YYYY-MM-DD`.
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    /// Add a deadline.
    Add {
        /// Due date, `YYYY-MM-DD`.
        #[arg(long)]
        date: NaiveDate,
        /// Deadline type, `GENERAL` when omitted.
        #[arg(long = "type")]
        deadline_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Jurisdiction, `US` when omitted.
        #[arg(long)]
        jurisdiction: Option<String>,
    },
    /// Mark a deadline complete.
    Complete { id: i64 },
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM: {e}"))
}

pub async fn run(
    console: &Console,
    args: &CalendarArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        CalendarCommand::Show { month, day } => {
            console.switch_view(View::Calendar).await;
            if let Some(month) = month {
                console.go_to_month(*month);
            }
            if let Some(day) = day {
                console.select_day(*day);
            }
            print_view(console, format)
        }
        CalendarCommand::Add {
            date,
            deadline_type,
            description,
            jurisdiction,
        } => {
            console.update(|s| s.view = View::Calendar);
            let deadline = NewDeadline::new(
                deadline_type.as_deref(),
                description.as_deref(),
                *date,
                jurisdiction.as_deref(),
            );
            console.create_deadline(&deadline).await?;
            print_panels(console, &[PanelId::Calendar, PanelId::UpcomingDeadlines], format)
        }
        CalendarCommand::Complete { id } => {
            console.update(|s| s.view = View::Calendar);
            console.complete_deadline(*id).await?;
            print_panels(console, &[PanelId::Calendar, PanelId::OverdueDeadlines], format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_argument() {
        assert_eq!(parse_month("2024-02"), Ok(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("March").is_err());
    }
}
