use std::path::Path;

use aml_console::{Console, Download, PanelId};
use aml_console_core::Node;

use crate::OutputFormat;

pub fn format_node(node: &Node, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => node.to_text(),
        OutputFormat::Html => node.to_html(),
        OutputFormat::Json => serde_json::to_string_pretty(node)?,
    })
}

/// Print the console's current view.
pub fn print_view(console: &Console, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", format_node(&console.render(), format)?);
    Ok(())
}

/// Print only the given panels, in order.
pub fn print_panels(console: &Console, panels: &[PanelId], format: OutputFormat) -> anyhow::Result<()> {
    for &id in panels {
        println!("{}", format_node(&console.render_panel(id), format)?);
    }
    Ok(())
}

/// Write a download to `dir` under its own filename, or to stdout.
pub fn save(download: &Download, dir: Option<&Path>) -> anyhow::Result<()> {
    match dir {
        Some(dir) => {
            let path = dir.join(&download.filename);
            std::fs::write(&path, &download.body)?;
            eprintln!("Saved {} ({})", path.display(), download.content_type);
        }
        None => print!("{}", download.body),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        let node: Node = Node::el("div")
            .child(Node::el("h3").text("Queues"))
            .child(Node::el("p").text("none"))
            .into();
        assert_eq!(format_node(&node, OutputFormat::Text).unwrap(), "Queues\nnone");
        assert!(format_node(&node, OutputFormat::Html).unwrap().starts_with("<div>"));
        let json = format_node(&node, OutputFormat::Json).unwrap();
        assert!(json.contains("\"tag\": \"h3\""), "{json}");
    }

    #[test]
    fn save_writes_named_file() {
        let dir = std::env::temp_dir().join(format!("amlctl-save-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let download = Download {
            filename: "case_queues_2024-03-10.csv".to_owned(),
            content_type: aml_console_core::export::CSV,
            body: "queueName\nAlpha\n".to_owned(),
        };
        save(&download, Some(&dir)).unwrap();
        let written = std::fs::read_to_string(dir.join("case_queues_2024-03-10.csv")).unwrap();
        assert_eq!(written, "queueName\nAlpha\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
