//! Pure formatting functions for UI output.
//!
//! Everything the operator sees goes through here; diagnostics go to
//! `tracing` instead.

use console::style;

use crate::pipeline::ReleaseReport;
use crate::registry::Component;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Announce work starting on a component, e.g. "Validating core ...".
pub fn display_component(action: &str, name: &str) {
    println!("{} {} ...", style(action).green().bold(), name);
}

/// Announce a stage within the current component.
pub fn display_stage(heading: &str) {
    println!("{} ...", style(heading).bold());
}

/// Render the component list with dependencies, one per line.
pub fn format_components(components: &[Component]) -> String {
    components
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut line = format!("  {}. {}", i + 1, c.name);
            if !c.dependencies.is_empty() {
                line.push_str(&format!(" (depends on {})", c.dependencies.join(", ")));
            }
            if let Some(hook) = &c.precommit_hook {
                line.push_str(&format!(" [hook: {}]", hook.name()));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display the components in release order.
pub fn display_components(components: &[Component]) {
    println!("{}", style("Release order:").bold());
    println!("{}", format_components(components));
}

/// Display the closing summary of a completed run.
pub fn display_summary(report: &ReleaseReport) {
    println!(
        "\n{} Released {} as {}\n",
        style("✓").green(),
        report.components.join(", "),
        style(&report.tag).cyan()
    );
}
