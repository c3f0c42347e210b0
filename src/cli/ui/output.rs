use console::style;

use crate::types::{HealthStatus, ServiceHealth};

/// Styled terminal output for commands
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress everything except errors
    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn header(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold().underlined());
        }
    }

    pub fn section(&self, message: &str) {
        if !self.quiet {
            println!("\n{}", style(message).bold());
            println!("{}", "─".repeat(40));
        }
    }

    pub fn item(&self, message: &str) {
        if !self.quiet {
            println!("  • {}", message);
        }
    }

    pub fn field(&self, label: &str, value: &str) {
        if !self.quiet {
            println!("  {:<12} {}", style(label).dim(), value);
        }
    }

    pub fn health(&self, health: &ServiceHealth) {
        if self.quiet {
            return;
        }
        let status = match health.status {
            HealthStatus::Healthy => style(health.status.to_string()).green(),
            HealthStatus::Offline => style(health.status.to_string()).red(),
        };
        println!(
            "  {:<20} {:<8} {}",
            health.service,
            status,
            style(health.timestamp.to_rfc3339()).dim()
        );
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
