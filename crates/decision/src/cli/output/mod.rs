//! Output formatting utilities

use console::style;

use decision_tasks::{TaskEvent, TaskReporter};

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Progress line printed for a scheduled task
pub fn scheduled_line(name: &str, id: &str) -> String {
    format!("Scheduled {}: {}", name, id)
}

/// Reporter printing one line per scheduled task
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl TaskReporter for ConsoleReporter {
    fn report(&self, event: &TaskEvent) {
        match event {
            TaskEvent::Scheduled { name, id } => {
                println!("{}", scheduled_line(name, id.as_str()));
            }
            TaskEvent::GraphScheduled { task_count } => {
                println!(
                    "{} {} tasks scheduled",
                    style("✓").green().bold(),
                    task_count
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decision_queue::TaskId;

    #[test]
    fn test_scheduled_line() {
        assert_eq!(
            scheduled_line("build task", "fXc1VgTqRfKuwdUnYg2pgA"),
            "Scheduled build task: fXc1VgTqRfKuwdUnYg2pgA"
        );
    }

    #[test]
    fn test_console_reporter() {
        // Just verify it doesn't panic
        let reporter = ConsoleReporter;
        reporter.report(&TaskEvent::Scheduled {
            name: "run task".to_string(),
            id: TaskId::new("abc"),
        });
        reporter.report(&TaskEvent::GraphScheduled { task_count: 3 });
    }
}
