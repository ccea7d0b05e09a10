use crate::library::logger::interface::{LogResult, Logger};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: chrono::FixedOffset,
}

impl LoggerConsole {
    pub fn new(timezone: chrono::FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
        }
    }

    fn format_line(&self, level: &str, message: &str) -> String {
        let local_time = Utc::now().with_timezone(&self.timezone);
        let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
        match &self.namespace {
            Some(namespace) => format!("[{}] {} {}: {}", formatted, level, namespace, message),
            None => format!("[{}] {} {}", formatted, level, message),
        }
    }
}

impl Logger for LoggerConsole {
    fn info(&self, message: &str) -> LogResult {
        println!("{}", self.format_line("INFO", message));
        Ok(())
    }

    fn error(&self, message: &str) -> LogResult {
        eprintln!("{}", self.format_line("ERROR", message));
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerConsole {
            namespace: Some(new_namespace),
            timezone: self.timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_are_joined_with_colons() {
        let logger = LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap());
        let nested = LoggerConsole {
            namespace: Some("camera:adapter".to_string()),
            timezone: logger.timezone,
        };

        let line = nested.format_line("INFO", "started");

        assert!(line.ends_with("INFO camera:adapter: started"));
    }

    #[test]
    fn test_line_without_namespace() {
        let logger = LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap());

        let line = logger.format_line("ERROR", "boom");

        assert!(line.ends_with("] ERROR boom"));
    }
}
