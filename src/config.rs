use std::path::PathBuf;

#[derive(Clone, Default)]
pub struct Config {
    pub logs_path: PathBuf,
    pub history_limit: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            logs_path: std::env::var("LOGS_PATH")
                .map_or(PathBuf::from("logs"), PathBuf::from),
            history_limit: std::env::var("HISTORY_LIMIT")
                .unwrap_or("100".to_string())
                .parse::<usize>()
                .unwrap_or(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn defaults_apply_without_env() {
        unsafe {
            std::env::remove_var("LOGS_PATH");
            std::env::remove_var("HISTORY_LIMIT");
        }
        let config = Config::new();
        assert_eq!(config.logs_path, PathBuf::from("logs"));
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    #[serial_test::serial]
    fn env_overrides_are_read() {
        unsafe {
            std::env::set_var("LOGS_PATH", "/tmp/event-bus-logs");
            std::env::set_var("HISTORY_LIMIT", "5");
        }
        let config = Config::new();
        assert_eq!(config.logs_path, PathBuf::from("/tmp/event-bus-logs"));
        assert_eq!(config.history_limit, 5);
        unsafe {
            std::env::remove_var("LOGS_PATH");
            std::env::remove_var("HISTORY_LIMIT");
        }
    }

    #[test]
    #[serial_test::serial]
    fn malformed_history_limit_falls_back_to_default() {
        unsafe {
            std::env::set_var("HISTORY_LIMIT", "not-a-number");
        }
        let config = Config::new();
        assert_eq!(config.history_limit, 100);
        unsafe {
            std::env::remove_var("HISTORY_LIMIT");
        }
    }
}
