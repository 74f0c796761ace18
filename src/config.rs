use std::path::PathBuf;

use crate::types::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone)]
pub struct Config {
    pub question_bank: Option<PathBuf>,
    pub progress_path: PathBuf,
    pub batch_size: usize,
    pub subject: Option<String>,
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let question_bank = lookup("VIVA_QUESTION_BANK")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let progress_path = lookup("VIVA_PROGRESS_PATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./viva_progress.json"));

        let batch_size = lookup("VIVA_BATCH_SIZE")
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE);

        let subject = lookup("VIVA_SUBJECT").filter(|value| !value.is_empty());

        let seed = lookup("VIVA_SEED").and_then(|value| value.parse::<u64>().ok());

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Self {
            question_bank,
            progress_path,
            batch_size,
            subject,
            seed,
            log_level,
        }
    }
}
