use chrono::Utc;
use serde::Serialize;

use viva_recall::config::Config;
use viva_recall::logging::init_tracing;
use viva_recall::selection::BatchSelector;
use viva_recall::session::{PlannedQuestion, StudySession};
use viva_recall::stats::subject_breakdown;
use viva_recall::types::{SubjectStats, UserStats, WeightVector};
use viva_recall::{store, RecallError, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StudyPlan {
    subject: Option<String>,
    weights: WeightVector,
    stats: UserStats,
    accuracy: u32,
    subjects: Vec<SubjectStats>,
    batch: Vec<PlannedQuestion>,
}

fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    if let Err(err) = run(&config) {
        tracing::error!(error = %err, "viva-recall failed");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let bank_path = config.question_bank.as_ref().ok_or_else(|| {
        RecallError::InvalidInput("VIVA_QUESTION_BANK must point to a question bank".to_string())
    })?;
    let bank = store::load_question_bank(bank_path)?;
    let progress = store::load_progress(&config.progress_path)?;

    let mut selector = match config.seed {
        Some(seed) => BatchSelector::with_seed(config.batch_size, seed),
        None => BatchSelector::new(config.batch_size),
    };
    let session = StudySession::start(
        &progress,
        &bank,
        config.subject.as_deref(),
        &mut selector,
        Utc::now(),
    )?;

    let plan = StudyPlan {
        subject: config.subject.clone(),
        weights: progress.weights,
        accuracy: progress.stats.accuracy(),
        stats: progress.stats.clone(),
        subjects: subject_breakdown(&bank, &progress.overrides),
        batch: session.plan(),
    };
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
