use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuizSet, SlotKey};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    slot: SlotKey,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSlot { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSlot { raw } => write!(f, "invalid --slot value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("STUDY_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut slot = std::env::var("STUDY_SLOT")
            .ok()
            .and_then(|value| SlotKey::new(value).ok())
            .unwrap_or_else(|| SlotKey::new("sample").expect("literal slot key is non-blank"));
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--slot" => {
                    let value = require_value(&mut args, "--slot")?;
                    slot = SlotKey::new(value.clone())
                        .map_err(|_| ArgsError::InvalidSlot { raw: value })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, slot, now })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>    SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --slot <key>         Slot to seed (default: sample)");
    eprintln!("  --now <rfc3339>      Override the created-at timestamp");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DB_URL, STUDY_SLOT");
}

fn sample_quiz() -> Result<QuizSet, Box<dyn std::error::Error>> {
    let questions = vec![
        Question {
            prompt: "Which layer of the cell regulates what enters and leaves it?".into(),
            options: vec![
                "The cell wall".into(),
                "The plasma membrane".into(),
                "The cytoskeleton".into(),
                "The nuclear envelope".into(),
            ],
            correct_answer: "The plasma membrane".into(),
            explanation: "The plasma membrane is selectively permeable and controls transport."
                .into(),
        },
        Question {
            prompt: "Where does most ATP production take place?".into(),
            options: vec![
                "Ribosomes".into(),
                "Mitochondria".into(),
                "Golgi apparatus".into(),
                "Lysosomes".into(),
            ],
            correct_answer: "Mitochondria".into(),
            explanation: "Oxidative phosphorylation in mitochondria yields the bulk of ATP.".into(),
        },
        Question {
            prompt: "Which molecule carries amino acids to the ribosome?".into(),
            options: vec!["mRNA".into(), "tRNA".into(), "rRNA".into(), "DNA".into()],
            correct_answer: "tRNA".into(),
            explanation: "Transfer RNA pairs its anticodon with mRNA codons during translation."
                .into(),
        },
    ];
    Ok(QuizSet::new(questions)?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    let now = args.now.unwrap_or_else(Utc::now);
    let storage = Storage::sqlite(&args.db_url).await?;
    let quiz = sample_quiz()?;
    storage.quizzes.save_quiz(&args.slot, &quiz, now).await?;

    println!(
        "Seeded slot {} with a {}-question quiz into {}",
        args.slot,
        quiz.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
