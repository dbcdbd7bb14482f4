use std::fmt;

use pathwise_core::model::{
    DisplaySettings, DisplaySettingsDraft, LearnerDraft, LearnerId, QuizResultDraft, ResourceId,
    Subject,
};
use pathwise_core::progress::ResourceState;
use serde::Serialize;
use services::views::PathPreview;
use services::{AppServices, Clock, LearnerServiceError, ViewState};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingLearnerId { command: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidLearnerId { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidResourceId { raw: String },
    InvalidSetting { var: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingLearnerId { command } => {
                write!(f, "{command} requires a learner id")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLearnerId { raw } => write!(f, "invalid learner id: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidResourceId { raw } => write!(f, "invalid resource id: {raw:?}"),
            ArgsError::InvalidSetting { var, raw } => write!(f, "invalid {var} value: {raw}"),
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

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn parse_resource_id(raw: String) -> Result<ResourceId, ArgsError> {
    ResourceId::new(raw.clone()).map_err(|_| ArgsError::InvalidResourceId { raw })
}

fn parse_learner_id(raw: Option<String>, command: &'static str) -> Result<LearnerId, ArgsError> {
    let raw = raw.ok_or(ArgsError::MissingLearnerId { command })?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidLearnerId { raw })
}

#[derive(Debug)]
enum Command {
    Path(LearnerId),
    Progress(LearnerId),
    Analytics,
    CreateLearner {
        draft: LearnerDraft,
        resources: Vec<ResourceId>,
    },
    RecordQuiz {
        learner_id: LearnerId,
        draft: QuizResultDraft,
    },
}

struct Args {
    db_url: String,
    verbose: bool,
    quiet: bool,
    command: Command,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [global options] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  path <learner-id>                 Learning path overview");
    eprintln!("  progress <learner-id>             Progress dashboard");
    eprintln!("  analytics                         Learner population overview");
    eprintln!("  create-learner --name <n> --style <s> --subject <s>");
    eprintln!("                 [--level <1-5>] [--weak-area <a>]... [--resource <id>]...");
    eprintln!("  record-quiz <learner-id> --resource <id> --score <0-100>");
    eprintln!("                 --answered <n> --correct <n> [--weak-topic <t>]...");
    eprintln!();
    eprintln!("Weak areas offered per subject (--weak-area):");
    for line in weak_area_help() {
        eprintln!("{line}");
    }
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://pathwise.sqlite3?mode=rwc)");
    eprintln!("  -v, --verbose             Debug logging");
    eprintln!("  -q, --quiet               Errors only");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PATHWISE_DB_URL, PATHWISE_LOG");
    eprintln!("  PATHWISE_WEAK_TOPIC_LIMIT, PATHWISE_ENTRY_TOPIC_LIMIT, PATHWISE_PATH_PREVIEW");
}

fn weak_area_help() -> Vec<String> {
    Subject::ALL
        .into_iter()
        .map(|subject| {
            format!(
                "  {:<14}{}",
                subject.as_str(),
                subject.weak_area_options().join(", ")
            )
        })
        .collect()
}

/// Argument problems get the usage text after the message.
fn is_usage_error(err: &(dyn std::error::Error + 'static)) -> bool {
    err.downcast_ref::<ArgsError>().is_some()
}

impl Args {
    fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PATHWISE_DB_URL")
            .unwrap_or_else(|_| "sqlite://pathwise.sqlite3?mode=rwc".into());
        let mut verbose = false;
        let mut quiet = false;
        let mut rest = Vec::new();

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "-v" | "--verbose" => verbose = true,
                "-q" | "--quiet" => quiet = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => rest.push(arg),
            }
        }

        let mut rest = rest.into_iter();
        let command = match rest.next().as_deref() {
            Some("path") => Command::Path(parse_learner_id(rest.next(), "path")?),
            Some("progress") => Command::Progress(parse_learner_id(rest.next(), "progress")?),
            Some("analytics") => Command::Analytics,
            Some("create-learner") => parse_create_learner(&mut rest)?,
            Some("record-quiz") => {
                let learner_id = parse_learner_id(rest.next(), "record-quiz")?;
                parse_record_quiz(learner_id, &mut rest)?
            }
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_string())),
            None => return Err(ArgsError::UnknownCommand(String::new())),
        };
        if let Some(extra) = rest.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self {
            db_url,
            verbose,
            quiet,
            command,
        })
    }
}

fn parse_create_learner(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut draft = LearnerDraft {
        knowledge_level: 1,
        ..LearnerDraft::default()
    };
    let mut resources = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => draft.name = require_value(args, "--name")?,
            "--style" => draft.learning_style = require_value(args, "--style")?,
            "--subject" => draft.subject = require_value(args, "--subject")?,
            "--level" => {
                draft.knowledge_level = parse_number("--level", require_value(args, "--level")?)?;
            }
            "--weak-area" => draft.weak_areas.push(require_value(args, "--weak-area")?),
            "--resource" => {
                resources.push(parse_resource_id(require_value(args, "--resource")?)?);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(Command::CreateLearner { draft, resources })
}

fn parse_record_quiz(
    learner_id: LearnerId,
    args: &mut impl Iterator<Item = String>,
) -> Result<Command, ArgsError> {
    let mut resource = None;
    let mut score = None;
    let mut answered = None;
    let mut correct = None;
    let mut weak_topics = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--resource" => {
                resource = Some(parse_resource_id(require_value(args, "--resource")?)?);
            }
            "--score" => score = Some(parse_number("--score", require_value(args, "--score")?)?),
            "--answered" => {
                answered = Some(parse_number("--answered", require_value(args, "--answered")?)?);
            }
            "--correct" => {
                correct = Some(parse_number("--correct", require_value(args, "--correct")?)?);
            }
            "--weak-topic" => weak_topics.push(require_value(args, "--weak-topic")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(Command::RecordQuiz {
        learner_id,
        draft: QuizResultDraft {
            resource_id: resource.ok_or(ArgsError::MissingValue { flag: "--resource" })?,
            score: score.ok_or(ArgsError::MissingValue { flag: "--score" })?,
            questions_answered: answered.ok_or(ArgsError::MissingValue { flag: "--answered" })?,
            correct_answers: correct.ok_or(ArgsError::MissingValue { flag: "--correct" })?,
            weak_topics,
        },
    })
}

fn env_limit(var: &'static str) -> Result<Option<usize>, ArgsError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ArgsError::InvalidSetting { var, raw }),
        Err(_) => Ok(None),
    }
}

fn display_settings() -> Result<DisplaySettings, Box<dyn std::error::Error>> {
    let draft = DisplaySettingsDraft {
        weak_topic_limit: env_limit("PATHWISE_WEAK_TOPIC_LIMIT")?,
        entry_topic_limit: env_limit("PATHWISE_ENTRY_TOPIC_LIMIT")?,
        path_preview_limit: env_limit("PATHWISE_PATH_PREVIEW")?,
    };
    Ok(draft.validate()?)
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PATHWISE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a settled view; a failed view also sets exit status 1.
fn emit_view<T: Serialize>(state: &ViewState<T>) -> Result<(), Box<dyn std::error::Error>> {
    print_json(state)?;
    if let Some(err) = state.error() {
        eprintln!("{}", err.message());
        std::process::exit(1);
    }
    Ok(())
}

/// Short human-readable listing on stderr, next to the JSON on stdout.
fn print_path_preview(preview: PathPreview<'_>) {
    for entry in preview.entries {
        let label = entry
            .title
            .as_deref()
            .unwrap_or_else(|| entry.resource_id.as_str());
        let marker = match entry.state {
            ResourceState::Completed => "x",
            ResourceState::Current => ">",
            ResourceState::Upcoming => " ",
        };
        eprintln!("[{marker}] {}. {label}", entry.index + 1);
    }
    if let Some(more) = preview.more_label() {
        eprintln!("{more}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1))?;
    init_tracing(args.quiet, args.verbose)?;

    let settings = display_settings()?;
    let app = AppServices::new_sqlite(&args.db_url, Clock::system(), settings).await?;

    match args.command {
        Command::Path(learner_id) => {
            let state = app.views().load_path_overview(learner_id).await;
            emit_view(&state)?;
            if let Some(overview) = state.loaded().filter(|_| !args.quiet) {
                print_path_preview(overview.preview(settings.path_preview_limit()));
            }
            Ok(())
        }
        Command::Progress(learner_id) => {
            emit_view(&app.views().load_progress_dashboard(learner_id).await)
        }
        Command::Analytics => emit_view(&app.views().load_analytics().await),
        Command::CreateLearner { draft, resources } => {
            match app.learners().create_learner(draft, resources).await {
                Ok((learner, path)) => print_json(&serde_json::json!({
                    "learner": learner,
                    "path": path,
                })),
                Err(LearnerServiceError::InputValidation(errors)) => {
                    for (field, message) in errors.field_messages() {
                        eprintln!("{}: {message}", field.as_str());
                    }
                    Err(errors.into())
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::RecordQuiz { learner_id, draft } => {
            let recorded = app.learners().record_quiz_result(learner_id, draft).await?;
            print_json(&serde_json::json!({
                "result": recorded.result,
                "band": recorded.result.band(),
                "advanced": recorded.advanced,
                "position": recorded.position,
            }))
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        if is_usage_error(err.as_ref()) {
            print_usage();
        }
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_record_quiz_with_global_flags() {
        let id = LearnerId::generate();
        let args = Args::parse(argv(&[
            "-v",
            "--db",
            "sqlite::memory:",
            "record-quiz",
            &id.to_string(),
            "--resource",
            "alg_001",
            "--score",
            "82.5",
            "--answered",
            "4",
            "--correct",
            "3",
            "--weak-topic",
            "slopes",
        ]))
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.db_url, "sqlite::memory:");
        let Command::RecordQuiz { learner_id, draft } = args.command else {
            panic!("expected record-quiz");
        };
        assert_eq!(learner_id, id);
        assert_eq!(draft.score, 82.5);
        assert_eq!(draft.weak_topics, vec!["slopes"]);
    }

    #[test]
    fn create_learner_defaults_level_to_one() {
        let args = Args::parse(argv(&[
            "create-learner",
            "--name",
            "Ada",
            "--style",
            "visual",
            "--subject",
            "algebra",
            "--resource",
            "alg_001",
        ]))
        .unwrap();
        let Command::CreateLearner { draft, resources } = args.command else {
            panic!("expected create-learner");
        };
        assert_eq!(draft.knowledge_level, 1);
        assert_eq!(resources.len(), 1);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Args::parse(argv(&["path"])),
            Err(ArgsError::MissingLearnerId { .. })
        ));
        assert!(matches!(
            Args::parse(argv(&["path", "nope"])),
            Err(ArgsError::InvalidLearnerId { .. })
        ));
        assert!(matches!(
            Args::parse(argv(&["teleport"])),
            Err(ArgsError::UnknownCommand(_))
        ));
        assert!(matches!(
            Args::parse(argv(&["record-quiz", &LearnerId::generate().to_string()])),
            Err(ArgsError::MissingValue { flag: "--resource" })
        ));
    }

    #[test]
    fn weak_area_help_lists_every_subject() {
        let lines = weak_area_help();
        assert_eq!(lines.len(), Subject::ALL.len());
        assert!(lines[0].trim_start().starts_with("algebra"));
        assert!(lines[0].contains("linear equations, like terms"));
        assert!(lines[3].trim_start().starts_with("calculus"));
        assert!(lines[3].ends_with("continuity"));
    }

    #[test]
    fn only_argument_errors_add_usage() {
        let args_err: Box<dyn std::error::Error> = Box::new(ArgsError::UnknownArg("--x".into()));
        assert!(is_usage_error(args_err.as_ref()));
        assert_eq!(args_err.to_string(), "unknown argument: --x");

        let other: Box<dyn std::error::Error> = "database is locked".into();
        assert!(!is_usage_error(other.as_ref()));
    }
}
