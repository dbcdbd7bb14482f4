use std::fmt;

use pathwise_core::model::{
    Difficulty, Resource, ResourceId, ResourceKind, StyleAffinity, Subject,
};
use storage::repository::Storage;

/// `(id, title, kind, content_url, difficulty, style, topic, prerequisites)`
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    &'static str,
    &'static str,
    &'static [&'static str],
);

const SAMPLE_CATALOG: &[SampleRow] = &[
    ("alg_001", "Introduction to Variables", "video", "https://example.com/video1", 1, "visual", "variables", &[]),
    ("alg_002", "Solving Linear Equations", "interactive", "https://example.com/interactive1", 2, "kinesthetic", "linear equations", &["variables"]),
    ("alg_003", "Combining Like Terms", "text", "https://example.com/article1", 2, "reading", "like terms", &["variables"]),
    ("alg_004", "Order of Operations - Visual Guide", "video", "https://example.com/video2", 1, "visual", "order of operations", &[]),
    ("alg_005", "Graphing Linear Equations", "interactive", "https://example.com/interactive2", 3, "visual", "graphing", &["linear equations", "variables"]),
    ("alg_006", "Variables Audio Lecture", "audio", "https://example.com/audio1", 1, "auditory", "variables", &[]),
    ("alg_007", "Linear Equations Practice Problems", "practice", "https://example.com/practice1", 2, "kinesthetic", "linear equations", &["variables"]),
    ("alg_008", "Universal Math Concepts", "mixed", "https://example.com/mixed1", 1, "universal", "basic math", &[]),
    ("alg_009", "Order of Operations Practice", "practice", "https://example.com/practice2", 1, "kinesthetic", "order of operations", &[]),
    ("alg_010", "Algebra Fundamentals Reading", "article", "https://example.com/article2", 1, "reading", "basic math", &[]),
    ("calc_001", "Introduction to Limits", "video", "https://example.com/calc_video1", 2, "visual", "limits", &[]),
    ("calc_002", "Understanding Derivatives", "interactive", "https://example.com/calc_interactive1", 3, "kinesthetic", "derivatives", &["limits"]),
    ("calc_003", "Limits Reading Guide", "article", "https://example.com/calc_article1", 2, "reading", "limits", &[]),
    ("calc_004", "Integration Basics", "video", "https://example.com/calc_video2", 4, "visual", "integrals", &["derivatives", "limits"]),
    ("calc_005", "Continuity Concepts", "audio", "https://example.com/calc_audio1", 3, "auditory", "continuity", &["limits"]),
    ("calc_006", "Advanced Calculus Reading", "article", "https://example.com/calc_article2", 5, "reading", "advanced calculus", &["derivatives", "integrals"]),
    ("calc_007", "Limits Practice Exercises", "practice", "https://example.com/calc_practice1", 2, "kinesthetic", "limits", &[]),
    ("calc_008", "Derivative Rules Visual Guide", "video", "https://example.com/calc_video3", 3, "visual", "derivatives", &["limits"]),
    ("geom_001", "Basic Shapes and Angles", "video", "https://example.com/geom_video1", 1, "visual", "angles", &[]),
    ("geom_002", "Triangle Properties", "interactive", "https://example.com/geom_interactive1", 2, "kinesthetic", "triangles", &["angles"]),
    ("geom_003", "Circle Geometry Guide", "article", "https://example.com/geom_article1", 3, "reading", "circles", &["angles"]),
    ("geom_004", "Area and Perimeter Calculations", "practice", "https://example.com/geom_practice1", 2, "kinesthetic", "area", &["triangles"]),
    ("geom_005", "Volume and Surface Area", "video", "https://example.com/geom_video2", 3, "visual", "volume", &["area"]),
    ("geom_006", "Coordinate Geometry", "interactive", "https://example.com/geom_interactive2", 4, "kinesthetic", "coordinate geometry", &["triangles", "area"]),
    ("trig_001", "Introduction to Trigonometry", "video", "https://example.com/trig_video1", 2, "visual", "sine", &["triangles"]),
    ("trig_002", "Sine, Cosine, and Tangent", "interactive", "https://example.com/trig_interactive1", 3, "kinesthetic", "cosine", &["sine"]),
    ("trig_003", "Trigonometric Identities", "article", "https://example.com/trig_article1", 4, "reading", "identities", &["sine", "cosine"]),
    ("trig_004", "Graphing Trigonometric Functions", "video", "https://example.com/trig_video2", 4, "visual", "graphs", &["sine", "cosine"]),
    ("trig_005", "Unit Circle Exploration", "interactive", "https://example.com/trig_interactive2", 3, "kinesthetic", "unit circle", &["sine", "cosine"]),
    ("trig_006", "Trigonometry Applications", "practice", "https://example.com/trig_practice1", 4, "kinesthetic", "applications", &["identities", "graphs"]),
    ("univ_001", "Mathematical Problem Solving Strategies", "article", "https://example.com/univ_article1", 2, "universal", "problem solving", &[]),
    ("univ_002", "Math Anxiety and Confidence Building", "audio", "https://example.com/univ_audio1", 1, "universal", "confidence", &[]),
    ("univ_003", "Study Techniques for Mathematics", "video", "https://example.com/univ_video1", 1, "universal", "study techniques", &[]),
    ("univ_004", "Mathematical Reasoning and Logic", "interactive", "https://example.com/univ_interactive1", 3, "universal", "reasoning", &[]),
    ("adv_001", "Advanced Mathematical Proofs", "article", "https://example.com/adv_article1", 5, "reading", "proofs", &["reasoning"]),
    ("adv_002", "Real-World Applications of Calculus", "video", "https://example.com/adv_video1", 5, "visual", "applications", &["derivatives", "integrals"]),
    ("adv_003", "Complex Mathematical Modeling", "practice", "https://example.com/adv_practice1", 5, "kinesthetic", "modeling", &["advanced calculus", "applications"]),
];

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    subject: Option<Subject>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSubject { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSubject { raw } => write!(f, "invalid --subject value: {raw}"),
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
        let mut db_url = std::env::var("PATHWISE_DB_URL")
            .unwrap_or_else(|_| "sqlite://pathwise.sqlite3?mode=rwc".into());
        let mut subject = None;

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
                "--subject" => {
                    let value = require_value(&mut args, "--subject")?;
                    let parsed = value
                        .parse::<Subject>()
                        .map_err(|_| ArgsError::InvalidSubject { raw: value.clone() })?;
                    subject = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, subject })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://pathwise.sqlite3?mode=rwc)");
    eprintln!("  --subject <name>          Only load one subject plus the shared entries");
    eprintln!("                            (algebra, geometry, trigonometry, calculus)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  PATHWISE_DB_URL");
}

/// Catalog id prefix for each subject. `univ_` and `adv_` entries are shared.
fn subject_prefix(subject: Subject) -> &'static str {
    match subject {
        Subject::Algebra => "alg_",
        Subject::Geometry => "geom_",
        Subject::Trigonometry => "trig_",
        Subject::Calculus => "calc_",
    }
}

fn is_usage_error(err: &(dyn std::error::Error + 'static)) -> bool {
    err.downcast_ref::<ArgsError>().is_some()
}

fn is_shared(id: &str) -> bool {
    id.starts_with("univ_") || id.starts_with("adv_")
}

fn sample_resource(row: &SampleRow) -> Result<Resource, Box<dyn std::error::Error>> {
    let (id, title, kind, url, difficulty, style, topic, prerequisites) = *row;
    let resource = Resource::new(
        ResourceId::new(id)?,
        title,
        kind.parse::<ResourceKind>()?,
        topic,
        Difficulty::new(difficulty)?,
        style.parse::<StyleAffinity>()?,
    )?
    .with_content_url(url)
    .with_prerequisites(prerequisites.iter().copied());
    Ok(resource)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse()?;

    let storage = Storage::sqlite(&args.db_url).await?;

    let mut loaded = 0_usize;
    for row in SAMPLE_CATALOG {
        let id = row.0;
        let wanted = args
            .subject
            .is_none_or(|subject| id.starts_with(subject_prefix(subject)) || is_shared(id));
        if !wanted {
            continue;
        }
        storage.resources.upsert_resource(&sample_resource(row)?).await?;
        loaded += 1;
    }

    println!("Seeded {loaded} catalog resources into {}", args.db_url);

    Ok(())
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
