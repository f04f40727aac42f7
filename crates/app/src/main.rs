use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use academy_core::model::{LessonCatalog, LessonId, OptionId, TrackId, UserId};
use services::{AppServices, Clock, LessonSession, StudyEngineService};
use storage::repository::{KeyValueStore, Storage};
use storage::FileKeyValueStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "app=info,services=info,storage=warn";
const USER_SLOT: &str = "gaia:academy:user-id";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { command: &'static str, what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { command, what } => {
                write!(f, "{command} requires <{what}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidId { raw } => write!(f, "invalid identifier: {raw:?}"),
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

fn require_operand(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
    what: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingOperand { command, what })
}

fn parse_id<T: std::str::FromStr>(raw: String) -> Result<T, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidId { raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options] <command>");
    eprintln!();
    eprintln!("Study Engine:");
    eprintln!("  status                    daily message and counters (default)");
    eprintln!("  complete-today            complete today's Study Day");
    eprintln!("  miss                      record a missed day");
    eprintln!("  backlog                   clear one backlog day");
    eprintln!("  ahead                     work one day ahead");
    eprintln!("  reset                     start the class over");
    eprintln!("  snapshot                  print the stored snapshot as JSON");
    eprintln!("  arcs                      list arcs and their day ranges");
    eprintln!("  sync [push|pull]          exchange the snapshot with the row store");
    eprintln!();
    eprintln!("Lessons:");
    eprintln!("  tracks                                  track summaries");
    eprintln!("  lessons <track>                         lessons with completion marks");
    eprintln!("  toggle <track> <lesson>                 flip a lesson's completion");
    eprintln!("  visit <track>                           record a study visit");
    eprintln!("  practice <track> <lesson> <answers> <file>");
    eprintln!("                                          submit quiz answers (e.g. b,a,c)");
    eprintln!("                                          and the practice text in <file>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data-dir <dir>    device slots directory (default .academy)");
    eprintln!("  --db <sqlite_url>   row store used by sync (default in-memory)");
    eprintln!("  --user <uuid>       user id for sync (default: generated per device)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ACADEMY_DATA_DIR, ACADEMY_DB_URL, ACADEMY_USER_ID, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SyncDirection {
    Push,
    Pull,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Status,
    CompleteToday,
    Miss,
    Backlog,
    Ahead,
    Reset,
    Snapshot,
    Arcs,
    Sync(SyncDirection),
    Tracks,
    Lessons(TrackId),
    Toggle(TrackId, LessonId),
    Visit(TrackId),
    Practice {
        track: TrackId,
        lesson: LessonId,
        answers: Vec<OptionId>,
        file: PathBuf,
    },
}

impl Command {
    fn parse(name: &str, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let cmd = match name {
            "status" => Self::Status,
            "complete-today" => Self::CompleteToday,
            "miss" => Self::Miss,
            "backlog" => Self::Backlog,
            "ahead" => Self::Ahead,
            "reset" => Self::Reset,
            "snapshot" => Self::Snapshot,
            "arcs" => Self::Arcs,
            "tracks" => Self::Tracks,
            "sync" => match args.next().as_deref() {
                None | Some("push") => Self::Sync(SyncDirection::Push),
                Some("pull") => Self::Sync(SyncDirection::Pull),
                Some(other) => return Err(ArgsError::UnknownArg(other.to_owned())),
            },
            "lessons" => Self::Lessons(parse_id(require_operand(args, "lessons", "track")?)?),
            "visit" => Self::Visit(parse_id(require_operand(args, "visit", "track")?)?),
            "toggle" => Self::Toggle(
                parse_id(require_operand(args, "toggle", "track")?)?,
                parse_id(require_operand(args, "toggle", "lesson")?)?,
            ),
            "practice" => {
                let track = parse_id(require_operand(args, "practice", "track")?)?;
                let lesson = parse_id(require_operand(args, "practice", "lesson")?)?;
                let answers = require_operand(args, "practice", "answers")?
                    .split(',')
                    .map(|raw| parse_id(raw.trim().to_owned()))
                    .collect::<Result<Vec<OptionId>, _>>()?;
                let file = PathBuf::from(require_operand(args, "practice", "file")?);
                Self::Practice {
                    track,
                    lesson,
                    answers,
                    file,
                }
            }
            other => return Err(ArgsError::UnknownCommand(other.to_owned())),
        };
        Ok(cmd)
    }
}

struct Args {
    data_dir: PathBuf,
    db_url: Option<String>,
    user: Option<UserId>,
    command: Command,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data_dir = std::env::var("ACADEMY_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(".academy"), PathBuf::from);
        let mut db_url = std::env::var("ACADEMY_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(normalize_sqlite_url);
        let mut user = std::env::var("ACADEMY_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut command = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => data_dir = PathBuf::from(require_value(&mut args, "--data-dir")?),
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    user = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?,
                    );
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                name if command.is_none() => command = Some(Command::parse(name, &mut args)?),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data_dir,
            db_url,
            user,
            command: command.unwrap_or(Command::Status),
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }
    let trimmed = raw.trim();
    let path = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    format!("sqlite://{path}?mode=rwc")
}

/// Stable per-device user id, created on first use.
fn device_user(slots: &dyn KeyValueStore) -> UserId {
    if let Ok(Some(raw)) = slots.get(USER_SLOT) {
        if let Ok(user) = raw.trim().parse() {
            return user;
        }
    }
    let user = UserId::random();
    if let Err(err) = slots.set(USER_SLOT, &user.to_string()) {
        warn!(error = %err, "failed to remember device user id");
    }
    user
}

fn print_status(engine: &StudyEngineService) {
    let state = engine.state();
    if let Some(advisory) = engine.load_outcome().advisory() {
        println!("{advisory}");
    }
    println!("{}", engine.load_outcome().status_line());
    println!();
    println!("{}", engine.engine().daily_message());
    println!();
    println!("{}", engine.engine().arc_context());
    println!(
        "Day {} of {} · completed {} ({:.1}%) · remaining {} · backlog {} · ahead {} · streak {}",
        state.current_day_index,
        state.total_planned_days,
        state.completed_days,
        engine.engine().progress_percent(),
        engine.engine().remaining_days(),
        state.backlog_days,
        state.ahead_days,
        state.streak,
    );
    if let Some(at) = engine.last_saved_at() {
        println!("Last saved {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

fn print_command_result(engine: &StudyEngineService, changed: bool, noop: &str) {
    if !changed {
        println!("{noop}");
    }
    print_status(engine);
}

fn print_lessons(catalog: &LessonCatalog, services: &AppServices, track: &TrackId) {
    let progress = services.lesson_progress();
    let Some(info) = catalog.track(track) else {
        println!("Unknown track: {track}");
        return;
    };
    println!("{}", info.title);
    let sections = catalog.sections(track);
    if sections.is_empty() {
        println!("  No lessons are written for this track yet.");
    }
    for section in sections {
        println!("  {}", section.title);
        for lesson in &section.lessons {
            let mark = if progress.is_lesson_completed(track, &lesson.id) {
                "x"
            } else {
                " "
            };
            println!("    [{mark}] {} {} ({})", lesson.code, lesson.title, lesson.estimate);
        }
    }
    if let Some(at) = progress.last_visit(track) {
        println!("Last visit {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let slots: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&args.data_dir));
    let user = args.user.unwrap_or_else(|| device_user(slots.as_ref()));
    let clock = Clock::default();
    let services = match &args.db_url {
        Some(url) => AppServices::new_sqlite(Arc::clone(&slots), url, clock, user).await?,
        None => AppServices::new(
            Storage {
                slots: Arc::clone(&slots),
                ..Storage::in_memory()
            },
            clock,
            user,
        )?,
    };
    let catalog = services.catalog();
    info!(data_dir = %args.data_dir.display(), %user, "academy ready");

    match args.command {
        Command::Status => print_status(&services.study_engine()),
        Command::CompleteToday => {
            let mut engine = services.study_engine();
            let changed = engine.complete_today();
            print_command_result(&engine, changed, "Every planned day is already complete.");
        }
        Command::Miss => {
            let mut engine = services.study_engine();
            engine.simulate_missed_day();
            print_status(&engine);
        }
        Command::Backlog => {
            let mut engine = services.study_engine();
            let changed = engine.complete_backlog_day();
            print_command_result(&engine, changed, "There is no backlog to clear.");
        }
        Command::Ahead => {
            let mut engine = services.study_engine();
            let changed = engine.work_ahead();
            print_command_result(&engine, changed, "Every planned day is already complete.");
        }
        Command::Reset => {
            let mut engine = services.study_engine();
            engine.reset();
            print_status(&engine);
        }
        Command::Snapshot => {
            let engine = services.study_engine();
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
        Command::Arcs => {
            let plan = services.plan();
            println!("{} ({} days)", plan.class_name(), plan.total_planned_days());
            for range in plan.ranges() {
                if let Some(arc) = plan.arcs().iter().find(|arc| arc.id == range.arc_id) {
                    println!(
                        "  days {:>3}-{:<3} {} - {} ({}, {})",
                        range.start,
                        range.end,
                        arc.label,
                        arc.title,
                        arc.estimated_duration,
                        arc.approx_lessons
                    );
                }
            }
        }
        Command::Sync(SyncDirection::Push) => {
            let engine = services.study_engine();
            let row = services.sync().push(&engine.snapshot()).await?;
            println!(
                "Synced {} for user {} at {}.",
                row.class_id,
                row.user_id,
                row.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        Command::Sync(SyncDirection::Pull) => {
            let mut engine = services.study_engine();
            let plan = services.plan();
            match services.sync().pull(plan.class_id()).await? {
                Some(snapshot) => {
                    if engine.adopt(snapshot.state) {
                        println!("Adopted the synced snapshot.");
                    } else {
                        println!("This device already matches the synced snapshot.");
                    }
                }
                None => println!("No synced snapshot exists for this user."),
            }
            print_status(&engine);
        }
        Command::Tracks => {
            let progress = services.lesson_progress();
            for track in catalog.tracks() {
                let summary = progress.track_summary(&catalog, &track.id);
                println!(
                    "  {:<12} {:>3}/{:<3} {:>3}%  {}",
                    track.id,
                    summary.completed,
                    summary.total,
                    summary.percent(),
                    track.title
                );
            }
        }
        Command::Lessons(track) => print_lessons(&catalog, &services, &track),
        Command::Toggle(track, lesson) => {
            if catalog.lesson(&track, &lesson).is_none() {
                warn!(%track, %lesson, "toggling a lesson outside the catalog");
            }
            let mut progress = services.lesson_progress();
            let done = progress.toggle_lesson_completed(&track, &lesson);
            let state = if done { "completed" } else { "not completed" };
            println!("{lesson} is now {state}.");
        }
        Command::Visit(track) => {
            let mut progress = services.lesson_progress();
            let at = progress.mark_study_visit(&track);
            println!("Visit to {track} recorded at {}.", at.format("%Y-%m-%d %H:%M UTC"));
        }
        Command::Practice {
            track,
            lesson,
            answers,
            file,
        } => {
            let input = std::fs::read_to_string(&file)?;
            let mut progress = services.lesson_progress();
            let mut session = LessonSession::open(&catalog, &progress, &track, &lesson)?;
            for (index, option) in answers.into_iter().enumerate() {
                session.select_answer(index, option)?;
            }
            let evaluation = session.submit_quiz();
            for result in &evaluation.results {
                let verdict = if result.is_correct { "correct" } else { "incorrect" };
                println!("  Q{} {verdict}: {}", result.index + 1, result.explanation);
            }
            let outcome = session.check_practice(&input, &mut progress);
            println!("{}", outcome.reason());
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn defaults_to_status() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, Command::Status);
    }

    #[test]
    fn parses_flags_around_command() {
        let args = parse(&["--data-dir", "/tmp/a", "toggle", "programming", "prog-1-1"]).unwrap();
        assert_eq!(args.data_dir, PathBuf::from("/tmp/a"));
        assert_eq!(
            args.command,
            Command::Toggle(TrackId::new("programming"), LessonId::new("prog-1-1"))
        );
    }

    #[test]
    fn parses_practice_answers() {
        let args = parse(&["practice", "programming", "prog-2-1", "b, a,c", "page.html"]).unwrap();
        match args.command {
            Command::Practice { answers, file, .. } => {
                let expected: Vec<OptionId> =
                    ["b", "a", "c"].into_iter().map(OptionId::new).collect();
                assert_eq!(answers, expected);
                assert_eq!(file, PathBuf::from("page.html"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_operands_and_unknown_commands() {
        assert!(matches!(
            parse(&["lessons"]),
            Err(ArgsError::MissingOperand { command: "lessons", .. })
        ));
        assert!(matches!(parse(&["dance"]), Err(ArgsError::UnknownCommand(_))));
        assert!(matches!(
            parse(&["--user", "nope"]),
            Err(ArgsError::InvalidUserId { .. })
        ));
    }

    #[test]
    fn sync_direction_defaults_to_push() {
        assert_eq!(
            parse(&["sync"]).unwrap().command,
            Command::Sync(SyncDirection::Push)
        );
        assert_eq!(
            parse(&["sync", "pull"]).unwrap().command,
            Command::Sync(SyncDirection::Pull)
        );
    }

    #[test]
    fn normalizes_plain_paths() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("dev.db".into()), "sqlite://dev.db?mode=rwc");
        assert_eq!(
            normalize_sqlite_url("sqlite:dev.db".into()),
            "sqlite://dev.db?mode=rwc"
        );
    }
}
