use std::collections::{BTreeMap, HashMap};

use crate::model::ids::{LessonId, TrackId};
use crate::model::practice::PracticeRequirement;
use crate::model::quiz::{QuizConfig, QuizError, QuizOption, QuizQuestion};

pub const PROGRAMMING_TRACK: &str = "programming";
pub const ACCOUNTING_TRACK: &str = "accounting";
pub const SELF_REPAIR_TRACK: &str = "self-repair";

//
// ─── TRACKS & LESSONS ──────────────────────────────────────────────────────────
//

/// A study path of the Academy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub planned_lessons: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub code: String,
    pub title: String,
    pub estimate: String,
}

/// A group of lessons inside a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub label: String,
    pub title: String,
    pub focus: String,
    pub lessons: Vec<Lesson>,
}

/// Quiz plus practice gate for one lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonAssessment {
    pub quiz: QuizConfig,
    pub practice: PracticeRequirement,
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Static Academy content: tracks, their sections, and per-lesson assessments.
#[derive(Debug, Clone, Default)]
pub struct LessonCatalog {
    tracks: Vec<Track>,
    sections: BTreeMap<TrackId, Vec<Section>>,
    assessments: HashMap<LessonId, LessonAssessment>,
}

impl LessonCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    #[must_use]
    pub fn with_section(mut self, track: &TrackId, section: Section) -> Self {
        self.sections.entry(track.clone()).or_default().push(section);
        self
    }

    #[must_use]
    pub fn with_assessment(mut self, lesson: LessonId, assessment: LessonAssessment) -> Self {
        self.assessments.insert(lesson, assessment);
        self
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn sections(&self, track: &TrackId) -> &[Section] {
        self.sections.get(track).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lessons<'a>(&'a self, track: &TrackId) -> impl Iterator<Item = &'a Lesson> + 'a {
        self.sections(track).iter().flat_map(|s| s.lessons.iter())
    }

    #[must_use]
    pub fn lesson(&self, track: &TrackId, id: &LessonId) -> Option<&Lesson> {
        self.lessons(track).find(|l| &l.id == id)
    }

    /// Number of lessons a track is measured against.
    ///
    /// Tracks with written sections count those lessons; others fall back to the
    /// planned total.
    #[must_use]
    pub fn lesson_count(&self, track: &TrackId) -> u32 {
        let written = self.lessons(track).count();
        if written > 0 {
            u32::try_from(written).unwrap_or(u32::MAX)
        } else {
            self.track(track).map_or(0, |t| t.planned_lessons)
        }
    }

    #[must_use]
    pub fn assessment(&self, lesson: &LessonId) -> Option<&LessonAssessment> {
        self.assessments.get(lesson)
    }

    /// The default Academy: three tracks, the programming syllabus, and the
    /// assessed HTML lessons.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if a built-in quiz is malformed.
    pub fn academy() -> Result<Self, QuizError> {
        let programming = TrackId::new(PROGRAMMING_TRACK);
        let mut catalog = Self::new()
            .with_track(Track {
                id: programming.clone(),
                title: "Web Programming · Builder of Worlds".into(),
                planned_lessons: 34,
            })
            .with_track(Track {
                id: TrackId::new(ACCOUNTING_TRACK),
                title: "Accounting · Keeper of Numbers".into(),
                planned_lessons: 26,
            })
            .with_track(Track {
                id: TrackId::new(SELF_REPAIR_TRACK),
                title: "Self-Repair · Rebuilding Me".into(),
                planned_lessons: 18,
            });

        for section in programming_sections() {
            catalog = catalog.with_section(&programming, section);
        }

        Ok(catalog
            .with_assessment(LessonId::new("prog-2-1"), first_html_page()?)
            .with_assessment(LessonId::new("prog-2-2"), text_links_images()?))
    }
}

//
// ─── PROGRAMMING SYLLABUS ──────────────────────────────────────────────────────
//

const PROGRAMMING_TITLES: &[(&str, &str)] = &[
    ("1.1", "How the web works"),
    ("1.2", "Your editor and browser tools"),
    ("1.3", "Files, folders and paths"),
    ("2.1", "Your first HTML page"),
    ("2.2", "Text, links and images"),
    ("2.3", "Lists and tables"),
    ("2.4", "Forms and inputs"),
    ("2.5", "Semantic layout tags"),
    ("3.1", "Selectors and the cascade"),
    ("3.2", "The box model and spacing"),
    ("3.3", "Flexbox layouts"),
    ("3.4", "Grid layouts"),
    ("3.5", "Responsive design"),
    ("3.6", "Tailwind basics"),
    ("4.1", "Values, variables and types"),
    ("4.2", "Conditions and loops"),
    ("4.3", "Functions"),
    ("4.4", "Arrays and objects"),
    ("4.5", "Working with the DOM"),
    ("4.6", "Events"),
    ("4.7", "Fetching data"),
    ("5.1", "Components and JSX"),
    ("5.2", "Props and state"),
    ("5.3", "Effects"),
    ("5.4", "Routing in Next.js"),
    ("5.5", "Loading data in Next.js"),
    ("6.1", "Databases and tables"),
    ("6.2", "Setting up Supabase"),
    ("6.3", "Authentication"),
    ("6.4", "CRUD from the UI"),
    ("7.1", "Planning a real project"),
    ("7.2", "Building the core"),
    ("7.3", "Polish and accessibility"),
    ("7.4", "Connecting to the main system"),
];

/// Resolve a programming lesson by its code.
///
/// Unknown codes become a visible `missing-<code>` placeholder rather than an error.
#[must_use]
pub fn programming_lesson(code: &str, estimate: &str) -> Lesson {
    match PROGRAMMING_TITLES.iter().find(|(c, _)| *c == code) {
        Some((code, title)) => Lesson {
            id: LessonId::new(format!("prog-{}", code.replace('.', "-"))),
            code: (*code).to_owned(),
            title: (*title).to_owned(),
            estimate: estimate.to_owned(),
        },
        None => Lesson {
            id: LessonId::new(format!("missing-{code}")),
            code: code.to_owned(),
            title: format!("Missing lesson for code {code}"),
            estimate: estimate.to_owned(),
        },
    }
}

fn section(id: &str, label: &str, title: &str, focus: &str, lessons: &[(&str, &str)]) -> Section {
    Section {
        id: id.into(),
        label: label.into(),
        title: title.into(),
        focus: focus.into(),
        lessons: lessons
            .iter()
            .map(|(code, estimate)| programming_lesson(code, estimate))
            .collect(),
    }
}

fn programming_sections() -> Vec<Section> {
    const LONG: &str = "60–90 min";
    const CAPSTONE: &str = "60–120 min";
    vec![
        section(
            "arc-1",
            "Arc 1 · Foundations",
            "How the Web Works & Your Tools",
            "Understand browsers, servers, and the tools you will use so nothing feels like magic.",
            &[("1.1", "30–45 min"), ("1.2", "45–60 min"), ("1.3", "45–60 min")],
        ),
        section(
            "arc-2",
            "Arc 2 · HTML",
            "HTML Structure & Semantics",
            "Learn how to structure pages with clean, semantic HTML that GAIA can read easily later.",
            &[
                ("2.1", LONG),
                ("2.2", LONG),
                ("2.3", "45–60 min"),
                ("2.4", LONG),
                ("2.5", "45–60 min"),
            ],
        ),
        section(
            "arc-3",
            "Arc 3 · CSS & Tailwind",
            "Styling, Layouts, and Tailwind Basics",
            "Control layout, spacing, and typography, then move to faster styling with Tailwind.",
            &[
                ("3.1", LONG),
                ("3.2", LONG),
                ("3.3", LONG),
                ("3.4", LONG),
                ("3.5", LONG),
                ("3.6", LONG),
            ],
        ),
        section(
            "arc-4",
            "Arc 4 · JavaScript",
            "JavaScript Fundamentals",
            "Build the logic layer so you can interact with users, data, and APIs.",
            &[
                ("4.1", LONG),
                ("4.2", LONG),
                ("4.3", LONG),
                ("4.4", LONG),
                ("4.5", LONG),
                ("4.6", LONG),
                ("4.7", LONG),
            ],
        ),
        section(
            "arc-5",
            "Arc 5 · React & Next.js",
            "Components, State, and Next.js",
            "Move from static pages to interactive apps using React and Next.js like GAIA itself.",
            &[("5.1", LONG), ("5.2", LONG), ("5.3", LONG), ("5.4", LONG), ("5.5", LONG)],
        ),
        section(
            "arc-6",
            "Arc 6 · Databases & Supabase",
            "Data, Auth, and CRUD",
            "Learn how to store your data remotely and keep it in sync, just like GAIA Awakening.",
            &[("6.1", LONG), ("6.2", LONG), ("6.3", LONG), ("6.4", LONG)],
        ),
        section(
            "arc-7",
            "Arc 7 · Capstone",
            "Build and Connect a Real Project",
            "Plan, build, and polish a small GAIA-style app and connect it into the main system.",
            &[("7.1", LONG), ("7.2", CAPSTONE), ("7.3", CAPSTONE), ("7.4", CAPSTONE)],
        ),
    ]
}

fn first_html_page() -> Result<LessonAssessment, QuizError> {
    let quiz = QuizConfig::new(vec![
        QuizQuestion::new(
            "What does the browser read to build a web page?",
            vec![
                QuizOption::new("a", "An image of the page"),
                QuizOption::new("b", "Text written in HTML"),
                QuizOption::new("c", "A spreadsheet"),
            ],
            "b",
            "A web page is plain text in HTML; the browser reads it top to bottom and builds what you see.",
        )?,
        QuizQuestion::new(
            "Which tag marks a paragraph?",
            vec![
                QuizOption::new("a", "<p>"),
                QuizOption::new("b", "<h1>"),
                QuizOption::new("c", "<body>"),
            ],
            "a",
            "<p> wraps a paragraph. <h1> is the main heading and <body> holds the visible page.",
        )?,
        QuizQuestion::new(
            "Where does the visible content of the page go?",
            vec![
                QuizOption::new("a", "Inside <head>"),
                QuizOption::new("b", "Inside <title>"),
                QuizOption::new("c", "Inside <body>"),
            ],
            "c",
            "<head> carries information about the page; everything shown on screen lives in <body>.",
        )?,
    ]);

    Ok(LessonAssessment {
        quiz,
        practice: PracticeRequirement::new(["<html", "<body", "<h1", "<p"]),
    })
}

fn text_links_images() -> Result<LessonAssessment, QuizError> {
    let quiz = QuizConfig::new(vec![
        QuizQuestion::new(
            "Which attribute tells a link where to go?",
            vec![
                QuizOption::new("a", "src"),
                QuizOption::new("b", "href"),
                QuizOption::new("c", "alt"),
            ],
            "b",
            "href holds the destination of an <a> link.",
        )?,
        QuizQuestion::new(
            "Why should every <img> carry an alt attribute?",
            vec![
                QuizOption::new("a", "It makes the image load faster"),
                QuizOption::new("b", "It describes the image when it cannot be seen"),
                QuizOption::new("c", "It sets the image size"),
            ],
            "b",
            "alt text is read by screen readers and shown when the image fails to load.",
        )?,
    ]);

    Ok(LessonAssessment {
        quiz,
        practice: PracticeRequirement::new(["<a", "href", "<img", "alt="]),
    })
}
