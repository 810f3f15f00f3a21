//! Static log corpora and on-disk fixtures.
//!
//! Corpora are plain `&[&str]` slices so they can be fed to rstest cases and
//! written to temp files without conversion.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Corpora
// ---------------------------------------------------------------------------

/// Three enrollments by two users in two courses; the third line repeats
/// user 1 with a different name and city.
pub const CORPUS_SMALL: &[&str] = &[
    "2024-01-15T10:00:00Z | web | user_id=1;user_name=Alice;user_city=NYC | course_id=C1;course_name=Rust;category=Programming | price=100;promo_code=NULL",
    "2024-01-15T11:30:00Z | web | user_id=2;user_name=Bob;user_city=SF | course_id=C2;course_name=SQL;category=Data | price=80;promo_code=SAVE10",
    "2024-01-16T09:15:00Z | app | user_id=1;user_name=Alicia;user_city=LA | course_id=C2;course_name=SQL;category=Data | price=80;promo_code=NULL",
];

/// The small corpus with blank and whitespace-only lines interleaved.
pub const CORPUS_WITH_BLANKS: &[&str] = &[
    "",
    "2024-01-15T10:00:00Z | web | user_id=1;user_name=Alice;user_city=NYC | course_id=C1;course_name=Rust;category=Programming | price=100;promo_code=NULL",
    "   ",
    "2024-01-15T11:30:00Z | web | user_id=2;user_name=Bob;user_city=SF | course_id=C2;course_name=SQL;category=Data | price=80;promo_code=SAVE10",
    "\t",
    "2024-01-16T09:15:00Z | app | user_id=1;user_name=Alicia;user_city=LA | course_id=C2;course_name=SQL;category=Data | price=80;promo_code=NULL",
    "",
];

/// Values that need CSV quoting on the way out.
pub const CORPUS_NEEDS_QUOTING: &[&str] = &[
    "2024-02-01T08:00:00Z | web | user_id=7;user_name=O\"Neil;user_city=New York, NY | course_id=C9;course_name=Intro, Part 1;category=Misc | price=0;promo_code=FREE",
];

/// Second line lacks the `category` key.
pub const CORPUS_MISSING_CATEGORY: &[&str] = &[
    "2024-01-15T10:00:00Z | web | user_id=1;user_name=Alice;user_city=NYC | course_id=C1;course_name=Rust;category=Programming | price=100;promo_code=NULL",
    "2024-01-15T11:30:00Z | web | user_id=2;user_name=Bob;user_city=SF | course_id=C2;course_name=SQL | price=80;promo_code=NULL",
];

/// Generate `n` valid lines cycling through 50 users, 12 courses and one
/// timestamp per minute.
pub fn corpus_high_volume(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let user = i % 50;
            let course = i % 12;
            let promo = if i % 3 == 0 { "SAVE10" } else { "NULL" };
            format!(
                "2024-03-{:02}T{:02}:{:02}:00Z | web | user_id={user};user_name=user{user};user_city=city{} | course_id=C{course};course_name=Course {course};category=cat{} | price={};promo_code={promo}",
                1 + (i / 1440) % 28,
                (i / 60) % 24,
                i % 60,
                user % 7,
                course % 4,
                50 + (i % 10) * 10,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// On-disk fixtures
// ---------------------------------------------------------------------------

/// A temp workspace with a raw log and an output directory path.
pub struct Workspace {
    pub dir: TempDir,
    pub raw_log: PathBuf,
    pub processed: PathBuf,
}

impl Workspace {
    pub fn with_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let raw_log = write_log(dir.path(), "enrollments.log", lines);
        let processed = dir.path().join("processed");
        Self {
            dir,
            raw_log,
            processed,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Write `lines` newline-terminated into `dir/name`.
pub fn write_log<S: AsRef<str>>(dir: &Path, name: &str, lines: &[S]) -> PathBuf {
    let mut content = String::new();
    for line in lines {
        content.push_str(line.as_ref());
        content.push('\n');
    }
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write log fixture");
    path
}
