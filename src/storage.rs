use crate::config::{parse_color, Config};
use crate::date::{days_in_month, first_day};
use crate::model::{Holidays, Keywords};
use crate::month::DayMark;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use directories::{BaseDirs, ProjectDirs};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        NoteStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.md", date.format("%Y-%m-%d")))
    }

    pub fn exists(&self, date: NaiveDate) -> bool {
        let path = self.path(date);
        match fs::metadata(&path) {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    log::warn!("checking {}: {}", path.display(), err);
                }
                false
            }
        }
    }

    pub fn load(&self, date: NaiveDate) -> String {
        let path = self.path(date);
        match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
            Err(err) => {
                log::warn!("reading {}: {}", path.display(), err);
                err.to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Annotations {
    notes: Option<NoteStore>,
    holidays: Holidays,
    keywords: Keywords,
    mark_noted: bool,
}

impl Annotations {
    pub fn new(notes: NoteStore, holidays: Holidays, keywords: Keywords, mark_noted: bool) -> Self {
        Annotations {
            notes: Some(notes),
            holidays,
            keywords,
            mark_noted,
        }
    }

    pub fn holidays(&self) -> &Holidays {
        &self.holidays
    }

    pub fn note(&self, date: NaiveDate) -> String {
        let note = self
            .notes
            .as_ref()
            .map(|store| store.load(date))
            .unwrap_or_default();
        self.holidays.prefix(date, &note)
    }

    // Per-day marks for the month containing `anchor`. Keywords beat
    // holidays, holidays beat a plain note.
    pub fn month_marks(&self, anchor: NaiveDate) -> HashMap<u32, DayMark> {
        let mut marks = HashMap::new();
        let first = first_day(anchor);
        for day in 1..=days_in_month(first.year(), first.month()) {
            let Some(date) = first.with_day(day) else {
                continue;
            };
            if let Some(mark) = self.mark_for(date) {
                marks.insert(day, mark);
            }
        }
        marks
    }

    fn mark_for(&self, date: NaiveDate) -> Option<DayMark> {
        let mut mark = None;
        if let Some(store) = &self.notes {
            if self.mark_noted && store.exists(date) {
                mark = Some(DayMark::Noted);
            }
        }
        if let Some(holiday) = self.holidays.find(date) {
            mark = Some(DayMark::Colored(holiday.color));
        }
        if !self.keywords.is_empty() {
            let keyword_color = self.notes.as_ref().and_then(|store| {
                self.keywords
                    .find(&store.load(date))
                    .and_then(|k| parse_color(&k.color))
            });
            if let Some(color) = keyword_color {
                mark = Some(DayMark::Colored(color));
            }
        }
        mark
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "calendar").context("locating application directories")
}

pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.yml"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("calendar.log"))
}

pub fn default_note_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    let mut config = if path.exists() {
        let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        serde_yaml::from_str(&data).with_context(|| format!("parsing {:?}", path))?
    } else {
        Config::default()
    };
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                config.editor = editor;
            }
        }
    }
    Ok(config)
}

pub fn expand_home(raw: &str) -> PathBuf {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    match home {
        Some(home) => {
            if let Some(rest) = raw.strip_prefix("~/") {
                home.join(rest)
            } else {
                PathBuf::from(raw.replace("$HOME", &home.to_string_lossy()))
            }
        }
        None => PathBuf::from(raw),
    }
}

pub fn note_store(config: &Config) -> Result<NoteStore> {
    let dir = if config.note_dir.trim().is_empty() {
        default_note_dir()?
    } else {
        expand_home(config.note_dir.trim())
    };
    Ok(NoteStore::new(dir))
}

pub fn load_holidays(paths: &[PathBuf]) -> Holidays {
    let mut holidays = Holidays::default();
    for path in paths {
        let path = expand_home(&path.to_string_lossy());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("reading holiday list {}: {}", path.display(), err);
                continue;
            }
        };
        match Holidays::parse(&text) {
            Ok(parsed) => holidays.extend(parsed),
            Err(err) => log::warn!("parsing holiday list {}: {}", path.display(), err),
        }
    }
    if !holidays.is_empty() {
        log::debug!("loaded {} holidays", holidays.len());
    }
    holidays
}

pub fn load_annotations(config: &Config) -> Result<Annotations> {
    let notes = note_store(config)?;
    Ok(Annotations::new(
        notes,
        load_holidays(&config.holiday_lists),
        Keywords::new(config.keywords.clone()),
        !config.theme.noted.is_blank(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Keyword;
    use ratatui::prelude::Color;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn note_paths_use_iso_dates() {
        let store = NoteStore::new("/notes");
        assert_eq!(store.path(ymd(2023, 6, 5)), PathBuf::from("/notes/2023-06-05.md"));
    }

    #[test]
    fn missing_and_empty_notes_do_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        assert!(!store.exists(ymd(2023, 6, 5)));
        assert_eq!(store.load(ymd(2023, 6, 5)), "");

        fs::write(store.path(ymd(2023, 6, 5)), "").unwrap();
        assert!(!store.exists(ymd(2023, 6, 5)));

        fs::write(store.path(ymd(2023, 6, 6)), "dentist").unwrap();
        assert!(store.exists(ymd(2023, 6, 6)));
        assert_eq!(store.load(ymd(2023, 6, 6)), "dentist");
    }

    #[test]
    fn unreadable_note_surfaces_the_error_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        fs::create_dir(store.path(ymd(2023, 6, 7))).unwrap();
        assert!(!store.exists(ymd(2023, 6, 7)));
        assert!(!store.load(ymd(2023, 6, 7)).is_empty());
    }

    #[test]
    fn annotations_prefix_holidays_and_rank_marks() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        fs::write(store.path(ymd(2023, 6, 1)), "plain").unwrap();
        fs::write(store.path(ymd(2023, 6, 2)), "URGENT stuff").unwrap();
        fs::write(store.path(ymd(2023, 6, 15)), "party").unwrap();
        let holidays = Holidays::parse("06-15 green Birthday\n06-02 green Flag day").unwrap();
        let keywords = Keywords::new(vec![Keyword {
            keyword: "URGENT".into(),
            color: "red".into(),
        }]);
        let annotations = Annotations::new(store, holidays, keywords, true);

        assert_eq!(annotations.note(ymd(2023, 6, 15)), "Birthday\n\nparty");
        assert_eq!(annotations.note(ymd(2023, 6, 1)), "plain");

        let marks = annotations.month_marks(ymd(2023, 6, 20));
        assert_eq!(marks.get(&1), Some(&DayMark::Noted));
        assert_eq!(marks.get(&2), Some(&DayMark::Colored(Color::Red)));
        assert_eq!(marks.get(&15), Some(&DayMark::Colored(Color::Green)));
        assert_eq!(marks.get(&3), None);
    }

    #[test]
    fn default_annotations_are_empty() {
        let annotations = Annotations::default();
        assert_eq!(annotations.note(ymd(2023, 6, 15)), "");
        assert!(annotations.month_marks(ymd(2023, 6, 1)).is_empty());
    }

    #[test]
    fn config_file_is_optional_but_must_parse() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.yml");
        let config = load_config(Some(&missing)).unwrap();
        assert_eq!(config.layout, Config::default().layout);

        let broken = dir.path().join("broken.yml");
        fs::write(&broken, "layout: [not, a, map]").unwrap();
        assert!(load_config(Some(&broken)).is_err());

        let good = dir.path().join("good.yml");
        fs::write(&good, "note_dir: /srv/notes\n").unwrap();
        let config = load_config(Some(&good)).unwrap();
        assert_eq!(note_store(&config).unwrap().dir(), Path::new("/srv/notes"));
    }

    #[test]
    fn bad_holiday_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.txt");
        fs::write(&good, "12-25 red Christmas\n").unwrap();
        fs::write(&bad, "garbage\n").unwrap();
        let holidays = load_holidays(&[bad, dir.path().join("missing.txt"), good]);
        assert_eq!(holidays.len(), 1);
    }
}
