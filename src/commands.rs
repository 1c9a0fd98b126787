use crate::calendar::Calendar;
use crate::config::Config;
use crate::date::days_in_month;
use crate::storage::{load_annotations, note_store};
use crate::ui;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, Month, NaiveDate};

pub fn tui(config: &Config, date: NaiveDate) -> Result<()> {
    let today = Local::now().date_naive();
    let annotations = load_annotations(config)?;
    log::info!(
        "starting on {} with {} holidays",
        date,
        annotations.holidays().len()
    );
    let calendar = Calendar::new(date, today, config.layout, annotations);
    ui::run(calendar, config, note_store(config)?)
}

pub fn print_path(config: &Config, date: NaiveDate) -> Result<()> {
    println!("{}", note_store(config)?.path(date).display());
    Ok(())
}

pub fn show(config: &Config, date: NaiveDate) -> Result<()> {
    let note = load_annotations(config)?.note(date);
    print!("{}", note);
    if !note.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn parse_date_args(args: &[String], today: NaiveDate) -> Result<NaiveDate> {
    match args {
        [] => Ok(today),
        [word] => {
            if let Ok(date) = NaiveDate::parse_from_str(word, "%Y-%m-%d") {
                return Ok(date);
            }
            if let Ok(day) = word.parse::<u32>() {
                return ymd(today.year(), today.month(), day);
            }
            let month = parse_month(word)?;
            let day = today.day().min(days_in_month(today.year(), month));
            ymd(today.year(), month, day)
        }
        [day, month] => ymd(today.year(), parse_month(month)?, parse_day(day)?),
        [day, month, year] => {
            let year = year
                .parse::<i32>()
                .with_context(|| format!("invalid year {:?}", year))?;
            ymd(year, parse_month(month)?, parse_day(day)?)
        }
        _ => bail!("expected at most three date words, got {}", args.len()),
    }
}

fn parse_day(raw: &str) -> Result<u32> {
    raw.parse::<u32>()
        .with_context(|| format!("invalid day {:?}", raw))
}

fn parse_month(raw: &str) -> Result<u32> {
    if let Ok(number) = raw.parse::<u32>() {
        return if (1..=12).contains(&number) {
            Ok(number)
        } else {
            Err(anyhow!("invalid month {}", number))
        };
    }
    raw.parse::<Month>()
        .map(|m| m.number_from_month())
        .map_err(|_| anyhow!("invalid month {:?}", raw))
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("no such date: {}-{:02}-{:02}", year, month, day))
}
