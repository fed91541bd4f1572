use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

use crate::error::Result;
use crate::fetch::squashed_text;
use crate::lesson::LessonParser;
use crate::structs::*;

/// One week's timetable page into seven [`DaySchedule`]s, Monday first.
///
/// The first cell of each row is the time slot; cells 1..=7 are Monday..Sunday.
/// Short rows, missing headers and unreadable cells are skipped.
pub fn parse_schedule(doc: &Html, parser: &LessonParser) -> Vec<DaySchedule> {
    let dates = match parse_header_dates(doc) {
        Ok(dates) => dates,
        Err(e) => {
            warn!("header dates: {e}");
            HashMap::new()
        }
    };
    let mut days: HashMap<Weekday, Vec<Lesson>> = HashMap::new();
    if let Err(e) = collect_lessons(doc, parser, &mut days) {
        warn!("timetable rows: {e}");
    }
    debug!(
        "parsed {} lessons",
        days.values().map(Vec::len).sum::<usize>()
    );

    Weekday::ALL
        .into_iter()
        .map(|day| DaySchedule {
            day,
            date: dates.get(&day).cloned(),
            lessons: days.remove(&day).unwrap_or_default().into(),
        })
        .collect()
}

fn collect_lessons(
    doc: &Html,
    parser: &LessonParser,
    days: &mut HashMap<Weekday, Vec<Lesson>>,
) -> Result<()> {
    let row_sel = Selector::parse("tr")?;
    let cell_sel = Selector::parse(":scope > td")?;

    for row in doc.select(&row_sel) {
        let mut cells = row.select(&cell_sel).enumerate();
        let Some((_, time_cell)) = cells.next() else {
            continue;
        };
        let time = squashed_text(time_cell);

        for (index, cell) in cells {
            let Some(day) = Weekday::from_column(index) else {
                continue;
            };
            let lessons = lessons_in_cell(cell, parser)?;
            if lessons.is_empty() {
                continue;
            }
            days.entry(day)
                .or_default()
                .extend(lessons.into_iter().map(|lesson| lesson.with_time(&time)));
        }
    }
    Ok(())
}

/// Cells either carry structured markup (`span.type`, `div.subject`, ...) or plain text.
fn lessons_in_cell(cell: ElementRef, parser: &LessonParser) -> Result<Vec<Lesson>> {
    let structured_sel = Selector::parse(".cell")?;
    let subject_sel = Selector::parse("div.subject")?;

    if cell.select(&subject_sel).next().is_some() {
        let blocks = cell.select(&structured_sel).collect::<Vec<_>>();
        if blocks.is_empty() {
            return Ok(structured_lesson(cell)?.into_iter().collect());
        }
        let mut lessons = Vec::new();
        for block in blocks {
            lessons.extend(structured_lesson(block)?);
        }
        return Ok(lessons);
    }

    let text = squashed_text(cell);
    if text.is_empty() {
        return Ok(Vec::new());
    }
    Ok(parser.parse(&text))
}

/// A lesson from the site's structured markup. The tutor is whoever the page belongs to.
pub fn structured_lesson(block: ElementRef) -> Result<Option<Lesson>> {
    let first_text = |selector: &str| -> Result<String> {
        let sel = Selector::parse(selector)?;
        Ok(block.select(&sel).map(squashed_text).next().unwrap_or_default())
    };
    let subject = first_text("div.subject")?;
    if subject.is_empty() {
        return Ok(None);
    }
    let or_unknown = |text: String| if text.is_empty() { UNKNOWN.to_string() } else { text };
    let subgroup = first_text("div.subg")?;
    Ok(Some(Lesson {
        time: String::new(),
        kind: or_unknown(first_text("span.type")?),
        subject,
        room: or_unknown(first_text("div.room")?),
        tutor: first_text("div.tutor")?,
        subgroup: (!subgroup.is_empty()).then_some(subgroup),
    }))
}

/// Header cells look like `Понедельник<br>14-10-2024`; keep the day of month.
fn parse_header_dates(doc: &Html) -> Result<HashMap<Weekday, String>> {
    let header_sel = Selector::parse("tr th")?;
    let br_re = Regex::new(r"<\s*br\s*/?\s*>")?;
    let mut dates = HashMap::new();

    for header in doc.select(&header_sel) {
        let html = header.inner_html();
        let parts = br_re.split(&html).collect::<Vec<_>>();
        let [day, date] = parts[..] else {
            continue;
        };
        let Some(day) = Weekday::from_name(&strip_tags(day)) else {
            continue;
        };
        let date = strip_tags(date);
        let day_of_month = date.split('-').next().unwrap_or_default().trim();
        if !day_of_month.is_empty() {
            dates.insert(day, day_of_month.to_string());
        }
    }
    Ok(dates)
}

fn strip_tags(fragment: &str) -> String {
    let fragment = Html::parse_fragment(fragment);
    fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
