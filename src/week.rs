use log::{debug, warn};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

use crate::error::Result;
use crate::fetch::{absolute, squashed_text};
use crate::structs::{DaySchedule, WeekLinks, WeekSchedule};

/// Used whenever the index page does not say which week it is.
pub const DEFAULT_WEEK: u32 = 1;

/// Week number from the `N учебная неделя` banner, [`DEFAULT_WEEK`] if absent.
pub fn parse_current_week(doc: &Html) -> u32 {
    find_current_week(doc).unwrap_or_else(|| {
        warn!("no current week on page, assuming week {DEFAULT_WEEK}");
        DEFAULT_WEEK
    })
}

/// Week number from the banner, `None` when the page does not state one.
pub fn find_current_week(doc: &Html) -> Option<u32> {
    find_week_banner(doc).unwrap_or_else(|e| {
        warn!("week banner: {e}");
        None
    })
}

fn find_week_banner(doc: &Html) -> Result<Option<u32>> {
    let parity_sel = Selector::parse("div.parity")?;
    let week_re = Regex::new(r"(\d+)\s+учебная\s+неделя")?;
    let banner = match doc.select(&parity_sel).next() {
        Some(parity) => squashed_text(parity),
        None => squashed_text(doc.root_element()),
    };
    Ok(week_re
        .captures(&banner)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|week| *week > 0))
}

/// Links to other weeks on a group or teacher timetable page.
///
/// A week link carries the page's id parameter plus `week=`; its label is the
/// week number. Labels that are not positive integers are skipped.
pub fn parse_week_links(doc: &Html, page_url: &str) -> WeekLinks {
    let mut links = WeekLinks::new();
    if let Err(e) = collect_week_links(doc, page_url, &mut links) {
        warn!("week links on {page_url}: {e}");
    }
    debug!("{} week links on {page_url}", links.len());
    links
}

fn collect_week_links(doc: &Html, page_url: &str, links: &mut WeekLinks) -> Result<()> {
    let link_sel = Selector::parse("a[href*='week=']")?;
    for link in doc.select(&link_sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !has_id_param(href) {
            continue;
        }
        let Ok(week) = squashed_text(link).parse::<u32>() else {
            continue;
        };
        if week == 0 {
            continue;
        }
        links.insert(week, absolute(page_url, href)?);
    }
    Ok(())
}

/// `?grp=12&week=3` has an id besides the week, `?week=3` alone does not.
fn has_id_param(href: &str) -> bool {
    let Some((_, query)) = href.split_once('?') else {
        return false;
    };
    let keys = query
        .split('&')
        .filter_map(|pair| pair.split('=').next())
        .collect::<Vec<_>>();
    keys.contains(&"week") && keys.iter().any(|key| *key != "week" && !key.is_empty())
}

/// Week links resolved on demand. Each week's timetable is fetched at most once.
#[derive(Debug, Clone, Default)]
pub struct LazyWeeks {
    links: WeekLinks,
    loaded: WeekSchedule,
}

impl LazyWeeks {
    pub fn new(links: WeekLinks) -> Self {
        LazyWeeks {
            links,
            loaded: WeekSchedule::new(),
        }
    }

    /// Start from a cached map; weeks it holds are never fetched again.
    pub fn with_loaded(links: WeekLinks, loaded: WeekSchedule) -> Self {
        LazyWeeks { links, loaded }
    }

    pub fn links(&self) -> &WeekLinks {
        &self.links
    }

    pub fn link(&self, week: u32) -> Option<&str> {
        self.links.get(&week).map(String::as_str)
    }

    pub fn weeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.links
            .keys()
            .chain(self.loaded.keys())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
    }

    pub fn first_week(&self) -> Option<u32> {
        self.weeks().next()
    }

    pub fn last_week(&self) -> Option<u32> {
        self.weeks().last()
    }

    pub fn next_week(&self, week: u32) -> Option<u32> {
        self.weeks().find(|known| *known > week)
    }

    pub fn prev_week(&self, week: u32) -> Option<u32> {
        self.weeks().filter(|known| *known < week).last()
    }

    pub fn cached(&self, week: u32) -> Option<&[DaySchedule]> {
        self.loaded.get(&week).map(Vec::as_slice)
    }

    pub(crate) fn store(&mut self, week: u32, days: Vec<DaySchedule>) -> &[DaySchedule] {
        self.loaded.entry(week).or_insert(days).as_slice()
    }

    /// Everything fetched so far, ready for the cache.
    pub fn loaded(&self) -> &WeekSchedule {
        &self.loaded
    }

    pub fn into_loaded(self) -> WeekSchedule {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{DayLessons, Weekday};

    #[test]
    fn week_from_parity_banner() {
        let doc = Html::parse_document(
            "<html><body><div class=\"parity\">Сейчас 14 учебная неделя (чётная)</div></body></html>",
        );
        assert_eq!(parse_current_week(&doc), 14);
    }

    #[test]
    fn week_found_outside_parity_block() {
        let doc = Html::parse_document("<html><body><span>7 учебная неделя</span></body></html>");
        assert_eq!(parse_current_week(&doc), 7);
    }

    #[test]
    fn missing_banner_defaults_to_first_week() {
        let doc = Html::parse_document("<html><body><div class=\"parity\">Каникулы</div></body></html>");
        assert_eq!(parse_current_week(&doc), DEFAULT_WEEK);
        assert_eq!(find_current_week(&doc), None);
        let doc = Html::parse_document("<html><body></body></html>");
        assert_eq!(parse_current_week(&doc), 1);
        assert_eq!(find_current_week(&doc), None);
    }

    #[test]
    fn week_links_need_id_and_numeric_label() {
        let doc = Html::parse_document(
            r#"<html><body>
            <a href="?grp=12&amp;week=3">3</a>
            <a href="?grp=12&amp;week=5"> 5 </a>
            <a href="?grp=12&amp;week=6">Следующая</a>
            <a href="?week=7">7</a>
            <a href="/news?page=2">2</a>
            </body></html>"#,
        );
        let links = parse_week_links(&doc, "https://rasp.ssuwt.ru/gs/faculties/timeline?grp=12");
        assert_eq!(links.keys().copied().collect::<Vec<_>>(), [3, 5]);
        assert_eq!(
            links[&5],
            "https://rasp.ssuwt.ru/gs/faculties/timeline?grp=12&week=5"
        );
    }

    #[test]
    fn lazy_weeks_navigation() {
        let links = WeekLinks::from([
            (3, "u3".to_string()),
            (4, "u4".to_string()),
            (6, "u6".to_string()),
        ]);
        let mut weeks = LazyWeeks::new(links);
        assert_eq!(weeks.first_week(), Some(3));
        assert_eq!(weeks.last_week(), Some(6));
        assert_eq!(weeks.next_week(4), Some(6));
        assert_eq!(weeks.next_week(6), None);
        assert_eq!(weeks.prev_week(3), None);
        assert_eq!(weeks.prev_week(6), Some(4));

        assert!(weeks.cached(4).is_none());
        let day = DaySchedule {
            day: Weekday::Monday,
            date: None,
            lessons: DayLessons::Empty,
        };
        weeks.store(4, vec![day.clone()]);
        weeks.store(4, Vec::new());
        assert_eq!(weeks.cached(4), Some(&[day][..]));
        assert_eq!(weeks.into_loaded().len(), 1);
    }

    #[test]
    fn cached_weeks_are_not_refetched() {
        let day = DaySchedule {
            day: Weekday::Friday,
            date: Some("18".into()),
            lessons: DayLessons::Empty,
        };
        let links = WeekLinks::from([(5, "u5".to_string())]);
        let loaded = WeekSchedule::from([(4, vec![day.clone()])]);
        let weeks = LazyWeeks::with_loaded(links, loaded);

        assert_eq!(weeks.weeks().collect::<Vec<_>>(), [4, 5]);
        assert_eq!(weeks.cached(4), Some(&[day][..]));
        assert!(weeks.cached(5).is_none());
        assert_eq!(weeks.link(4), None);
        assert_eq!(weeks.prev_week(5), Some(4));
    }
}
