use log::{error, info, warn};

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::lesson::{LessonGrammar, LessonParser};
use crate::roster::{parse_groups, parse_teachers};
use crate::settings::Settings;
use crate::structs::*;
use crate::table::parse_schedule;
use crate::week::{find_current_week, parse_week_links, LazyWeeks, DEFAULT_WEEK};

/// Entry point for everything fetched from the timetable site.
///
/// Every public operation is best-effort: failures are logged and the caller
/// gets whatever was gathered, possibly nothing.
pub struct Scraper {
    settings: Settings,
    fetcher: Fetcher,
    group_parser: LessonParser,
    teacher_parser: LessonParser,
}

impl Scraper {
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_grammars(settings, &LessonGrammar::canonical(), &LessonGrammar::teacher())
    }

    pub fn with_grammars(
        settings: Settings,
        group_grammar: &LessonGrammar,
        teacher_grammar: &LessonGrammar,
    ) -> Result<Self> {
        Ok(Scraper {
            fetcher: Fetcher::new(&settings)?,
            group_parser: group_grammar.compile()?,
            teacher_parser: teacher_grammar.compile()?,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn fetch_groups(&self) -> Roster {
        let url = self.settings.faculties_url();
        match self.fetcher.fetch(&url).await {
            Ok(doc) => {
                let roster = parse_groups(&doc, &url);
                info!("fetched {} faculties", roster.len());
                roster
            }
            Err(e) => {
                error!("fetching groups: {e}");
                Roster::new()
            }
        }
    }

    pub async fn fetch_teachers(&self) -> Vec<Teacher> {
        let url = self.settings.teachers_url();
        match self.fetcher.fetch(&url).await {
            Ok(doc) => {
                let teachers = parse_teachers(&doc, &url);
                info!("fetched {} teachers", teachers.len());
                teachers
            }
            Err(e) => {
                error!("fetching teachers: {e}");
                Vec::new()
            }
        }
    }

    /// The academic week shown on the faculties index, [`DEFAULT_WEEK`] on any failure.
    pub async fn current_week(&self) -> u32 {
        self.try_current_week().await.unwrap_or_else(|| {
            warn!("current week unknown, assuming week {DEFAULT_WEEK}");
            DEFAULT_WEEK
        })
    }

    /// The academic week only when the index page actually states it.
    async fn try_current_week(&self) -> Option<u32> {
        match self.fetcher.fetch(&self.settings.faculties_url()).await {
            Ok(doc) => find_current_week(&doc),
            Err(e) => {
                warn!("fetching current week: {e}");
                None
            }
        }
    }

    /// One week of a group's timetable; all seven days, empty ones marked empty.
    pub async fn fetch_schedule(&self, link: &str) -> Vec<DaySchedule> {
        self.schedule_with(link, &self.group_parser).await
    }

    /// One week of a teacher's timetable. Lessons carry no tutor.
    pub async fn fetch_teacher_schedule(&self, link: &str) -> Vec<DaySchedule> {
        self.schedule_with(link, &self.teacher_parser).await
    }

    async fn schedule_with(&self, link: &str, parser: &LessonParser) -> Vec<DaySchedule> {
        match self.fetcher.fetch(link).await {
            Ok(doc) => parse_schedule(&doc, parser),
            Err(e) => {
                error!("fetching schedule {link}: {e}");
                Vec::new()
            }
        }
    }

    /// Week number to timetable link for a group or teacher page.
    ///
    /// The page itself shows the current week, so that week maps to
    /// `schedule_url` unless the page links to it explicitly. When the
    /// current week cannot be resolved only the explicit links are returned.
    pub async fn fetch_weeks(&self, schedule_url: &str) -> WeekLinks {
        let current = self.try_current_week().await;
        let mut links = match self.fetcher.fetch(schedule_url).await {
            Ok(doc) => parse_week_links(&doc, schedule_url),
            Err(e) => {
                error!("fetching weeks for {schedule_url}: {e}");
                return WeekLinks::new();
            }
        };
        if let Some(current) = current {
            links
                .entry(current)
                .or_insert_with(|| schedule_url.to_string());
        }
        info!("{} weeks for {schedule_url}", links.len());
        links
    }

    pub async fn lazy_weeks(&self, schedule_url: &str) -> LazyWeeks {
        LazyWeeks::new(self.fetch_weeks(schedule_url).await)
    }

    /// Week links of a teacher's timetable page.
    pub async fn fetch_teacher_weeks(&self, link: &str) -> WeekLinks {
        self.fetch_weeks(link).await
    }

    /// Every week's group timetable, fetched one after another.
    pub async fn fetch_all_weeks(&self, schedule_url: &str) -> WeekSchedule {
        self.all_weeks_with(schedule_url, &self.group_parser).await
    }

    /// Every week's teacher timetable, fetched one after another.
    pub async fn fetch_all_teacher_weeks(&self, link: &str) -> WeekSchedule {
        self.all_weeks_with(link, &self.teacher_parser).await
    }

    async fn all_weeks_with(&self, schedule_url: &str, parser: &LessonParser) -> WeekSchedule {
        let mut weeks = self.lazy_weeks(schedule_url).await;
        let numbers = weeks.links().keys().copied().collect::<Vec<_>>();
        for week in numbers {
            self.load_week(&mut weeks, week, parser).await;
        }
        weeks.into_loaded()
    }

    /// A week from `weeks`, fetched on first use. `None` for a week with no link.
    pub async fn week_schedule<'w>(
        &self,
        weeks: &'w mut LazyWeeks,
        week: u32,
    ) -> Option<&'w [DaySchedule]> {
        self.load_week(weeks, week, &self.group_parser).await
    }

    pub async fn teacher_week_schedule<'w>(
        &self,
        weeks: &'w mut LazyWeeks,
        week: u32,
    ) -> Option<&'w [DaySchedule]> {
        self.load_week(weeks, week, &self.teacher_parser).await
    }

    async fn load_week<'w>(
        &self,
        weeks: &'w mut LazyWeeks,
        week: u32,
        parser: &LessonParser,
    ) -> Option<&'w [DaySchedule]> {
        if weeks.cached(week).is_none() {
            let link = weeks.link(week)?.to_string();
            let days = self.schedule_with(&link, parser).await;
            if days.is_empty() {
                // nothing to memoize; a later call may succeed
                return None;
            }
            weeks.store(week, days);
        }
        weeks.cached(week)
    }
}
