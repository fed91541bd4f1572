use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fallback for a field the lesson grammar could not capture.
pub const UNKNOWN: &str = "Неизвестно";
/// Placeholder text of the sentinel lesson shown for a day without classes.
pub const NO_DATA: &str = "Нет данных";

/// Faculty name to its groups, each list sorted by group name.
pub type Roster = BTreeMap<String, Vec<Group>>;
/// Week number to the seven days of that week.
pub type WeekSchedule = BTreeMap<u32, Vec<DaySchedule>>;
/// Week number to the absolute URL of that week's timetable.
pub type WeekLinks = BTreeMap<u32, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: String,
    pub room: String,
    pub tutor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup: Option<String>,
}

impl Lesson {
    /// The legacy "no classes" record: every field set to [`NO_DATA`].
    pub fn no_data() -> Self {
        Lesson {
            time: NO_DATA.into(),
            kind: NO_DATA.into(),
            subject: NO_DATA.into(),
            room: NO_DATA.into(),
            tutor: NO_DATA.into(),
            subgroup: None,
        }
    }

    pub fn with_time(self, time: &str) -> Self {
        Lesson {
            time: time.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Понедельник")]
    Monday,
    #[serde(rename = "Вторник")]
    Tuesday,
    #[serde(rename = "Среда")]
    Wednesday,
    #[serde(rename = "Четверг")]
    Thursday,
    #[serde(rename = "Пятница")]
    Friday,
    #[serde(rename = "Суббота")]
    Saturday,
    #[serde(rename = "Воскресенье")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Понедельник",
            Weekday::Tuesday => "Вторник",
            Weekday::Wednesday => "Среда",
            Weekday::Thursday => "Четверг",
            Weekday::Friday => "Пятница",
            Weekday::Saturday => "Суббота",
            Weekday::Sunday => "Воскресенье",
        }
    }

    /// Timetable column to weekday; column 0 holds the time slot.
    pub fn from_column(index: usize) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[index - 1]),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.name().to_lowercase() == name)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lessons of one day. `Scheduled` never holds an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaggedLessons", into = "TaggedLessons")]
pub enum DayLessons {
    Empty,
    Scheduled(Vec<Lesson>),
}

/// Wire shape of [`DayLessons`]; decoding goes through `From<Vec<Lesson>>`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "lessons", rename_all = "snake_case")]
enum TaggedLessons {
    Empty,
    Scheduled(Vec<Lesson>),
}

impl From<TaggedLessons> for DayLessons {
    fn from(tagged: TaggedLessons) -> Self {
        match tagged {
            TaggedLessons::Empty => DayLessons::Empty,
            TaggedLessons::Scheduled(lessons) => lessons.into(),
        }
    }
}

impl From<DayLessons> for TaggedLessons {
    fn from(lessons: DayLessons) -> Self {
        match lessons {
            DayLessons::Empty => TaggedLessons::Empty,
            DayLessons::Scheduled(lessons) => TaggedLessons::Scheduled(lessons),
        }
    }
}

impl DayLessons {
    pub fn is_empty(&self) -> bool {
        matches!(self, DayLessons::Empty)
    }

    pub fn as_slice(&self) -> &[Lesson] {
        match self {
            DayLessons::Empty => &[],
            DayLessons::Scheduled(lessons) => lessons,
        }
    }

    /// Lessons for rendering: an empty day becomes the single [`Lesson::no_data`] record.
    pub fn or_sentinel(&self) -> Vec<Lesson> {
        match self {
            DayLessons::Empty => vec![Lesson::no_data()],
            DayLessons::Scheduled(lessons) => lessons.clone(),
        }
    }
}

impl From<Vec<Lesson>> for DayLessons {
    fn from(lessons: Vec<Lesson>) -> Self {
        if lessons.is_empty() {
            DayLessons::Empty
        } else {
            DayLessons::Scheduled(lessons)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: Weekday,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub lessons: DayLessons,
}

impl DaySchedule {
    pub fn date_label(&self) -> &str {
        self.date.as_deref().unwrap_or(UNKNOWN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub link: String,
    pub faculty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    pub link: String,
}

/// Academic week parity, as used for "even/odd week" display.
pub fn is_even_week(week: u32) -> bool {
    week % 2 == 0
}
