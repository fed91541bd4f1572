//! Free-text timetable cells into [`Lesson`] records.
//!
//! A cell reads like `лек Программирование 305/2 Иванов И.И. 1`: lesson type
//! code, subject, room, tutor and an optional subgroup. Several lessons may
//! share one cell. The token shapes drift between pages, so they are described
//! once by a [`LessonGrammar`] and compiled into a [`LessonParser`].

use log::error;
use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::error::Result;
use crate::structs::{Lesson, UNKNOWN};

/// Lecture, lab, seminar, consultation, exam, credit test.
pub const LESSON_KINDS: [&str; 6] = ["лек", "лаб", "пр", "конс", "ЭКЗ", "зач"];

const TUTOR: &str = r"[А-ЯЁ][а-яё]+(?:-[А-ЯЁ][а-яё]+)?\s+[А-ЯЁ]\.\s?[А-ЯЁ]\.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomToken {
    /// `305/2`, `12/А`
    Slashed,
    /// Any run of non-space characters.
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorToken {
    Required,
    /// Teacher pages leave out the tutor; a missing one reads as empty.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubgroupToken {
    /// `подгруппа 2`
    Labelled,
    /// `2` or `подгруппа 2`
    Numbered,
    /// Whatever single token follows the tutor.
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonGrammar {
    pub kinds: Vec<String>,
    pub room: RoomToken,
    pub tutor: TutorToken,
    pub subgroup: SubgroupToken,
}

impl Default for LessonGrammar {
    fn default() -> Self {
        Self::canonical()
    }
}

impl LessonGrammar {
    pub fn canonical() -> Self {
        LessonGrammar {
            kinds: LESSON_KINDS.iter().map(|kind| kind.to_string()).collect(),
            room: RoomToken::Any,
            tutor: TutorToken::Required,
            subgroup: SubgroupToken::Numbered,
        }
    }

    /// Early timetable pages: only lectures, labs and seminars, rooms always `N/x`.
    pub fn legacy() -> Self {
        LessonGrammar {
            kinds: vec!["лаб".into(), "лек".into(), "пр".into()],
            room: RoomToken::Slashed,
            tutor: TutorToken::Required,
            subgroup: SubgroupToken::Labelled,
        }
    }

    /// A teacher's own timetable, where the tutor column is the page owner.
    pub fn teacher() -> Self {
        LessonGrammar {
            room: RoomToken::Slashed,
            tutor: TutorToken::Optional,
            ..Self::canonical()
        }
    }

    pub fn pattern(&self) -> String {
        let kinds = self
            .kinds
            .iter()
            .map(|kind| regex::escape(kind))
            .collect::<Vec<_>>()
            .join("|");
        let room = match self.room {
            RoomToken::Slashed => r"\d+/\w+",
            RoomToken::Any => r"\S+",
        };
        let tutor = match self.tutor {
            TutorToken::Required => format!(r"\s+(?<tutor>{TUTOR})"),
            TutorToken::Optional => format!(r"(?:\s+(?<tutor>{TUTOR}))?"),
        };
        let subgroup = match self.subgroup {
            SubgroupToken::Labelled => r"(?:\s+подгруппа\s+(?<subgroup>\d+))?",
            SubgroupToken::Numbered => r"(?:\s+(?:подгруппа\s+)?(?<subgroup>\d+)\b)?",
            SubgroupToken::Any => r"(?:\s+(?<subgroup>\S+))?",
        };
        format!(r"\b(?<type>{kinds})\s+(?<subject>.+?)\s+(?<room>{room}){tutor}{subgroup}")
    }

    pub fn compile(&self) -> Result<LessonParser> {
        let re = Regex::new(&self.pattern())?;
        Ok(LessonParser {
            re,
            tutor: self.tutor,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LessonParser {
    re: Regex,
    tutor: TutorToken,
}

impl LessonParser {
    /// The shared parser for [`LessonGrammar::canonical`], compiled once.
    pub fn canonical() -> Option<&'static LessonParser> {
        static CANONICAL: OnceLock<Option<LessonParser>> = OnceLock::new();
        CANONICAL
            .get_or_init(|| match LessonGrammar::canonical().compile() {
                Ok(parser) => Some(parser),
                Err(e) => {
                    error!("canonical lesson grammar: {e}");
                    None
                }
            })
            .as_ref()
    }

    /// Every lesson found in `cell`, `time` left blank. Never fails: text the
    /// grammar does not recognise yields no lessons.
    pub fn parse(&self, cell: &str) -> Vec<Lesson> {
        self.re
            .captures_iter(cell)
            .map(|caps| self.lesson(&caps))
            .collect()
    }

    fn lesson(&self, caps: &Captures) -> Lesson {
        let field = |name| caps.name(name).map(|m| m.as_str().trim().to_string());
        let tutor = field("tutor").unwrap_or_else(|| match self.tutor {
            TutorToken::Required => UNKNOWN.into(),
            TutorToken::Optional => String::new(),
        });
        Lesson {
            time: String::new(),
            kind: field("type").unwrap_or_else(|| UNKNOWN.into()),
            subject: field("subject").unwrap_or_else(|| UNKNOWN.into()),
            room: field("room").unwrap_or_else(|| UNKNOWN.into()),
            tutor,
            subgroup: field("subgroup"),
        }
    }
}

/// [`LessonParser::parse`] with the canonical grammar.
pub fn parse_lesson_info(cell: &str) -> Vec<Lesson> {
    LessonParser::canonical()
        .map(|parser| parser.parse(cell))
        .unwrap_or_default()
}
