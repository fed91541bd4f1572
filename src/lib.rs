//! Scraper for the SSUWT public timetable: faculty rosters, teachers,
//! academic weeks and weekly lesson tables, plus a JSON cache codec for
//! whatever stores them between runs.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod lesson;
pub mod prefs;
pub mod roster;
pub mod scrape;
pub mod settings;
pub mod structs;
pub mod table;
pub mod week;

pub use error::{Error, Result};
pub use lesson::{parse_lesson_info, LessonGrammar, LessonParser};
pub use scrape::Scraper;
pub use settings::Settings;
pub use structs::*;
