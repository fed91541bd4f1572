//! JSON encoding of scraped schedules and the preference keys they live under.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::prefs::Preferences;
use crate::structs::{DaySchedule, Teacher, WeekSchedule};

pub const SELECTED_GROUP_NAME: &str = "selectedGroupName";
pub const DAY_SCHEDULES: &str = "daySchedules";
pub const SELECTED_TEACHER: &str = "selectedTeacher";
pub const SELECTED_WEEK: &str = "selectedWeek";
pub const SHOW_TUTOR: &str = "showTutor";
pub const SHOW_ROOM: &str = "showRoom";
pub const SHOW_SUBGROUP: &str = "showSubgroup";

pub fn weeks_key(group_name: &str) -> String {
    format!("weeksMap_{group_name}")
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

/// Decode `key`, treating an unreadable blob as absent.
fn load<T: DeserializeOwned>(prefs: &impl Preferences, key: &str) -> Option<T> {
    let text = prefs.get_string(key)?;
    match decode(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("discarding cached {key}: {e}");
            None
        }
    }
}

pub fn save_day_schedules(
    prefs: &mut impl Preferences,
    group_name: &str,
    days: &[DaySchedule],
) -> Result<()> {
    let json = encode(days)?;
    prefs.put_string(SELECTED_GROUP_NAME, group_name);
    prefs.put_string(DAY_SCHEDULES, &json);
    prefs.commit();
    Ok(())
}

/// The last selected group name and its day schedules.
pub fn load_day_schedules(prefs: &impl Preferences) -> Option<(String, Vec<DaySchedule>)> {
    let group_name = prefs.get_string(SELECTED_GROUP_NAME)?;
    let days = load(prefs, DAY_SCHEDULES)?;
    Some((group_name, days))
}

pub fn save_weeks(prefs: &mut impl Preferences, group_name: &str, weeks: &WeekSchedule) -> Result<()> {
    let json = encode(weeks)?;
    prefs.put_string(&weeks_key(group_name), &json);
    prefs.commit();
    Ok(())
}

/// The cached week map of `group_name`; week numbers start at 1, so a week 0 entry is dropped.
pub fn load_weeks(prefs: &impl Preferences, group_name: &str) -> Option<WeekSchedule> {
    let mut weeks: WeekSchedule = load(prefs, &weeks_key(group_name))?;
    if weeks.remove(&0).is_some() {
        warn!("dropping week 0 from cached weeks of {group_name}");
    }
    Some(weeks)
}

pub fn save_teacher_schedule(
    prefs: &mut impl Preferences,
    teacher: &Teacher,
    days: &[DaySchedule],
) -> Result<()> {
    let teacher_json = encode(teacher)?;
    let days_json = encode(days)?;
    prefs.put_string(SELECTED_TEACHER, &teacher_json);
    prefs.put_string(DAY_SCHEDULES, &days_json);
    prefs.commit();
    Ok(())
}

pub fn load_teacher_schedule(prefs: &impl Preferences) -> Option<(Teacher, Vec<DaySchedule>)> {
    let teacher = load(prefs, SELECTED_TEACHER)?;
    let days = load(prefs, DAY_SCHEDULES)?;
    Some((teacher, days))
}

pub fn save_selected_week(prefs: &mut impl Preferences, week: u32) {
    prefs.put_string(SELECTED_WEEK, &week.to_string());
    prefs.commit();
}

pub fn load_selected_week(prefs: &impl Preferences) -> Option<u32> {
    prefs.get_string(SELECTED_WEEK)?.parse().ok().filter(|week| *week > 0)
}

/// Which lesson fields the timetable view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_tutor: bool,
    pub show_room: bool,
    pub show_subgroup: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            show_tutor: true,
            show_room: true,
            show_subgroup: true,
        }
    }
}

impl DisplayOptions {
    pub fn load(prefs: &impl Preferences) -> Self {
        DisplayOptions {
            show_tutor: prefs.get_bool(SHOW_TUTOR, true),
            show_room: prefs.get_bool(SHOW_ROOM, true),
            show_subgroup: prefs.get_bool(SHOW_SUBGROUP, true),
        }
    }

    pub fn save(&self, prefs: &mut impl Preferences) {
        prefs.put_bool(SHOW_TUTOR, self.show_tutor);
        prefs.put_bool(SHOW_ROOM, self.show_room);
        prefs.put_bool(SHOW_SUBGROUP, self.show_subgroup);
        prefs.commit();
    }
}
