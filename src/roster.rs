use log::{debug, warn};
use scraper::{Html, Selector};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::fetch::{absolute, squashed_text};
use crate::structs::{Group, Roster, Teacher};

const FACULTY_TAB: &str = "a[id^='mark-'][role='tab']";
const GROUP_LINK: &str = "a[href^='/gs/faculties/timeline?grp=']";
const TEACHER_LINK: &str = "a.tutors_item";

/// Faculty tabs and the group links inside each tab's panel.
///
/// Groups are sorted by name within their faculty. A faculty whose panel
/// cannot be read is logged and skipped; the rest still come back.
pub fn parse_groups(doc: &Html, page_url: &str) -> Roster {
    let mut groups = Vec::new();
    if let Err(e) = collect_groups(doc, page_url, &mut groups) {
        warn!("faculties index: {e}");
    }
    let mut roster: Roster = BTreeMap::new();
    for group in groups {
        roster.entry(group.faculty.clone()).or_default().push(group);
    }
    for faculty in roster.values_mut() {
        faculty.sort_by(|a, b| a.name.cmp(&b.name));
    }
    debug!(
        "roster: {} faculties, {} groups",
        roster.len(),
        roster.values().map(Vec::len).sum::<usize>()
    );
    roster
}

fn collect_groups(doc: &Html, page_url: &str, groups: &mut Vec<Group>) -> Result<()> {
    let tab_sel = Selector::parse(FACULTY_TAB)?;

    for tab in doc.select(&tab_sel) {
        let faculty = squashed_text(tab);
        let Some(panel) = tab.value().attr("aria-controls") else {
            debug!("faculty tab {faculty:?} has no panel");
            continue;
        };
        let group_sel = match Selector::parse(&format!("#{panel} {GROUP_LINK}")) {
            Ok(sel) => sel,
            Err(e) => {
                warn!("faculty {faculty:?}: bad panel id {panel:?}: {e}");
                continue;
            }
        };
        for link in doc.select(&group_sel) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            groups.push(Group {
                name: squashed_text(link),
                link: absolute(page_url, href)?,
                faculty: faculty.clone(),
            });
        }
    }
    Ok(())
}

/// Every named teacher on the teachers index, sorted by name.
pub fn parse_teachers(doc: &Html, page_url: &str) -> Vec<Teacher> {
    let mut teachers = Vec::new();
    if let Err(e) = collect_teachers(doc, page_url, &mut teachers) {
        warn!("teachers index: {e}");
    }
    teachers.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("{} teachers", teachers.len());
    teachers
}

fn collect_teachers(doc: &Html, page_url: &str, teachers: &mut Vec<Teacher>) -> Result<()> {
    let teacher_sel = Selector::parse(TEACHER_LINK)?;
    for link in doc.select(&teacher_sel) {
        let name = squashed_text(link);
        if name.is_empty() {
            continue;
        }
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        teachers.push(Teacher {
            name,
            link: absolute(page_url, href)?,
        });
    }
    Ok(())
}
