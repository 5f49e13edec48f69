//! Bucketing notes into sidebar categories.
//!
//! Notes are filtered to what the current session may see, split into the
//! pinned bucket and the recency buckets, and sorted newest first. The
//! flattened concatenation of all buckets is the browsing order used for
//! keyboard navigation.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Offset, TimeZone};

use crate::models::{Category, Note};

/// Start-of-day cut-offs (Unix ms) for the recency buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundaries {
    today: i64,
    yesterday: i64,
    week: i64,
    month: i64,
}

impl DayBoundaries {
    /// Boundaries at the local midnights of `now`'s day and the days before it
    pub fn from_now<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            today: local_midnight_ms(now, 0),
            yesterday: local_midnight_ms(now, 1),
            week: local_midnight_ms(now, 7),
            month: local_midnight_ms(now, 30),
        }
    }

    /// Recency bucket for a creation timestamp
    #[must_use]
    pub const fn category_for(&self, created_at: i64) -> Category {
        if created_at >= self.today {
            Category::Today
        } else if created_at >= self.yesterday {
            Category::Yesterday
        } else if created_at >= self.week {
            Category::Previous7Days
        } else if created_at >= self.month {
            Category::Previous30Days
        } else {
            Category::Older
        }
    }
}

/// Unix ms of the local midnight `days_back` calendar days before `now`.
///
/// Days are counted on the calendar, so a DST change shortens or lengthens
/// them. A midnight skipped by a DST gap resolves with `now`'s offset.
fn local_midnight_ms<Tz: TimeZone>(now: &DateTime<Tz>, days_back: u64) -> i64 {
    let date = now
        .date_naive()
        .checked_sub_days(Days::new(days_back))
        .unwrap_or(NaiveDate::MIN);
    let midnight = date.and_time(NaiveTime::MIN);

    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(
            || {
                let offset_ms = i64::from(now.offset().fix().local_minus_utc()) * 1000;
                midnight.and_utc().timestamp_millis() - offset_ms
            },
            |start| start.timestamp_millis(),
        )
}

/// Notes grouped by [`Category`], each bucket ordered newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedNotes {
    buckets: [Vec<Note>; 6],
}

impl GroupedNotes {
    /// Notes in one category
    #[must_use]
    pub fn get(&self, category: Category) -> &[Note] {
        &self.buckets[category.index()]
    }

    /// Non-empty categories with their notes, in display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Note])> {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
            .filter(|(_, notes)| !notes.is_empty())
    }

    /// Concatenation of every bucket in category order
    #[must_use]
    pub fn flatten(&self) -> Vec<&Note> {
        self.buckets.iter().flatten().collect()
    }

    /// Index of a slug in the flattened order
    #[must_use]
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.buckets.iter().flatten().position(|note| note.slug == slug)
    }

    /// Category a slug is listed under
    #[must_use]
    pub fn category_of(&self, slug: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| self.get(*category).iter().any(|note| note.slug == slug))
    }

    /// Look up a listed note by slug
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&Note> {
        self.buckets.iter().flatten().find(|note| note.slug == slug)
    }

    /// Drop a slug from every bucket, returning whether anything was removed
    pub fn remove(&mut self, slug: &str) -> bool {
        let before = self.len();
        for bucket in &mut self.buckets {
            bucket.retain(|note| note.slug != slug);
        }
        self.len() != before
    }

    /// Total number of listed notes
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Whether no note is listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

/// Group the notes `owner_id` may see into sidebar categories.
///
/// Pinned membership wins over recency. Within a bucket notes are sorted by
/// `created_at` descending; equal timestamps keep their input order.
pub fn group_notes<Tz: TimeZone>(
    notes: &[Note],
    pinned: &BTreeSet<String>,
    owner_id: &str,
    now: &DateTime<Tz>,
) -> GroupedNotes {
    let boundaries = DayBoundaries::from_now(now);
    let mut grouped = GroupedNotes::default();

    for note in notes.iter().filter(|note| note.is_visible_to(owner_id)) {
        let category = if pinned.contains(&note.slug) {
            Category::Pinned
        } else {
            boundaries.category_for(note.created_at)
        };
        grouped.buckets[category.index()].push(note.clone());
    }

    for bucket in &mut grouped.buckets {
        bucket.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime, Utc};
    use pretty_assertions::assert_eq;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    const HOUR_MS: i64 = 60 * 60 * 1000;

    /// US Eastern time with its 2024 DST rules
    #[derive(Debug, Clone, Copy)]
    struct Eastern2024;

    impl Eastern2024 {
        fn est() -> FixedOffset {
            FixedOffset::west_opt(5 * 3600).unwrap()
        }

        fn edt() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }

        fn utc(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        }
    }

    impl TimeZone for Eastern2024 {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let fits = |offset: FixedOffset| {
                let utc = *local - offset;
                self.offset_from_utc_datetime(&utc) == offset
            };
            match (fits(Self::edt()), fits(Self::est())) {
                (true, true) => LocalResult::Ambiguous(Self::edt(), Self::est()),
                (true, false) => LocalResult::Single(Self::edt()),
                (false, true) => LocalResult::Single(Self::est()),
                (false, false) => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            let dst = Self::utc(2024, 3, 10, 7)..Self::utc(2024, 11, 3, 6);
            if dst.contains(utc) {
                Self::edt()
            } else {
                Self::est()
            }
        }
    }

    fn now() -> DateTime<Utc> {
        // 2024-03-15 13:30:00 UTC
        Utc.with_ymd_and_hms(2024, 3, 15, 13, 30, 0).unwrap()
    }

    fn note(slug: &str, owner: &str, created_at: i64) -> Note {
        Note::new(slug, owner, "").unwrap().with_created_at(created_at)
    }

    fn slugs(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|note| note.slug.as_str()).collect()
    }

    #[test]
    fn boundaries_start_at_local_midnight() {
        let boundaries = DayBoundaries::from_now(&now());
        let midnight = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let ms = midnight.timestamp_millis();

        assert_eq!(boundaries.category_for(ms), Category::Today);
        assert_eq!(boundaries.category_for(ms - 1), Category::Yesterday);
        assert_eq!(boundaries.category_for(ms - DAY_MS), Category::Yesterday);
        assert_eq!(boundaries.category_for(ms - DAY_MS - 1), Category::Previous7Days);
        assert_eq!(boundaries.category_for(ms - 7 * DAY_MS), Category::Previous7Days);
        assert_eq!(boundaries.category_for(ms - 7 * DAY_MS - 1), Category::Previous30Days);
        assert_eq!(boundaries.category_for(ms - 30 * DAY_MS - 1), Category::Older);
    }

    #[test]
    fn boundaries_follow_local_midnight_across_dst_start() {
        // 2024-03-10 13:00 EDT, the day clocks sprang forward
        let now = Eastern2024.with_ymd_and_hms(2024, 3, 10, 13, 0, 0).unwrap();
        let boundaries = DayBoundaries::from_now(&now);

        let midnight = Eastern2024.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(
            midnight.naive_utc(),
            Eastern2024::utc(2024, 3, 10, 5)
        );
        let today = midnight.timestamp_millis();
        let late_saturday = Eastern2024
            .with_ymd_and_hms(2024, 3, 9, 23, 30, 0)
            .unwrap()
            .timestamp_millis();

        assert_eq!(boundaries.category_for(today), Category::Today);
        assert_eq!(boundaries.category_for(today - 1), Category::Yesterday);
        assert_eq!(boundaries.category_for(late_saturday), Category::Yesterday);
    }

    #[test]
    fn earlier_boundaries_are_calendar_midnights_across_dst_end() {
        // 2024-11-04 09:00 EST, the day after clocks fell back
        let now = Eastern2024.with_ymd_and_hms(2024, 11, 4, 9, 0, 0).unwrap();
        let boundaries = DayBoundaries::from_now(&now);

        let yesterday = Eastern2024
            .with_ymd_and_hms(2024, 11, 3, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        let week = Eastern2024
            .with_ymd_and_hms(2024, 10, 28, 0, 0, 0)
            .unwrap()
            .timestamp_millis();

        assert_eq!(boundaries.category_for(yesterday), Category::Yesterday);
        assert_eq!(boundaries.category_for(yesterday - 1), Category::Previous7Days);
        assert_eq!(boundaries.category_for(week), Category::Previous7Days);
        assert_eq!(boundaries.category_for(week - 1), Category::Previous30Days);
        // 25-hour Sunday: an instant one 24h day before today's midnight is still Sunday
        let today = Eastern2024
            .with_ymd_and_hms(2024, 11, 4, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(today - yesterday, DAY_MS + HOUR_MS);
        assert_eq!(boundaries.category_for(today - DAY_MS - 1), Category::Yesterday);
    }

    #[test]
    fn future_timestamps_count_as_today() {
        let boundaries = DayBoundaries::from_now(&now());
        let tomorrow = now().timestamp_millis() + DAY_MS;
        assert_eq!(boundaries.category_for(tomorrow), Category::Today);
    }

    #[test]
    fn groups_by_pin_then_recency() {
        let base = now().timestamp_millis();
        let notes = vec![
            note("today-note", "me", base - 60_000),
            note("old-note", "me", base - 90 * DAY_MS),
            note("pinned-note", "me", base - 2 * DAY_MS),
            note("week-note", "me", base - 3 * DAY_MS),
        ];
        let pinned = BTreeSet::from(["pinned-note".to_string()]);

        let grouped = group_notes(&notes, &pinned, "me", &now());

        assert_eq!(slugs(grouped.get(Category::Pinned)), vec!["pinned-note"]);
        assert_eq!(slugs(grouped.get(Category::Today)), vec!["today-note"]);
        assert_eq!(slugs(grouped.get(Category::Previous7Days)), vec!["week-note"]);
        assert_eq!(slugs(grouped.get(Category::Older)), vec!["old-note"]);
        assert!(grouped.get(Category::Yesterday).is_empty());
    }

    #[test]
    fn hides_other_sessions_private_notes() {
        let base = now().timestamp_millis();
        let notes = vec![
            note("mine", "me", base),
            note("theirs", "other", base),
            note("shared", "other", base).with_public(true),
        ];

        let grouped = group_notes(&notes, &BTreeSet::new(), "me", &now());
        let flat: Vec<&str> = grouped.flatten().iter().map(|n| n.slug.as_str()).collect();

        assert_eq!(grouped.len(), 2);
        assert!(flat.contains(&"mine"));
        assert!(flat.contains(&"shared"));
        assert!(!flat.contains(&"theirs"));
    }

    #[test]
    fn every_visible_note_lands_in_exactly_one_category() {
        let base = now().timestamp_millis();
        let notes: Vec<Note> = (0..40)
            .map(|i| {
                let owner = if i % 3 == 0 { "other" } else { "me" };
                note(&format!("n{i}"), owner, base - i * DAY_MS / 2).with_public(i % 5 == 0)
            })
            .collect();
        let pinned: BTreeSet<String> = ["n1", "n7", "n30"].iter().map(ToString::to_string).collect();

        let grouped = group_notes(&notes, &pinned, "me", &now());

        for visible in notes.iter().filter(|n| n.is_visible_to("me")) {
            let hits = Category::ALL
                .iter()
                .filter(|c| grouped.get(**c).iter().any(|n| n.slug == visible.slug))
                .count();
            assert_eq!(hits, 1, "{} listed {hits} times", visible.slug);
        }
        assert_eq!(grouped.len(), notes.iter().filter(|n| n.is_visible_to("me")).count());
    }

    #[test]
    fn sorts_newest_first_with_stable_ties() {
        let base = now().timestamp_millis();
        let notes = vec![
            note("a", "me", base - 3_000),
            note("b", "me", base - 1_000),
            note("c", "me", base - 3_000),
            note("d", "me", base - 2_000),
        ];

        let grouped = group_notes(&notes, &BTreeSet::new(), "me", &now());

        assert_eq!(slugs(grouped.get(Category::Today)), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn flatten_follows_category_order() {
        let base = now().timestamp_millis();
        let notes = vec![
            note("older", "me", base - 100 * DAY_MS),
            note("today", "me", base),
            note("pin", "me", base - 100 * DAY_MS),
        ];
        let pinned = BTreeSet::from(["pin".to_string()]);

        let grouped = group_notes(&notes, &pinned, "me", &now());
        let flat: Vec<&str> = grouped.flatten().iter().map(|n| n.slug.as_str()).collect();

        assert_eq!(flat, vec!["pin", "today", "older"]);
        assert_eq!(grouped.position("older"), Some(2));
        assert_eq!(grouped.category_of("pin"), Some(Category::Pinned));
    }

    #[test]
    fn remove_drops_slug_from_all_buckets() {
        let base = now().timestamp_millis();
        let notes = vec![note("a", "me", base), note("b", "me", base - 2 * DAY_MS)];
        let mut grouped = group_notes(&notes, &BTreeSet::new(), "me", &now());

        assert!(grouped.remove("b"));
        assert!(!grouped.remove("b"));
        assert_eq!(grouped.len(), 1);
        assert!(grouped.find("b").is_none());
    }

    #[test]
    fn iter_skips_empty_categories() {
        let notes = vec![note("a", "me", now().timestamp_millis())];
        let grouped = group_notes(&notes, &BTreeSet::new(), "me", &now());
        let categories: Vec<Category> = grouped.iter().map(|(c, _)| c).collect();
        assert_eq!(categories, vec![Category::Today]);
    }
}
