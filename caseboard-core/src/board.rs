//! Bucket grouping for the deadline board.
//!
//! [`group_and_sort`] classifies a snapshot of cases, groups them in fixed
//! bucket order and sorts each bucket by due day. Ties keep input order.
//! The same groups feed the summary tiles ([`BoardSummary`]) and the flat
//! render sequence ([`flatten`]).

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::CaseSummary;
use crate::urgency::{classify, Bucket, UrgencyInfo};

/// A case paired with its urgency for this pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCase {
    pub case: CaseSummary,
    #[serde(rename = "urgencyInfo")]
    pub urgency: UrgencyInfo,
}

/// One non-empty bucket and its ordered cases.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardGroup {
    pub bucket: Bucket,
    pub cases: Vec<ClassifiedCase>,
}

impl BoardGroup {
    /// Number of cases in the group.
    pub fn count(&self) -> usize {
        self.cases.len()
    }
}

impl Serialize for BoardGroup {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("BoardGroup", 4)?;
        s.serialize_field("bucketKey", self.bucket.key())?;
        s.serialize_field("bucketLabel", self.bucket.title())?;
        s.serialize_field("count", &self.count())?;
        s.serialize_field("cases", &self.cases)?;
        s.end()
    }
}

/// Aggregate counts for the summary tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub overdue_count: usize,
    pub today_count: usize,
    pub week_count: usize,
    pub total_count: usize,
}

impl BoardSummary {
    /// Tally counts from grouped output.
    pub fn from_groups(groups: &[BoardGroup]) -> Self {
        let count_of = |bucket: Bucket| {
            groups
                .iter()
                .find(|g| g.bucket == bucket)
                .map_or(0, BoardGroup::count)
        };

        Self {
            overdue_count: count_of(Bucket::Overdue),
            today_count: count_of(Bucket::Today),
            week_count: count_of(Bucket::Week),
            total_count: groups.iter().map(BoardGroup::count).sum(),
        }
    }
}

/// Classify, group and sort a snapshot of cases.
///
/// Groups come out in [`Bucket::ALL`] order with empty buckets omitted.
/// Within a group, cases are ordered by sort key, then by day difference;
/// anything still tied keeps its input order.
pub fn group_and_sort(cases: &[CaseSummary], today: NaiveDate) -> Vec<BoardGroup> {
    let mut by_bucket: [Vec<ClassifiedCase>; 6] = Default::default();

    for case in cases {
        let urgency = classify(case, today);
        by_bucket[bucket_index(urgency.bucket)].push(ClassifiedCase {
            case: case.clone(),
            urgency,
        });
    }

    Bucket::ALL
        .into_iter()
        .zip(by_bucket)
        .filter(|(_, cases)| !cases.is_empty())
        .map(|(bucket, mut cases)| {
            // sort_by_key is stable, so equal keys keep input order
            cases.sort_by_key(|c| (c.urgency.sort_key, c.urgency.diff_days));
            BoardGroup { bucket, cases }
        })
        .collect()
}

/// Flatten groups into the board's render sequence.
pub fn flatten(groups: &[BoardGroup]) -> Vec<ClassifiedCase> {
    groups.iter().flat_map(|g| g.cases.iter().cloned()).collect()
}

fn bucket_index(bucket: Bucket) -> usize {
    match bucket {
        Bucket::Overdue => 0,
        Bucket::Today => 1,
        Bucket::Week => 2,
        Bucket::Next => 3,
        Bucket::Later => 4,
        Bucket::NoDue => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn due_in(id: &str, days: i64) -> CaseSummary {
        let due = today() + Duration::days(days);
        CaseSummary::new(id).with_next_due(due.format("%Y-%m-%d").to_string())
    }

    fn ids(cases: &[ClassifiedCase]) -> Vec<&str> {
        cases.iter().map(|c| c.case.id.as_str()).collect()
    }

    #[test]
    fn test_one_case_per_bucket() {
        let cases = vec![
            due_in("later", 10),
            CaseSummary::new("none"),
            due_in("next", 5),
            due_in("week", 2),
            due_in("today", 0),
            due_in("overdue", -3),
        ];

        let groups = group_and_sort(&cases, today());
        let buckets: Vec<Bucket> = groups.iter().map(|g| g.bucket).collect();

        assert_eq!(buckets, Bucket::ALL.to_vec());
        assert!(groups.iter().all(|g| g.count() == 1));
        assert_eq!(ids(&groups[2].cases), vec!["week"]);
        assert_eq!(ids(&groups[3].cases), vec!["next"]);
    }

    #[test]
    fn test_empty_buckets_are_omitted() {
        let cases = vec![CaseSummary::new("a"), due_in("b", -1), due_in("c", 30)];
        let groups = group_and_sort(&cases, today());
        let buckets: Vec<Bucket> = groups.iter().map(|g| g.bucket).collect();

        assert_eq!(buckets, vec![Bucket::Overdue, Bucket::Later, Bucket::NoDue]);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(group_and_sort(&[], today()).is_empty());
        assert_eq!(BoardSummary::from_groups(&[]), BoardSummary::default());
    }

    #[test]
    fn test_every_case_lands_once() {
        let cases: Vec<CaseSummary> = (-12..12)
            .map(|d| due_in(&format!("c{d}"), d))
            .chain([
                CaseSummary::new("blank").with_next_due(""),
                CaseSummary::new("garbage").with_next_due("soon"),
            ])
            .collect();

        let groups = group_and_sort(&cases, today());
        let flat = flatten(&groups);

        assert_eq!(flat.len(), cases.len());
        let out: HashSet<&str> = flat.iter().map(|c| c.case.id.as_str()).collect();
        let input: HashSet<&str> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(out, input);
    }

    #[test]
    fn test_sorted_within_bucket() {
        let cases = vec![due_in("d-1", -1), due_in("d-9", -9), due_in("d-4", -4)];
        let groups = group_and_sort(&cases, today());

        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0].cases), vec!["d-9", "d-4", "d-1"]);
    }

    #[test]
    fn test_same_day_keeps_input_order() {
        let cases = vec![
            due_in("second-listed-first", 5),
            CaseSummary::new("same-day-time").with_next_due("2024-06-15T17:00:00"),
            due_in("earlier", 4),
            due_in("third", 5),
        ];
        let groups = group_and_sort(&cases, today());

        assert_eq!(
            ids(&groups[0].cases),
            vec!["earlier", "second-listed-first", "same-day-time", "third"]
        );

        let undated = vec![CaseSummary::new("z"), CaseSummary::new("a"), CaseSummary::new("m")];
        let groups = group_and_sort(&undated, today());
        assert_eq!(ids(&groups[0].cases), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let cases = vec![due_in("a", 3), due_in("b", -2), CaseSummary::new("c"), due_in("d", 3)];
        assert_eq!(group_and_sort(&cases, today()), group_and_sort(&cases, today()));
    }

    #[test]
    fn test_summary_counts() {
        let cases = vec![
            due_in("o1", -2),
            due_in("o2", -1),
            due_in("t", 0),
            due_in("w1", 1),
            due_in("w2", 3),
            due_in("n", 6),
            CaseSummary::new("x"),
        ];
        let summary = BoardSummary::from_groups(&group_and_sort(&cases, today()));

        assert_eq!(
            summary,
            BoardSummary {
                overdue_count: 2,
                today_count: 1,
                week_count: 2,
                total_count: 7,
            }
        );
    }

    #[test]
    fn test_group_serializes_render_shape() {
        let groups = group_and_sort(&[due_in("a", -3)], today());
        let value = serde_json::to_value(&groups[0]).unwrap();

        assert_eq!(value["bucketKey"], "overdue");
        assert_eq!(value["bucketLabel"], "Overdue");
        assert_eq!(value["count"], 1);
        assert_eq!(value["cases"][0]["case"]["id"], "a");
        assert_eq!(value["cases"][0]["urgencyInfo"]["label"], "3 days overdue");
        assert_eq!(value["cases"][0]["urgencyInfo"]["bucket"], "overdue");
    }
}
