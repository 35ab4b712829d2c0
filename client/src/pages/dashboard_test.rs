use super::*;
use eventboard::models::EventStatus;

#[test]
fn tiles_follow_counts() {
    let stats: StatusCounts =
        [EventStatus::Pending, EventStatus::Approved, EventStatus::Approved, EventStatus::Rejected]
            .into_iter()
            .collect();
    assert_eq!(
        stat_tiles(&stats),
        [("Total Events", 4), ("Pending Review", 1), ("Published", 2), ("Rejected", 1)]
    );
}

#[test]
fn empty_dashboard_shows_zero_tiles() {
    assert!(stat_tiles(&StatusCounts::default()).iter().all(|(_, v)| *v == 0));
}
