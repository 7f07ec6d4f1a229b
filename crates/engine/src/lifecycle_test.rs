#[cfg(test)]
mod tests {
    use crate::lifecycle::{resolve_existing, window_contains};
    use chrono::{DateTime, TimeZone, Utc};
    use common::models::{Season, SeasonProgress};
    use common::Error;
    use uuid::Uuid;

    fn make_season(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Season {
        Season {
            id: Uuid::new_v4(),
            title: "January Trivia".to_string(),
            starts_at,
            ends_at,
            created_at: starts_at,
        }
    }

    fn make_progress(is_completed: bool) -> SeasonProgress {
        let started = Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap();
        SeasonProgress {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            season_id: Uuid::new_v4(),
            is_completed,
            started_at: started,
            ended_at: is_completed.then(|| started + chrono::Duration::hours(1)),
        }
    }

    fn january_season() -> Season {
        make_season(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap(),
        )
    }

    #[test]
    fn window_rejects_day_after_end() {
        let season = january_season();
        let feb_first = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        assert!(!window_contains(&season, feb_first));
    }

    #[test]
    fn window_accepts_final_second() {
        let season = january_season();
        let last_moment = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        assert!(window_contains(&season, last_moment));
    }

    #[test]
    fn window_is_inclusive_at_start() {
        let season = january_season();
        assert!(window_contains(&season, season.starts_at));
    }

    #[test]
    fn window_rejects_before_start() {
        let season = january_season();
        let too_early = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert!(!window_contains(&season, too_early));
    }

    #[test]
    fn open_participation_makes_start_idempotent() {
        let progress = make_progress(false);
        let id = progress.id;
        let resolved = resolve_existing(progress).expect("open participation is returned as-is");
        assert_eq!(resolved.id, id);
        assert!(!resolved.is_completed);
    }

    #[test]
    fn completed_participation_refuses_restart() {
        let progress = make_progress(true);
        match resolve_existing(progress) {
            Err(Error::Conflict(_)) => {}
            other => panic!("expected Conflict, got {:?}", other.map(|p| p.id)),
        }
    }
}
