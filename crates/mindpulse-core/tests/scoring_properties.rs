//! Property tests for the scoring formulas.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use mindpulse_core::metrics::focus;
use mindpulse_core::progress::mind_score::{self, MindScoreState, MAX_SCORE, MIN_SCORE};
use mindpulse_core::progress::momentum::MomentumState;
use mindpulse_core::progress::xp::{level, progress_pct, xp_for_level};
use mindpulse_core::progress::StreakState;
use mindpulse_core::{CheckInEntry, CheckInWindow};
use proptest::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

/// One optional reading per day; `None` is a missed day.
fn arb_days() -> impl Strategy<Value = Vec<Option<(i64, i64, i64)>>> {
    prop::collection::vec(prop::option::of((0i64..=100, 0i64..=100, 0i64..=100)), 1..120)
}

fn entries_for(days: &[Option<(i64, i64, i64)>]) -> Vec<CheckInEntry> {
    days.iter()
        .enumerate()
        .filter_map(|(i, reading)| {
            let (e, c, m) = (*reading)?;
            let day = start() + Duration::days(i as i64 + 1);
            let at = Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
            Some(CheckInEntry::new(e, c, m, CheckInWindow::CheckIn2, at))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_focus_matches_weighting(clarity in 0i64..=100, energy in 0i64..=100) {
        let expected = (0.6 * clarity as f64 + 0.4 * energy as f64).round() as i64;
        prop_assert_eq!(focus(clarity, energy), expected);
        prop_assert!((0..=100).contains(&focus(clarity, energy)));
    }

    #[test]
    fn prop_mind_score_stays_clamped(
        days in arb_days(),
        initial in MIN_SCORE..=MAX_SCORE,
        streak in 0u32..30,
    ) {
        let history = entries_for(&days);
        let state = MindScoreState { date: start(), value: initial };
        let today = start() + Duration::days(days.len() as i64 + 1);

        let (next, processed) = mind_score::walk(state, &history, today, streak, 0);
        prop_assert_eq!(processed as usize, days.len());
        prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&next.value));
        prop_assert_eq!(next.date, today);

        // A second walk on the same day has nothing left to do.
        let (again, processed) = mind_score::walk(next, &history, today, streak, 0);
        prop_assert_eq!(processed, 0);
        prop_assert_eq!(again, next);
    }

    #[test]
    fn prop_momentum_gap_formula(value in 0.0f64..=100.0, gap in 0i64..30) {
        let state = MomentumState { value, last: start() };
        let next = state.boosted(start() + Duration::days(gap));
        let expected = ((value - 20.0 * gap as f64).max(0.0) + 34.0).min(100.0);
        prop_assert_eq!(next.value, expected);
    }

    #[test]
    fn prop_level_round_trip(lvl in 1u32..2000) {
        let xp = xp_for_level(lvl);
        prop_assert_eq!(level(xp), lvl);
        prop_assert_eq!(xp_for_level(level(xp)), xp);
        prop_assert_eq!(progress_pct(xp), 0);
        if xp > 0 {
            prop_assert_eq!(level(xp - 1), lvl - 1);
        }
    }

    #[test]
    fn prop_streak_never_exceeds_longest(gaps in prop::collection::vec(0i64..4, 1..60)) {
        let mut state = StreakState::default();
        let mut day = start();
        for gap in gaps {
            day += Duration::days(gap);
            state = state.advance(day);
            prop_assert!(state.current >= 1);
            prop_assert!(state.current <= state.longest);
            prop_assert_eq!(state.last_check_in, Some(day));
        }
    }
}

#[test]
fn test_streak_examples() {
    let today = start() + Duration::days(10);
    let yesterday = StreakState {
        last_check_in: Some(today - Duration::days(1)),
        current: 4,
        longest: 4,
    };
    let next = yesterday.advance(today);
    assert_eq!(next.current, 5);
    assert_eq!(next.longest, 5);

    let stale = StreakState {
        last_check_in: Some(today - Duration::days(3)),
        current: 4,
        longest: 9,
    };
    let next = stale.advance(today);
    assert_eq!(next.current, 1);
    assert_eq!(next.longest, 9);
}

#[test]
fn test_level_scenario() {
    assert_eq!(level(0), 1);
    assert_eq!(progress_pct(0), 0);
    assert_eq!(level(15), 2);
}
