use crate::domain::model::{RankedShift, ShiftMatch};

/// 保留分數 >= `min_score` 的結果，分數由高到低，最多 `limit` 筆
///
/// 排序是穩定的：同分時維持輸入順序。
pub fn get_top_matches<'a>(
    matches: Vec<ShiftMatch<'a>>,
    min_score: u8,
    limit: usize,
) -> Vec<ShiftMatch<'a>> {
    let mut kept: Vec<ShiftMatch<'a>> = matches
        .into_iter()
        .filter(|m| m.score >= min_score)
        .collect();
    kept.sort_by(|a, b| b.score.cmp(&a.score));
    kept.truncate(limit);
    kept
}

pub fn to_ranked(matches: &[ShiftMatch<'_>]) -> Vec<RankedShift> {
    matches
        .iter()
        .enumerate()
        .map(|(index, m)| RankedShift {
            rank: index + 1,
            shift: m.shift.clone(),
            score: m.score,
            reasons: m.reasons.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Location, ShiftPosting, ShiftStatus, ShiftType, Urgency};
    use chrono::{TimeZone, Utc};

    fn shift(id: &str) -> ShiftPosting {
        ShiftPosting {
            id: id.to_string(),
            title: format!("Shift {}", id),
            client_name: String::new(),
            starts_at: Utc.with_ymd_and_hms(2026, 11, 2, 8, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 11, 2, 16, 0, 0).unwrap(),
            location: Location::default(),
            address: String::new(),
            hourly_rate: 22.0,
            shift_type: ShiftType::Day,
            required_credentials: Vec::new(),
            preferred_skills: Vec::new(),
            urgency: Urgency::Low,
            distance_miles: None,
            status: ShiftStatus::Open,
        }
    }

    fn scored<'a>(shifts: &'a [ShiftPosting], scores: &[u8]) -> Vec<ShiftMatch<'a>> {
        shifts
            .iter()
            .zip(scores)
            .map(|(shift, &score)| ShiftMatch {
                shift,
                score,
                reasons: vec!["test".to_string()],
            })
            .collect()
    }

    #[test]
    fn test_filters_sorts_and_truncates() {
        let shifts: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|id| shift(id)).collect();
        let matches = scored(&shifts, &[55, 92, 70, 88, 40]);

        let top = get_top_matches(matches, 60, 2);
        let ids: Vec<&str> = top.iter().map(|m| m.shift.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let shifts: Vec<_> = ["a", "b", "c", "d"].iter().map(|id| shift(id)).collect();
        let matches = scored(&shifts, &[70, 85, 70, 85]);

        let top = get_top_matches(matches, 0, 10);
        let ids: Vec<&str> = top.iter().map(|m| m.shift.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_properties_hold_for_mixed_scores() {
        let shifts: Vec<_> = (0..20).map(|i| shift(&i.to_string())).collect();
        let scores: Vec<u8> = (0..20).map(|i| ((i * 37) % 101) as u8).collect();

        for (min_score, limit) in [(0, 5), (50, 3), (90, 10), (100, 1)] {
            let top = get_top_matches(scored(&shifts, &scores), min_score, limit);
            assert!(top.len() <= limit);
            assert!(top.iter().all(|m| m.score >= min_score));
            assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_empty_and_zero_limit() {
        assert!(get_top_matches(Vec::new(), 0, 5).is_empty());

        let shifts = vec![shift("a")];
        assert!(get_top_matches(scored(&shifts, &[99]), 0, 0).is_empty());
    }

    #[test]
    fn test_to_ranked_numbers_from_one() {
        let shifts = vec![shift("a"), shift("b")];
        let ranked = to_ranked(&get_top_matches(scored(&shifts, &[60, 90]), 0, 5));
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].shift.id, "b");
        assert_eq!(ranked[1].rank, 2);
    }
}
