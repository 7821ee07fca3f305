use super::weights::{Weights, TOTAL_POINTS};
use crate::domain::model::{ShiftMatch, ShiftPosting, Urgency, WorkerProfile};
use std::collections::HashSet;

pub const FALLBACK_REASON: &str = "Limited match with your profile";

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub weights: Weights,
    /// 超出通勤上限但在這個倍數內仍給部分分數
    pub distance_grace_ratio: f64,
    pub distance_grace_share: f64,
    /// 低於期望時薪下限的容許比例
    pub pay_grace_ratio: f64,
    pub pay_grace_share: f64,
    pub medium_urgency_share: f64,
    pub strong_rating: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            distance_grace_ratio: 1.5,
            distance_grace_share: 0.4,
            pay_grace_ratio: 0.10,
            pay_grace_share: 0.4,
            medium_urgency_share: 0.6,
            strong_rating: 4.5,
        }
    }
}

impl MatchingConfig {
    pub fn with_weights(weights: Weights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorScore {
    pub points: f64,
    pub reasons: Vec<String>,
}

impl FactorScore {
    fn zero() -> Self {
        Self::default()
    }

    fn new(points: f64, reason: impl Into<String>) -> Self {
        Self {
            points,
            reasons: vec![reason.into()],
        }
    }
}

/// 用預設配分計算所有班表的比對分數，順序與輸入相同
pub fn calculate_shift_matches<'a>(
    worker: &WorkerProfile,
    shifts: &'a [ShiftPosting],
) -> Vec<ShiftMatch<'a>> {
    ShiftScorer::new(MatchingConfig::default()).calculate_matches(worker, shifts)
}

pub struct ShiftScorer {
    config: MatchingConfig,
}

impl ShiftScorer {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn calculate_matches<'a>(
        &self,
        worker: &WorkerProfile,
        shifts: &'a [ShiftPosting],
    ) -> Vec<ShiftMatch<'a>> {
        shifts.iter().map(|shift| self.score(worker, shift)).collect()
    }

    pub fn score<'a>(&self, worker: &WorkerProfile, shift: &'a ShiftPosting) -> ShiftMatch<'a> {
        let factors = [
            self.score_credentials(worker, shift),
            self.score_distance(worker, shift),
            self.score_pay_rate(worker, shift),
            self.score_skills(worker, shift),
            self.score_shift_type(worker, shift),
            self.score_urgency(shift),
            self.score_rating(worker),
        ];

        let total: f64 = factors.iter().map(|f| f.points.max(0.0)).sum();
        let mut reasons: Vec<String> = factors.into_iter().flat_map(|f| f.reasons).collect();
        if reasons.is_empty() {
            reasons.push(FALLBACK_REASON.to_string());
        }

        ShiftMatch {
            shift,
            score: total.clamp(0.0, TOTAL_POINTS).round() as u8,
            reasons,
        }
    }

    fn score_credentials(&self, worker: &WorkerProfile, shift: &ShiftPosting) -> FactorScore {
        let weight = self.config.weights.credentials;
        let required = distinct(&shift.required_credentials);
        if required.is_empty() {
            return FactorScore::new(weight, "No specific credentials required");
        }

        // 只看證照；自填的技能由 score_skills 處理
        let held: HashSet<String> = worker.certifications.iter().map(|c| normalize(c)).collect();

        let matched: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| held.contains(&normalize(c)))
            .collect();
        if matched.is_empty() {
            return FactorScore::zero();
        }

        FactorScore::new(
            weight * matched.len() as f64 / required.len() as f64,
            format!("Certification match: {}", matched.join(", ")),
        )
    }

    fn score_distance(&self, worker: &WorkerProfile, shift: &ShiftPosting) -> FactorScore {
        let weight = self.config.weights.distance;
        let (Some(distance), Some(max)) = (shift.distance_miles, worker.preferences.max_distance_miles)
        else {
            return FactorScore::zero();
        };
        if !distance.is_finite() || distance < 0.0 || !max.is_finite() || max <= 0.0 {
            return FactorScore::zero();
        }

        if distance <= max {
            FactorScore::new(weight, format!("Within preferred distance ({:.1} mi)", distance))
        } else if distance <= max * self.config.distance_grace_ratio {
            FactorScore::new(
                weight * self.config.distance_grace_share,
                format!("Slightly beyond preferred distance ({:.1} mi)", distance),
            )
        } else {
            FactorScore::zero()
        }
    }

    fn score_pay_rate(&self, worker: &WorkerProfile, shift: &ShiftPosting) -> FactorScore {
        let weight = self.config.weights.pay_rate;
        let Some(range) = worker.preferences.pay_range else {
            return FactorScore::zero();
        };
        let rate = shift.hourly_rate;
        if !rate.is_finite() || range.min > range.max {
            return FactorScore::zero();
        }

        if range.contains(rate) {
            FactorScore::new(weight, format!("Pay rate within preferred range (${:.2}/hr)", rate))
        } else if rate > range.max {
            FactorScore::new(weight, format!("Pay rate above preferred range (${:.2}/hr)", rate))
        } else if rate >= range.min * (1.0 - self.config.pay_grace_ratio) {
            FactorScore::new(
                weight * self.config.pay_grace_share,
                format!("Pay rate slightly below preferred range (${:.2}/hr)", rate),
            )
        } else {
            FactorScore::zero()
        }
    }

    fn score_skills(&self, worker: &WorkerProfile, shift: &ShiftPosting) -> FactorScore {
        let weight = self.config.weights.skills;
        let wanted = distinct(&shift.preferred_skills);
        if wanted.is_empty() {
            return FactorScore::zero();
        }

        let skills: HashSet<String> = worker.skills.iter().map(|s| normalize(s)).collect();
        let matched: Vec<&str> = wanted
            .iter()
            .copied()
            .filter(|s| skills.contains(&normalize(s)))
            .collect();
        if matched.is_empty() {
            return FactorScore::zero();
        }

        FactorScore::new(
            weight * matched.len() as f64 / wanted.len() as f64,
            format!("Skill match: {}", matched.join(", ")),
        )
    }

    fn score_shift_type(&self, worker: &WorkerProfile, shift: &ShiftPosting) -> FactorScore {
        if worker
            .preferences
            .preferred_shift_types
            .contains(&shift.shift_type)
        {
            FactorScore::new(
                self.config.weights.shift_type,
                format!("Matches preferred shift type: {}", shift.shift_type),
            )
        } else {
            FactorScore::zero()
        }
    }

    fn score_urgency(&self, shift: &ShiftPosting) -> FactorScore {
        let weight = self.config.weights.urgency;
        match shift.urgency {
            Urgency::High => FactorScore::new(weight, "Urgent: high-priority shift"),
            Urgency::Medium => FactorScore::new(
                weight * self.config.medium_urgency_share,
                "Medium-priority shift",
            ),
            Urgency::Low => FactorScore::zero(),
        }
    }

    fn score_rating(&self, worker: &WorkerProfile) -> FactorScore {
        let Some(rating) = worker.stats.rating.filter(|r| r.is_finite()) else {
            return FactorScore::zero();
        };
        let rating = rating.clamp(0.0, 5.0);
        let points = self.config.weights.rating * rating / 5.0;

        if rating >= self.config.strong_rating {
            FactorScore::new(points, format!("Strong performance history (rating {:.1}/5)", rating))
        } else {
            FactorScore {
                points,
                reasons: Vec::new(),
            }
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// 去除空白與重複（不分大小寫），保留原順序
fn distinct(values: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Location, PayRange, ShiftStatus, ShiftType, WorkerPreferences, WorkerStats,
    };
    use chrono::{TimeZone, Utc};

    fn worker() -> WorkerProfile {
        WorkerProfile {
            id: "w-1".to_string(),
            name: "Dana Reyes".to_string(),
            certifications: vec!["CPR Certification".to_string(), "First Aid".to_string()],
            skills: vec!["Medication Administration".to_string()],
            years_experience: 4.0,
            preferences: WorkerPreferences {
                max_distance_miles: Some(25.0),
                pay_range: Some(PayRange { min: 20.0, max: 35.0 }),
                preferred_shift_types: vec![ShiftType::Overnight],
            },
            ..Default::default()
        }
    }

    fn shift(id: &str) -> ShiftPosting {
        ShiftPosting {
            id: id.to_string(),
            title: "Residential support".to_string(),
            client_name: "Maple House".to_string(),
            starts_at: Utc.with_ymd_and_hms(2026, 10, 20, 22, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 10, 21, 6, 0, 0).unwrap(),
            location: Location::default(),
            address: "12 Elm St".to_string(),
            hourly_rate: 24.0,
            shift_type: ShiftType::Day,
            required_credentials: vec!["CPR Certification".to_string(), "First Aid".to_string()],
            preferred_skills: Vec::new(),
            urgency: Urgency::Low,
            distance_miles: Some(2.5),
            status: ShiftStatus::Open,
        }
    }

    #[test]
    fn test_reference_scenario_scores_high() {
        let shifts = vec![shift("s-1")];
        let matches = calculate_shift_matches(&worker(), &shifts);

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert!(m.score >= 80, "score was {}", m.score);
        assert!(m
            .reasons
            .iter()
            .any(|r| r == "Certification match: CPR Certification, First Aid"));
        assert!(m
            .reasons
            .iter()
            .any(|r| r.starts_with("Within preferred distance")));
        assert_eq!(m.shift.id, "s-1");
    }

    #[test]
    fn test_full_match_reaches_maximum() {
        let mut worker = worker();
        worker.stats = WorkerStats {
            rating: Some(5.0),
            ..Default::default()
        };
        let mut perfect = shift("s-1");
        perfect.shift_type = ShiftType::Overnight;
        perfect.urgency = Urgency::High;
        perfect.preferred_skills = vec!["medication administration".to_string()];

        let shifts = vec![perfect];
        let matches = calculate_shift_matches(&worker, &shifts);
        assert_eq!(matches[0].score, 100);
    }

    #[test]
    fn test_empty_shift_list() {
        assert!(calculate_shift_matches(&worker(), &[]).is_empty());
    }

    #[test]
    fn test_missing_preferences_contribute_nothing() {
        let bare = WorkerProfile {
            id: "w-2".to_string(),
            ..Default::default()
        };
        let mut s = shift("s-1");
        s.required_credentials = vec!["CPR Certification".to_string()];

        let shifts = vec![s];
        let matches = calculate_shift_matches(&bare, &shifts);
        assert_eq!(matches[0].score, 0);
        assert_eq!(matches[0].reasons, vec![FALLBACK_REASON]);
    }

    #[test]
    fn test_no_requirements_earns_credential_points() {
        let bare = WorkerProfile::default();
        let mut s = shift("s-1");
        s.required_credentials = vec!["  ".to_string()];

        let shifts = vec![s];
        let matches = calculate_shift_matches(&bare, &shifts);
        assert_eq!(matches[0].score, 35);
        assert_eq!(matches[0].reasons, vec!["No specific credentials required"]);
    }

    #[test]
    fn test_reasons_follow_factor_order() {
        let mut w = worker();
        w.stats.rating = Some(4.9);
        let mut s = shift("s-1");
        s.urgency = Urgency::High;
        s.shift_type = ShiftType::Overnight;

        let shifts = vec![s];
        let reasons = &calculate_shift_matches(&w, &shifts)[0].reasons;
        assert_eq!(
            reasons,
            &vec![
                "Certification match: CPR Certification, First Aid".to_string(),
                "Within preferred distance (2.5 mi)".to_string(),
                "Pay rate within preferred range ($24.00/hr)".to_string(),
                "Matches preferred shift type: overnight".to_string(),
                "Urgent: high-priority shift".to_string(),
                "Strong performance history (rating 4.9/5)".to_string(),
            ]
        );
    }

    #[test]
    fn test_credential_overlap_is_monotonic() {
        let w = worker();
        let mut none = w.clone();
        none.certifications.clear();
        none.skills.clear();
        let mut partial = w.clone();
        partial.certifications = vec!["CPR Certification".to_string()];

        let shifts = vec![shift("s-1")];
        let full_score = calculate_shift_matches(&w, &shifts)[0].score;
        let partial_score = calculate_shift_matches(&partial, &shifts)[0].score;
        let none_score = calculate_shift_matches(&none, &shifts)[0].score;

        assert!(none_score < partial_score);
        assert!(partial_score < full_score);
    }

    #[test]
    fn test_skill_does_not_count_as_credential() {
        let mut w = worker();
        w.certifications.clear();
        w.skills = vec!["First Aid".to_string()];
        let mut s = shift("s-1");
        s.required_credentials = vec!["First Aid".to_string()];
        s.preferred_skills = vec!["First Aid".to_string()];

        let scorer = ShiftScorer::new(MatchingConfig::default());
        assert_eq!(scorer.score_credentials(&w, &s), FactorScore::zero());

        let shifts = vec![s];
        let m = &calculate_shift_matches(&w, &shifts)[0];
        assert!(!m.reasons.iter().any(|r| r.starts_with("Certification match")));
        assert!(m.reasons.iter().any(|r| r == "Skill match: First Aid"));
        // 距離 25 + 時薪 20 + 技能 5
        assert_eq!(m.score, 50);
    }

    #[test]
    fn test_skill_overlap_is_monotonic() {
        let mut s = shift("s-1");
        s.preferred_skills = vec![
            "Medication Administration".to_string(),
            "Behavior Support".to_string(),
        ];
        let mut none = worker();
        none.skills.clear();
        let partial = worker();
        let mut full = worker();
        full.skills.push("behavior support".to_string());

        let scorer = ShiftScorer::new(MatchingConfig::default());
        let none_points = scorer.score_skills(&none, &s).points;
        let partial_points = scorer.score_skills(&partial, &s).points;
        let full_points = scorer.score_skills(&full, &s).points;

        assert_eq!(none_points, 0.0);
        assert!(none_points < partial_points);
        assert!(partial_points < full_points);
        assert_eq!(full_points, 5.0);

        let shifts = vec![s];
        let none_score = calculate_shift_matches(&none, &shifts)[0].score;
        let full_score = calculate_shift_matches(&full, &shifts)[0].score;
        assert!(none_score < full_score);
    }

    #[test]
    fn test_shift_type_preference_is_monotonic() {
        let mut s = shift("s-1");
        s.shift_type = ShiftType::Overnight;
        let mut indifferent = worker();
        indifferent.preferences.preferred_shift_types.clear();
        let preferring = worker();

        let scorer = ShiftScorer::new(MatchingConfig::default());
        assert_eq!(scorer.score_shift_type(&indifferent, &s).points, 0.0);
        assert_eq!(scorer.score_shift_type(&preferring, &s).points, 5.0);

        let shifts = vec![s];
        let without = calculate_shift_matches(&indifferent, &shifts)[0].score;
        let with = calculate_shift_matches(&preferring, &shifts)[0].score;
        assert!(without < with);
    }

    #[test]
    fn test_credentials_compare_case_insensitively() {
        let mut w = worker();
        w.certifications = vec!["  cpr certification ".to_string(), "FIRST AID".to_string()];
        let shifts = vec![shift("s-1")];
        let scorer = ShiftScorer::new(MatchingConfig::default());
        let factor = scorer.score_credentials(&w, &shifts[0]);
        assert_eq!(factor.points, 35.0);
    }

    #[test]
    fn test_distance_tiers() {
        let scorer = ShiftScorer::new(MatchingConfig::default());
        let w = worker();
        let mut s = shift("s-1");

        s.distance_miles = Some(25.0);
        assert_eq!(scorer.score_distance(&w, &s).points, 25.0);

        s.distance_miles = Some(30.0);
        let near = scorer.score_distance(&w, &s);
        assert!((near.points - 10.0).abs() < 1e-9);
        assert_eq!(near.reasons, vec!["Slightly beyond preferred distance (30.0 mi)"]);

        s.distance_miles = Some(60.0);
        assert_eq!(scorer.score_distance(&w, &s).points, 0.0);

        s.distance_miles = None;
        assert_eq!(scorer.score_distance(&w, &s), FactorScore::zero());
    }

    #[test]
    fn test_pay_rate_tiers() {
        let scorer = ShiftScorer::new(MatchingConfig::default());
        let w = worker();
        let mut s = shift("s-1");

        s.hourly_rate = 40.0;
        let above = scorer.score_pay_rate(&w, &s);
        assert_eq!(above.points, 20.0);
        assert_eq!(above.reasons, vec!["Pay rate above preferred range ($40.00/hr)"]);

        s.hourly_rate = 18.5;
        assert!((scorer.score_pay_rate(&w, &s).points - 8.0).abs() < 1e-9);

        s.hourly_rate = 12.0;
        assert_eq!(scorer.score_pay_rate(&w, &s).points, 0.0);
    }

    #[test]
    fn test_urgency_and_rating_bonuses() {
        let scorer = ShiftScorer::new(MatchingConfig::default());
        let mut s = shift("s-1");
        s.urgency = Urgency::Medium;
        assert!((scorer.score_urgency(&s).points - 3.0).abs() < 1e-9);

        let mut w = worker();
        w.stats.rating = Some(4.8);
        let rating = scorer.score_rating(&w);
        assert!((rating.points - 4.8).abs() < 1e-9);
        assert_eq!(rating.reasons, vec!["Strong performance history (rating 4.8/5)"]);

        w.stats.rating = Some(9.0);
        assert_eq!(scorer.score_rating(&w).points, 5.0);
    }

    #[test]
    fn test_score_stays_in_bounds_with_oversized_weights() {
        let weights = Weights {
            credentials: 90.0,
            distance: 90.0,
            ..Weights::default()
        };
        let scorer = ShiftScorer::new(MatchingConfig::with_weights(weights));
        let shifts = vec![shift("s-1")];
        let matches = scorer.calculate_matches(&worker(), &shifts);
        assert_eq!(matches[0].score, 100);
    }

    #[test]
    fn test_does_not_mutate_inputs() {
        let w = worker();
        let shifts = vec![shift("s-1"), shift("s-2")];
        let before = (w.clone(), shifts.clone());
        let matches = calculate_shift_matches(&w, &shifts);
        assert_eq!(matches.len(), 2);
        assert_eq!((w, shifts), before);
    }
}
