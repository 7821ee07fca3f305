//! In-memory filtering for the shift browser and the DSP approval queue.
//!
//! Both operate on records already loaded from the API; nothing here
//! touches the network.

use crate::domain::model::{ShiftPosting, ShiftType, Urgency};
use crate::domain::records::{ApplicationStatus, DspApplication};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftSort {
    #[default]
    StartTime,
    RateDesc,
    DistanceAsc,
    UrgencyDesc,
}

#[derive(Debug, Clone, Default)]
pub struct ShiftQuery {
    pub search: Option<String>,
    pub shift_type: Option<ShiftType>,
    pub urgency: Option<Urgency>,
    pub min_rate: Option<f64>,
    pub max_distance: Option<f64>,
    pub sort: ShiftSort,
}

impl ShiftQuery {
    pub fn matches(&self, shift: &ShiftPosting) -> bool {
        if let Some(needle) = normalized_search(&self.search) {
            let haystacks = [
                shift.title.as_str(),
                shift.client_name.as_str(),
                shift.location.city.as_str(),
                shift.location.state.as_str(),
                shift.address.as_str(),
            ];
            if !haystacks
                .iter()
                .any(|h| h.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        if let Some(shift_type) = &self.shift_type {
            if &shift.shift_type != shift_type {
                return false;
            }
        }
        if let Some(urgency) = self.urgency {
            if shift.urgency != urgency {
                return false;
            }
        }
        if let Some(min_rate) = self.min_rate {
            if shift.hourly_rate < min_rate {
                return false;
            }
        }
        if let Some(max_distance) = self.max_distance {
            // 距離未知的班表不算在範圍內
            match shift.distance_miles {
                Some(d) if d <= max_distance => {}
                _ => return false,
            }
        }
        true
    }

    pub fn apply<'a>(&self, shifts: &'a [ShiftPosting]) -> Vec<&'a ShiftPosting> {
        let mut result: Vec<&ShiftPosting> = shifts.iter().filter(|s| self.matches(s)).collect();
        match self.sort {
            ShiftSort::StartTime => result.sort_by_key(|s| s.starts_at),
            ShiftSort::RateDesc => result.sort_by(|a, b| {
                b.hourly_rate
                    .partial_cmp(&a.hourly_rate)
                    .unwrap_or(Ordering::Equal)
            }),
            ShiftSort::DistanceAsc => result.sort_by(|a, b| compare_distance(a, b)),
            ShiftSort::UrgencyDesc => result.sort_by(|a, b| b.urgency.cmp(&a.urgency)),
        }
        result
    }
}

fn compare_distance(a: &ShiftPosting, b: &ShiftPosting) -> Ordering {
    match (a.distance_miles, b.distance_miles) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
    pub flagged_only: bool,
    pub search: Option<String>,
}

impl ApplicationQuery {
    pub fn matches(&self, application: &DspApplication) -> bool {
        if let Some(status) = self.status {
            if application.status != status {
                return false;
            }
        }
        if self.flagged_only && !application.is_flagged() {
            return false;
        }
        if let Some(needle) = normalized_search(&self.search) {
            let name = application.applicant_name.to_lowercase();
            let email = application.email.to_lowercase();
            if !name.contains(&needle) && !email.contains(&needle) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, applications: &'a [DspApplication]) -> Vec<&'a DspApplication> {
        applications.iter().filter(|a| self.matches(a)).collect()
    }
}

fn normalized_search(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}
