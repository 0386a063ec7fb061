use crate::{JobPosting, SearchRequest};

pub const DEFAULT_ROLES: &str = "Data Scientist, ML Engineer";
pub const DEFAULT_LOCATIONS: &str = "Remote, Bengaluru, Hyderabad";
pub const DEFAULT_KEYWORDS: &str = "Python, NLP, AWS";
pub const DEFAULT_MIN_SCORE: u8 = 70;
pub const MAX_SCORE: u8 = 100;

/// Free-text search filters as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    pub roles_text: String,
    pub locations_text: String,
    pub keywords_text: String,
    min_score: u8,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            roles_text: DEFAULT_ROLES.to_string(),
            locations_text: DEFAULT_LOCATIONS.to_string(),
            keywords_text: DEFAULT_KEYWORDS.to_string(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl SearchFilters {
    pub fn min_score(&self) -> u8 {
        self.min_score
    }

    pub fn set_min_score(&mut self, value: u8) {
        self.min_score = value.min(MAX_SCORE);
    }

    pub fn with_min_score(mut self, value: u8) -> Self {
        self.set_min_score(value);
        self
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            roles: split_list(&self.roles_text),
            locations: split_list(&self.locations_text),
            keywords: split_list(&self.keywords_text),
            min_score: self.min_score,
        }
    }
}

/// Splits comma-separated text, trimming entries and dropping empty ones.
/// Empty input yields an empty list, meaning "no filter".
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Display filter applied on top of the backend's own threshold.
pub fn filter_by_min_score(jobs: &[JobPosting], min_score: u8) -> Vec<&JobPosting> {
    let threshold = f64::from(min_score);
    jobs.iter()
        .filter(|job| job.score * 100.0 >= threshold)
        .collect()
}

/// Score as a whole percentage for display.
pub fn fit_percent(score: f64) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str, score: f64) -> JobPosting {
        let mut job = JobPosting::new("Role", "Co", url);
        job.score = score;
        job
    }

    #[test]
    fn split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list("Data Scientist,  ML Engineer"),
            vec!["Data Scientist".to_string(), "ML Engineer".to_string()]
        );
        assert_eq!(split_list(" , ,,"), Vec::<String>::new());
        assert_eq!(split_list(""), Vec::<String>::new());
    }

    #[test]
    fn min_score_filter_keeps_jobs_at_or_above_threshold() {
        let jobs = vec![job("a", 0.65), job("b", 0.80)];
        let kept: Vec<_> = filter_by_min_score(&jobs, 70)
            .into_iter()
            .map(|j| j.url.as_str())
            .collect();
        assert_eq!(kept, vec!["b"]);
    }

    #[test]
    fn zero_threshold_keeps_everything() {
        let jobs = vec![job("a", 0.0), job("b", 1.0)];
        assert_eq!(filter_by_min_score(&jobs, 0).len(), 2);
    }

    #[test]
    fn min_score_is_clamped() {
        let filters = SearchFilters::default().with_min_score(250);
        assert_eq!(filters.min_score(), 100);
    }

    #[test]
    fn request_uses_split_lists() {
        let filters = SearchFilters {
            roles_text: "Data Scientist,  ML Engineer".into(),
            locations_text: String::new(),
            keywords_text: "Rust".into(),
            ..SearchFilters::default()
        };
        let request = filters.to_request();
        assert_eq!(request.roles, vec!["Data Scientist", "ML Engineer"]);
        assert!(request.locations.is_empty());
        assert_eq!(request.keywords, vec!["Rust"]);
        assert_eq!(request.min_score, DEFAULT_MIN_SCORE);
    }

    #[test]
    fn fit_percent_rounds() {
        assert_eq!(fit_percent(0.654), 65);
        assert_eq!(fit_percent(0.8), 80);
        assert_eq!(fit_percent(1.4), 100);
    }
}
