use crate::data::application::Application;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the global filter query is matched against a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Contains,
    Fuzzy,
    Regex,
}

impl std::str::FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(FilterMode::Contains),
            "fuzzy" => Ok(FilterMode::Fuzzy),
            "regex" => Ok(FilterMode::Regex),
            other => Err(anyhow::anyhow!("Unknown filter mode: {}", other)),
        }
    }
}

/// Handles global filtering of registry rows
pub struct SearchFilter;

impl SearchFilter {
    /// The values a row is matched on: raw type code, its label, name and path
    fn searchable_fields(app: &Application) -> [&str; 4] {
        [
            app.type_code.as_str(),
            app.type_label(),
            app.name.as_str(),
            app.path.as_str(),
        ]
    }

    /// Indices of rows matching `query` under `mode`. An empty query matches all rows.
    pub fn matching_indices(data: &[Application], query: &str, mode: FilterMode) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return (0..data.len()).collect();
        }

        match mode {
            FilterMode::Contains => Self::apply_contains_filter(data, query),
            FilterMode::Fuzzy => Self::apply_fuzzy_filter(data, query, 0),
            FilterMode::Regex => Self::apply_regex_filter(data, query),
        }
    }

    /// Case-insensitive substring match on any searchable field
    pub fn apply_contains_filter(data: &[Application], query: &str) -> Vec<usize> {
        let needle = query.to_lowercase();
        data.iter()
            .enumerate()
            .filter(|(_, app)| {
                Self::searchable_fields(app)
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Apply fuzzy filter to data and return matching indices
    pub fn apply_fuzzy_filter(data: &[Application], pattern: &str, score_threshold: i64) -> Vec<usize> {
        let matcher = SkimMatcherV2::default().ignore_case();
        let mut filtered_indices = Vec::new();

        for (idx, app) in data.iter().enumerate() {
            let best_score = Self::searchable_fields(app)
                .iter()
                .filter_map(|field| matcher.fuzzy_match(field, pattern))
                .max()
                .unwrap_or(0);

            if best_score > score_threshold {
                filtered_indices.push(idx);
            }
        }

        filtered_indices
    }

    /// Case-insensitive regex match. An invalid pattern matches nothing.
    pub fn apply_regex_filter(data: &[Application], pattern: &str) -> Vec<usize> {
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                warn!(target: "filter", "Invalid filter pattern '{}': {}", pattern, e);
                return Vec::new();
            }
        };

        data.iter()
            .enumerate()
            .filter(|(_, app)| {
                Self::searchable_fields(app)
                    .iter()
                    .any(|field| regex.is_match(field))
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Application> {
        vec![
            Application::new("1", "Billing", "/svc/billing").with_id("AAAAA"),
            Application::new("2", "Ledger", "/svc/ledger").with_id("BBBBB"),
            Application::new("1", "Portal", "/web/portal").with_id("CCCCC"),
        ]
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(
            SearchFilter::matching_indices(&rows(), "  ", FilterMode::Contains),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let data = rows();
        assert_eq!(SearchFilter::apply_contains_filter(&data, "BILL"), vec![0]);
        assert_eq!(SearchFilter::apply_contains_filter(&data, "/svc"), vec![0, 1]);
    }

    #[test]
    fn test_contains_matches_type_label() {
        let data = rows();
        assert_eq!(SearchFilter::apply_contains_filter(&data, "web"), vec![0, 2]);
        assert_eq!(SearchFilter::apply_contains_filter(&data, "distribuido"), vec![1]);
    }

    #[test]
    fn test_fuzzy_filter() {
        let data = rows();
        assert_eq!(SearchFilter::apply_fuzzy_filter(&data, "ldgr", 0), vec![1]);
    }

    #[test]
    fn test_regex_filter() {
        let data = rows();
        assert_eq!(SearchFilter::apply_regex_filter(&data, "^/web/"), vec![2]);
        assert!(SearchFilter::apply_regex_filter(&data, "(unclosed").is_empty());
    }

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!("Fuzzy".parse::<FilterMode>().unwrap(), FilterMode::Fuzzy);
        assert!("glob".parse::<FilterMode>().is_err());
    }
}
