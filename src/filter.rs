use serde::Deserialize;

use crate::core::db::{Applicant, Barangay, Gender, Status};

/// Age buckets offered by the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum AgeRange {
    #[serde(rename = "18-25")]
    #[value(name = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    #[value(name = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    #[value(name = "36-45")]
    From36To45,
    #[serde(rename = "46+")]
    #[value(name = "46+")]
    From46,
}

impl AgeRange {
    pub fn contains(self, age: u32) -> bool {
        match self {
            AgeRange::From18To25 => (18..=25).contains(&age),
            AgeRange::From26To35 => (26..=35).contains(&age),
            AgeRange::From36To45 => (36..=45).contains(&age),
            AgeRange::From46 => age >= 46,
        }
    }
}

/// List-view filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub search_term: Option<String>,
    pub status: Option<Status>,
    pub barangay: Option<Barangay>,
    pub gender: Option<Gender>,
    pub age_range: Option<AgeRange>,
    pub education: Option<String>,
}

impl FilterOptions {
    pub fn matches(&self, applicant: &Applicant) -> bool {
        let term = self.search_term.as_deref().map(str::trim).unwrap_or_default();
        if !term.is_empty() && !matches_search(applicant, &term.to_uppercase()) {
            return false;
        }
        self.status.is_none_or(|s| applicant.status == s)
            && self.barangay.is_none_or(|b| applicant.barangay == b)
            && self.gender.is_none_or(|g| applicant.gender == g)
            && self.age_range.is_none_or(|r| r.contains(applicant.age))
            && self
                .education
                .as_deref()
                .is_none_or(|e| applicant.educational_attainment.eq_ignore_ascii_case(e))
    }
}

fn matches_search(applicant: &Applicant, needle: &str) -> bool {
    let mut haystack = vec![
        applicant.first_name.as_str(),
        applicant.last_name.as_str(),
        applicant.code.as_str(),
        applicant.barangay.as_str(),
    ];
    haystack.extend(applicant.middle_name.as_deref());
    haystack.extend(applicant.extension_name.as_deref());
    haystack
        .into_iter()
        .any(|field| field.to_uppercase().contains(needle))
}

/// Applicants passing every filter, in their original order.
pub fn filter_applicants<'a>(
    applicants: &'a [Applicant],
    options: &FilterOptions,
) -> Vec<&'a Applicant> {
    applicants.iter().filter(|a| options.matches(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::applicant;

    #[test]
    fn search_is_case_insensitive_over_names_code_and_barangay() {
        let mut a = applicant(Barangay::Pooc, Gender::Male, Status::Pending);
        a.first_name = "JUAN".into();
        a.code = "GIP-2026-0007".into();
        let list = vec![a];

        for term in ["juan", "0007", "poo", "  JuA  "] {
            let options = FilterOptions {
                search_term: Some(term.into()),
                ..FilterOptions::default()
            };
            assert_eq!(filter_applicants(&list, &options).len(), 1, "{}", term);
        }
        let options = FilterOptions {
            search_term: Some("pedro".into()),
            ..FilterOptions::default()
        };
        assert!(filter_applicants(&list, &options).is_empty());
    }

    #[test]
    fn exact_filters_combine() {
        let list = vec![
            applicant(Barangay::Pooc, Gender::Male, Status::Pending),
            applicant(Barangay::Pooc, Gender::Female, Status::Pending),
            applicant(Barangay::Dila, Gender::Female, Status::Approved),
        ];
        let options = FilterOptions {
            barangay: Some(Barangay::Pooc),
            gender: Some(Gender::Female),
            ..FilterOptions::default()
        };
        let found = filter_applicants(&list, &options);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].gender, Gender::Female);
        assert_eq!(filter_applicants(&list, &FilterOptions::default()).len(), 3);
    }

    #[test]
    fn age_ranges_are_inclusive() {
        assert!(AgeRange::From18To25.contains(25));
        assert!(!AgeRange::From18To25.contains(26));
        assert!(AgeRange::From26To35.contains(26));
        assert!(AgeRange::From46.contains(70));
        assert!(!AgeRange::From36To45.contains(46));
    }

    #[test]
    fn options_deserialize_from_list_view_names() {
        let options: FilterOptions = serde_json::from_str(
            r#"{"searchTerm":"x","ageRange":"46+","status":"APPROVED","barangay":"DON JOSE"}"#,
        )
        .unwrap();
        assert_eq!(options.age_range, Some(AgeRange::From46));
        assert_eq!(options.status, Some(Status::Approved));
        assert_eq!(options.barangay, Some(Barangay::DonJose));
    }
}
