//! Bulk Candidate Import
//!
//! Parses an uploaded CSV export into candidate records. The parser honors
//! double-quoted fields (so `"React,Node"` stays one field) but is
//! deliberately not RFC 4180-complete: escaped quotes inside quoted fields
//! are not supported. Validation is a batch pass with no rollback: good
//! rows are accepted, bad rows are collected as error strings and reported.

use super::types::{Candidate, InterviewType};

// ============================================================
// HEADER MAPPING
// ============================================================

/// Canonical candidate fields a CSV column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Phone,
    Skills,
    Experience,
    Source,
    Vacancy,
    InterviewType,
}

/// Map a header cell to a canonical field. Case-insensitive; accepts the
/// alias spellings seen across historical exports (`skill_set`,
/// `interviewType`, ...). Unknown headers map to `None` and their columns
/// are ignored.
fn canonical_field(header: &str) -> Option<Field> {
    let key: String = header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    match key.as_str() {
        "name" | "fullname" | "candidatename" => Some(Field::Name),
        "email" | "emailaddress" | "emailid" => Some(Field::Email),
        "phone" | "phonenumber" | "mobile" | "contact" => Some(Field::Phone),
        "skills" | "skillset" => Some(Field::Skills),
        "experience" | "yearsexperience" | "yearsofexperience" => Some(Field::Experience),
        "source" | "referralsource" => Some(Field::Source),
        "vacancy" | "vacancyid" | "position" => Some(Field::Vacancy),
        "interviewtype" => Some(Field::InterviewType),
        _ => None,
    }
}

// ============================================================
// LINE SPLITTING
// ============================================================

/// Split one CSV line into fields, honoring double-quote wrapping.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

// ============================================================
// IMPORT REPORT
// ============================================================

/// Partitioned result of a bulk import: accepted candidates plus one error
/// string per rejected row. Partial success is expected, not exceptional.
#[derive(Debug)]
pub struct ImportReport {
    pub accepted: Vec<Candidate>,
    pub errors: Vec<String>,
}

/// How many row errors are spelled out before collapsing to a count.
const ERROR_DISPLAY_CAP: usize = 5;

impl ImportReport {
    /// User-facing summary: up to five errors verbatim, then a remainder
    /// count. `None` when every row was accepted.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let mut summary = self.errors[..self.errors.len().min(ERROR_DISPLAY_CAP)].join("\n");
        if self.errors.len() > ERROR_DISPLAY_CAP {
            summary.push_str(&format!(
                "\n...and {} more",
                self.errors.len() - ERROR_DISPLAY_CAP
            ));
        }
        Some(summary)
    }
}

// ============================================================
// IMPORT
// ============================================================

/// Parse CSV text into candidate records.
///
/// Row numbering in error messages is 1-based over the whole file, so the
/// first data row is "Row 2". A row is rejected when its column count does
/// not match the header or when name/email are missing; accepted rows get
/// generated defaults (fresh id, `unassigned` status, walk-in interview
/// type) for everything the file does not provide.
pub fn import_candidates(csv: &str) -> ImportReport {
    let mut report = ImportReport {
        accepted: Vec::new(),
        errors: Vec::new(),
    };

    let mut lines = csv.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break split_line(line),
            None => {
                report.errors.push("File is empty".to_string());
                return report;
            }
        }
    };
    let columns: Vec<Option<Field>> = header.iter().map(|h| canonical_field(h)).collect();

    if !columns.contains(&Some(Field::Name)) || !columns.contains(&Some(Field::Email)) {
        report
            .errors
            .push("Header must include name and email columns".to_string());
        return report;
    }

    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row_no = idx + 1;
        let cells = split_line(line);

        if cells.len() != columns.len() {
            report.errors.push(format!(
                "Row {}: Column count mismatch (expected {}, found {})",
                row_no,
                columns.len(),
                cells.len()
            ));
            continue;
        }

        let mut candidate = Candidate::new("", "");
        candidate.source = "bulk_upload".to_string();
        for (field, cell) in columns.iter().zip(cells.iter()) {
            let value = cell.trim();
            match field {
                Some(Field::Name) => candidate.name = value.to_string(),
                Some(Field::Email) => candidate.email = value.to_string(),
                Some(Field::Phone) => candidate.phone = value.to_string(),
                Some(Field::Skills) => {
                    candidate.skills = value
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                Some(Field::Experience) => {
                    candidate.years_experience = value.parse().ok();
                }
                Some(Field::Source) => {
                    if !value.is_empty() {
                        candidate.source = value.to_string();
                    }
                }
                Some(Field::Vacancy) => {
                    if !value.is_empty() {
                        candidate.vacancy_id = Some(value.to_string());
                    }
                }
                Some(Field::InterviewType) => {
                    candidate.interview_type =
                        InterviewType::parse(value).unwrap_or_default();
                }
                None => {}
            }
        }

        if candidate.name.is_empty() || candidate.email.is_empty() {
            report
                .errors
                .push(format!("Row {}: Missing required fields", row_no));
            continue;
        }

        report.accepted.push(candidate);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::CandidateStatus;

    #[test]
    fn test_happy_path_with_defaults() {
        let csv = "Name,Email,Phone\nPriya Nair,priya@example.com,9876543210\n";
        let report = import_candidates(csv);
        assert_eq!(report.errors, Vec::<String>::new());
        assert_eq!(report.accepted.len(), 1);

        let c = &report.accepted[0];
        assert_eq!(c.name, "Priya Nair");
        assert_eq!(c.email, "priya@example.com");
        assert_eq!(c.phone, "9876543210");
        assert_eq!(c.status, CandidateStatus::Unassigned);
        assert_eq!(c.interview_type, InterviewType::WalkIn);
        assert_eq!(c.source, "bulk_upload");
        assert!(!c.id.is_empty());
    }

    #[test]
    fn test_column_count_mismatch_is_rejected() {
        // header of 5 columns, data row of 4
        let csv = "Name,Email,Phone,Skills,Source\nA,a@x.com,123,Rust\n";
        let report = import_candidates(csv);
        assert!(report.accepted.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0],
            "Row 2: Column count mismatch (expected 5, found 4)"
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let csv = "Name,Email\n,x@x.com\n";
        let report = import_candidates(csv);
        assert!(report.accepted.is_empty());
        assert_eq!(report.errors, vec!["Row 2: Missing required fields"]);

        let csv = "Name,Email\nSomeone,\n";
        let report = import_candidates(csv);
        assert_eq!(report.errors, vec!["Row 2: Missing required fields"]);
    }

    #[test]
    fn test_quoted_field_keeps_commas() {
        let csv = "Name,Email,Skills,Source\nA,a@x.com,\"React,Node\",LinkedIn\n";
        let report = import_candidates(csv);
        assert!(report.errors.is_empty());
        let c = &report.accepted[0];
        assert_eq!(c.skills, vec!["React", "Node"]);
        assert_eq!(c.source, "LinkedIn");
    }

    #[test]
    fn test_header_aliases_case_insensitive() {
        let csv = "Candidate Name,EMAIL ADDRESS,skill_set,interviewType\nB,b@x.com,Python,virtual\n";
        let report = import_candidates(csv);
        assert!(report.errors.is_empty());
        let c = &report.accepted[0];
        assert_eq!(c.name, "B");
        assert_eq!(c.skills, vec!["Python"]);
        assert_eq!(c.interview_type, InterviewType::Virtual);
    }

    #[test]
    fn test_partial_success_is_partitioned() {
        let csv = "Name,Email\nOk One,one@x.com\n,two@x.com\nOk Three,three@x.com\n";
        let report = import_candidates(csv);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Row 3:"));
    }

    #[test]
    fn test_error_summary_caps_at_five() {
        let mut csv = String::from("Name,Email\n");
        for _ in 0..8 {
            csv.push_str(",missing-name@x.com\n");
        }
        let report = import_candidates(&csv);
        assert_eq!(report.errors.len(), 8);
        let summary = report.error_summary().unwrap();
        assert_eq!(summary.lines().count(), 6);
        assert!(summary.ends_with("...and 3 more"));
    }

    #[test]
    fn test_empty_file() {
        let report = import_candidates("");
        assert!(report.accepted.is_empty());
        assert_eq!(report.errors, vec!["File is empty"]);
    }

    #[test]
    fn test_header_without_required_columns() {
        let report = import_candidates("Phone,Skills\n123,Rust\n");
        assert!(report.accepted.is_empty());
        assert_eq!(
            report.errors,
            vec!["Header must include name and email columns"]
        );
    }
}
