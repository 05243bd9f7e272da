//! Dashboard search criteria.

use super::BugReport;

/// Filter value that disables status or severity matching.
pub const ALL_SENTINEL: &str = "All";
/// Reports shown per dashboard page.
pub const BUGS_PER_PAGE: u32 = 10;

/// Criteria for the dashboard listing.
///
/// Keyword matches a case-insensitive substring of the title. Status and
/// severity match the whole label case-insensitively. Absent criteria match
/// everything.
///
/// # Examples
/// ```
/// use bugtracker::domain::BugFilter;
///
/// let filter = BugFilter::new(Some("crash"), Some("All"), Some("high"));
/// assert_eq!(filter.keyword(), Some("crash"));
/// assert_eq!(filter.status(), None);
/// assert_eq!(filter.severity(), Some("high"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugFilter {
    keyword: Option<String>,
    status: Option<String>,
    severity: Option<String>,
}

fn criterion(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn label(raw: Option<&str>) -> Option<String> {
    criterion(raw)
        .filter(|value| *value != ALL_SENTINEL)
        .map(str::to_owned)
}

impl BugFilter {
    /// Normalise raw query values. Every value is trimmed; blank values
    /// clear a criterion, as does [`ALL_SENTINEL`] for status and severity.
    pub fn new(keyword: Option<&str>, status: Option<&str>, severity: Option<&str>) -> Self {
        Self {
            keyword: criterion(keyword).map(str::to_owned),
            status: label(status),
            severity: label(severity),
        }
    }

    /// Title substring, if any.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Status label, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Severity label, if any.
    pub fn severity(&self) -> Option<&str> {
        self.severity.as_deref()
    }

    /// `ILIKE` pattern for the keyword with `%`, `_` and `\` escaped.
    pub fn keyword_pattern(&self) -> Option<String> {
        self.keyword.as_deref().map(|keyword| {
            let mut pattern = String::with_capacity(keyword.len() + 2);
            pattern.push('%');
            for ch in keyword.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        })
    }

    /// Whether `report` satisfies every criterion.
    pub fn matches(&self, report: &BugReport) -> bool {
        let keyword_ok = self.keyword.as_deref().is_none_or(|keyword| {
            report
                .title
                .to_lowercase()
                .contains(&keyword.to_lowercase())
        });
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|status| report.status.to_lowercase() == status.to_lowercase());
        let severity_ok = self
            .severity
            .as_deref()
            .is_none_or(|severity| report.severity.to_lowercase() == severity.to_lowercase());
        keyword_ok && status_ok && severity_ok
    }
}
