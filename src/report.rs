//! Per-artifact outcome lines shown to the user.
//!
//! Every decision the pipeline makes is recorded as one [`ReportEntry`];
//! [`print_report`] writes them to stdout once the run is over, including runs
//! that stopped on a fatal error.

use std::fmt;

use crate::planner::ArtifactKind;

/// Outcome of one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// File written (created or replaced)
    Created,
    /// Lines appended to a shared file
    Updated,
    /// Left out by the idempotency guard or already present
    Skipped,
    /// Would be written; dry run only
    Planned,
    /// Dropped input that did not stop the run, e.g. an unknown relation kind
    Warning,
    /// The error that stopped the run
    Failed,
}

impl Status {
    fn icon(self) -> &'static str {
        match self {
            Status::Created | Status::Updated => "✅",
            Status::Planned => "📝",
            Status::Skipped | Status::Warning => "⚠️ ",
            Status::Failed => "❌",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Updated => "Updated",
            Status::Skipped => "Skipped",
            Status::Planned => "Would write",
            Status::Warning => "Warning",
            Status::Failed => "Failed",
        }
    }
}

/// One reported line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Outcome
    pub status: Status,
    /// Artifact kind, if the line is about one
    pub kind: Option<ArtifactKind>,
    /// File path or entity name
    pub subject: String,
    /// Extra detail such as the skip reason
    pub detail: Option<String>,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.icon(), self.status.verb())?;
        if let Some(kind) = self.kind {
            write!(f, " {kind}")?;
        }
        write!(f, " {}", self.subject)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

/// Ordered outcome lines of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a line.
    pub fn push(
        &mut self,
        status: Status,
        kind: Option<ArtifactKind>,
        subject: impl Into<String>,
        detail: Option<String>,
    ) {
        self.entries.push(ReportEntry {
            status,
            kind,
            subject: subject.into(),
            detail,
        });
    }

    /// All lines in order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Number of lines with `status`.
    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Whether any line reports a fatal failure.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.count(Status::Failed) > 0
    }
}

/// Print every line of `report` followed by a summary.
pub fn print_report(report: &Report) {
    for entry in report.entries() {
        println!("{entry}");
    }
    println!(
        "\n📋 {} created, {} updated, {} skipped, {} warning(s)",
        report.count(Status::Created),
        report.count(Status::Updated),
        report.count(Status::Skipped),
        report.count(Status::Warning),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_lines() {
        let mut report = Report::new();
        report.push(
            Status::Created,
            Some(ArtifactKind::EntityDefinition),
            "app/Models/Project.php",
            None,
        );
        report.push(
            Status::Skipped,
            Some(ArtifactKind::SchemaDefinition),
            "Project",
            Some("table 'projects' already exists in the database".to_string()),
        );
        report.push(
            Status::Warning,
            None,
            "Project",
            Some("invalid relation type 'hasOne' for Owner".to_string()),
        );

        let lines: Vec<String> = report.entries().iter().map(ToString::to_string).collect();
        assert_eq!(lines[0], "✅ Created model app/Models/Project.php");
        assert_eq!(
            lines[1],
            "⚠️  Skipped migration Project: table 'projects' already exists in the database"
        );
        assert_eq!(
            lines[2],
            "⚠️  Warning Project: invalid relation type 'hasOne' for Owner"
        );
        assert_eq!(report.count(Status::Skipped), 1);
        assert!(!report.has_failures());
    }
}
