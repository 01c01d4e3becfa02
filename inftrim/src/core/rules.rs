//! Declarative section filter run through the rewrite driver.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use regex::Regex;

use crate::core::scanner::Scanner;
use crate::core::sink::Sink;
use crate::core::types::Record;

/// Drop lines whose text (without terminator) matches `pattern`, optionally
/// only inside sections matching `section`.
#[derive(Debug, Clone)]
pub struct LineRule {
    pub section: Option<Regex>,
    pub pattern: Regex,
}

impl LineRule {
    fn matches(&self, section: &str, text: &str) -> bool {
        self.section
            .as_ref()
            .is_none_or(|scope| scope.is_match(section))
            && self.pattern.is_match(text)
    }
}

/// Lines to add right after the first header of `section`, or as a new
/// trailing section when the input has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub section: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub drop_sections: Vec<Regex>,
    pub drop_lines: Vec<LineRule>,
    pub inserts: Vec<Insertion>,
    /// Sections that must exist in the input.
    pub expect_sections: Vec<String>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.drop_sections.is_empty()
            && self.drop_lines.is_empty()
            && self.inserts.is_empty()
            && self.expect_sections.is_empty()
    }

    pub fn drops_section(&self, section: &str) -> bool {
        !section.is_empty() && self.drop_sections.iter().any(|re| re.is_match(section))
    }

    fn drops_line(&self, record: Record<'_>, ending: &str) -> bool {
        let text = record.line.strip_suffix(ending).unwrap_or(record.line);
        self.drop_lines
            .iter()
            .any(|rule| rule.matches(record.section, text))
    }

    /// Filter `records` into `sink`.
    pub fn apply(&self, records: Scanner<'_>, sink: &mut Sink) -> Result<()> {
        let ending = sink.line_ending().as_str();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut inserted: BTreeSet<&str> = BTreeSet::new();

        for record in records {
            if record.is_header() {
                seen.insert(record.section);
            }
            if self.drops_section(record.section) {
                continue;
            }
            if record.is_header() {
                sink.emit_record(record);
                if inserted.insert(record.section) {
                    self.emit_inserts(record.section, sink);
                }
                continue;
            }
            if self.drops_line(record, ending) {
                continue;
            }
            sink.emit_record(record);
        }

        for section in &self.expect_sections {
            if !seen.contains(section.as_str()) {
                bail!("expected section [{section}] not found");
            }
        }

        for insertion in &self.inserts {
            let section = insertion.section.as_str();
            if inserted.contains(section) || self.drops_section(section) {
                continue;
            }
            inserted.insert(section);
            if insertion.lines.is_empty() && !self.has_insert_lines(section) {
                sink.emit(section, "");
            }
            self.emit_inserts(section, sink);
        }
        Ok(())
    }

    fn has_insert_lines(&self, section: &str) -> bool {
        self.inserts
            .iter()
            .any(|ins| ins.section == section && !ins.lines.is_empty())
    }

    fn emit_inserts(&self, section: &str, sink: &mut Sink) {
        for insertion in self.inserts.iter().filter(|ins| ins.section == section) {
            for line in &insertion.lines {
                sink.emit_text(section, line);
            }
        }
    }
}
