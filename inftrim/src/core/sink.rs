//! Output sink for rewrite transformations.
//!
//! Headers are written automatically on section transitions, so a
//! transformation only has to say which section each line belongs to.

use crate::core::types::{LineEnding, Record};

/// Header last written to the output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmitState {
    #[default]
    NoSection,
    InSection(String),
}

impl EmitState {
    /// Apply one emission and return whether a `[section]` header must be
    /// written before the line.
    ///
    /// An empty `section` never writes a header and keeps the state as is.
    pub fn transition(&mut self, section: &str, line: &str) -> bool {
        if section.is_empty() {
            return false;
        }
        let changed = match self {
            EmitState::NoSection => true,
            EmitState::InSection(current) => current != section,
        };
        if line.is_empty() || changed {
            *self = EmitState::InSection(section.to_string());
            return true;
        }
        false
    }
}

/// Serializes emissions into a byte buffer.
///
/// # Panics
///
/// [`Sink::emit`] panics on calls that would make the output ambiguous: both
/// fields empty, or a line that does not end with the buffer's terminator.
#[derive(Debug)]
pub struct Sink {
    out: Vec<u8>,
    state: EmitState,
    ending: LineEnding,
}

impl Sink {
    pub fn new(ending: LineEnding, capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            state: EmitState::NoSection,
            ending,
        }
    }

    /// Terminator that every emitted line must end with.
    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    pub fn emit(&mut self, section: &str, line: &str) {
        assert!(
            !(section.is_empty() && line.is_empty()),
            "emitted empty section and line"
        );
        assert!(
            line.is_empty() || line.ends_with(self.ending.as_str()),
            "line {line:?} must end with {:?}",
            self.ending.as_str()
        );

        if self.state.transition(section, line) {
            self.out.push(b'[');
            self.out.extend_from_slice(section.as_bytes());
            self.out.push(b']');
            self.out.extend_from_slice(self.ending.as_str().as_bytes());
        }
        self.out.extend_from_slice(line.as_bytes());
    }

    pub fn emit_record(&mut self, record: Record<'_>) {
        self.emit(record.section, record.line);
    }

    /// Emit `text` plus the terminator under `section`.
    pub fn emit_text(&mut self, section: &str, text: &str) {
        let line = format!("{text}{}", self.ending.as_str());
        self.emit(section, &line);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_writes_header_on_first_section() {
        let mut state = EmitState::NoSection;
        assert!(state.transition("A", "x\n"));
        assert_eq!(state, EmitState::InSection("A".to_string()));
    }

    #[test]
    fn transition_skips_header_for_same_section() {
        let mut state = EmitState::InSection("A".to_string());
        assert!(!state.transition("A", "x\n"));
    }

    #[test]
    fn transition_always_writes_pure_header() {
        let mut state = EmitState::InSection("A".to_string());
        assert!(state.transition("A", ""));
    }

    #[test]
    fn transition_ignores_empty_section() {
        let mut state = EmitState::InSection("A".to_string());
        assert!(!state.transition("", "x\n"));
        assert_eq!(state, EmitState::InSection("A".to_string()));
    }

    #[test]
    fn emit_inserts_headers_on_section_change() {
        let mut sink = Sink::new(LineEnding::Lf, 0);
        sink.emit("", "; top\n");
        sink.emit("A", "a1\n");
        sink.emit("A", "a2\n");
        sink.emit("B", "b1\n");
        sink.emit("A", "a3\n");
        assert_eq!(
            String::from_utf8(sink.into_bytes()).expect("utf8"),
            "; top\n[A]\na1\na2\n[B]\nb1\n[A]\na3\n"
        );
    }

    #[test]
    fn emit_text_appends_crlf() {
        let mut sink = Sink::new(LineEnding::CrLf, 0);
        sink.emit_text("A", "k=v");
        assert_eq!(sink.into_bytes(), b"[A]\r\nk=v\r\n");
    }

    #[test]
    #[should_panic(expected = "emitted empty section and line")]
    fn emit_rejects_empty_record() {
        let mut sink = Sink::new(LineEnding::Lf, 0);
        sink.emit("", "");
    }

    #[test]
    #[should_panic(expected = "must end with")]
    fn emit_rejects_unterminated_line() {
        let mut sink = Sink::new(LineEnding::Lf, 0);
        sink.emit("A", "no newline");
    }

    #[test]
    #[should_panic(expected = "must end with")]
    fn emit_rejects_lf_line_in_crlf_buffer() {
        let mut sink = Sink::new(LineEnding::CrLf, 0);
        sink.emit("A", "x\n");
    }
}
