//! Rewrite driver: scan a buffer, hand records to a transformation, and
//! serialize what it emits.

use thiserror::Error;

use crate::core::scanner::{ScanError, Scanner};
use crate::core::sink::Sink;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Format(#[from] ScanError),
    #[error("filter sections")]
    Transform(#[source] anyhow::Error),
}

/// Rewrite `buf` through `transform`.
///
/// The transformation pulls records from the scanner and pushes output through
/// the sink; emission order is exactly call order. The buffer is validated
/// before `transform` runs, and nothing is returned unless the whole
/// transformation succeeds.
pub fn rewrite<F>(buf: &[u8], transform: F) -> Result<Vec<u8>, RewriteError>
where
    F: FnOnce(Scanner<'_>, &mut Sink) -> anyhow::Result<()>,
{
    let records = Scanner::new(buf)?;
    let mut sink = Sink::new(records.line_ending(), buf.len());
    transform(records, &mut sink).map_err(RewriteError::Transform)?;
    Ok(sink.into_bytes())
}

/// Transformation that re-emits every record unchanged.
pub fn passthrough(records: Scanner<'_>, sink: &mut Sink) -> anyhow::Result<()> {
    for record in records {
        sink.emit_record(record);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unindent;
    use anyhow::bail;

    fn rewrite_str<F>(input: &str, transform: F) -> String
    where
        F: FnOnce(Scanner<'_>, &mut Sink) -> anyhow::Result<()>,
    {
        let out = rewrite(input.as_bytes(), transform).expect("rewrite");
        String::from_utf8(out).expect("utf8")
    }

    fn fixture() -> String {
        unindent(
            "
            ; test

            [Section]
            sdfsdf,asdasd,dfgdfg


            [Section2]
            [Section2]
            dfkmgkldmfg,werwer
            [Section2]
            erktjnekjrntasd
            ",
        )
    }

    #[test]
    fn passthrough_is_byte_identical() {
        let input = fixture();
        assert_eq!(rewrite_str(&input, passthrough), input);
    }

    #[test]
    fn passthrough_is_byte_identical_for_crlf() {
        let input = "; c\r\n[A]\r\nx\r\n[A]\r\n\r\n[B]\r\ny\r\n";
        assert_eq!(rewrite_str(input, passthrough), input);
    }

    #[test]
    fn content_only_passthrough_collapses_repeated_headers() {
        let out = rewrite_str(&fixture(), |records, sink| {
            for record in records.filter(|record| !record.is_header()) {
                sink.emit_record(record);
            }
            Ok(())
        });
        assert_eq!(
            out,
            unindent(
                "
                ; test

                [Section]
                sdfsdf,asdasd,dfgdfg


                [Section2]
                dfkmgkldmfg,werwer
                erktjnekjrntasd
                ",
            )
        );
    }

    #[test]
    fn dropping_a_section_removes_its_header() {
        let out = rewrite_str(&fixture(), |records, sink| {
            for record in records.filter(|record| record.section != "Section") {
                sink.emit_record(record);
            }
            Ok(())
        });
        assert_eq!(
            out,
            unindent(
                "
                ; test

                [Section2]
                [Section2]
                dfkmgkldmfg,werwer
                [Section2]
                erktjnekjrntasd
                ",
            )
        );
    }

    #[test]
    fn dropping_lines_keeps_explicit_headers() {
        let out = rewrite_str(&fixture(), |records, sink| {
            for record in records.filter(|record| !record.line.contains("asd")) {
                sink.emit_record(record);
            }
            Ok(())
        });
        assert_eq!(
            out,
            unindent(
                "
                ; test

                [Section]


                [Section2]
                [Section2]
                dfkmgkldmfg,werwer
                [Section2]
                ",
            )
        );
    }

    #[test]
    fn synthesized_lines_and_new_sections() {
        let out = rewrite_str(&fixture(), |records, sink| {
            for record in records {
                if record.section == "Section" && record.is_header() {
                    sink.emit_text(record.section, "sdfskjdfnksjndf");
                    sink.emit_text(record.section, "ertert");
                }
                if !record.is_header() && !record.line.contains("asd") {
                    sink.emit_record(record);
                }
            }
            sink.emit_text("Section3", "dflgmldkfmg");
            Ok(())
        });
        assert_eq!(
            out,
            unindent(
                "
                ; test

                [Section]
                sdfskjdfnksjndf
                ertert


                [Section2]
                dfkmgkldmfg,werwer
                [Section3]
                dflgmldkfmg
                ",
            )
        );
    }

    #[test]
    fn drop_lines_matching_marker() {
        let out = rewrite_str("[S]\nkeep,1\ndrop,2\n", |records, sink| {
            for record in records.filter(|record| !record.line.contains("drop")) {
                sink.emit_record(record);
            }
            Ok(())
        });
        assert_eq!(out, "[S]\nkeep,1\n");
    }

    #[test]
    fn reassigning_a_line_to_another_section() {
        let out = rewrite_str("[A]\nx\n[B]\ny\n", |records, sink| {
            for record in records.filter(|record| record.section == "B" && !record.is_header()) {
                sink.emit("A", record.line);
            }
            Ok(())
        });
        assert_eq!(out, "[A]\ny\n");
    }

    #[test]
    fn emission_order_follows_calls_not_input() {
        let out = rewrite_str("[A]\n1\n[B]\n2\n", |records, sink| {
            let mut lines: Vec<_> = records.filter(|record| !record.is_header()).collect();
            lines.reverse();
            for record in lines {
                sink.emit_record(record);
            }
            Ok(())
        });
        assert_eq!(out, "[B]\n2\n[A]\n1\n");
    }

    #[test]
    fn headers_never_repeat_for_consecutive_same_section_lines() {
        let out = rewrite_str("[A]\n1\n2\n3\n", |records, sink| {
            for record in records.filter(|record| !record.is_header()) {
                sink.emit_record(record);
                sink.emit_record(record);
            }
            Ok(())
        });
        assert_eq!(out.matches("[A]").count(), 1);
    }

    #[test]
    fn transform_failure_is_wrapped() {
        let err = rewrite(b"[A]\nx\n", |_records, _sink| bail!("marker not found"))
            .expect_err("transform error");
        assert!(matches!(err, RewriteError::Transform(_)));
        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(rendered, "filter sections: marker not found");
    }

    #[test]
    fn format_error_skips_transform() {
        let mut called = false;
        let err = rewrite(b"[A]\r\nx\n", |_records, _sink| {
            called = true;
            Ok(())
        })
        .expect_err("format error");
        assert!(matches!(err, RewriteError::Format(ScanError::MixedLineEndings { .. })));
        assert!(!called);
    }
}
