// Tests for output formatting
//
// Writers are backed by a shared buffer so the rendered text can be inspected.

use super::*;
use rulegen_core::{FieldMetadata, TodoItem};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, 0, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_report() -> TranspileReport {
    TranspileReport {
        lines_read: 4,
        blank_lines: 1,
        blocks: 1,
        standalone: 1,
        todos: vec![TodoItem {
            line: 3,
            original: "項目「帽子.(色)」＝１。".to_string(),
            code: "//TODO: 項目「帽子.(色)」＝１。 [entity not found: 帽子]".to_string(),
            reason: "entity not found: 帽子".to_string(),
        }],
        ..TranspileReport::default()
    }
}

#[test]
fn test_human_messages() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.info("loading").unwrap();
    output.warning("careful").unwrap();
    output.success("done").unwrap();
    assert_eq!(buffer.contents(), "INFO: loading\nWARNING: careful\ndone\n");
}

#[test]
fn test_quiet_suppresses_info_but_not_warnings() {
    let (mut output, buffer) = writer(OutputFormat::Human, true);
    output.info("loading").unwrap();
    output.section("Report").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "WARNING: careful\n");
}

#[test]
fn test_machine_formats_skip_messages() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.info("loading").unwrap();
    output.error("bad").unwrap();
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_report_human() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.report(&sample_report()).unwrap();
    let text = buffer.contents();
    assert!(text.contains("=== Conversion Report ==="));
    assert!(text.contains("Lines read             4"));
    assert!(text.contains("TODO lines             1"));
    assert!(text.contains("entity not found: 帽子"));
}

#[test]
fn test_report_json() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.report(&sample_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
    assert_eq!(value["lines_read"], 4);
    assert_eq!(value["todos"][0]["line"], 3);
}

#[test]
fn test_entity_table_aligns_wide_characters() {
    let entity = EntityMetadata::new("Glove")
        .with_field(FieldMetadata::new("code", "会社コード").with_type("String"))
        .with_field(FieldMetadata::new("long_name", "件数").with_type("Long"));
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.entity(&entity).unwrap();

    let text = buffer.contents();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "=== Glove ===");
    let first_bar = |line: &str| display_width(&line[..line.find('│').unwrap()]);
    assert_eq!(first_bar(lines[2]), first_bar(lines[4]));
    assert!(lines[4].contains("getCode"));
    assert!(lines[5].contains("setLongName"));
}

#[test]
fn test_entity_yaml() {
    let entity = EntityMetadata::new("Glove").with_field(FieldMetadata::new("code", "コード"));
    let (mut output, buffer) = writer(OutputFormat::Yaml, false);
    output.entity(&entity).unwrap();
    assert!(buffer.contents().contains("class_name: Glove"));
}

#[test]
fn test_display_width() {
    assert_eq!(display_width("abc"), 3);
    assert_eq!(display_width("件数"), 4);
    assert_eq!(display_width("Ｌ０１"), 6);
    assert_eq!(pad("件", 4), "件  ");
}
