use super::*;
use pretty_assertions::assert_eq;

#[test]
fn underline_marks_column() {
    let custom = Underline::new('-', '*');
    assert_eq!(PositionInfo::new("abc", 0).underline(custom), "*--");
    assert_eq!(PositionInfo::new("abc", 1).underline(custom), "-*-");
    assert_eq!(PositionInfo::new("abc", 2).underline(custom), "--*");
}

#[test]
fn underline_extends_past_line_end() {
    let info = PositionInfo::new("ab", 2);
    assert_eq!(info.underline(Underline::default()), "  ^");
}

#[test]
fn line_and_column() {
    let cases = [
        ("ab\nc", 0, "ab", 1, 0),
        ("ab\ncd", 1, "ab", 1, 1),
        ("ab\ncd", 2, "ab", 1, 2),
        ("ab\ncd", 3, "cd", 2, 0),
        ("ab\ncd", 4, "cd", 2, 1),
        ("ab\ncd", 5, "cd", 2, 2),
    ];
    for (source, offset, line, line_number, column) in cases {
        let info = PositionInfo::new(source, offset);
        assert_eq!(info.line(), line, "line at {offset} in {source:?}");
        assert_eq!(info.line_number(), line_number, "line number at {offset}");
        assert_eq!(info.column(), column, "column at {offset}");
    }
}

#[test]
fn multi_byte_columns_count_characters() {
    // '字' starts at byte 3
    let info = PositionInfo::new("漢字", 3);
    assert_eq!(info.line(), "漢字");
    assert_eq!(info.line_number(), 1);
    assert_eq!(info.column(), 1);
    assert_eq!(info.position_char(), PositionChar::Char('字'));
    assert_eq!(info.underline(Underline::new('-', '*')), "-*");
}

#[test]
fn offset_inside_character_snaps_back() {
    let info = PositionInfo::new("漢字", 4);
    assert_eq!(info.offset(), 3);
    assert_eq!(info.column(), 1);
}

#[test]
fn end_of_input_marker() {
    let info = PositionInfo::new("ab", 2);
    assert_eq!(info.position_char(), PositionChar::EndOfInput);
    assert_eq!(info.position_char().to_string(), "EOI");

    let info = PositionInfo::new("", 0);
    assert_eq!(info.position_char(), PositionChar::EndOfInput);
    assert_eq!(info.line(), "");
    assert_eq!(info.line_number(), 1);
}

#[test]
fn offset_past_end_is_clamped() {
    let info = PositionInfo::new("ab", 10);
    assert_eq!(info.offset(), 2);
    assert_eq!(info.column(), 2);
}

#[test]
fn indexed_lookup_matches_scan() {
    let source = "first line\nsecond\n\nlast 漢字";
    let index = LineIndex::build(source);
    for offset in (0..=source.len()).filter(|&o| source.is_char_boundary(o)) {
        assert_eq!(
            PositionInfo::with_index(source, &index, offset),
            PositionInfo::new(source, offset),
            "offset {offset}"
        );
    }
}

#[test]
fn display_renders_line_and_caret() {
    let info = PositionInfo::new("x = 1\ny = ?", 10);
    assert_eq!(info.to_string(), "Line 2\ny = ?\n    ^");
}
