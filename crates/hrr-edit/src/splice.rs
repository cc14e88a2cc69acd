//! Offset-safe application of a file's edits to its content

use crate::edit::{check_descending_disjoint, sort_descending, TextEdit};
use crate::error::EditError;
use std::path::Path;

/// Apply edits for a single file to `content`
///
/// Edits are applied from the tail of the file toward its head, so each
/// splice leaves the offsets of the remaining edits untouched. Input order
/// does not matter.
///
/// # Errors
/// - `EditError::InvalidRange` for `start > end`
/// - `EditError::OutOfBounds` if an edit ends past the content or splits a
///   UTF-8 character
/// - `EditError::Overlap` if two edits overlap
pub fn apply_edits(path: &Path, content: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut ordered = edits.to_vec();
    sort_descending(&mut ordered);

    for edit in &ordered {
        if edit.start > edit.end {
            return Err(EditError::InvalidRange {
                path: path.to_path_buf(),
                span: edit.span(),
            });
        }
        if edit.end > content.len()
            || !content.is_char_boundary(edit.start)
            || !content.is_char_boundary(edit.end)
        {
            return Err(EditError::OutOfBounds {
                path: path.to_path_buf(),
                span: edit.span(),
                len: content.len(),
            });
        }
    }
    check_descending_disjoint(path, &ordered)?;

    let mut output = content.to_string();
    for edit in &ordered {
        output.replace_range(edit.range(), &edit.new_text);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use pretty_assertions::assert_eq;

    fn buffer_with_two_spans() -> String {
        let mut text = "x".repeat(60);
        text.replace_range(10..17, "scr_old");
        text.replace_range(40..47, "scr_old");
        text
    }

    #[test]
    fn applies_both_spans_regardless_of_input_order() {
        let content = buffer_with_two_spans();
        let edits = vec![
            TextEdit::new("a.gml", 10, 17, "scr_new"),
            TextEdit::new("a.gml", 40, 47, "scr_new"),
        ];

        let out = apply_edits(Path::new("a.gml"), &content, &edits).unwrap();
        assert_eq!(&out[10..17], "scr_new");
        assert_eq!(&out[40..47], "scr_new");
        assert!(!out.contains("scr_old"));
    }

    #[test]
    fn length_changing_edits_keep_earlier_offsets_valid() {
        let content = "call(foo); foo = foo + 1;";
        let edits = vec![
            TextEdit::new("a.gml", 5, 8, "renamed_value"),
            TextEdit::new("a.gml", 11, 14, "renamed_value"),
            TextEdit::new("a.gml", 17, 20, "renamed_value"),
        ];

        let out = apply_edits(Path::new("a.gml"), content, &edits).unwrap();
        assert_eq!(
            out,
            "call(renamed_value); renamed_value = renamed_value + 1;"
        );
    }

    #[test]
    fn insertion_and_replacement_at_same_offset() {
        let edits = vec![
            TextEdit::new("a.gml", 0, 0, "// header\n"),
            TextEdit::new("a.gml", 0, 3, "bar"),
        ];
        let out = apply_edits(Path::new("a.gml"), "foo();", &edits).unwrap();
        assert_eq!(out, "// header\nbar();");
    }

    #[test]
    fn rejects_edit_past_end() {
        let edits = vec![TextEdit::new("a.gml", 2, 50, "x")];
        let err = apply_edits(Path::new("a.gml"), "short", &edits).unwrap_err();
        assert_eq!(
            err,
            EditError::OutOfBounds {
                path: "a.gml".into(),
                span: Span { start: 2, end: 50 },
                len: 5,
            }
        );
    }

    #[test]
    fn rejects_split_character() {
        // 'é' is two bytes starting at offset 1
        let edits = vec![TextEdit::new("a.gml", 2, 3, "x")];
        let err = apply_edits(Path::new("a.gml"), "xéx", &edits).unwrap_err();
        assert!(matches!(err, EditError::OutOfBounds { .. }));
    }

    #[test]
    fn rejects_overlap() {
        let edits = vec![
            TextEdit::new("a.gml", 0, 4, "x"),
            TextEdit::new("a.gml", 2, 6, "y"),
        ];
        let err = apply_edits(Path::new("a.gml"), "abcdefgh", &edits).unwrap_err();
        assert!(matches!(err, EditError::Overlap { .. }));
    }
}
