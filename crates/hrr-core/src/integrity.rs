//! Post-application integrity verification
//!
//! Double-checks a written rename with plain text search, independent of the
//! analyzer that planned it:
//! - the old name must not appear as a whole word outside comments
//! - the new name must appear at least once in every edited file
//!
//! Optionally the analyzer is asked for new-name occurrences outside the
//! edited files (possible accidental shadowing) and the parser re-reads every
//! edited file to catch broken syntax.

use crate::collaborators::{CapabilityExt, FileStore};
use crate::engine::RenameEngine;
use crate::error::RenameError;
use hrr_symbol::SymbolId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Outcome of [`RenameEngine::verify_post_edit_integrity`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// No errors found
    pub valid: bool,
    /// Problems that indicate a broken rename
    pub errors: Vec<String>,
    /// Suspicious findings
    pub warnings: Vec<String>,
    /// Files inspected
    pub files_checked: usize,
}

impl RenameEngine {
    /// Verify edited files after a rename was written
    ///
    /// # Errors
    /// - `RenameError::InvalidInput` if a name cannot form a search pattern
    /// - `RenameError::Collaborator` if the analyzer fails the stray check
    pub async fn verify_post_edit_integrity(
        &self,
        symbol_id: &SymbolId,
        new_name: &str,
        edited_files: &[PathBuf],
        store: &dyn FileStore,
    ) -> Result<IntegrityReport, RenameError> {
        let old_name = symbol_id.name();
        let old_word = whole_word(old_name)?;
        let new_word = whole_word(new_name)?;

        let mut report = IntegrityReport::default();
        let files: BTreeSet<&PathBuf> = edited_files.iter().collect();

        for path in &files {
            let content = match store.read_file(path).await {
                Ok(content) => content,
                Err(e) => {
                    report.errors.push(format!("cannot read {}: {e}", path.display()));
                    continue;
                }
            };
            report.files_checked += 1;

            let code = mask_comments(&content);
            if let Some(found) = old_word.find(&code) {
                report.errors.push(format!(
                    "{} still contains '{old_name}' at byte {}",
                    path.display(),
                    found.start()
                ));
            }
            if !new_word.is_match(&content) {
                report
                    .errors
                    .push(format!("{} does not contain '{new_name}'", path.display()));
            }

            if self.config().verify_syntax {
                if let Err(e) = self.parser().parse(path).await.supported() {
                    report
                        .errors
                        .push(format!("{} no longer parses: {e}", path.display()));
                }
            }
        }

        if self.config().check_stray_occurrences {
            let renamed = symbol_id.with_name(new_name);
            let occurrences = self
                .analyzer()
                .get_symbol_occurrences(&renamed)
                .await
                .or_fallback(Vec::new())?;
            let strays: BTreeSet<&PathBuf> = occurrences
                .iter()
                .map(|o| &o.path)
                .filter(|p| !files.contains(p))
                .collect();
            for path in strays {
                report.warnings.push(format!(
                    "'{new_name}' resolves to {renamed} in unedited file {}; possible accidental shadowing",
                    path.display()
                ));
            }
        }

        report.valid = report.errors.is_empty();
        if report.valid {
            tracing::info!(files = report.files_checked, "rename integrity verified");
        } else {
            tracing::warn!(errors = report.errors.len(), "rename integrity check failed");
        }
        Ok(report)
    }
}

fn whole_word(name: &str) -> Result<Regex, RenameError> {
    Regex::new(&format!(r"\b{}\b", regex::escape(name)))
        .map_err(|e| RenameError::InvalidInput(format!("cannot search for '{name}': {e}")))
}

/// Replace comment text with spaces, keeping byte offsets and newlines
///
/// Understands `//` line comments, `/* */` block comments and string literals
/// in either quote style, so comment markers inside strings are left alone.
fn mask_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        Code,
        Line,
        Block,
        Str(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                '"' | '\'' => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Line => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    push_blank(&mut out, c);
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    push_blank(&mut out, c);
                }
            }
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || c == '\n' {
                    state = State::Code;
                }
            }
        }
    }
    out
}

fn push_blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
}
