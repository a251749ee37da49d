//
// import_matcher.rs
//
// Syntactic matching of icon-library import statements
//

use regex::Regex;
use std::sync::OnceLock;

/// A qualifying import statement located in a text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMatch {
    /// The package path token, e.g. `@vicons/ionicons5`.
    pub package_name: String,
    /// The brace-enclosed identifier list, braces included.
    pub names_group: String,
    /// Byte offset of `names_group` within the scanned text.
    pub names_offset: usize,
    /// Byte offset just past the matched statement; the next scan window
    /// starts here.
    pub resume_offset: usize,
}

/// Compiled regex patterns for import matching
struct ImportPatterns {
    keyword: Regex,
    qualifying: Regex,
    package: Regex,
    names: Regex,
}

fn patterns() -> &'static ImportPatterns {
    static PATTERNS: OnceLock<ImportPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ImportPatterns {
        keyword: Regex::new(r"import").unwrap(),
        // An import statement whose source path contains a family marker
        // reaching a closing quote. Anchored: evaluated against a window
        // that starts at an `import` keyword and is bounded at the next
        // one, which stands in for the lookahead the original pattern used.
        qualifying: Regex::new(r#"^import(?s:.)+?(?:v2|[vrs])icons[\w/]+['"]"#).unwrap(),
        // import { AddOutline, Add } from '@vicons/ionicons5'
        //                                  ^^^^^^^^^^^^^^^^^
        package: Regex::new(r"@(?:v2|[vrs])icons/\w+").unwrap(),
        // import { AddOutline, Add } from '@vicons/ionicons5'
        //        ^^^^^^^^^^^^^^^^^^^
        names: Regex::new(r"\{(?:\s*\w+,?\s*)+\}").unwrap(),
    })
}

/// Find the first qualifying icon-library import in `text`.
///
/// A statement qualifies when its source path contains one of the family
/// markers (`vicons`, `ricons`, `sicons`, `v2icons`) and the statement
/// carries both a brace-enclosed identifier list and an `@family/subpackage`
/// token. Tolerates multiline statements, extra whitespace, trailing commas,
/// and either quote style.
///
/// Purely syntactic: imported names are not validated against real exports,
/// and a family marker outside an import context (comment, string literal)
/// can false-positive. Returns `None` when no qualifying import remains.
pub fn find_import(text: &str) -> Option<ImportMatch> {
    let pats = patterns();
    let mut cursor = 0;

    while let Some(kw) = pats.keyword.find(&text[cursor..]) {
        let start = cursor + kw.start();
        // Bound the statement window at the next `import` keyword so a
        // single match never spans two statements.
        let window_end = pats
            .keyword
            .find(&text[start + kw.len()..])
            .map(|next| start + kw.len() + next.start())
            .unwrap_or(text.len());
        let window = &text[start..window_end];

        if let Some(stmt) = pats.qualifying.find(window) {
            let stmt_text = &window[..stmt.end()];
            let package = pats.package.find(stmt_text);
            let names = pats.names.find(stmt_text);

            if let (Some(package), Some(names)) = (package, names) {
                return Some(ImportMatch {
                    package_name: package.as_str().to_string(),
                    names_group: names.as_str().to_string(),
                    names_offset: start + names.start(),
                    resume_offset: start + stmt.end(),
                });
            }

            log::trace!(
                "import at offset {} qualifies but lacks a name list or package token",
                start
            );
        }

        // Not a qualifying statement; continue at the next keyword.
        cursor = start + kw.len();
    }

    None
}
