//
// scanner.rs
//
// Scan orchestration: driving the import matcher over a whole document
//

use serde::Deserialize;

use crate::import_matcher::{find_import, ImportMatch};
use crate::range_resolver::resolve_ranges;
use crate::types::IconMatch;

/// How much of a document a scan cycle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStrategy {
    /// Scan once and stop at the first qualifying import. Fast, but a
    /// document with several qualifying import statements only gets
    /// previews for the first; known limitation of this variant.
    SinglePass,
    /// Loop the matcher, advancing the search window past each match,
    /// until no qualifying import remains.
    #[default]
    Exhaustive,
}

/// Collect all qualifying import statements per the chosen strategy.
///
/// Each returned match carries absolute offsets. A matched statement that
/// fails to advance the window terminates the loop rather than spinning.
pub fn scan_imports(text: &str, strategy: ScanStrategy) -> Vec<ImportMatch> {
    let mut found = Vec::new();
    let mut base = 0;

    while base <= text.len() {
        let Some(m) = find_import(&text[base..]) else {
            break;
        };

        let rebased = ImportMatch {
            package_name: m.package_name,
            names_group: m.names_group,
            names_offset: base + m.names_offset,
            resume_offset: base + m.resume_offset,
        };

        // Degenerate match guard: a window that does not advance would
        // loop forever; treat it as no-match.
        if rebased.resume_offset <= base {
            log::warn!("import match at offset {} did not advance the scan window", base);
            break;
        }

        let next_base = rebased.resume_offset;
        found.push(rebased);

        if strategy == ScanStrategy::SinglePass {
            break;
        }
        base = next_base;
    }

    found
}

/// Run a full scan over `text`: locate qualifying imports and resolve every
/// identifier in their name lists to an absolute byte range.
pub fn collect_icon_matches(text: &str, strategy: ScanStrategy) -> Vec<IconMatch> {
    let mut matches = Vec::new();
    for import in scan_imports(text, strategy) {
        matches.extend(resolve_ranges(
            &import.names_group,
            import.names_offset,
            &import.package_name,
        ));
    }
    matches
}
