//
// range_resolver.rs
//
// Resolving imported identifiers to character ranges within a name list
//

use crate::types::IconMatch;

/// Resolve each identifier inside a brace-enclosed name list to a byte range.
///
/// `names_group` is the brace group as matched (braces included) and
/// `group_offset` its byte offset within the scanned text; emitted offsets
/// are absolute. Tokens are split on commas, trimmed, and empties discarded.
/// Each token is anchored at its first occurrence whose following character
/// is not an ASCII letter, so `Add` never resolves to the prefix of
/// `AddOutline`. A token with no valid occurrence is skipped, not fatal.
pub fn resolve_ranges(names_group: &str, group_offset: usize, package_name: &str) -> Vec<IconMatch> {
    let mut matches = Vec::new();

    for token in names_group.trim_matches(|c| c == '{' || c == '}').split(',') {
        let icon_name = token.trim();
        if icon_name.is_empty() {
            continue;
        }

        let Some(index) = locate_token(names_group, icon_name) else {
            log::trace!("no standalone occurrence of '{}' in name list", icon_name);
            continue;
        };

        let start_offset = group_offset + index;
        matches.push(IconMatch {
            icon_name: icon_name.to_string(),
            icon_package_name: package_name.to_string(),
            start_offset,
            end_offset: start_offset + icon_name.len(),
        });
    }

    matches
}

/// First occurrence of `token` in `list` whose next character is not an
/// ASCII letter. The brace group always ends in `}`, so a genuine token is
/// always followed by something; a token flush against the end of the slice
/// has no boundary character and does not count.
fn locate_token(list: &str, token: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = list[from..].find(token) {
        let index = from + found;
        match list[index + token.len()..].chars().next() {
            Some(c) if c.is_ascii_alphabetic() => {
                // Retry past this occurrence; the token may start with a
                // multibyte character, so advance a full char, not a byte.
                from = index + list[index..].chars().next().map_or(1, char::len_utf8);
            }
            Some(_) => return Some(index),
            None => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_simple_list() {
        let group = "{ AddOutline, Add }";
        let matches = resolve_ranges(group, 7, "@vicons/ionicons5");
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].icon_name, "AddOutline");
        assert_eq!(matches[0].start_offset, 9);
        assert_eq!(matches[0].end_offset, 19);

        assert_eq!(matches[1].icon_name, "Add");
        assert_eq!(matches[1].start_offset, 21);
        assert_eq!(matches[1].end_offset, 24);
    }

    #[test]
    fn prefix_token_does_not_match_inside_longer_token() {
        // `Add` must anchor on the standalone occurrence, not the prefix of
        // `AddOutline`; the two ranges must not overlap.
        let group = "{ AddOutline, Add }";
        let matches = resolve_ranges(group, 0, "@vicons/ionicons5");
        let add = matches.iter().find(|m| m.icon_name == "Add").unwrap();
        let outline = matches.iter().find(|m| m.icon_name == "AddOutline").unwrap();
        assert_eq!(add.start_offset, 14);
        assert!(add.start_offset >= outline.end_offset);
    }

    #[test]
    fn offsets_are_rebased_by_group_offset() {
        let group = "{ Airplane }";
        let matches = resolve_ranges(group, 100, "@ricons/tabler");
        assert_eq!(matches[0].start_offset, 102);
        assert_eq!(matches[0].end_offset, 110);
    }

    #[test]
    fn empty_tokens_are_discarded() {
        let group = "{ Add, , }";
        let matches = resolve_ranges(group, 0, "@vicons/ionicons5");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].icon_name, "Add");
    }

    #[test]
    fn multiline_group_with_trailing_comma() {
        let group = "{\n  AddOutline,\n  Add,\n}";
        let matches = resolve_ranges(group, 0, "@vicons/ionicons5");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].icon_name, "AddOutline");
        assert_eq!(matches[0].start_offset, 4);
        assert_eq!(matches[1].icon_name, "Add");
        assert_eq!(matches[1].start_offset, 18);
    }

    #[test]
    fn package_name_is_carried_through() {
        let matches = resolve_ranges("{ Add }", 0, "@sicons/material");
        assert_eq!(matches[0].icon_package_name, "@sicons/material");
    }

    #[test]
    fn locate_token_skips_letter_followed_occurrences() {
        assert_eq!(locate_token("{ AddOutline, Add }", "Add"), Some(14));
        assert_eq!(locate_token("{ AddOutline }", "AddOutline"), Some(2));
        assert_eq!(locate_token("{ AddOutline }", "Missing"), None);
    }

    #[test]
    fn multibyte_identifiers_resolve_without_panicking() {
        // `Ädd` is a prefix of `ÄddOutline`, so the first occurrence is
        // rejected and the search must step over the two-byte `Ä` cleanly.
        let group = "{ ÄddOutline, Ädd }";
        let matches = resolve_ranges(group, 0, "@vicons/ionicons5");
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].icon_name, "ÄddOutline");
        assert_eq!(matches[0].start_offset, 2);
        assert_eq!(matches[0].end_offset, 13);

        assert_eq!(matches[1].icon_name, "Ädd");
        assert_eq!(matches[1].start_offset, 15);
        assert_eq!(matches[1].end_offset, 19);
        assert_eq!(&group[15..19], "Ädd");
    }

    #[test]
    fn token_at_end_of_slice_has_no_boundary() {
        // Cannot happen for a real brace group (it ends in `}`), but the
        // boundary rule requires a following character.
        assert_eq!(locate_token("Add", "Add"), None);
    }
}
