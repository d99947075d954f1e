//! Filter-spec path parsing.
//!
//! A filter spec is a list of path expressions separated by `,` or `;`.
//! Each expression is `.`-separated segments, optionally prefixed with any
//! number of `!` (each one toggles exclusion), and may use parenthesized
//! groups that expand Cartesian-style: `a.(b,c)` becomes `a.b` and `a.c`.

pub(crate) const PROPERTY_SEPARATOR: char = '.';
pub(crate) const EXCLUDE_PREFIX: char = '!';
pub(crate) const PATH_SEPARATOR: char = ',';
pub(crate) const ALTERNATE_PATH_SEPARATOR: char = ';';
pub(crate) const GROUP_OPENER: char = '(';
pub(crate) const GROUP_CLOSER: char = ')';
pub(crate) const ANY_PROPERTY: &str = "*";

/// One parsed path: segment names plus a net exclusion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PropertyPath {
    pub parts: Vec<String>,
    pub is_excluded: bool,
}

impl PropertyPath {
    /// Parses a dotted path, optionally prefixed with a root path.
    ///
    /// Each segment is trimmed; a `!` at the start of any segment (after
    /// trimming) is stripped and toggles the exclusion flag for the whole
    /// path. Empty segments fail the parse.
    pub fn try_parse(full_name: &str, root_path: Option<&str>) -> Option<PropertyPath> {
        let prefix = match root_path {
            Some(root) if !root.trim().is_empty() => {
                format!("{}{}", root.trim(), PROPERTY_SEPARATOR)
            }
            _ => String::new(),
        };

        let full = format!("{prefix}{full_name}");
        let mut parts = Vec::new();
        let mut is_excluded = false;

        for raw_part in full.split(PROPERTY_SEPARATOR) {
            let mut part = raw_part.trim();
            if part.is_empty() {
                return None;
            }
            while let Some(rest) = part.strip_prefix(EXCLUDE_PREFIX) {
                part = rest.trim();
                if part.is_empty() {
                    return None;
                }
                is_excluded = !is_excluded;
            }
            parts.push(part.to_string());
        }

        if parts.is_empty() {
            None
        } else {
            Some(PropertyPath { parts, is_excluded })
        }
    }
}

pub(crate) fn is_path_boundary(ch: char) -> bool {
    matches!(
        ch,
        PATH_SEPARATOR | ALTERNATE_PATH_SEPARATOR | GROUP_OPENER | GROUP_CLOSER
    )
}

/// Splits a filter spec into full path expressions, expanding groups.
///
/// Empty expressions between separators are skipped. Exclusion prefixes and
/// segment validity are handled later by [`PropertyPath::try_parse`].
pub(crate) fn split_full_paths(text: &str) -> Vec<String> {
    let mut index = 0;
    do_split_full_paths(text, &mut index)
}

fn do_split_full_paths(text: &str, index: &mut usize) -> Vec<String> {
    let mut results = Vec::new();
    let mut prefixes: Option<Vec<String>> = None;

    loop {
        let next_index = if *index < text.len() {
            text[*index..]
                .find(is_path_boundary)
                .map_or(text.len(), |offset| *index + offset)
        } else {
            text.len()
        };

        let chunk = text[*index..next_index].trim();
        if !chunk.is_empty() {
            prefixes = Some(match prefixes {
                Some(existing) => existing
                    .into_iter()
                    .map(|prefix| format!("{prefix}{chunk}"))
                    .collect(),
                None => vec![chunk.to_string()],
            });
        }

        let next_char = text[next_index..].chars().next();
        if next_char == Some(GROUP_OPENER) {
            *index = next_index + 1;
            let group_paths = do_split_full_paths(text, index);
            prefixes = Some(match prefixes {
                Some(existing) => existing
                    .iter()
                    .flat_map(|prefix| {
                        group_paths
                            .iter()
                            .map(move |group_path| format!("{prefix}{group_path}"))
                    })
                    .collect(),
                None => group_paths,
            });
        } else {
            if let Some(full_paths) = prefixes.take() {
                results.extend(full_paths);
            }
            *index = next_index;
            if next_char.is_none() || next_char == Some(GROUP_CLOSER) {
                break;
            }
        }

        if *index < text.len() {
            *index += 1;
        }
    }

    results
}
