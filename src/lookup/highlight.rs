#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    pub text: String,
    pub matched: bool,
}

/// Splits `label` into runs, marking case-insensitive occurrences of `query`.
///
/// Matches are found left to right and never overlap.
pub(crate) fn highlight(label: &str, query: &str) -> Vec<Segment> {
    let needle: Vec<char> = query.trim().chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() || label.is_empty() {
        return vec![Segment {
            text: label.to_string(),
            matched: false,
        }];
    }

    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < label.len() {
        if let Some(end) = match_at(label, pos, &needle) {
            if plain_start < pos {
                out.push(Segment {
                    text: label[plain_start..pos].to_string(),
                    matched: false,
                });
            }
            out.push(Segment {
                text: label[pos..end].to_string(),
                matched: true,
            });
            pos = end;
            plain_start = end;
        } else {
            pos += label[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if plain_start < label.len() {
        out.push(Segment {
            text: label[plain_start..].to_string(),
            matched: false,
        });
    }
    out
}

/// Byte offset just past a match of `needle` starting at `start`, if any.
fn match_at(label: &str, start: usize, needle: &[char]) -> Option<usize> {
    let mut expected = needle.iter();
    let mut pending = expected.next();

    for (offset, ch) in label[start..].char_indices() {
        for lower in ch.to_lowercase() {
            match pending {
                Some(want) if *want == lower => pending = expected.next(),
                _ => return None,
            }
        }
        if pending.is_none() {
            return Some(start + offset + ch.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| {
                if s.matched {
                    format!("[{}]", s.text)
                } else {
                    s.text.clone()
                }
            })
            .collect()
    }

    #[test]
    fn empty_query_is_one_plain_segment() {
        let segments = highlight("Budi Santoso", "  ");
        assert_eq!(
            segments,
            vec![Segment {
                text: "Budi Santoso".to_string(),
                matched: false
            }]
        );
    }

    #[test]
    fn marks_case_insensitive_match() {
        assert_eq!(render(&highlight("Budi Santoso", "bud")), "[Bud]i Santoso");
        assert_eq!(render(&highlight("Budi Santoso", "SANTO")), "Budi [Santo]so");
    }

    #[test]
    fn marks_every_non_overlapping_match() {
        assert_eq!(render(&highlight("Banana", "ana")), "B[ana]na");
        assert_eq!(render(&highlight("aaaa", "aa")), "[aa][aa]");
    }

    #[test]
    fn no_match_keeps_label_intact() {
        let segments = highlight("Kas Kecil", "bank");
        assert_eq!(render(&segments), "Kas Kecil");
        assert!(segments.iter().all(|s| !s.matched));
    }

    #[test]
    fn handles_multibyte_labels() {
        assert_eq!(render(&highlight("Café Üter", "ü")), "Café [Ü]ter");
        assert_eq!(render(&highlight("Ünal", "ÜN")), "[Ün]al");
    }

    #[test]
    fn segments_rebuild_label() {
        let label = "Piutang Usaha - Budi";
        let joined: String = highlight(label, "u")
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(joined, label);
    }
}
