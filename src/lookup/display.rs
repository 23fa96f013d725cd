#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ViewMode {
    /// Closed with a value: label plus a clear affordance.
    Chip { label: String },
    SearchBox,
}

/// Chooses between the chip and the search box.
///
/// An open control always shows the search box. A closed control with a value
/// shows a chip labelled with `display_name`, or with the raw value when the
/// parent supplied none (e.g. an edit form prefilled without a fetched option).
pub(crate) fn view_mode(value: &str, display_name: &str, is_open: bool) -> ViewMode {
    if is_open || value.is_empty() {
        return ViewMode::SearchBox;
    }
    let label = if display_name.trim().is_empty() {
        value
    } else {
        display_name
    };
    ViewMode::Chip {
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_always_shows_search_box() {
        for value in ["", "C001"] {
            for name in ["", "Budi Santoso"] {
                assert_eq!(view_mode(value, name, true), ViewMode::SearchBox);
            }
        }
    }

    #[test]
    fn closed_with_value_shows_chip() {
        assert_eq!(
            view_mode("C001", "Budi Santoso", false),
            ViewMode::Chip {
                label: "Budi Santoso".to_string()
            }
        );
    }

    #[test]
    fn chip_falls_back_to_raw_value() {
        assert_eq!(
            view_mode("4-100", "", false),
            ViewMode::Chip {
                label: "4-100".to_string()
            }
        );
        assert_eq!(
            view_mode("4-100", "   ", false),
            ViewMode::Chip {
                label: "4-100".to_string()
            }
        );
    }

    #[test]
    fn empty_value_forces_search_box() {
        assert_eq!(view_mode("", "stale label", false), ViewMode::SearchBox);
    }
}
