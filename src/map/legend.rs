//! Legend text for the selection

use std::collections::HashSet;

use crate::point::Point;

/// Legend lines for the selection, numbered by list position.
///
/// Group labels are appended only when the selection spans more than one
/// distinct group.
pub fn legend_lines(selection: &[Point]) -> Vec<String> {
    let groups: HashSet<&str> = selection.iter().filter_map(|p| p.group()).collect();
    let show_groups = groups.len() > 1;

    selection
        .iter()
        .enumerate()
        .map(|(index, point)| match point.group() {
            Some(group) if show_groups => format!("{}：{} [{}]", index + 1, point.name(), group),
            _ => format!("{}：{}", index + 1, point.name()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_group_has_no_brackets() {
        let selection = vec![
            Point::new("1", "Station", 35.0, 139.0).with_group("Show"),
            Point::new("2", "Bridge", 35.1, 139.1).with_group("Show"),
        ];
        insta::assert_snapshot!(legend_lines(&selection).join("\n"), @r"
        1：Station
        2：Bridge
        ");
    }

    #[test]
    fn test_multiple_groups_are_labelled() {
        let selection = vec![
            Point::new("1", "Station", 35.0, 139.0).with_group("Show A"),
            Point::new("2", "Bridge", 35.1, 139.1).with_group("Show B"),
            Point::new("3", "Cafe", 35.2, 139.2),
        ];
        insta::assert_snapshot!(legend_lines(&selection).join("\n"), @r"
        1：Station [Show A]
        2：Bridge [Show B]
        3：Cafe
        ");
    }

    #[test]
    fn test_empty_selection() {
        assert!(legend_lines(&[]).is_empty());
    }
}
