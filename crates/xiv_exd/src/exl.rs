//! Table list (`exd/root.exl`) parsing.

/// Path of the table list inside the archive
pub const ROOT_PATH: &str = "exd/root.exl";

/// Table names listed in an exl file
///
/// The first line is a header. Every other non-empty line starts with a table name, followed by
/// a comma and an id that is ignored.
pub fn parse_table_list(data: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(data)
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::exl::parse_table_list;

    #[test]
    fn skip_header_and_ids() {
        let input = b"EXLT,2\r\nAction,4\r\nquest/000/ClsArc001_00001,-1\r\n\r\nItem,10";

        assert_eq!(
            parse_table_list(input),
            vec!["Action", "quest/000/ClsArc001_00001", "Item"]
        );
    }

    #[test]
    fn header_only() {
        assert!(parse_table_list(b"EXLT,2\n").is_empty());
        assert!(parse_table_list(b"").is_empty());
    }
}
