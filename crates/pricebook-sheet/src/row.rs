//! Splitting one line of a delimited export into fields.

/// Splits a comma-delimited line into trimmed fields.
#[must_use]
pub fn parse_row(line: &str) -> Vec<String> {
    parse_row_with(line, ',')
}

/// Splits `line` on `delimiter`, honouring double-quoted fields.
///
/// Every `"` toggles the quoted state and is dropped from the output, so an
/// escaped `""` inside a quoted field disappears instead of becoming a literal
/// quote. Unbalanced quotes never fail; the rest of the line is simply read
/// as one quoted field.
#[must_use]
pub fn parse_row_with(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut current = String::new();

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            fields.push(finish_field(&current));
            current.clear();
        } else {
            current.push(c);
        }
    }
    fields.push(finish_field(&current));

    fields
}

fn finish_field(raw: &str) -> String {
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    unquoted.trim().to_string()
}

/// Splits sheet text into its non-blank lines.
pub(crate) fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.trim().is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        assert_eq!(parse_row("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn trims_each_field() {
        assert_eq!(parse_row("  a , b ,c  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn delimiter_inside_quotes_is_kept() {
        assert_eq!(
            parse_row(r#""IP 11","R$ 1.234,56",PRETO"#),
            vec!["IP 11", "R$ 1.234,56", "PRETO"]
        );
    }

    #[test]
    fn empty_fields_are_preserved() {
        assert_eq!(parse_row("a,,c,"), vec!["a", "", "c", ""]);
    }

    #[test]
    fn empty_line_yields_single_empty_field() {
        assert_eq!(parse_row(""), vec![""]);
    }

    #[test]
    fn doubled_quotes_are_dropped() {
        assert_eq!(parse_row(r#""tela ""OLED""",x"#), vec!["tela OLED", "x"]);
    }

    #[test]
    fn unbalanced_quote_swallows_rest_of_line() {
        assert_eq!(parse_row(r#"a,"b,c"#), vec!["a", "b,c"]);
    }

    #[test]
    fn custom_delimiter() {
        assert_eq!(parse_row_with("a;\"b;c\";d", ';'), vec!["a", "b;c", "d"]);
    }

    #[test]
    fn non_blank_lines_skips_whitespace_only_lines() {
        let text = "h1,h2\r\n\r\n  \na,b\n";
        assert_eq!(non_blank_lines(text), vec!["h1,h2", "a,b"]);
    }
}
