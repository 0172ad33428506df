//! Line codec for the comma-delimited, double-quote escaped CSV dialect.
//!
//! The codec works on one physical line at a time. It never fails: an
//! unterminated quote simply keeps the rest of the line inside the current
//! field.
//!
//! # Quoting Rule
//!
//! A field is quoted on output iff it contains a comma, a double quote, a
//! newline, `{` or `[`. The last two make embedded JSON always quoted, even
//! when a particular document happens to contain no commas.
//!
//! # Example
//!
//! ```
//! use epoch_expander::csv_handler::{format_line, parse_line};
//!
//! let fields = parse_line(r#"1,"a, b","say ""hi""""#);
//! assert_eq!(fields, vec!["1", "a, b", r#"say "hi""#]);
//!
//! assert_eq!(format_line(&fields), r#"1,"a, b","say ""hi""""#);
//! ```

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split one CSV line into its fields.
///
/// A double quote toggles quoted mode, except that two consecutive quotes
/// inside a quoted section produce one literal quote. Commas outside quotes
/// end the current field. The final field is always emitted, so an empty
/// line yields a single empty field and a trailing comma yields a trailing
/// empty field.
#[must_use]
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                current.push(QUOTE);
                chars.next();
            }
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    fields.push(current);
    fields
}

/// Returns true if `field` must be wrapped in quotes when written.
#[inline]
#[must_use]
pub fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\n', '{', '['])
}

/// Join fields into one CSV line, quoting where required.
#[must_use]
pub fn format_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        let field = field.as_ref();
        if needs_quoting(field) {
            line.push(QUOTE);
            line.push_str(&field.replace(QUOTE, "\"\""));
            line.push(QUOTE);
        } else {
            line.push_str(field);
        }
    }

    line
}
