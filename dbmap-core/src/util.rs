/// Character marking a bind parameter in caller-authored SQL text.
pub const PLACEHOLDER: char = '?';

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Byte offsets of the placeholder markers in `sql`, left to right.
///
/// Markers inside single quoted, double quoted or backtick quoted spans are
/// literal text. A doubled quote character inside a span is an escaped quote and
/// keeps the span open, so does a backslash escaped quote inside `'..'` and `".."`.
pub fn placeholder_positions(sql: &str) -> impl Iterator<Item = usize> + '_ {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    sql.char_indices().filter_map(move |(i, c)| {
        match quote {
            Some(..) if escaped => escaped = false,
            Some(q) if c == '\\' && q != '`' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(..) => {}
            None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
            None if c == PLACEHOLDER => return Some(i),
            None => {}
        }
        None
    })
}

/// Longest prefix of `value` within 497 bytes that ends on a character boundary.
pub fn truncated(value: &str) -> &str {
    let mut end = value.len().min(497);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].trim_end()
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncated(&$query),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Builds the argument vector of a query, converting every item into a [`Value`](crate::Value).
///
/// ```rust
/// use dbmap_core::{Value, params};
/// let args = params![vec![2, 3, 4], "abc"];
/// assert_eq!(args.len(), 2);
/// assert!(matches!(args[0], Value::List(..)));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}
