use crate::{MappingError, PLACEHOLDER, Result, Value, placeholder_positions, separated_by};

/// Pair the `?` markers of `query` with `args`, expanding sequence arguments.
///
/// A [`Value::List`] argument replaces its marker with one marker per element,
/// joined by `", "`, and contributes its elements to the returned arguments in
/// order. An empty list becomes the literal `NULL` and contributes nothing, so
/// `x IN (?)` turns into `x IN (NULL)`. A NULL list is a single NULL argument.
/// Every other argument is passed through. Text outside the markers is kept
/// verbatim and the markers are left in the `?` syntax.
pub fn expand(query: &str, args: Vec<Value>) -> Result<(String, Vec<Value>)> {
    let positions: Vec<usize> = placeholder_positions(query).collect();
    if positions.len() != args.len() {
        return Err(MappingError::ArgumentCount {
            markers: positions.len(),
            arguments: args.len(),
        }
        .into());
    }
    if !args.iter().any(|v| matches!(v, Value::List(Some(..), ..))) {
        return Ok((query.to_owned(), args));
    }
    let mut sql = String::with_capacity(query.len() + 16);
    let mut flat = Vec::with_capacity(args.len());
    let mut last = 0;
    for (position, arg) in positions.into_iter().zip(args) {
        sql.push_str(&query[last..position]);
        last = position + PLACEHOLDER.len_utf8();
        match arg {
            Value::List(Some(items), ..) if items.is_empty() => sql.push_str("NULL"),
            Value::List(Some(items), ..) => {
                separated_by(
                    &mut sql,
                    items.iter(),
                    |out, _| out.push(PLACEHOLDER),
                    ", ",
                );
                flat.extend(items);
            }
            Value::List(None, ..) => {
                sql.push(PLACEHOLDER);
                flat.push(Value::Null);
            }
            other => {
                sql.push(PLACEHOLDER);
                flat.push(other);
            }
        }
    }
    sql.push_str(&query[last..]);
    Ok((sql, flat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn scalars_pass_through() {
        let (sql, args) = expand("SELECT * FROM t WHERE a = ? AND b = ?", params![1, "x"]).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE a = ? AND b = ?");
        assert_eq!(args, params![1, "x"]);
    }

    #[test]
    fn list_becomes_markers() {
        let (sql, args) = expand(
            "SELECT * FROM t WHERE id IN (?) AND name = ?",
            params![vec![2, 3, 4], "abc"],
        )
        .unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE id IN (?, ?, ?) AND name = ?");
        assert_eq!(args, params![2, 3, 4, "abc"]);
    }

    #[test]
    fn empty_list_is_null() {
        let (sql, args) = expand("SELECT * FROM t WHERE id IN (?)", params![Vec::<i64>::new()]).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE id IN (NULL)");
        assert!(args.is_empty());
    }

    #[test]
    fn count_mismatch() {
        let error = expand("SELECT ? + ?", params![1]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<MappingError>(),
            Some(MappingError::ArgumentCount {
                markers: 2,
                arguments: 1
            })
        ));
        assert!(expand("SELECT '?'", params![1]).is_err());
    }

    #[test]
    fn escaped_quotes_keep_the_literal() {
        let (sql, args) = expand(
            r"SELECT * FROM t WHERE a = 'it\'s ?' AND id IN (?)",
            params![vec![1, 2]],
        )
        .unwrap();
        assert_eq!(sql, r"SELECT * FROM t WHERE a = 'it\'s ?' AND id IN (?, ?)");
        assert_eq!(args, params![1, 2]);
    }
}
