use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

const LIKE_ESCAPE: char = '\\';

/// Case-insensitive substring match of `needle` against `column`.
/// `%` and `_` in the needle match themselves.
pub fn icontains<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Matches when any of `columns` contains `needle`, ignoring case.
pub fn icontains_any<C: ColumnTrait>(columns: &[C], needle: &str) -> Condition {
    columns
        .iter()
        .fold(Condition::any(), |condition, column| {
            condition.add(icontains(*column, needle))
        })
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Adds one to `column` in a single `UPDATE ... SET col = col + 1`.
/// Returns whether a row matched `filter`.
pub async fn increment<E, C>(db: &C, column: E::Column, filter: SimpleExpr) -> Result<bool, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(column, Expr::col(column).add(1))
        .filter(filter)
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Search terms are matched as typed; only a missing or empty term means
/// "no text filter".
pub fn normalize_query(query: Option<&str>) -> Option<&str> {
    query.filter(|q| !q.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_keeps_whitespace() {
        assert_eq!(normalize_query(Some(" calculus ")), Some(" calculus "));
        assert_eq!(normalize_query(Some("   ")), Some("   "));
        assert_eq!(normalize_query(Some("")), None);
        assert_eq!(normalize_query(None), None);
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("lab_1"), "lab\\_1");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("graph"), "graph");
    }
}
