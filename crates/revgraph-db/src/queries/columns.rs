//! Column-major query results.
//!
//! Aggregate queries come back row by row; the graph builders want one
//! sequence per selected column. `Columns` holds that transposed view, with
//! every column the same length and positions aligned to the original row
//! order.

use rusqlite::types::Value;
use rusqlite::Params;
use tracing::debug;

use crate::pool::{DbError, DbPool, DbResult};

/// One selected column across all rows.
pub type Column = Vec<Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    columns: Vec<Column>,
    rows: usize,
}

impl Columns {
    /// Transpose row-major values into `width` columns.
    pub fn from_rows(width: usize, rows: Vec<Vec<Value>>) -> Self {
        let row_count = rows.len();
        let mut columns: Vec<Column> = (0..width).map(|_| Vec::with_capacity(row_count)).collect();
        for row in rows {
            for (i, value) in row.into_iter().enumerate().take(width) {
                columns[i].push(value);
            }
        }
        Self { columns, rows: row_count }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column `index` as text values.
    pub fn text(&self, index: usize) -> DbResult<Vec<String>> {
        self.columns[index]
            .iter()
            .map(|v| match v {
                Value::Text(s) => Ok(s.clone()),
                _ => Err(DbError::ColumnType { index, expected: "text" }),
            })
            .collect()
    }

    /// Column `index` as integers.
    pub fn integer(&self, index: usize) -> DbResult<Vec<i64>> {
        self.columns[index]
            .iter()
            .map(|v| match v {
                Value::Integer(n) => Ok(*n),
                _ => Err(DbError::ColumnType { index, expected: "integer" }),
            })
            .collect()
    }

    /// Fail with `EmptyResult` when there are no rows.
    pub fn require_rows(self, what: &str) -> DbResult<Self> {
        if self.is_empty() {
            return Err(DbError::EmptyResult(what.to_string()));
        }
        Ok(self)
    }
}

/// Execute `sql` with `params` and return the result column-major.
pub fn query_columns<P: Params>(pool: &DbPool, sql: &str, params: P) -> DbResult<Columns> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(sql)?;
        let width = stmt.column_count();

        let rows = stmt
            .query_map(params, |row| {
                (0..width).map(|i| row.get::<_, Value>(i)).collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = rows.len(), width, "Query returned");
        Ok(Columns::from_rows(width, rows))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_transpose_keeps_alignment() {
        let cols = Columns::from_rows(
            3,
            vec![
                vec![text("A"), text("x"), Value::Integer(3)],
                vec![text("A"), text("y"), Value::Integer(1)],
                vec![text("B"), text("x"), Value::Integer(2)],
            ],
        );
        assert_eq!(cols.width(), 3);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols.text(0).unwrap(), vec!["A", "A", "B"]);
        assert_eq!(cols.text(1).unwrap(), vec!["x", "y", "x"]);
        assert_eq!(cols.integer(2).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn test_type_mismatch() {
        let cols = Columns::from_rows(1, vec![vec![Value::Integer(1)]]);
        assert!(matches!(cols.text(0), Err(DbError::ColumnType { index: 0, .. })));
    }

    #[test]
    fn test_require_rows() {
        let empty = Columns::from_rows(2, vec![]);
        assert_eq!(empty.width(), 2);
        assert!(matches!(empty.require_rows("nothing"), Err(DbError::EmptyResult(_))));
    }

    #[test]
    fn test_query_columns() {
        let pool = DbPool::in_memory().unwrap();
        pool.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE t (k TEXT, v INTEGER);
                 INSERT INTO t VALUES ('a', 1), ('b', 2), ('c', 3);",
            )?;
            Ok(())
        })
        .unwrap();

        let cols = query_columns(&pool, "SELECT k, v FROM t WHERE v > ?1 ORDER BY k", [1]).unwrap();
        assert_eq!(cols.text(0).unwrap(), vec!["b", "c"]);
        assert_eq!(cols.integer(1).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_malformed_query_propagates() {
        let pool = DbPool::in_memory().unwrap();
        assert!(matches!(
            query_columns(&pool, "SELEC nonsense", []),
            Err(DbError::Connection(_))
        ));
    }
}
