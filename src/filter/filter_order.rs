use sqlx::{QueryBuilder, Sqlite};

use super::types::BookSort;

pub struct FilterOrder;

impl FilterOrder {
    /// `ORDER BY` for a book listing. Ties break on id in the same direction
    /// so pages never overlap.
    pub fn generate(sort: &BookSort) -> String {
        let dir = sort.direction.to_sql();
        format!(" ORDER BY books.{} {}, books.id {}", sort.field.column(), dir, dir)
    }

    pub fn push(qb: &mut QueryBuilder<'_, Sqlite>, sort: &BookSort) {
        qb.push(Self::generate(sort));
    }
}
