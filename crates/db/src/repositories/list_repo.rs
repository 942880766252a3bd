//! Schema-driven list queries.
//!
//! Translates a [`ListQuery`] into SQL with [`QueryBuilder`]. Column and
//! table names come from the static collection schemas; every user-supplied
//! value is bound, never interpolated.

use devcamper_core::query::{
    Collection, Condition, FieldKind, FilterOp, FilterValue, ListQuery, Scalar, SortDirection,
    SortKey,
};
use devcamper_core::types::{DbId, Timestamp};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// Byte-order collation, so text ranges and sorts agree across adapters.
const BYTE_COLLATION: &str = " COLLATE \"C\"";

/// Generic list reads over any collection table.
pub struct ListRepo;

impl ListRepo {
    /// Count the rows matching `conditions`, ignoring paging.
    pub async fn count(
        pool: &PgPool,
        collection: Collection,
        conditions: &[Condition],
    ) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) FROM {}",
            collection.schema().table
        ));
        push_conditions(&mut builder, conditions);
        builder.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Fetch one page of rows, filtered and sorted per `query`.
    pub async fn fetch_page<T>(
        pool: &PgPool,
        collection: Collection,
        columns: &str,
        query: &ListQuery,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {columns} FROM {}",
            collection.schema().table
        ));
        push_conditions(&mut builder, &query.conditions);
        push_order_by(&mut builder, &query.sort);
        builder.push(" LIMIT ");
        builder.push_bind(to_i64(query.limit));
        builder.push(" OFFSET ");
        builder.push_bind(to_i64(query.skip()));
        builder.build_query_as::<T>().fetch_all(pool).await
    }

    /// Fetch the rows whose id is in `ids`.
    pub async fn fetch_by_ids<T>(
        pool: &PgPool,
        collection: Collection,
        columns: &str,
        ids: &[DbId],
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = format!(
            "SELECT {columns} FROM {} WHERE id = ANY($1)",
            collection.schema().table
        );
        sqlx::query_as::<_, T>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, conditions: &[Condition]) {
    for (i, condition) in conditions.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_condition(builder, condition);
    }
}

fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, condition: &Condition) {
    let column = condition.field.column;
    match (condition.field.kind, &condition.value) {
        // Array columns: equality is containment, `in` is overlap.
        (FieldKind::TextList, FilterValue::One(value)) => {
            push_scalar(builder, value);
            builder.push(" = ANY(").push(column).push(")");
        }
        (FieldKind::TextList, FilterValue::Many(values)) => {
            builder.push(column).push(" && ");
            builder.push_bind(texts(values));
        }
        (kind, FilterValue::Many(values)) => {
            builder.push(column).push(" = ANY(");
            push_array(builder, kind, values);
            builder.push(")");
        }
        (kind, FilterValue::One(value)) => {
            builder.push(column);
            if kind == FieldKind::Text {
                builder.push(BYTE_COLLATION);
            }
            builder.push(sql_operator(condition.op));
            push_scalar(builder, value);
        }
    }
}

fn sql_operator(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq | FilterOp::In => " = ",
        FilterOp::Gt => " > ",
        FilterOp::Gte => " >= ",
        FilterOp::Lt => " < ",
        FilterOp::Lte => " <= ",
    }
}

fn push_scalar(builder: &mut QueryBuilder<'_, Postgres>, value: &Scalar) {
    match value {
        Scalar::Int(v) => builder.push_bind(*v),
        Scalar::Float(v) => builder.push_bind(*v),
        Scalar::Text(v) => builder.push_bind(v.clone()),
        Scalar::Bool(v) => builder.push_bind(*v),
        Scalar::Timestamp(v) => builder.push_bind(*v),
    };
}

/// Bind an `in` list as a typed array matching the column.
fn push_array(builder: &mut QueryBuilder<'_, Postgres>, kind: FieldKind, values: &[Scalar]) {
    match kind {
        FieldKind::Id | FieldKind::Int => {
            let ints: Vec<i64> = values
                .iter()
                .filter_map(|v| match v {
                    Scalar::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            builder.push_bind(ints);
        }
        FieldKind::Float => {
            let floats: Vec<f64> = values
                .iter()
                .filter_map(|v| match v {
                    Scalar::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            builder.push_bind(floats);
        }
        FieldKind::Bool => {
            let bools: Vec<bool> = values
                .iter()
                .filter_map(|v| match v {
                    Scalar::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            builder.push_bind(bools);
        }
        FieldKind::Timestamp => {
            let stamps: Vec<Timestamp> = values
                .iter()
                .filter_map(|v| match v {
                    Scalar::Timestamp(t) => Some(*t),
                    _ => None,
                })
                .collect();
            builder.push_bind(stamps);
        }
        FieldKind::Text | FieldKind::TextList => {
            builder.push_bind(texts(values));
        }
    }
}

fn texts(values: &[Scalar]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| match v {
            Scalar::Text(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

/// Missing values sort before present ones in ascending order and after
/// them in descending order.
fn push_order_by(builder: &mut QueryBuilder<'_, Postgres>, sort: &[SortKey]) {
    if sort.is_empty() {
        return;
    }
    builder.push(" ORDER BY ");
    let mut keys = builder.separated(", ");
    for key in sort {
        let collation = if key.field.kind == FieldKind::Text {
            BYTE_COLLATION
        } else {
            ""
        };
        let direction = match key.direction {
            SortDirection::Asc => " ASC NULLS FIRST",
            SortDirection::Desc => " DESC NULLS LAST",
        };
        keys.push(format!("{}{collation}{direction}", key.field.column));
    }
}

#[cfg(test)]
mod tests {
    use devcamper_core::query::DefaultOrder;

    use super::*;

    fn plan(raw: &[(&str, &str)]) -> ListQuery {
        let pairs: Vec<(String, String)> = raw
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListQuery::parse(Collection::Bootcamps.schema(), &pairs, DefaultOrder::OldestFirst)
            .unwrap()
    }

    fn where_sql(raw: &[(&str, &str)]) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM bootcamps");
        push_conditions(&mut builder, &plan(raw).conditions);
        builder.sql().to_string()
    }

    #[test]
    fn range_conditions_bind_values() {
        assert_eq!(
            where_sql(&[("averageCost[gte]", "10000"), ("housing", "true")]),
            "SELECT id FROM bootcamps WHERE average_cost >= $1 AND housing = $2"
        );
    }

    #[test]
    fn list_fields_use_array_operators() {
        assert_eq!(
            where_sql(&[("careers", "Business")]),
            "SELECT id FROM bootcamps WHERE $1 = ANY(careers)"
        );
        assert_eq!(
            where_sql(&[("careers[in]", "Business,UI/UX")]),
            "SELECT id FROM bootcamps WHERE careers && $1"
        );
    }

    #[test]
    fn text_ranges_use_byte_collation() {
        assert_eq!(
            where_sql(&[("location.city[gt]", "M")]),
            "SELECT id FROM bootcamps WHERE city COLLATE \"C\" > $1"
        );
    }

    #[test]
    fn order_by_places_nulls_as_smallest() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM bootcamps");
        push_order_by(&mut builder, &plan(&[("sort", "-averageCost,name")]).sort);
        assert_eq!(
            builder.sql(),
            "SELECT id FROM bootcamps ORDER BY average_cost DESC NULLS LAST, \
             name COLLATE \"C\" ASC NULLS FIRST, id DESC NULLS LAST"
        );
    }
}
