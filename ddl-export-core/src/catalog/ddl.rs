//! DDL reconstruction from column metadata.

use crate::models::{ColumnDef, ColumnRecord, TableRef};

/// Types whose declared length is part of the type name
const CHARACTER_TYPES: [&str; 4] = ["VARCHAR2", "CHAR", "NVARCHAR2", "NCHAR"];

/// Fixed-point type that carries precision and scale
const NUMERIC_TYPE: &str = "NUMBER";

/// Resolves the declared type of a column from its catalog row.
///
/// ```rust
/// use ddl_export_core::catalog::resolve_type;
/// use ddl_export_core::models::ColumnRecord;
///
/// let record = ColumnRecord {
///     data_type: "NUMBER".to_string(),
///     data_precision: Some(12),
///     data_scale: Some(2),
///     ..Default::default()
/// };
/// assert_eq!(resolve_type(&record), "NUMBER(12,2)");
/// ```
pub fn resolve_type(record: &ColumnRecord) -> String {
    let base = record.data_type.trim();

    if CHARACTER_TYPES.contains(&base) {
        if let Some(length) = record.data_length {
            return format!("{}({})", base, length);
        }
    } else if base == NUMERIC_TYPE
        && let Some(precision) = record.data_precision
    {
        return match record.data_scale {
            Some(scale) if scale > 0 => format!("{}({},{})", base, precision, scale),
            _ => format!("{}({})", base, precision),
        };
    }

    base.to_string()
}

impl From<ColumnRecord> for ColumnDef {
    fn from(record: ColumnRecord) -> Self {
        let type_name = resolve_type(&record);
        let default_value = record
            .data_default
            .map(|expr| expr.trim().to_string())
            .filter(|expr| !expr.is_empty());

        Self {
            name: record.name,
            type_name,
            nullable: record.nullable.trim() != "N",
            default_value,
        }
    }
}

/// Formats one column as it appears inside `CREATE TABLE (...)`.
pub fn column_line(column: &ColumnDef) -> String {
    let mut line = format!("    {} {}", column.name, column.type_name);

    if !column.nullable {
        line.push_str(" NOT NULL");
    }

    if let Some(default) = &column.default_value {
        line.push_str(" DEFAULT ");
        line.push_str(default);
    }

    line
}

/// Builds a `CREATE TABLE` statement from column definitions.
///
/// Columns keep their given order. A table without columns produces an
/// empty body rather than an error.
pub fn synthesize_ddl(table: &TableRef, columns: &[ColumnDef]) -> String {
    let body = columns
        .iter()
        .map(column_line)
        .collect::<Vec<_>>()
        .join(",\n");

    format!("CREATE TABLE {}.{} (\n{}\n);\n", table.owner, table.name, body)
}
