//! Tabular views over FPL JSON payloads.
//!
//! A [`Table`] is a list of flat rows with named columns and an index made of
//! one or more natural-key columns (`id`, `(player_id, fixture)`, ...). Tables
//! without index columns are positional: rows are addressed by their number.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{FplError, Result};


/// Widest a cell gets in the text rendering before it is cut.
const MAX_CELL_WIDTH: usize = 28;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index_names: Vec<String>,
    columns: Vec<String>,
    keys: Vec<Vec<Value>>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    pos: usize,
}

impl Table {
    /// Build a table from an array of JSON objects.
    ///
    /// `index` names the natural-key columns; every record must carry them.
    /// Columns listed in `exclude` are dropped. An empty `records` slice gives
    /// a zero-row table that still knows its index names.
    pub fn from_records(records: &[Value], index: &[&str], exclude: &[&str]) -> Result<Self> {
        let mut objects = Vec::with_capacity(records.len());
        for record in records {
            let obj = record
                .as_object()
                .ok_or_else(|| FplError::unexpected(format!("expected an object, got {record}")))?;
            objects.push(obj);
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                let k = key.as_str();
                if index.contains(&k) || exclude.contains(&k) {
                    continue;
                }
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }

        let mut keys = Vec::with_capacity(objects.len());
        let mut rows = Vec::with_capacity(objects.len());
        for obj in objects {
            let key = index
                .iter()
                .map(|name| {
                    obj.get(*name)
                        .cloned()
                        .ok_or_else(|| FplError::MissingIndexKey {
                            key: name.to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            let row = columns
                .iter()
                .map(|c| obj.get(c).cloned().unwrap_or(Value::Null))
                .collect();
            keys.push(key);
            rows.push(row);
        }

        Ok(Self {
            index_names: index.iter().map(|s| s.to_string()).collect(),
            columns,
            keys,
            rows,
        })
    }

    /// A single top-level object as a one-row table.
    pub fn from_record(record: &Value, index: &[&str]) -> Result<Self> {
        Self::from_records(std::slice::from_ref(record), index, &[])
    }

    /// Flatten the child collection `child_field` of every parent into its own
    /// table.
    ///
    /// Each child row is tagged with its parent's `parent_key` value under the
    /// column `tag`, and the result is indexed by `(tag, child_key)`. A missing
    /// or `null` child collection counts as empty.
    pub fn explode(
        parents: &[Value],
        parent_key: &str,
        child_field: &str,
        tag: &str,
        child_key: &str,
    ) -> Result<Self> {
        let mut children = Vec::new();
        for parent in parents {
            let obj = parent
                .as_object()
                .ok_or_else(|| FplError::unexpected(format!("expected an object, got {parent}")))?;
            let parent_id = obj
                .get(parent_key)
                .cloned()
                .ok_or_else(|| FplError::MissingIndexKey {
                    key: parent_key.to_string(),
                })?;

            let items = match obj.get(child_field) {
                None | Some(Value::Null) => continue,
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(FplError::unexpected(format!(
                        "'{child_field}' should be an array, got {other}"
                    )))
                }
            };

            for item in items {
                let mut child: Map<String, Value> = item
                    .as_object()
                    .cloned()
                    .ok_or_else(|| {
                        FplError::unexpected(format!("'{child_field}' entry is not an object"))
                    })?;
                child.insert(tag.to_string(), parent_id.clone());
                children.push(Value::Object(child));
            }
        }

        Self::from_records(&children, &[tag, child_key], &[])
    }

    /// Rename one index level. Unknown names are left alone.
    pub fn rename_index(mut self, from: &str, to: &str) -> Self {
        for name in self.index_names.iter_mut() {
            if name.as_str() == from {
                *name = to.to_string();
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_positional(&self) -> bool {
        self.index_names.is_empty()
    }

    /// Row number of the row with the given index key.
    pub fn position(&self, key: &[Value]) -> Option<usize> {
        if self.is_positional() {
            return match key {
                [v] => v
                    .as_u64()
                    .map(|n| n as usize)
                    .filter(|n| *n < self.rows.len()),
                _ => None,
            };
        }
        self.keys.iter().position(|k| k.as_slice() == key)
    }

    pub fn get(&self, key: &[Value]) -> Option<Row<'_>> {
        self.position(key).map(|pos| Row { table: self, pos })
    }

    pub fn row_at(&self, pos: usize) -> Option<Row<'_>> {
        (pos < self.rows.len()).then_some(Row { table: self, pos })
    }

    /// Cell lookup by index key and column name.
    pub fn value(&self, key: &[Value], column: &str) -> Option<&Value> {
        self.get(key).and_then(|row| row.get(column))
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.rows.len()).map(move |pos| Row { table: self, pos })
    }
}

impl<'a> Row<'a> {
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Index values of this row. Empty for positional tables.
    pub fn key(&self) -> &'a [Value] {
        &self.table.keys[self.pos]
    }

    /// Value of an index level or data column.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        if let Some(i) = self.table.index_names.iter().position(|n| n == column) {
            return self.table.keys[self.pos].get(i);
        }
        let i = self.table.columns.iter().position(|c| c == column)?;
        self.table.rows[self.pos].get(i)
    }

    pub fn values(&self) -> &'a [Value] {
        &self.table.rows[self.pos]
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let table = self.table;
        let mut map =
            serializer.serialize_map(Some(table.index_names.len() + table.columns.len()))?;
        for (name, value) in table.index_names.iter().zip(self.key()) {
            map.serialize_entry(name, value)?;
        }
        for (name, value) in table.columns.iter().zip(self.values()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Serializes as a list of flat records, index values first.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        text
    }
}

/// Aligned text grid, index columns first.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = self
            .index_names
            .iter()
            .chain(self.columns.iter())
            .cloned()
            .collect();
        let body: Vec<Vec<String>> = self
            .keys
            .iter()
            .zip(&self.rows)
            .map(|(key, row)| key.iter().chain(row.iter()).map(cell_text).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for line in &body {
            for (w, cell) in widths.iter_mut().zip(line) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line = cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c:<width$}", width = *w))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())
        };

        write_line(f, &header)?;
        for line in &body {
            write_line(f, line)?;
        }
        Ok(())
    }
}
