use crate::error::{Result, StandardizeError};

/// A single cell of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// A named, ordered sequence of cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// In-memory table of uniquely named, row-aligned columns.
///
/// Column order is insertion order. Every column has the same number of rows;
/// [`Table::push_column`] enforces it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TableRepr"))]
pub struct Table {
    columns: Vec<Column>,
}

/// Unchecked wire form; every column is replayed through `push_column`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TableRepr {
    columns: Vec<Column>,
}

#[cfg(feature = "serde")]
impl TryFrom<TableRepr> for Table {
    type Error = StandardizeError;

    fn try_from(repr: TableRepr) -> Result<Self> {
        let mut table = Table::new();
        for column in repr.columns {
            table.push_column(column.name, column.values)?;
        }
        Ok(table)
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Table::push_column`].
    pub fn with_column<V: Into<Value>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Append a column. Fails on a duplicate name or a row count that
    /// differs from the columns already present.
    pub fn push_column<V: Into<Value>>(
        &mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(StandardizeError::DuplicateColumn { name });
        }

        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if let Some(first) = self.columns.first() {
            if first.len() != values.len() {
                return Err(StandardizeError::LengthMismatch {
                    name,
                    expected: first.len(),
                    found: values.len(),
                });
            }
        }

        self.columns.push(Column::new(name, values));
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}
