use crate::types::MergeError;

/// Column holding the identifying name used as the merge key
pub const NAME_COLUMN: &str = "Name";

/// Separator between the values of a multi-value field
pub const MULTI_VALUE_SEPARATOR: &str = " ::: ";

/// Ordered column names taken from the header line
///
/// The schema is fixed for the whole run: every [`Record`] carries exactly one
/// value per column, in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<String>,
    name_index: usize,
}

impl ColumnSchema {
    /// Build a schema from the tokenized header line
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` if no column is named `Name`.
    pub fn from_header(columns: Vec<String>) -> Result<Self, MergeError> {
        let name_index = columns
            .iter()
            .position(|col| col == NAME_COLUMN)
            .ok_or_else(|| MergeError::missing_column(NAME_COLUMN))?;

        Ok(ColumnSchema {
            columns,
            name_index,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the `Name` column
    pub fn name_index(&self) -> usize {
        self.name_index
    }

    /// Position of a column by exact name
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == column)
    }
}

/// One contact row, stored positionally against a [`ColumnSchema`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    /// Wrap values that already match the schema width
    pub fn new(values: Vec<String>) -> Self {
        Record { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, index: usize, value: String) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// The identifying name of this contact (may be empty)
    pub fn name(&self, schema: &ColumnSchema) -> &str {
        self.get(schema.name_index())
    }

    /// Look up a value by column name
    pub fn field<'a>(&'a self, schema: &ColumnSchema, column: &str) -> Option<&'a str> {
        schema.index_of(column).map(|index| self.get(index))
    }
}

/// Split a multi-value field into its parts
///
/// An empty field has no values.
pub fn split_multi_value(value: &str) -> Vec<&str> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split(MULTI_VALUE_SEPARATOR).collect()
    }
}
