use crate::core::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Column layout shared by every row of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetHeader {
    pub relation_name: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl DatasetHeader {
    pub fn new<I, S>(relation_name: String, columns: I) -> DatasetHeader
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        DatasetHeader {
            relation_name,
            columns,
            index,
        }
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_at_index(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    pub fn index_of_column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// One dataset row, values aligned with the header's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Row {
        Row { values }
    }

    /// `None` when the row is shorter than the header, i.e. the column is absent.
    #[inline]
    pub fn value_at_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

/// Row-oriented table handed to the sampler. Never mutated by the core.
#[derive(Debug, Clone)]
pub struct Dataset {
    header: Arc<DatasetHeader>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(header: Arc<DatasetHeader>, rows: Vec<Row>) -> Dataset {
        Dataset { header, rows }
    }

    pub fn header(&self) -> &Arc<DatasetHeader> {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shops() -> Dataset {
        let header = Arc::new(DatasetHeader::new(
            "sales".into(),
            ["shop_id", "item_price"],
        ));
        Dataset::new(
            header,
            vec![
                Row::new(vec![Value::from(1.0), Value::from(10.0)]),
                Row::new(vec![Value::from(2.0)]),
            ],
        )
    }

    #[test]
    fn header_resolves_column_names() {
        let ds = shops();
        let h = ds.header();
        assert_eq!(h.number_of_columns(), 2);
        assert_eq!(h.index_of_column("item_price"), Some(1));
        assert_eq!(h.index_of_column("missing"), None);
        assert_eq!(h.column_at_index(0), Some("shop_id"));
        assert_eq!(h.relation_name(), "sales");
    }

    #[test]
    fn short_rows_report_absent_columns() {
        let ds = shops();
        let row = ds.row(1).unwrap();
        assert_eq!(row.value_at_index(0), Some(&Value::from(2.0)));
        assert!(row.value_at_index(1).is_none());
        assert_eq!(ds.row(0).unwrap().value_at_index(1), Some(&Value::from(10.0)));
    }
}
