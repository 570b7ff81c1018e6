//! In-memory dataset: a schema plus an ordered sequence of typed tuples.
//!
//! The dataset is the single shared, mutable resource of a run. Components
//! take it by `&Dataset` when they only read and by `&mut Dataset` when they
//! rewrite cells. Tuples are never added or removed after loading.

use crate::{AttrId, DatasetError, DatasetResult, Schema, TupleId, Value};
use std::collections::HashSet;

/// A single row.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a cell by attribute id.
    pub fn get(&self, attr: AttrId) -> Option<&Value> {
        self.values.get(attr.index())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// The dataset snapshot.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    tuples: Vec<Tuple>,
}

impl Dataset {
    /// Create an empty dataset over a schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            tuples: Vec::new(),
        }
    }

    /// Create a dataset from rows, checking every row's width.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Value>>) -> DatasetResult<Self> {
        let mut dataset = Self::new(schema);
        for row in rows {
            dataset.push(row)?;
        }
        Ok(dataset)
    }

    /// Append a row (loading only).
    pub fn push(&mut self, values: Vec<Value>) -> DatasetResult<TupleId> {
        if values.len() != self.schema.len() {
            return Err(DatasetError::arity_mismatch(self.schema.len(), values.len()));
        }
        let id = TupleId::new(self.tuples.len());
        self.tuples.push(Tuple::new(values));
        Ok(id)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Get a tuple by id.
    pub fn tuple(&self, id: TupleId) -> Option<&Tuple> {
        self.tuples.get(id.index())
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    /// All tuple ids in row order.
    pub fn ids(&self) -> impl Iterator<Item = TupleId> {
        (0..self.tuples.len()).map(TupleId::new)
    }

    /// Read one cell.
    pub fn value(&self, id: TupleId, attr: AttrId) -> DatasetResult<&Value> {
        let tuple = self.tuple(id).ok_or(DatasetError::TupleNotFound(id))?;
        tuple.get(attr).ok_or(DatasetError::AttrNotFound(attr))
    }

    /// Overwrite one cell in place, returning the previous value.
    pub fn set_value(&mut self, id: TupleId, attr: AttrId, value: Value) -> DatasetResult<Value> {
        let tuple = self
            .tuples
            .get_mut(id.index())
            .ok_or(DatasetError::TupleNotFound(id))?;
        let cell = tuple
            .values
            .get_mut(attr.index())
            .ok_or(DatasetError::AttrNotFound(attr))?;
        Ok(std::mem::replace(cell, value))
    }

    /// Replace a whole row (used to roll back a failed rewrite).
    pub fn restore(&mut self, id: TupleId, tuple: Tuple) -> DatasetResult<()> {
        if tuple.values.len() != self.schema.len() {
            return Err(DatasetError::arity_mismatch(self.schema.len(), tuple.values.len()));
        }
        let slot = self
            .tuples
            .get_mut(id.index())
            .ok_or(DatasetError::TupleNotFound(id))?;
        *slot = tuple;
        Ok(())
    }

    /// Active domain of an attribute: distinct non-null values in
    /// first-appearance order.
    pub fn active_domain(&self, attr: AttrId) -> DatasetResult<Vec<Value>> {
        if attr.index() >= self.schema.len() {
            return Err(DatasetError::AttrNotFound(attr));
        }
        let mut seen = HashSet::new();
        let mut domain = Vec::new();
        for tuple in &self.tuples {
            let value = &tuple.values[attr.index()];
            if let Some(key) = value.key() {
                if seen.insert(key) {
                    domain.push(value.clone());
                }
            }
        }
        Ok(domain)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.tuples.len() * self.schema.len()
    }
}
