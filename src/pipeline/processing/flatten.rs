//! Flattening of enrichment payloads into fixed-column rows.
//!
//! The API returns an object with two optional sub-entities, `person` and
//! `company`. Each one is copied field by field into dotted columns
//! (`person.firstName`, `company.name`, ...) according to a declared schema, so
//! every row carries the same columns no matter what the payload contained.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::common::constants::{COMPANY_KEY, EMAIL_COLUMN, PERSON_KEY};
use crate::common::types::{EnrichedRecord, LookupOutcome};

/// One sub-entity of the payload and the fields copied out of it.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    /// Payload key of the sub-object, also the column prefix
    pub prefix: &'static str,
    pub fields: &'static [&'static str],
}

impl EntitySchema {
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.fields.iter().map(move |field| format!("{}.{}", self.prefix, field))
    }

    /// Push one cell per declared field. Anything but a JSON object counts as absent.
    fn extract_into(&self, payload: Option<&Value>, cells: &mut Vec<Value>) {
        let entity = payload
            .and_then(|p| p.get(self.prefix))
            .and_then(Value::as_object);
        for field in self.fields {
            let cell = entity
                .and_then(|obj| obj.get(*field))
                .cloned()
                .unwrap_or(Value::Null);
            cells.push(cell);
        }
    }
}

pub const PERSON_SCHEMA: EntitySchema = EntitySchema {
    prefix: PERSON_KEY,
    fields: &[
        "publicIdentifier",
        "linkedInIdentifier",
        "memberIdentifier",
        "linkedInUrl",
        "firstName",
        "lastName",
        "headline",
        "location",
        "summary",
        "photoUrl",
        "backgroundUrl",
        "openToWork",
        "premium",
        "pronoun",
        "showVerificationBadge",
        "creationDate",
        "followerCount",
        "positions",
        "schools",
        "skills",
        "languages",
        "recommendations",
        "certifications",
    ],
};

pub const COMPANY_SCHEMA: EntitySchema = EntitySchema {
    prefix: COMPANY_KEY,
    fields: &[
        "linkedInId",
        "name",
        "universalName",
        "linkedInUrl",
        "employeeCount",
        "followerCount",
        "employeeCountRange",
        "websiteUrl",
        "tagline",
        "description",
        "industry",
        "phone",
        "specialities",
        "headquarter",
        "logo",
        "fundingData",
    ],
};

/// Schemas in column order
pub const SCHEMAS: [EntitySchema; 2] = [PERSON_SCHEMA, COMPANY_SCHEMA];

static COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    std::iter::once(EMAIL_COLUMN.to_string())
        .chain(SCHEMAS.iter().flat_map(|schema| schema.column_names()))
        .collect()
});

/// Every output column: `email`, then the person columns, then the company columns.
pub fn columns() -> &'static [String] {
    &COLUMNS
}

/// One output row; cells line up with [`columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    cells: Vec<Value>,
}

impl FlatRow {
    pub fn email(&self) -> &str {
        self.cells.first().and_then(Value::as_str).unwrap_or_default()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        columns()
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.cells.get(idx))
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    /// (column, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        columns().iter().map(String::as_str).zip(self.cells.iter())
    }
}

/// Build the row for one record. Pure: the same record always gives the same row.
pub fn flatten(record: &EnrichedRecord) -> FlatRow {
    let payload = match &record.outcome {
        LookupOutcome::Success(value) => Some(value),
        LookupOutcome::Failure(_) => None,
    };

    let mut cells = Vec::with_capacity(columns().len());
    cells.push(Value::String(record.email.clone()));
    for schema in &SCHEMAS {
        schema.extract_into(payload, &mut cells);
    }
    FlatRow { cells }
}

/// Text form of one cell for delimited output: null is empty, strings verbatim, everything else as JSON
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flattened rows in the order their records were collected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputTable {
    pub rows: Vec<FlatRow>,
}

impl OutputTable {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        Self {
            rows: records.iter().map(flatten).collect(),
        }
    }

    pub fn columns(&self) -> &'static [String] {
        columns()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
