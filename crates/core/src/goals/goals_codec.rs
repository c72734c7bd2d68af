//! Conversion between goal documents and `Goal` entities.

use super::goals_model::Goal;
use crate::constants::{
    FIELD_CREATED_BY, FIELD_DEADLINE, FIELD_DESCRIPTION, FIELD_IS_COMPLETED, FIELD_NAME,
};
use crate::documents::{FieldValue, RawDocument, RawRecord};
use crate::errors::DecodeError;

/// Decodes a snapshot document into a `Goal`.
///
/// Every wire field is required and must carry the expected type. The
/// document id becomes the goal id.
pub fn decode_goal(document: &RawDocument) -> Result<Goal, DecodeError> {
    let name = required(document, FIELD_NAME, "string", FieldValue::as_str)?;
    let description = required(document, FIELD_DESCRIPTION, "string", FieldValue::as_str)?;
    let deadline = required(document, FIELD_DEADLINE, "timestamp", FieldValue::as_timestamp)?;
    let is_completed = required(document, FIELD_IS_COMPLETED, "bool", FieldValue::as_bool)?;
    let created_by = required(document, FIELD_CREATED_BY, "string", FieldValue::as_str)?;

    Ok(Goal {
        id: document.id.clone(),
        name: name.to_string(),
        description: description.to_string(),
        deadline,
        is_completed,
        created_by: created_by.to_string(),
    })
}

/// Encodes a goal into the record written to the store. The id is implied
/// by the document key and is not part of the record.
pub fn encode_goal(goal: &Goal) -> RawRecord {
    let mut record = RawRecord::new();
    record.insert(FIELD_NAME.to_string(), FieldValue::from(goal.name.as_str()));
    record.insert(
        FIELD_DESCRIPTION.to_string(),
        FieldValue::from(goal.description.as_str()),
    );
    record.insert(FIELD_DEADLINE.to_string(), FieldValue::from(goal.deadline));
    record.insert(
        FIELD_IS_COMPLETED.to_string(),
        FieldValue::from(goal.is_completed),
    );
    record.insert(
        FIELD_CREATED_BY.to_string(),
        FieldValue::from(goal.created_by.as_str()),
    );
    record
}

fn required<'a, T>(
    document: &'a RawDocument,
    field: &'static str,
    expected: &'static str,
    extract: impl Fn(&'a FieldValue) -> Option<T>,
) -> Result<T, DecodeError> {
    let value = document.get(field).ok_or_else(|| DecodeError::MissingField {
        document_id: document.id.clone(),
        field,
    })?;
    extract(value).ok_or_else(|| DecodeError::WrongType {
        document_id: document.id.clone(),
        field,
        expected,
    })
}
