use serde::Serialize;
use serde::ser::Error as _;
use serde_json::{Map, Value};

/// One serialized entity: column name to transport-safe value.
pub type Record = Map<String, Value>;

/// Turns entities into flat records for the wire.
///
/// Implementors only declare their columns; the default methods go through
/// serde and check that the result is a flat object carrying exactly those
/// columns, each holding a string, number, boolean or null.
pub trait Serializer: Serialize + Sized {
    const COLUMNS: &'static [&'static str];

    fn serialize_row(&self) -> Result<Record, serde_json::Error> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected an object, got {other}"
                )));
            }
        };

        if fields.len() != Self::COLUMNS.len()
            || !Self::COLUMNS.iter().all(|c| fields.contains_key(*c))
        {
            let found: Vec<&str> = fields.keys().map(String::as_str).collect();
            return Err(serde_json::Error::custom(format!(
                "columns {found:?} do not match declared {:?}",
                Self::COLUMNS
            )));
        }

        // Emit in declared column order.
        let record: Record = Self::COLUMNS
            .iter()
            .filter_map(|c| fields.remove(*c).map(|v| (c.to_string(), v)))
            .collect();

        if let Some((column, _)) = record
            .iter()
            .find(|(_, v)| matches!(v, Value::Array(_) | Value::Object(_)))
        {
            return Err(serde_json::Error::custom(format!(
                "column `{column}` is not a primitive value"
            )));
        }

        Ok(record)
    }

    /// Serializes each item, keeping input order.
    fn serialize_list(items: &[Self]) -> Result<Vec<Record>, serde_json::Error> {
        items.iter().map(Self::serialize_row).collect()
    }
}
