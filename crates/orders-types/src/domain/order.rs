use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// A row exactly as the store returned it. Reads hand these back to callers
/// untouched, whatever columns they carry.
pub type OrderRow = Map<String, Value>;

/// A typed row of the `orders` table, as kept by the local stores.
///
/// Columns this type does not name are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub cart_price: Option<Number>,
    #[serde(default)]
    pub cart_products: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub delivery_price: Option<Number>,
    #[serde(default)]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub total_price: Option<Number>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A partial order as sent by a caller for create and update.
///
/// Each field is tri-state: absent leaves the column alone, `null` clears it,
/// and a value sets it. Absent fields are skipped on serialization so a patch
/// echoes back as the caller wrote it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OrderPatch {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub approved: Option<Option<bool>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub cart_price: Option<Option<Number>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub cart_products: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub delivery_price: Option<Option<Number>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub paid: Option<Option<bool>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Option<Number>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Option<String>>,
}

// A present `null` must stay distinguishable from an absent field.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn set<T: Clone>(column: &mut Option<T>, patch: &Option<Option<T>>) {
    if let Some(value) = patch {
        *column = value.clone();
    }
}

impl OrderRecord {
    /// Builds a fresh row from an insert patch. `id` and timestamps fall back
    /// to the given values when the patch leaves them out.
    pub fn from_patch(id: String, patch: &OrderPatch, now: &str) -> Self {
        let mut record = Self {
            id,
            created_at: Some(now.to_string()),
            updated_at: Some(now.to_string()),
            ..Self::default()
        };
        record.apply(patch, now);
        record
    }

    /// The row a local store returns for this record: every named column,
    /// `null` when unset, plus the extra columns.
    pub fn to_row(&self) -> Result<OrderRow, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(row) => Ok(row),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "order record serialized as {other}"
            ))),
        }
    }

    /// Applies a partial update in place. `id` never changes; `updated_at` is
    /// refreshed to `now` unless the patch sets it.
    pub fn apply(&mut self, patch: &OrderPatch, now: &str) {
        set(&mut self.approved, &patch.approved);
        set(&mut self.cart_price, &patch.cart_price);
        set(&mut self.cart_products, &patch.cart_products);
        set(&mut self.created_at, &patch.created_at);
        set(&mut self.delivery_price, &patch.delivery_price);
        set(&mut self.destination_id, &patch.destination_id);
        set(&mut self.email, &patch.email);
        set(&mut self.name, &patch.name);
        set(&mut self.paid, &patch.paid);
        set(&mut self.phone, &patch.phone);
        set(&mut self.total_price, &patch.total_price);
        set(&mut self.user_id, &patch.user_id);
        match &patch.updated_at {
            Some(value) => self.updated_at = value.clone(),
            None => self.updated_at = Some(now.to_string()),
        }
    }
}
