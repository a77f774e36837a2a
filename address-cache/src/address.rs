use serde::{Deserialize, Deserializer, Serialize};

/// A postal address. Two addresses are the same address when both fields
/// match byte for byte.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, alias = "Country", deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, alias = "City", deserialize_with = "null_as_default")]
    pub city: String,
}

impl Address {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
        }
    }
}

/// Inbound payload. Missing fields default to empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(default, alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "Last", deserialize_with = "null_as_default")]
    pub last: String,
    #[serde(default, alias = "Addresses", deserialize_with = "addresses_or_empty")]
    pub addresses: Vec<Address>,
}

/// `null` reads as the type's empty value, same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Address list where both the list and its entries may be `null`
fn addresses_or_empty<'de, D>(deserializer: D) -> Result<Vec<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let addresses = Option::<Vec<Option<Address>>>::deserialize(deserializer)?;
    Ok(addresses
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    pub time_taken: String,
    pub duplicates_removed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub name: String,
    pub last: String,
    pub addresses: Vec<Address>,
    pub processing_info: ProcessingInfo,
}
