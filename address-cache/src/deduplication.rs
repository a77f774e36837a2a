use crate::address::Address;
use std::collections::HashMap;

/// Result of removing duplicate addresses from a list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deduplicated {
    /// One address per `(country, city)`, in first-seen order
    pub unique: Vec<Address>,
    /// How many input entries repeated an already seen key
    pub removed: usize,
}

/// Remove duplicate addresses.
///
/// Keys are compared exactly, with no case or whitespace folding. When a key
/// repeats, the later entry replaces the earlier one in place, so the output
/// keeps the position of the first occurrence and the payload of the last.
pub fn deduplicate(addresses: &[Address]) -> Deduplicated {
    deduplicate_owned(addresses.to_vec())
}

/// Same as [`deduplicate`], consuming the input.
pub fn deduplicate_owned(addresses: Vec<Address>) -> Deduplicated {
    let mut positions: HashMap<(String, String), usize> = HashMap::with_capacity(addresses.len());
    let mut unique: Vec<Address> = Vec::with_capacity(addresses.len());
    let mut removed = 0;

    for address in addresses {
        let key = (address.country.clone(), address.city.clone());
        if let Some(&index) = positions.get(&key) {
            removed += 1;
            unique[index] = address;
        } else {
            positions.insert(key, unique.len());
            unique.push(address);
        }
    }

    Deduplicated { unique, removed }
}
