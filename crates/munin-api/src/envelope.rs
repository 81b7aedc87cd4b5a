// HAL envelope helpers.
//
// Collection endpoints answer `{ "_embedded": { "<resource>": [...] }, "_links": ... }`;
// singleton endpoints answer the resource object itself.

use serde_json::Value;

/// Key holding embedded collections in a HAL document.
pub const EMBEDDED: &str = "_embedded";

/// Borrow the embedded collection for `key`, if the payload carries one.
pub fn embedded<'a>(payload: &'a Value, key: &str) -> Option<&'a [Value]> {
    payload
        .get(EMBEDDED)?
        .get(key)?
        .as_array()
        .map(Vec::as_slice)
}

/// Take ownership of the embedded collection for `key`.
pub fn into_embedded(payload: Value, key: &str) -> Option<Vec<Value>> {
    let Value::Object(mut root) = payload else {
        return None;
    };
    let Value::Object(mut embedded) = root.remove(EMBEDDED)? else {
        return None;
    };
    match embedded.remove(key)? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}
