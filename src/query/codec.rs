//! Bracket-notation query string codec.
//!
//! Decodes `tx_solr[filter][]=type:shoes&tx_solr[q]=boots` into a
//! [`QueryMap`] and encodes it back with explicit indices
//! (`tx_solr[filter][0]=type%3Ashoes`).

use url::form_urlencoded;

use crate::query::tree::{QueryMap, QueryValue};

#[derive(Debug, Clone, Copy)]
enum KeyPart<'a> {
    Name(&'a str),
    Append,
}

/// Splits `a[b][]` into the base name and its bracket parts.
/// Returns `None` for names that cannot be stored (empty base).
fn split_key(name: &str) -> Option<(&str, Vec<KeyPart<'_>>)> {
    let open = match name.find('[') {
        Some(0) => return None,
        Some(open) => open,
        None if name.is_empty() => return None,
        None => return Some((name, Vec::new())),
    };

    let mut parts = Vec::new();
    let mut rest = &name[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else { break };
        let part = &inner[..close];
        parts.push(if part.is_empty() {
            KeyPart::Append
        } else {
            KeyPart::Name(part)
        });
        rest = &inner[close + 1..];
    }

    if parts.is_empty() {
        // Unclosed bracket: the whole name is a plain key.
        return Some((name, parts));
    }
    Some((&name[..open], parts))
}

fn assign(map: &mut QueryMap, key: KeyPart<'_>, rest: &[KeyPart<'_>], value: String) {
    let Some((next, tail)) = rest.split_first() else {
        match key {
            KeyPart::Name(name) => {
                map.insert(name, value);
            }
            KeyPart::Append => {
                map.push(value);
            }
        }
        return;
    };

    let child = match key {
        KeyPart::Name(name) => map.entry_map(name),
        KeyPart::Append => {
            let index = map.push(QueryMap::new());
            map.entry_map(&index.to_string())
        }
    };
    assign(child, *next, tail, value);
}

/// Parses an `application/x-www-form-urlencoded` query string.
pub fn parse_query(raw: &str) -> QueryMap {
    let mut map = QueryMap::new();
    for (name, value) in form_urlencoded::parse(raw.as_bytes()) {
        let Some((base, parts)) = split_key(&name) else {
            continue;
        };
        assign(&mut map, KeyPart::Name(base), &parts, value.into_owned());
    }
    map
}

fn append_value(serializer: &mut form_urlencoded::Serializer<'_, String>, name: &str, value: &QueryValue) {
    match value {
        QueryValue::Scalar(scalar) => {
            serializer.append_pair(name, scalar);
        }
        QueryValue::Map(map) => {
            for (key, nested) in map.iter() {
                append_value(serializer, &format!("{name}[{key}]"), nested);
            }
        }
    }
}

/// Encodes a tree as a query string. Empty maps produce no pairs.
pub fn encode_query(map: &QueryMap) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in map.iter() {
        append_value(&mut serializer, key, value);
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_and_appended_keys() {
        let map = parse_query("tx_solr%5Bfilter%5D%5B%5D=color%3Ared&tx_solr[filter][]=size:xl&tx_solr[q]=red+boots&page=2");

        assert_eq!(
            map.to_json(),
            json!({
                "tx_solr": {"filter": ["color:red", "size:xl"], "q": "red boots"},
                "page": "2"
            })
        );
    }

    #[test]
    fn test_parse_plain_and_malformed_keys() {
        let map = parse_query("a[b=1&=2&[x]=3&c&d=4&d=5");

        assert_eq!(map.to_json(), json!({"a[b": "1", "c": "", "d": "5"}));
    }

    #[test]
    fn test_parse_append_with_nested_map() {
        let map = parse_query("f[][name]=brand&f[][name]=type");
        assert_eq!(map.to_json(), json!({"f": [{"name": "brand"}, {"name": "type"}]}));
    }

    #[test]
    fn test_encode_uses_explicit_indices() {
        let mut map = QueryMap::new();
        let filter = map.entry_map("tx_solr").entry_map("filter");
        filter.push("type:shoes");
        filter.push("brand:acme corp");
        map.insert("empty", QueryMap::new());

        assert_eq!(
            encode_query(&map),
            "tx_solr%5Bfilter%5D%5B0%5D=type%3Ashoes&tx_solr%5Bfilter%5D%5B1%5D=brand%3Aacme+corp"
        );
    }

    #[test]
    fn test_encoded_query_parses_to_same_tree() {
        let original = parse_query("tx_solr[filter][category]=household&tx_solr[filter][0]=type:shoes&q=x");
        assert_eq!(parse_query(&encode_query(&original)), original);
    }

    #[test]
    fn test_oversized_client_indices_keep_every_appended_value() {
        let map = parse_query("a[18446744073709551614]=x&a[]=y&a[]=z");
        assert_eq!(
            map.to_json(),
            json!({"a": {"18446744073709551614": "x", "0": "y", "1": "z"}})
        );

        let map = parse_query("a[18446744073709551615]=x&a[]=y");
        assert_eq!(map.to_json(), json!({"a": {"18446744073709551615": "x", "0": "y"}}));
    }
}
