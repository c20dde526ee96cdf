use url::form_urlencoded;

/// Percent-encodes a caller-supplied value for one query parameter. Spaces
/// become `%20` so they are never read back as a literal `+`.
pub fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Escapes a value for use inside a single-quoted OData string literal.
pub fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// `startswith(prop,'value')` with the literal quoted and query-encoded.
pub fn startswith(property: &str, value: &str) -> String {
    format!(
        "startswith({},'{}')",
        property,
        encode_query_value(&quote_literal(value))
    )
}
