// A collection is addressed as a single DNS label directly under the service domain:
// "<collection>.<service domain>". Anything else does not name a collection.

const MAX_LABEL_LEN: usize = 63;

/// Extracts the collection name from a lowercased routing host name.
///
/// Returns `None` for the bare service domain, for names outside it, for empty
/// labels and for more than one label ("a.b.example.com").
pub fn parse_collection_name<'a>(routing_host: &'a str, service_domain: &str) -> Option<&'a str> {
    let label = routing_host
        .strip_suffix(service_domain)?
        .strip_suffix('.')?;

    is_valid_label(label).then_some(label)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
