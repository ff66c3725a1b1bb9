use std::collections::HashSet;

/// Sanitizes admin-authored display text (titles, descriptions, names)
/// before it is stored, so no client rendering it can be handed markup.
///
/// Every tag is dropped (script and style along with their content) and the
/// remaining text is kept as written. The fields are served as JSON, so the
/// entities the HTML serializer emits are turned back into plain characters.
///
/// Question text and canonical answers never pass through here: grading is
/// exact string equality and must see the text exactly as it was written.
pub fn clean_text(input: &str) -> String {
    let stripped = ammonia::Builder::default()
        .tags(HashSet::new())
        .clean(input.trim())
        .to_string();

    unescape_text(&stripped)
}

// `&amp;` goes last so an escaped entity like `&amp;lt;` decodes to `&lt;`.
fn unescape_text(serialized: &str) -> String {
    serialized
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
