//! Small text helpers for working with model output.

/// Slice out the outermost JSON object embedded in free text.
///
/// Models asked for "only the JSON" still wrap it in prose or code fences
/// often enough that callers should not parse the raw response directly.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_surrounding_prose() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nHope that helps!";
        assert_eq!(extract_json_object(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn bare_object_passes_through() {
        assert_eq!(extract_json_object("{\"a\": 1}"), Some("{\"a\": 1}"));
    }

    #[test]
    fn no_object_is_none() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn nested_objects_take_the_outermost_span() {
        let text = "{\"outer\": {\"inner\": 2}} trailing";
        assert_eq!(extract_json_object(text), Some("{\"outer\": {\"inner\": 2}}"));
    }
}
