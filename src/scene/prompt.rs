/// Build the scene prompt sent to the generator.
///
/// Both inputs are embedded verbatim. Validation is left to the caller.
pub fn compose(topic: &str, location: &str) -> String {
    format!(
        "Imagine a vivid, surreal, and fun scene where the concept of '{topic}' is memorably \
         placed inside '{location}' as part of a memory palace. Do not be logical — be \
         imaginative and symbolic."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_topic_and_location() {
        let prompt = compose("photosynthesis", "My Home");
        assert!(prompt.contains("photosynthesis"));
        assert!(prompt.contains("My Home"));
        assert!(prompt.contains("memory palace"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(compose("entropy", "Library"), compose("entropy", "Library"));
        assert_ne!(compose("entropy", "Library"), compose("entropy", "Game World"));
    }

    #[test]
    fn prompt_keeps_unicode_and_quotes_verbatim() {
        let topic = "Krebs' cycle — ATP";
        let location = "दादी का घर";
        let prompt = compose(topic, location);
        assert!(prompt.contains(topic));
        assert!(prompt.contains(location));
    }
}
