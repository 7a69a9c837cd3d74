use serde::{Deserialize, Deserializer};

/// Keeps "absent" and "null" apart in PATCH bodies: a missing field stays
/// `None` through `#[serde(default)]`, an explicit `null` becomes `Some(None)`.
pub fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::double_option;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "double_option")]
        comment: Option<Option<String>>,
    }

    #[test]
    fn distinguishes_missing_null_and_value() {
        let missing: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.comment, None);
        let null: Body = serde_json::from_str(r#"{"comment":null}"#).unwrap();
        assert_eq!(null.comment, Some(None));
        let set: Body = serde_json::from_str(r#"{"comment":"hi"}"#).unwrap();
        assert_eq!(set.comment, Some(Some("hi".to_string())));
    }
}
