//! Parsing of the analysis model's JSON output
//!
//! The text is untrusted even when the request carried a response schema, so
//! every record is checked for its required fields and coordinate ranges
//! before a [`VocabularyItem`] is built.

use serde::{Deserialize, Deserializer};

use crate::domain::entities::VocabularyItem;
use crate::domain::value_objects::{BoundingBox, BoundingBoxError};

#[derive(Debug, Deserialize)]
struct RawVocabularyItem {
    english: String,
    korean: String,
    chinese: String,
    #[serde(deserialize_with = "present_or_null")]
    box2d: Option<RawBox>,
}

// The key must be present; only an explicit `null` means "not located".
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<RawBox>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

#[derive(Debug, Deserialize)]
struct RawBox {
    ymin: i64,
    xmin: i64,
    ymax: i64,
    xmax: i64,
}

/// Parse the analysis output into vocabulary items, preserving order
pub fn parse_vocabulary(text: &str) -> Result<Vec<VocabularyItem>, VocabularyParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(VocabularyParseError::EmptyResponse);
    }

    let raw: Vec<RawVocabularyItem> = serde_json::from_str(text)?;

    raw.into_iter()
        .enumerate()
        .map(|(index, item)| validate_item(index, item))
        .collect()
}

fn validate_item(index: usize, raw: RawVocabularyItem) -> Result<VocabularyItem, VocabularyParseError> {
    for (field, value) in [
        ("english", &raw.english),
        ("korean", &raw.korean),
        ("chinese", &raw.chinese),
    ] {
        if value.trim().is_empty() {
            return Err(VocabularyParseError::BlankLabel { index, field });
        }
    }

    let box2d = raw
        .box2d
        .map(|b| {
            BoundingBox::new(
                narrow(b.ymin),
                narrow(b.xmin),
                narrow(b.ymax),
                narrow(b.xmax),
            )
        })
        .transpose()
        .map_err(|source| VocabularyParseError::InvalidBox { index, source })?;

    Ok(VocabularyItem {
        english: raw.english.trim().to_string(),
        korean: raw.korean.trim().to_string(),
        chinese: raw.chinese.trim().to_string(),
        box2d,
    })
}

// Values beyond i32 saturate and then fail the range check.
fn narrow(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Reasons the analysis output was rejected
#[derive(Debug, thiserror::Error)]
pub enum VocabularyParseError {
    #[error("Analysis returned no text")]
    EmptyResponse,
    #[error("Analysis output is not a valid vocabulary array: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Item {index} has a blank '{field}' label")]
    BlankLabel { index: usize, field: &'static str },
    #[error("Item {index} has an invalid box2d: {source}")]
    InvalidBox {
        index: usize,
        #[source]
        source: BoundingBoxError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_items_in_order() {
        let text = r#"[
            {"english": "Illumination", "korean": "조명", "chinese": "照明",
             "box2d": {"ymin": 10, "xmin": 20, "ymax": 110, "xmax": 220}},
            {"english": "Bucket", "korean": "양동이", "chinese": "水桶",
             "box2d": {"ymin": 500, "xmin": 600, "ymax": 700, "xmax": 800}}
        ]"#;

        let items = parse_vocabulary(text).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].english, "Illumination");
        assert_eq!(items[1].chinese, "水桶");
        assert_eq!(items[1].box2d, BoundingBox::new(500, 600, 700, 800).ok());
    }

    #[test]
    fn test_null_box_is_allowed() {
        let text = r#"[{"english": "Breeze", "korean": "산들바람", "chinese": "微风", "box2d": null}]"#;
        let items = parse_vocabulary(text).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].box2d.is_none());
    }

    #[test]
    fn test_missing_box_key_is_rejected() {
        let text = r#"[{"english": "Breeze", "korean": "산들바람", "chinese": "微风"}]"#;

        let err = parse_vocabulary(text).unwrap_err();
        assert!(matches!(err, VocabularyParseError::InvalidJson(_)));
        assert!(err.to_string().contains("box2d"));
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_vocabulary("[]").unwrap().is_empty());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(matches!(
            parse_vocabulary("  \n"),
            Err(VocabularyParseError::EmptyResponse)
        ));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            parse_vocabulary("[{\"english\": \"Cup\""),
            Err(VocabularyParseError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_vocabulary("{\"items\": []}"),
            Err(VocabularyParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_label_is_rejected() {
        let text = r#"[{"english": "Cup", "chinese": "杯子", "box2d": null}]"#;
        assert!(matches!(
            parse_vocabulary(text),
            Err(VocabularyParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_blank_label_is_rejected() {
        let text = r#"[{"english": "Cup", "korean": " ", "chinese": "杯子", "box2d": null}]"#;
        assert!(matches!(
            parse_vocabulary(text),
            Err(VocabularyParseError::BlankLabel { index: 0, field: "korean" })
        ));
    }

    #[test]
    fn test_out_of_range_box_is_rejected() {
        let text = r#"[
            {"english": "Cup", "korean": "컵", "chinese": "杯子", "box2d": null},
            {"english": "Moon", "korean": "달", "chinese": "月亮",
             "box2d": {"ymin": 0, "xmin": 0, "ymax": 1200, "xmax": 10}}
        ]"#;
        assert!(matches!(
            parse_vocabulary(text),
            Err(VocabularyParseError::InvalidBox { index: 1, .. })
        ));
    }

    #[test]
    fn test_huge_coordinate_is_rejected() {
        let text = r#"[{"english": "Star", "korean": "별", "chinese": "星星",
            "box2d": {"ymin": 0, "xmin": 0, "ymax": 10, "xmax": 99999999999}}]"#;
        assert!(matches!(
            parse_vocabulary(text),
            Err(VocabularyParseError::InvalidBox { index: 0, .. })
        ));
    }
}
