//! Annotation layout - Where each word bubble sits on the image

use serde::Serialize;

use crate::domain::entities::VocabularyItem;
use crate::domain::value_objects::AnchorPoint;

/// Overlay marker for one located vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationMarker {
    /// Position of the item in the vocabulary list
    pub index: usize,
    pub anchor: AnchorPoint,
}

/// Markers for every item that has a bounding box, in list order.
///
/// Items without a box get no marker. Markers whose anchors coincide or
/// whose bubbles overlap are left as they are.
pub fn annotation_markers(vocabulary: &[VocabularyItem]) -> Vec<AnnotationMarker> {
    vocabulary
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            item.box2d.map(|bbox| AnnotationMarker {
                index,
                anchor: bbox.anchor(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::BoundingBox;

    fn item(english: &str, box2d: Option<BoundingBox>) -> VocabularyItem {
        VocabularyItem {
            english: english.to_string(),
            korean: String::new(),
            chinese: String::new(),
            box2d,
        }
    }

    #[test]
    fn test_unlocated_items_get_no_marker() {
        let vocabulary = vec![
            item("Lantern", BoundingBox::new(0, 0, 1000, 1000).ok()),
            item("Breeze", None),
            item("Seashell", BoundingBox::new(200, 400, 400, 600).ok()),
        ];

        let markers = annotation_markers(&vocabulary);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].index, 0);
        assert_eq!(markers[1].index, 2);
        assert_eq!(markers[1].anchor.left_percent, 50.0);
        assert_eq!(markers[1].anchor.top_percent, 30.0);
    }

    #[test]
    fn test_coinciding_anchors_are_kept() {
        let bbox = BoundingBox::new(100, 100, 300, 300).ok();
        let vocabulary = vec![item("Cup", bbox), item("Saucer", bbox)];

        let markers = annotation_markers(&vocabulary);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].anchor, markers[1].anchor);
    }
}
