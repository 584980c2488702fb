//! Bounding boxes on the model's normalized 0-1000 grid

use serde::{Deserialize, Serialize};

/// Upper bound of the normalized coordinate space used by the analysis model
pub const NORMALIZED_SCALE: i32 = 1000;

/// A rectangular region of the generated image.
///
/// Coordinates are `(ymin, xmin, ymax, xmax)` on a `0..=1000` scale, the same
/// order the analysis model emits them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct BoundingBox {
    pub ymin: i32,
    pub xmin: i32,
    pub ymax: i32,
    pub xmax: i32,
}

impl BoundingBox {
    /// Build a box, rejecting coordinates outside the normalized grid or
    /// with a min edge past its max edge.
    pub fn new(ymin: i32, xmin: i32, ymax: i32, xmax: i32) -> Result<Self, BoundingBoxError> {
        for (name, value) in [("ymin", ymin), ("xmin", xmin), ("ymax", ymax), ("xmax", xmax)] {
            if !(0..=NORMALIZED_SCALE).contains(&value) {
                return Err(BoundingBoxError::OutOfRange { field: name, value });
            }
        }
        if ymin > ymax {
            return Err(BoundingBoxError::Inverted { axis: "y", min: ymin, max: ymax });
        }
        if xmin > xmax {
            return Err(BoundingBoxError::Inverted { axis: "x", min: xmin, max: xmax });
        }
        Ok(Self { ymin, xmin, ymax, xmax })
    }

    /// Center of the box as percentages of the image width and height.
    pub fn anchor(&self) -> AnchorPoint {
        let scale = f64::from(NORMALIZED_SCALE) / 100.0;
        AnchorPoint {
            left_percent: f64::from(self.xmin + self.xmax) / 2.0 / scale,
            top_percent: f64::from(self.ymin + self.ymax) / 2.0 / scale,
        }
    }
}

#[derive(Deserialize)]
struct RawBoundingBox {
    ymin: i32,
    xmin: i32,
    ymax: i32,
    xmax: i32,
}

impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = BoundingBoxError;

    fn try_from(raw: RawBoundingBox) -> Result<Self, Self::Error> {
        BoundingBox::new(raw.ymin, raw.xmin, raw.ymax, raw.xmax)
    }
}

/// Overlay anchor relative to the rendered image, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnchorPoint {
    pub left_percent: f64,
    pub top_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundingBoxError {
    #[error("{field} = {value} is outside 0..={NORMALIZED_SCALE}")]
    OutOfRange { field: &'static str, value: i32 },
    #[error("{axis} min {min} is greater than max {max}")]
    Inverted { axis: &'static str, min: i32, max: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_frame_anchors_at_center() {
        let bbox = BoundingBox::new(0, 0, 1000, 1000).unwrap();
        let anchor = bbox.anchor();
        assert_eq!(anchor.left_percent, 50.0);
        assert_eq!(anchor.top_percent, 50.0);
    }

    #[test]
    fn test_anchor_uses_box_center() {
        let bbox = BoundingBox::new(200, 400, 400, 600).unwrap();
        let anchor = bbox.anchor();
        assert_eq!(anchor.left_percent, 50.0);
        assert_eq!(anchor.top_percent, 30.0);
    }

    #[test]
    fn test_anchor_keeps_fractional_percent() {
        let bbox = BoundingBox::new(0, 0, 5, 15).unwrap();
        let anchor = bbox.anchor();
        assert!((anchor.left_percent - 0.75).abs() < f64::EPSILON);
        assert!((anchor.top_percent - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = BoundingBox::new(0, -1, 10, 10).unwrap_err();
        assert_eq!(err, BoundingBoxError::OutOfRange { field: "xmin", value: -1 });

        assert!(BoundingBox::new(0, 0, 1001, 10).is_err());
    }

    #[test]
    fn test_rejects_inverted_edges() {
        let err = BoundingBox::new(500, 0, 100, 10).unwrap_err();
        assert!(matches!(err, BoundingBoxError::Inverted { axis: "y", .. }));
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let bbox: BoundingBox =
            serde_json::from_str(r#"{"ymin":200,"xmin":400,"ymax":400,"xmax":600}"#).unwrap();
        assert_eq!(bbox, BoundingBox::new(200, 400, 400, 600).unwrap());

        assert!(serde_json::from_str::<BoundingBox>(
            r#"{"ymin":900,"xmin":-5000,"ymax":100,"xmax":99999}"#
        )
        .is_err());
        assert!(serde_json::from_str::<BoundingBox>(
            r#"{"ymin":600,"xmin":0,"ymax":100,"xmax":10}"#
        )
        .is_err());
    }
}
