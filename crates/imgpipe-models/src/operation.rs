//! Transformation operations and their wire schema.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Named filters applied by the pipeline.
///
/// Unrecognized kinds deserialize to `Other` and pass the image through
/// unchanged at that step rather than failing the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub enum FilterKind {
    Blur,
    Sharpen,
    EdgeEnhance,
    /// Catch-all for kinds this version does not know about.
    Other,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Blur => "blur",
            FilterKind::Sharpen => "sharpen",
            FilterKind::EdgeEnhance => "edge_enhance",
            FilterKind::Other => "other",
        }
    }
}

impl From<&str> for FilterKind {
    fn from(s: &str) -> Self {
        match s {
            "blur" => FilterKind::Blur,
            "sharpen" => FilterKind::Sharpen,
            "edge_enhance" => FilterKind::EdgeEnhance,
            _ => FilterKind::Other,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FilterKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FilterKind::from(s.as_str()))
    }
}

/// One transformation step in a job's operation chain.
///
/// Wire schema, matching the submission payload:
/// `{"type":"resize","size":[w,h]}`,
/// `{"type":"filter","filter_type":"blur"}`,
/// `{"type":"brightness","factor":1.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Resize to exact target dimensions.
    Resize { size: [u32; 2] },
    /// Apply a named filter kernel.
    Filter { filter_type: FilterKind },
    /// Rescale luminance by an unbounded multiplier.
    Brightness { factor: f32 },
}

/// Validation failure for a submitted operation.
#[derive(Debug, Error)]
pub enum InvalidOperation {
    #[error("resize dimensions must be positive, got {width}x{height}")]
    ZeroResizeDimension { width: u32, height: u32 },
}

impl Operation {
    /// Validate a submitted operation.
    ///
    /// Brightness factors are deliberately not bounds-checked; they are
    /// passed through to the underlying primitive unchanged.
    pub fn validate(&self) -> Result<(), InvalidOperation> {
        match self {
            Operation::Resize { size: [w, h] } if *w == 0 || *h == 0 => {
                Err(InvalidOperation::ZeroResizeDimension {
                    width: *w,
                    height: *h,
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_wire_format() {
        let op: Operation = serde_json::from_str(r#"{"type":"resize","size":[100,100]}"#).unwrap();
        assert_eq!(op, Operation::Resize { size: [100, 100] });

        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, r#"{"type":"resize","size":[100,100]}"#);
    }

    #[test]
    fn test_filter_wire_format() {
        let op: Operation =
            serde_json::from_str(r#"{"type":"filter","filter_type":"edge_enhance"}"#).unwrap();
        assert_eq!(
            op,
            Operation::Filter {
                filter_type: FilterKind::EdgeEnhance
            }
        );
    }

    #[test]
    fn test_brightness_wire_format() {
        let op: Operation =
            serde_json::from_str(r#"{"type":"brightness","factor":1.5}"#).unwrap();
        assert_eq!(op, Operation::Brightness { factor: 1.5 });
    }

    #[test]
    fn test_unknown_filter_kind_is_other() {
        let op: Operation =
            serde_json::from_str(r#"{"type":"filter","filter_type":"sepia"}"#).unwrap();
        assert_eq!(
            op,
            Operation::Filter {
                filter_type: FilterKind::Other
            }
        );
    }

    #[test]
    fn test_unknown_operation_type_rejected() {
        let result: Result<Operation, _> =
            serde_json::from_str(r#"{"type":"rotate","degrees":90}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_operation_list_parses_in_order() {
        let ops: Vec<Operation> = serde_json::from_str(
            r#"[{"type":"resize","size":[64,48]},{"type":"filter","filter_type":"blur"},{"type":"brightness","factor":0.5}]"#,
        )
        .unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0], Operation::Resize { size: [64, 48] });
        assert_eq!(ops[2], Operation::Brightness { factor: 0.5 });
    }

    #[test]
    fn test_malformed_operations_payload_rejected() {
        let result: Result<Vec<Operation>, _> = serde_json::from_str("{bad");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_resize_dimension_invalid() {
        let op = Operation::Resize { size: [0, 100] };
        assert!(op.validate().is_err());

        let op = Operation::Resize { size: [100, 100] };
        assert!(op.validate().is_ok());
    }
}
