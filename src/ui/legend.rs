//! Legend tables for the two overlays.
//!
//! Building a legend is pure: a scale goes in, an ordered list of
//! swatch/label rows comes out. Painting happens in the widget.

use crate::style::{BoundaryClass, Color, DepthScale};
use crate::ui::elements::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub swatch: Color,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub position: Position,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// `-10–10 km`, `10–30 km`, ... `90+ km`. Each swatch is the colour of a
    /// depth just inside its bucket, since bounds themselves belong below.
    pub fn depth(scale: &DepthScale, position: Position) -> Self {
        let buckets = scale.buckets();
        let entries = buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let label = match buckets.get(i + 1) {
                    Some(next) => format!("{}\u{2013}{} km", bucket.lower_bound, next.lower_bound),
                    None => format!("{}+ km", bucket.lower_bound),
                };
                LegendEntry {
                    swatch: scale.color_for(bucket.lower_bound + 1.0),
                    label,
                }
            })
            .collect();

        Self {
            title: "Depth".to_string(),
            position,
            entries,
        }
    }

    /// One row per boundary class, fallback last
    pub fn boundaries(position: Position) -> Self {
        let entries = BoundaryClass::ALL
            .iter()
            .map(|class| LegendEntry {
                swatch: class.color(),
                label: match class.code() {
                    Some(code) => format!("{} ({})", class.label(), code),
                    None => class.label().to_string(),
                },
            })
            .collect();

        Self {
            title: "Plate Boundaries".to_string(),
            position,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
