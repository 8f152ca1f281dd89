//! Background descriptor
//!
//! JSON side file describing how the packed background image is imported.

use serde::{Deserialize, Serialize};

use crate::layout::MapLayout;
use crate::CodegenError;

/// Import settings of the background image of a map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub bpp_mode: String,
    /// Height of the whole canvas, every graphics layer included
    pub height: u32,
}

impl BackgroundDescriptor {
    pub fn for_layout(layout: &MapLayout) -> Self {
        Self {
            kind: "regular_bg".to_string(),
            bpp_mode: "bpp_4_auto".to_string(),
            height: layout.canvas.height(),
        }
    }

    pub fn to_json(&self) -> Result<String, CodegenError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
