//! Document properties and the numeric setting enums.

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            #[default]
            $($variant = $value),+
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {}", stringify!($name), other)),
                }
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::from(value as u8)
            }
        }

        impl $name {
            /// Read a setting value stored as a number.
            pub fn from_value(value: &Value) -> Option<Self> {
                value
                    .as_u64()
                    .and_then(|v| u8::try_from(v).ok())
                    .and_then(|v| Self::try_from(v).ok())
            }
        }
    };
}

wire_enum!(
    /// Margin presets. `Custom` reads the `customMargins` setting.
    MarginsType { Default = 0, NoMargins = 1, Minimum = 2, Custom = 3 }
);

wire_enum!(
    /// Scaling modes. `Custom` reads the `scaling` percentage.
    ScalingType { Default = 0, FitToPage = 1, FitToPaper = 2, Custom = 3 }
);

/// Properties of the document being printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentSettings {
    pub all_pages_have_custom_size: bool,
    pub all_pages_have_custom_orientation: bool,
    pub has_selection: bool,
    /// False for PDF sources, whose layout is fixed.
    pub is_modifiable: bool,
    pub is_scaling_disabled: bool,
    pub fit_to_page_scaling: u32,
    pub page_count: u32,
    pub title: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            all_pages_have_custom_size: false,
            all_pages_have_custom_orientation: false,
            has_selection: false,
            is_modifiable: true,
            is_scaling_disabled: false,
            fit_to_page_scaling: 100,
            page_count: 0,
            title: String::new(),
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(rename = "marginTop")]
    pub top: f64,
    #[serde(rename = "marginRight")]
    pub right: f64,
    #[serde(rename = "marginBottom")]
    pub bottom: f64,
    #[serde(rename = "marginLeft")]
    pub left: f64,
}

impl Margins {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Page size in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

impl Size {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}
