//! Enterprise printing policies.
//!
//! The native layer sends policies as a loosely typed JSON map
//! (`{"duplex": {"allowedMode": 2, "defaultMode": 4}, ...}`). This module
//! parses that map once into the closed [`Policy`] enumeration so consumers
//! never index policies by string.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

macro_rules! restriction_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant = $value),+
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = PolicyError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(PolicyError::InvalidValue {
                        policy: stringify!($name).to_string(),
                        value: other,
                    }),
                }
            }
        }
    };
}

restriction_enum!(
    /// Background graphics printing restriction.
    BackgroundGraphicsModeRestriction { Unset = 0, Enabled = 1, Disabled = 2 }
);

restriction_enum!(
    /// Color printing restriction.
    ColorModeRestriction { Unset = 0, Monochrome = 1, Color = 2 }
);

restriction_enum!(
    /// Duplex printing restriction. `Duplex` is the "any two-sided mode" group.
    DuplexModeRestriction { Unset = 0, Simplex = 1, LongEdge = 2, ShortEdge = 4, Duplex = 6 }
);

restriction_enum!(
    /// PIN printing restriction.
    PinModeRestriction { Unset = 0, Pin = 1, NoPin = 2 }
);

impl ColorModeRestriction {
    fn into_option(self) -> Option<Self> {
        (self != ColorModeRestriction::Unset).then_some(self)
    }
}

impl DuplexModeRestriction {
    fn into_option(self) -> Option<Self> {
        (self != DuplexModeRestriction::Unset).then_some(self)
    }

    /// Whether this restriction names a concrete two-sided mode.
    pub fn is_two_sided_mode(&self) -> bool {
        matches!(self, DuplexModeRestriction::LongEdge | DuplexModeRestriction::ShortEdge)
    }
}

impl PinModeRestriction {
    fn into_option(self) -> Option<Self> {
        (self != PinModeRestriction::Unset).then_some(self)
    }
}

impl BackgroundGraphicsModeRestriction {
    fn into_option(self) -> Option<Self> {
        (self != BackgroundGraphicsModeRestriction::Unset).then_some(self)
    }
}

/// Default paper size requested by policy, in microns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSizePolicy {
    pub width: i64,
    pub height: i64,
}

/// One enterprise policy with its typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Policy {
    HeaderFooter {
        allowed_mode: Option<bool>,
        default_mode: Option<bool>,
    },
    CssBackground {
        allowed_mode: Option<BackgroundGraphicsModeRestriction>,
        default_mode: Option<BackgroundGraphicsModeRestriction>,
    },
    MediaSize {
        default_mode: Option<MediaSizePolicy>,
    },
    Sheets {
        value: Option<u32>,
    },
    Color {
        allowed_mode: Option<ColorModeRestriction>,
        default_mode: Option<ColorModeRestriction>,
    },
    Duplex {
        allowed_mode: Option<DuplexModeRestriction>,
        default_mode: Option<DuplexModeRestriction>,
    },
    Pin {
        allowed_mode: Option<PinModeRestriction>,
        default_mode: Option<PinModeRestriction>,
    },
    PrintPdfAsImageAvailability {
        allowed_mode: Option<bool>,
    },
    PrintPdfAsImage {
        default_mode: Option<bool>,
    },
}

impl Policy {
    /// Wire name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            Policy::HeaderFooter { .. } => "headerFooter",
            Policy::CssBackground { .. } => "cssBackground",
            Policy::MediaSize { .. } => "mediaSize",
            Policy::Sheets { .. } => "sheets",
            Policy::Color { .. } => "color",
            Policy::Duplex { .. } => "duplex",
            Policy::Pin { .. } => "pin",
            Policy::PrintPdfAsImageAvailability { .. } => "printPdfAsImageAvailability",
            Policy::PrintPdfAsImage { .. } => "printPdfAsImage",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
struct RawEntry<T> {
    #[serde(default)]
    allowed_mode: Option<T>,
    #[serde(default)]
    default_mode: Option<T>,
    #[serde(default)]
    value: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPolicies {
    header_footer: Option<RawEntry<bool>>,
    css_background: Option<RawEntry<BackgroundGraphicsModeRestriction>>,
    media_size: Option<RawEntry<MediaSizePolicy>>,
    sheets: Option<RawEntry<u32>>,
    color: Option<RawEntry<ColorModeRestriction>>,
    duplex: Option<RawEntry<DuplexModeRestriction>>,
    pin: Option<RawEntry<PinModeRestriction>>,
    print_pdf_as_image_availability: Option<RawEntry<bool>>,
    print_pdf_as_image: Option<RawEntry<bool>>,
}

/// The set of policies in effect. Absent entries mean no policy applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Policies {
    entries: Vec<Policy>,
}

impl Policies {
    pub fn new(entries: Vec<Policy>) -> Self {
        Self { entries }
    }

    /// Parse the native policy map.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let raw: RawPolicies = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawPolicies) -> Self {
        let mut entries = Vec::new();
        if let Some(e) = raw.header_footer {
            entries.push(Policy::HeaderFooter {
                allowed_mode: e.allowed_mode,
                default_mode: e.default_mode,
            });
        }
        if let Some(e) = raw.css_background {
            entries.push(Policy::CssBackground {
                allowed_mode: e.allowed_mode.and_then(|m| m.into_option()),
                default_mode: e.default_mode.and_then(|m| m.into_option()),
            });
        }
        if let Some(e) = raw.media_size {
            entries.push(Policy::MediaSize {
                default_mode: e.default_mode,
            });
        }
        if let Some(e) = raw.sheets {
            entries.push(Policy::Sheets { value: e.value });
        }
        if let Some(e) = raw.color {
            entries.push(Policy::Color {
                allowed_mode: e.allowed_mode.and_then(|m| m.into_option()),
                default_mode: e.default_mode.and_then(|m| m.into_option()),
            });
        }
        if let Some(e) = raw.duplex {
            entries.push(Policy::Duplex {
                allowed_mode: e.allowed_mode.and_then(|m| m.into_option()),
                default_mode: e.default_mode.and_then(|m| m.into_option()),
            });
        }
        if let Some(e) = raw.pin {
            entries.push(Policy::Pin {
                allowed_mode: e.allowed_mode.and_then(|m| m.into_option()),
                default_mode: e.default_mode.and_then(|m| m.into_option()),
            });
        }
        if let Some(e) = raw.print_pdf_as_image_availability {
            entries.push(Policy::PrintPdfAsImageAvailability {
                allowed_mode: e.allowed_mode,
            });
        }
        if let Some(e) = raw.print_pdf_as_image {
            entries.push(Policy::PrintPdfAsImage {
                default_mode: e.default_mode,
            });
        }
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Policy> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
