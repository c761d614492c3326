//! Print settings and the model that reconciles them.
//!
//! Settings live as one JSON record inside an [`Observable`], keyed by
//! [`SettingName`]. Each entry has the shape of [`Setting`].
//!
//! [`Observable`]: printpreview_observable::Observable

mod availability;
mod document;
mod model;
mod policy;
mod sticky;
mod ticket;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use printpreview_config::Platform;

pub use document::{DocumentSettings, Margins, MarginsType, ScalingType, Size};
pub use model::{ModelEvent, PrintPreviewModel};
pub use ticket::{DuplexMode, PrintTicket};

/// Smallest page dimension that leaves room for headers and footers.
pub const MINIMUM_HEIGHT_MICRONS: i64 = 25400;

/// Version tag of the persisted sticky settings blob.
pub const STICKY_SETTINGS_VERSION: u64 = 2;

macro_rules! setting_names {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Name of one print setting.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SettingName {
            $($variant),+
        }

        impl SettingName {
            pub const ALL: &'static [SettingName] = &[$(SettingName::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(SettingName::$variant => $name),+
                }
            }
        }

        impl FromStr for SettingName {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(SettingName::$variant),)+
                    other => Err(format!("unknown setting: {}", other)),
                }
            }
        }
    };
}

setting_names! {
    Pages => "pages",
    Copies => "copies",
    Collate => "collate",
    Layout => "layout",
    Color => "color",
    MediaSize => "mediaSize",
    Margins => "margins",
    CustomMargins => "customMargins",
    Dpi => "dpi",
    Scaling => "scaling",
    ScalingType => "scalingType",
    ScalingTypePdf => "scalingTypePdf",
    Duplex => "duplex",
    DuplexShortEdge => "duplexShortEdge",
    CssBackground => "cssBackground",
    SelectionOnly => "selectionOnly",
    HeaderFooter => "headerFooter",
    Rasterize => "rasterize",
    VendorItems => "vendorItems",
    PagesPerSheet => "pagesPerSheet",
    OtherOptions => "otherOptions",
    Ranges => "ranges",
    RecentDestinations => "recentDestinations",
    Pin => "pin",
    PinValue => "pinValue",
}

impl fmt::Display for SettingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One setting entry.
///
/// `key` names the field in the sticky blob; an empty key means the
/// setting is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub value: Value,
    pub unavailable_value: Value,
    pub valid: bool,
    pub available: bool,
    pub set_by_policy: bool,
    pub set_from_ui: bool,
    pub key: String,
    pub updates_preview: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_default_value: Option<Value>,
}

impl Setting {
    fn new(value: Value, unavailable_value: Value, key: &str, updates_preview: bool) -> Self {
        Self {
            value,
            unavailable_value,
            valid: true,
            available: true,
            set_by_policy: false,
            set_from_ui: false,
            key: key.to_string(),
            updates_preview,
            policy_default_value: None,
        }
    }

    /// The value in effect: `unavailable_value` while unavailable.
    pub fn effective_value(&self) -> &Value {
        if self.available {
            &self.value
        } else {
            &self.unavailable_value
        }
    }
}

/// Letter paper with a full imageable area.
fn letter_media_size() -> Value {
    json!({
        "width_microns": 215900,
        "height_microns": 279400,
        "imageable_area_left_microns": 0,
        "imageable_area_bottom_microns": 0,
        "imageable_area_right_microns": 215900,
        "imageable_area_top_microns": 279400,
    })
}

/// The initial settings record. Every setting starts available.
pub fn create_settings() -> Value {
    use SettingName as N;

    let default_margins = Value::from(MarginsType::Default);
    let default_scaling = Value::from(ScalingType::Default);
    let entries = [
        (N::Pages, Setting::new(json!([1]), json!([]), "", false)),
        (N::Copies, Setting::new(json!(1), json!(1), "", false)),
        (N::Collate, Setting::new(json!(true), json!(false), "isCollateEnabled", false)),
        (N::Layout, Setting::new(json!(false), json!(false), "isLandscapeEnabled", true)),
        (N::Color, Setting::new(json!(true), json!(false), "isColorEnabled", true)),
        (N::MediaSize, Setting::new(json!({}), letter_media_size(), "mediaSize", true)),
        (
            N::Margins,
            Setting::new(default_margins.clone(), default_margins, "marginsType", true),
        ),
        (N::CustomMargins, Setting::new(json!({}), json!({}), "customMargins", true)),
        (N::Dpi, Setting::new(json!({}), json!({}), "dpi", false)),
        (N::Scaling, Setting::new(json!("100"), json!("100"), "scaling", true)),
        (
            N::ScalingType,
            Setting::new(default_scaling.clone(), default_scaling.clone(), "scalingType", true),
        ),
        (
            N::ScalingTypePdf,
            Setting::new(default_scaling.clone(), default_scaling, "scalingTypePdf", true),
        ),
        (N::Duplex, Setting::new(json!(true), json!(false), "isDuplexEnabled", false)),
        (
            N::DuplexShortEdge,
            Setting::new(json!(false), json!(false), "isDuplexShortEdge", false),
        ),
        (
            N::CssBackground,
            Setting::new(json!(false), json!(false), "isCssBackgroundEnabled", true),
        ),
        (N::SelectionOnly, Setting::new(json!(false), json!(false), "", true)),
        (
            N::HeaderFooter,
            Setting::new(json!(true), json!(false), "isHeaderFooterEnabled", true),
        ),
        (N::Rasterize, Setting::new(json!(false), json!(false), "", true)),
        (N::VendorItems, Setting::new(json!({}), json!({}), "vendorOptions", false)),
        (N::PagesPerSheet, Setting::new(json!(1), json!(1), "", true)),
        (N::OtherOptions, Setting::new(Value::Null, Value::Null, "", false)),
        (N::Ranges, Setting::new(json!([]), json!([]), "", true)),
        (
            N::RecentDestinations,
            Setting::new(json!([]), json!([]), "recentDestinations", false),
        ),
        (N::Pin, Setting::new(json!(false), json!(false), "isPinEnabled", false)),
        (N::PinValue, Setting::new(json!(""), json!(""), "pinValue", false)),
    ];

    let mut settings = Map::new();
    for (name, setting) in entries {
        // Setting only holds JSON values and plain fields.
        if let Ok(entry) = serde_json::to_value(setting) {
            settings.insert(name.as_str().to_string(), entry);
        }
    }
    Value::Object(settings)
}

/// Persisted settings in restore order.
pub fn sticky_setting_names(platform: Platform) -> Vec<SettingName> {
    use SettingName as N;

    let mut names = vec![
        N::RecentDestinations,
        N::Collate,
        N::Color,
        N::CssBackground,
        N::CustomMargins,
        N::Dpi,
        N::Duplex,
        N::DuplexShortEdge,
        N::HeaderFooter,
        N::Layout,
        N::Margins,
        N::MediaSize,
        N::Scaling,
        N::ScalingType,
        N::ScalingTypePdf,
        N::VendorItems,
    ];
    if platform.is_chrome_os() {
        names.push(N::Pin);
        names.push(N::PinValue);
    }
    names
}
