use super::*;
use serde_json::json;

fn sample_cdd() -> serde_json::Value {
    json!({
        "version": "1.0",
        "printer": {
            "collate": {"default": true},
            "color": {"option": [
                {"type": "STANDARD_COLOR", "vendor_id": "2", "is_default": true},
                {"type": "STANDARD_MONOCHROME", "vendor_id": "1"}
            ]},
            "copies": {"default": 1, "max": 99},
            "duplex": {"option": [
                {"type": "NO_DUPLEX", "is_default": true},
                {"type": "LONG_EDGE"},
                {"type": "SHORT_EDGE"}
            ]},
            "media_size": {"option": [
                {"name": "NA_LETTER", "width_microns": 215900, "height_microns": 279400, "is_default": true},
                {"name": "ISO_A4", "width_microns": 210000, "height_microns": 297000}
            ]},
            "dpi": {"option": [
                {"horizontal_dpi": 300, "vertical_dpi": 300},
                {"horizontal_dpi": 600, "vertical_dpi": 600, "is_default": true}
            ]},
            "vendor_capability": [
                {"id": "finishings", "type": "SELECT", "select_cap": {"option": [
                    {"value": "none", "is_default": true},
                    {"value": "staple"}
                ]}}
            ]
        }
    })
}

#[test]
fn test_parse_full_document() {
    let cdd: Cdd = serde_json::from_value(sample_cdd()).unwrap();
    let printer = cdd.printer.unwrap();
    assert_eq!(printer.color.as_ref().unwrap().option.len(), 2);
    assert_eq!(printer.copies.as_ref().unwrap().max, Some(99));
    assert_eq!(printer.duplex.as_ref().unwrap().option[1].r#type, DuplexType::LongEdge);
    assert_eq!(printer.vendor_capability.as_ref().unwrap()[0].id, "finishings");
}

#[test]
fn test_default_or_first() {
    let cdd: Cdd = serde_json::from_value(sample_cdd()).unwrap();
    let printer = cdd.printer.unwrap();
    let dpi = printer.dpi.unwrap();
    assert_eq!(dpi.default_or_first().unwrap().horizontal_dpi, 600);

    let no_default = OptionsCapability::new(vec![DpiOption::new(150, 150)]);
    assert_eq!(no_default.default_or_first().unwrap().horizontal_dpi, 150);
    assert!(no_default.default_option().is_none());
}

#[test]
fn test_reset_value_requires_flag() {
    let mut cap = OptionsCapability::new(vec![DuplexOption {
        r#type: DuplexType::LongEdge,
        is_default: Some(true),
    }]);
    assert!(cap.reset_value().is_none());

    cap.reset_to_default = Some(true);
    assert_eq!(cap.reset_value().unwrap().r#type, DuplexType::LongEdge);
}

#[test]
fn test_duplex_type_wire_names() {
    assert_eq!(serde_json::to_string(&DuplexType::NoDuplex).unwrap(), "\"NO_DUPLEX\"");
    assert_eq!(serde_json::to_string(&DuplexType::ShortEdge).unwrap(), "\"SHORT_EDGE\"");
    assert!(DuplexType::LongEdge.is_two_sided());
    assert!(!DuplexType::NoDuplex.is_two_sided());
}

#[test]
fn test_vendor_default_value() {
    let select: VendorCapability = serde_json::from_value(json!({
        "id": "finishings", "type": "SELECT",
        "select_cap": {"option": [{"value": "a"}, {"value": "b", "is_default": true}]}
    }))
    .unwrap();
    assert_eq!(select.default_value(), Some("b"));

    let range: VendorCapability = serde_json::from_value(json!({
        "id": "density", "type": "RANGE", "range_cap": {"value_type": "INTEGER", "default": "5"}
    }))
    .unwrap();
    assert_eq!(range.default_value(), Some("5"));

    let typed: VendorCapability = serde_json::from_value(json!({
        "id": "label", "type": "TYPED_VALUE", "typed_value_cap": {"value_type": "STRING"}
    }))
    .unwrap();
    assert_eq!(typed.default_value(), None);
}

#[test]
fn test_serialize_skips_absent_fields() {
    let cdd = Cdd::with_printer(CddCapabilities {
        color: Some(OptionsCapability::new(vec![ColorOption::of_type("STANDARD_COLOR")])),
        ..CddCapabilities::default()
    });
    let text = serde_json::to_string(&cdd).unwrap();
    assert_eq!(
        text,
        r#"{"version":"1.0","printer":{"color":{"option":[{"type":"STANDARD_COLOR"}]}}}"#
    );
}

#[test]
fn test_color_option_is_monochrome() {
    assert!(ColorOption::of_type("STANDARD_MONOCHROME").is_monochrome());
    assert!(ColorOption::of_type("CUSTOM_MONOCHROME").is_monochrome());
    assert!(!ColorOption::of_type("STANDARD_COLOR").is_monochrome());
    assert!(!ColorOption::default().is_monochrome());
}

#[test]
fn test_options_of_types_without_default() {
    let duplex: OptionsCapability<DuplexOption> =
        serde_json::from_value(json!({"option": [{"type": "SHORT_EDGE"}]})).unwrap();
    assert_eq!(duplex.option, vec![DuplexOption::new(DuplexType::ShortEdge)]);
    assert!(duplex.reset_to_default.is_none());

    let empty: OptionsCapability<DuplexOption> = serde_json::from_value(json!({})).unwrap();
    assert!(empty.option.is_empty());
}
