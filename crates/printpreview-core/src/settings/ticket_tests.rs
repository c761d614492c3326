use super::*;
use printpreview_config::Platform;
use printpreview_protocols::{
    Cdd, CddCapabilities, CollateCapability, ColorOption, CopiesCapability, DpiOption,
    DuplexOption, DuplexType, MediaSizeOption, OptionsCapability, PageOrientationOption,
    PinCapability, SelectCapability, SelectOption, VendorCapability, VendorCapabilityType,
};

use crate::destination::SAVE_AS_PDF_ID;
use crate::settings::{DocumentSettings, Size};

fn color(color_type: &str, vendor_id: &str, is_default: bool) -> ColorOption {
    ColorOption {
        vendor_id: Some(vendor_id.to_string()),
        is_default: Some(is_default),
        ..ColorOption::of_type(color_type)
    }
}

fn orientation(types: &[&str]) -> OptionsCapability<PageOrientationOption> {
    OptionsCapability::new(
        types
            .iter()
            .map(|t| PageOrientationOption {
                r#type: Some(t.to_string()),
                is_default: None,
            })
            .collect(),
    )
}

fn printer_caps() -> CddCapabilities {
    let letter = MediaSizeOption {
        is_default: Some(true),
        ..MediaSizeOption::new("NA_LETTER", 215900, 279400)
    };
    let dpi_300 = DpiOption {
        is_default: Some(true),
        ..DpiOption::new(300, 300)
    };
    CddCapabilities {
        collate: Some(CollateCapability::default()),
        copies: Some(CopiesCapability::default()),
        color: Some(OptionsCapability::new(vec![
            color("STANDARD_COLOR", "13", true),
            color("STANDARD_MONOCHROME", "14", false),
        ])),
        duplex: Some(OptionsCapability::new(vec![
            DuplexOption {
                is_default: Some(true),
                ..DuplexOption::new(DuplexType::NoDuplex)
            },
            DuplexOption::new(DuplexType::LongEdge),
            DuplexOption::new(DuplexType::ShortEdge),
        ])),
        page_orientation: Some(orientation(&["PORTRAIT", "LANDSCAPE", "AUTO"])),
        media_size: Some(OptionsCapability::new(vec![
            letter,
            MediaSizeOption::new("ISO_A4", 210000, 297000),
        ])),
        dpi: Some(OptionsCapability::new(vec![dpi_300, DpiOption::new(600, 600)])),
        ..CddCapabilities::default()
    }
}

fn local_printer() -> Destination {
    Destination::new("office", DestinationOrigin::Local, "Office")
        .with_capabilities(Cdd::with_printer(printer_caps()))
}

fn extension_printer(caps: CddCapabilities) -> Destination {
    Destination::new("usb-1", DestinationOrigin::Extension, "USB printer")
        .with_extension("ext-id", "Printer app")
        .with_capabilities(Cdd::with_printer(caps))
}

fn model_for(destination: &Destination) -> PrintPreviewModel {
    let mut model = PrintPreviewModel::new(Platform::Linux);
    model.set_destination(destination.clone());
    model
}

#[test]
fn test_ticket_defaults_from_capabilities() {
    let destination = local_printer();
    let mut model = model_for(&destination);
    model.set_page_size(Size::new(612, 792));

    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.media_size["width_microns"], 215900);
    assert_eq!(ticket.page_count, 1);
    assert!(!ticket.landscape);
    assert_eq!(ticket.color, 13);
    assert!(!ticket.header_footer_enabled);
    assert_eq!(ticket.margins_type, MarginsType::Default);
    assert_eq!(ticket.duplex, DuplexMode::Simplex);
    assert_eq!(ticket.copies, 1);
    assert!(ticket.collate);
    assert!(!ticket.should_print_selection_only);
    assert!(ticket.preview_modifiable);
    assert_eq!(ticket.printer_type, PrinterType::Local);
    assert_eq!(ticket.scale_factor, 100);
    assert_eq!(ticket.scaling_type, ScalingType::Default);
    assert_eq!(ticket.dpi_horizontal, 300);
    assert_eq!(ticket.dpi_vertical, 300);
    assert_eq!(ticket.device_name, "office");
    assert_eq!(ticket.page_width, 612);
    assert_eq!(ticket.page_height, 792);
    assert!(ticket.open_pdf_in_preview.is_none());
    assert!(ticket.margins_custom.is_none());
    assert!(ticket.ticket.is_none());
    assert!(ticket.capabilities.is_none());
}

#[test]
fn test_ticket_reflects_user_choices() {
    let destination = local_printer();
    let mut model = model_for(&destination);
    model.set_setting(SettingName::Layout, Value::Bool(true), false);
    model.set_setting(SettingName::Duplex, Value::Bool(true), false);
    model.set_setting(SettingName::DuplexShortEdge, Value::Bool(true), false);
    model.set_setting(SettingName::Color, Value::Bool(false), false);

    let ticket = model.create_print_ticket(&destination, false, true);
    assert!(ticket.landscape);
    assert_eq!(ticket.duplex, DuplexMode::ShortEdge);
    assert_eq!(ticket.color, 14);
    assert!(ticket.show_system_dialog);

    model.set_setting(SettingName::DuplexShortEdge, Value::Bool(false), false);
    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.duplex, DuplexMode::LongEdge);
}

#[test]
fn test_custom_scaling() {
    let destination = local_printer();
    let mut model = model_for(&destination);
    model.set_setting(SettingName::ScalingType, ScalingType::Custom.into(), false);
    model.set_setting(SettingName::Scaling, json!("90"), false);

    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.scaling_type, ScalingType::Custom);
    assert_eq!(ticket.scale_factor, 90);

    model.set_setting(SettingName::Scaling, json!("abc"), false);
    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.scale_factor, 100);
}

#[test]
fn test_pdf_source_reads_pdf_scaling_type() {
    let destination = local_printer();
    let mut model = model_for(&destination);
    model.set_document_settings(DocumentSettings {
        is_modifiable: false,
        ..DocumentSettings::default()
    });
    model.set_setting(SettingName::ScalingType, ScalingType::Custom.into(), false);
    model.set_setting(SettingName::ScalingTypePdf, ScalingType::FitToPage.into(), false);

    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.scaling_type, ScalingType::FitToPage);
    assert_eq!(ticket.scale_factor, 100);
    assert!(!ticket.preview_modifiable);
}

#[test]
fn test_parse_scale_factor() {
    assert_eq!(parse_scale_factor("90"), Some(90));
    assert_eq!(parse_scale_factor(" 120%"), Some(120));
    assert_eq!(parse_scale_factor("90.5"), Some(90));
    assert_eq!(parse_scale_factor("-5"), Some(-5));
    assert_eq!(parse_scale_factor(""), None);
    assert_eq!(parse_scale_factor("x90"), None);
}

#[test]
fn test_custom_margins_are_attached() {
    let destination = local_printer();
    let mut model = model_for(&destination);
    let custom = json!({"marginTop": 10, "marginRight": 20, "marginBottom": 30, "marginLeft": 40});
    model.set_setting(SettingName::Margins, MarginsType::Custom.into(), false);
    model.set_setting(SettingName::CustomMargins, custom.clone(), false);

    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.margins_type, MarginsType::Custom);
    assert_eq!(ticket.margins_custom, Some(custom));
}

#[test]
fn test_json_field_names_and_order() {
    let destination = Destination::new(SAVE_AS_PDF_ID, DestinationOrigin::Local, "Save as PDF");
    let model = model_for(&destination);

    let json = model
        .create_print_ticket(&destination, false, false)
        .to_json()
        .unwrap();
    assert!(json.starts_with(r#"{"mediaSize":"#));
    assert!(json.contains(r#""rasterizePDF":false"#));
    assert!(json.contains(r#""printerType":1"#));
    assert!(json.contains(r#""marginsType":0"#));
    assert!(json.ends_with(r#""showSystemDialog":false}"#));
    assert!(!json.contains("openPDFInPreview"));

    let json = model
        .create_print_ticket(&destination, true, false)
        .to_json()
        .unwrap();
    assert!(json.ends_with(r#""openPDFInPreview":true}"#));

    let parsed: Value = serde_json::from_str(&json).unwrap();
    let keys: Vec<&str> = parsed.as_object().unwrap().keys().map(String::as_str).collect();
    assert!(keys.contains(&"dpiDefault"));
    assert!(keys.contains(&"shouldPrintSelectionOnly"));
}

#[test]
fn test_extension_ticket_embeds_cloud_job_ticket() {
    let destination = extension_printer(printer_caps());
    let model = model_for(&destination);

    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.printer_type, PrinterType::Extension);
    let cjt: Value = serde_json::from_str(ticket.ticket.as_deref().unwrap()).unwrap();
    assert_eq!(cjt["version"], "1.0");
    let caps: Cdd = serde_json::from_str(ticket.capabilities.as_deref().unwrap()).unwrap();
    assert_eq!(caps.printer, Some(printer_caps()));
}

#[test]
fn test_cloud_job_ticket_contents() {
    let mut caps = printer_caps();
    caps.vendor_capability = Some(vec![VendorCapability {
        id: "finishing".to_string(),
        display_name: None,
        r#type: VendorCapabilityType::Select,
        select_cap: Some(SelectCapability {
            option: vec![SelectOption {
                value: "staple".to_string(),
                display_name: None,
                is_default: Some(true),
            }],
        }),
        range_cap: None,
        typed_value_cap: None,
    }]);
    let destination = extension_printer(caps);
    let mut model = model_for(&destination);
    model.set_setting(SettingName::Copies, json!(3), false);
    model.set_setting(SettingName::Duplex, Value::Bool(true), false);

    let cjt: Value = serde_json::from_str(&model.create_cloud_job_ticket(&destination)).unwrap();
    let print = &cjt["print"];
    assert_eq!(print["collate"], json!({"collate": true}));
    assert_eq!(print["color"], json!({"type": "STANDARD_COLOR", "vendor_id": "13"}));
    assert_eq!(print["copies"], json!({"copies": 3}));
    assert_eq!(print["duplex"], json!({"type": "LONG_EDGE"}));
    assert_eq!(
        print["media_size"],
        json!({"width_microns": 215900, "height_microns": 279400})
    );
    assert_eq!(print["page_orientation"], json!({"type": "PORTRAIT"}));
    assert_eq!(
        print["dpi"],
        json!({"horizontal_dpi": 300, "vertical_dpi": 300})
    );
    assert_eq!(
        print["vendor_ticket_item"],
        json!([{"id": "finishing", "value": "staple"}])
    );
}

#[test]
fn test_cloud_job_ticket_without_choices() {
    let caps = CddCapabilities {
        color: Some(OptionsCapability::new(vec![color("STANDARD_MONOCHROME", "1", true)])),
        page_orientation: Some(orientation(&["AUTO"])),
        ..CddCapabilities::default()
    };
    let destination = extension_printer(caps);
    let model = model_for(&destination);

    let cjt: Value = serde_json::from_str(&model.create_cloud_job_ticket(&destination)).unwrap();
    let print = cjt["print"].as_object().unwrap();
    assert_eq!(print["color"], json!({"type": "STANDARD_MONOCHROME", "vendor_id": "1"}));
    assert_eq!(print["page_orientation"], json!({"type": "AUTO"}));
    for absent in ["collate", "copies", "duplex", "media_size", "dpi", "vendor_ticket_item"] {
        assert!(!print.contains_key(absent), "{}", absent);
    }
}

#[test]
#[should_panic(expected = "non-extension destination")]
fn test_cloud_job_ticket_requires_extension() {
    let destination = local_printer();
    let model = model_for(&destination);
    model.create_cloud_job_ticket(&destination);
}

#[test]
fn test_chrome_os_pin_and_advanced_settings() {
    let caps = CddCapabilities {
        pin: Some(PinCapability {
            supported: Some(true),
        }),
        ..printer_caps()
    };
    let destination = Destination::new("lab", DestinationOrigin::ChromeOs, "Lab")
        .with_capabilities(Cdd::with_printer(caps));
    let mut model = PrintPreviewModel::new(Platform::ChromeOs);
    model.set_destination(destination.clone());

    let ticket = model.create_print_ticket(&destination, false, false);
    assert!(ticket.pin_value.is_none());
    assert_eq!(ticket.advanced_settings, Some(json!({})));

    model.set_setting(SettingName::Pin, Value::Bool(true), false);
    model.set_setting(SettingName::PinValue, json!("1234"), false);
    let ticket = model.create_print_ticket(&destination, false, false);
    assert_eq!(ticket.pin_value.as_deref(), Some("1234"));

    let json = ticket.to_json().unwrap();
    assert!(json.ends_with(r#""pinValue":"1234","advancedSettings":{}}"#));
}
