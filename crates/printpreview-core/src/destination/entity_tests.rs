use super::*;
use printpreview_protocols::{
    CopiesCapability, DuplexOption, OptionsCapability, PinCapability, PrinterStatus,
    PrinterStatusSeverity, StatusReasonEntry,
};

fn with_caps(caps: CddCapabilities) -> Destination {
    Destination::new("printer", DestinationOrigin::Local, "Printer")
        .with_capabilities(Cdd::with_printer(caps))
}

fn color_caps(types: &[&str]) -> CddCapabilities {
    CddCapabilities {
        color: Some(OptionsCapability::new(
            types.iter().map(|t| ColorOption::of_type(t)).collect(),
        )),
        ..CddCapabilities::default()
    }
}

#[test]
fn test_key_and_type() {
    let local = Destination::new("hp", DestinationOrigin::Local, "HP");
    assert_eq!(local.key(), "hp/local/");
    assert_eq!(local.printer_type(), PrinterType::Local);

    let pdf = Destination::new(SAVE_AS_PDF_ID, DestinationOrigin::Extension, "PDF");
    assert_eq!(pdf.printer_type(), PrinterType::Pdf);

    let ext = Destination::new("usb", DestinationOrigin::Extension, "USB");
    assert_eq!(ext.printer_type(), PrinterType::Extension);
    assert!(ext.is_extension());

    let cros = Destination::new("lab", DestinationOrigin::ChromeOs, "Lab");
    assert_eq!(cros.key(), "lab/chrome_os/");
    assert_eq!(cros.printer_type(), PrinterType::Local);
}

#[test]
fn test_color_capability_needs_both_kinds() {
    assert!(!with_caps(color_caps(&["STANDARD_COLOR"])).has_color_capability());
    assert!(!with_caps(color_caps(&["STANDARD_MONOCHROME"])).has_color_capability());
    assert!(with_caps(color_caps(&["STANDARD_COLOR", "STANDARD_MONOCHROME"])).has_color_capability());
    assert!(with_caps(color_caps(&["CUSTOM_COLOR", "CUSTOM_MONOCHROME"])).has_color_capability());
    assert!(!Destination::new("x", DestinationOrigin::Local, "X").has_color_capability());
}

#[test]
fn test_copies_capability() {
    let none = with_caps(CddCapabilities::default());
    assert!(!none.has_copies_capability());

    let unlimited = with_caps(CddCapabilities {
        copies: Some(CopiesCapability::default()),
        ..CddCapabilities::default()
    });
    assert!(unlimited.has_copies_capability());

    let single = with_caps(CddCapabilities {
        copies: Some(CopiesCapability {
            default: Some(1),
            max: Some(1),
        }),
        ..CddCapabilities::default()
    });
    assert!(!single.has_copies_capability());
}

#[test]
fn test_native_color_model() {
    let bare = Destination::new("x", DestinationOrigin::Local, "X");
    assert_eq!(bare.get_native_color_model(true), NATIVE_COLOR_MODEL_COLOR);
    assert_eq!(bare.get_native_color_model(false), NATIVE_COLOR_MODEL_GRAY);

    let mut caps = color_caps(&["STANDARD_COLOR", "STANDARD_MONOCHROME"]);
    if let Some(color) = caps.color.as_mut() {
        color.option[0].vendor_id = Some("13".to_string());
        color.option[1].vendor_id = Some("not-a-number".to_string());
    }
    let dest = with_caps(caps);
    assert_eq!(dest.get_native_color_model(true), 13);
    assert_eq!(dest.get_native_color_model(false), NATIVE_COLOR_MODEL_GRAY);
}

#[test]
fn test_get_color_prefers_standard() {
    let dest = with_caps(color_caps(&["CUSTOM_COLOR", "STANDARD_COLOR", "STANDARD_MONOCHROME"]));
    assert_eq!(
        dest.get_color(true).and_then(|o| o.r#type.as_deref()),
        Some("STANDARD_COLOR")
    );
    assert_eq!(
        dest.get_color(false).and_then(|o| o.r#type.as_deref()),
        Some("STANDARD_MONOCHROME")
    );
}

#[test]
fn test_default_color_option() {
    let mut caps = color_caps(&["STANDARD_COLOR", "STANDARD_MONOCHROME"]);
    if let Some(color) = caps.color.as_mut() {
        color.option[1].is_default = Some(true);
    }
    let dest = with_caps(caps);
    assert!(dest.default_color_option().unwrap().is_monochrome());
}

#[test]
fn test_supports_duplex() {
    let dest = with_caps(CddCapabilities {
        duplex: Some(OptionsCapability::new(vec![
            DuplexOption::new(DuplexType::NoDuplex),
            DuplexOption::new(DuplexType::LongEdge),
        ])),
        ..CddCapabilities::default()
    });
    assert!(dest.supports_duplex(DuplexType::LongEdge));
    assert!(!dest.supports_duplex(DuplexType::ShortEdge));
    assert!(!with_caps(CddCapabilities::default()).supports_duplex(DuplexType::NoDuplex));
}

#[test]
fn test_dpi_and_media_lookup() {
    let dest = with_caps(CddCapabilities {
        dpi: Some(OptionsCapability::new(vec![
            DpiOption::new(300, 300),
            DpiOption::new(600, 600),
        ])),
        media_size: Some(OptionsCapability::new(vec![
            MediaSizeOption::new("NA_LETTER", 215900, 279400),
            MediaSizeOption::new("ISO_A4", 210000, 297000),
        ])),
        ..CddCapabilities::default()
    });
    assert!(dest.get_dpi(600, 600).is_some());
    assert!(dest.get_dpi(1200, 1200).is_none());
    assert_eq!(
        dest.get_media_size(210000, 297000).and_then(|m| m.name.as_deref()),
        Some("ISO_A4")
    );
}

#[test]
fn test_pin_setting() {
    let dest = with_caps(CddCapabilities {
        pin: Some(PinCapability {
            supported: Some(true),
        }),
        ..CddCapabilities::default()
    });
    assert!(dest.has_pin_setting());
    assert!(!with_caps(CddCapabilities::default()).has_pin_setting());
}

#[test]
fn test_from_descriptor() {
    let mut descriptor = PrinterDescriptor::new("lab-1", "Lab Printer");
    descriptor.location = Some("Room 4".to_string());
    descriptor.is_enterprise_printer = true;
    descriptor.printer_status = Some(PrinterStatus {
        printer_id: "lab-1".to_string(),
        status_reasons: vec![StatusReasonEntry::new(
            PrinterStatusReason::OutOfInk,
            PrinterStatusSeverity::Error,
        )],
        timestamp: 1.0,
    });

    let dest = Destination::from_descriptor(&descriptor, PrinterType::Local, true);
    assert_eq!(dest.key(), "lab-1/chrome_os/");
    assert_eq!(dest.display_name(), "Lab Printer");
    assert_eq!(dest.location(), "Room 4");
    assert_eq!(dest.printer_state(), PrinterState::Error);
    assert_eq!(dest.icon(), "print-preview:business-printer-status-red");

    let mut usb = PrinterDescriptor::new("usb-7", "");
    usb.provisional = true;
    usb.extension_id = Some("ext".to_string());
    let dest = Destination::from_descriptor(&usb, PrinterType::Extension, false);
    assert_eq!(dest.display_name(), "usb-7");
    assert!(dest.is_provisional());
    assert_eq!(dest.origin(), DestinationOrigin::Extension);
    assert_eq!(dest.extension_id(), "ext");
}

#[test]
fn test_recent_destination_round_trip_fields() {
    let dest = Destination::new("hp", DestinationOrigin::Local, "HP")
        .with_capabilities(Cdd::with_printer(color_caps(&["STANDARD_COLOR"])));
    let recent = make_recent_destination(&dest);
    assert_eq!(recent.key(), "hp/local/");
    assert_eq!(recent.display_name, "HP");
    assert!(recent.capabilities.is_some());

    let json = serde_json::to_value(&recent).unwrap();
    assert_eq!(json["origin"], "local");
    assert_eq!(json["displayName"], "HP");
}
