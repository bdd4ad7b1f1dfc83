//! Built-in schematic: FOC_DV, a three-phase BLDC motor driver board
//!
//! DRV8313 gate driver in the middle, INA240 current sense amplifiers at the
//! bottom left, the MCU/SWD header on the right and the motor terminal block
//! at the bottom.

use anyhow::Context;

use super::Schematic;
use crate::domain::{
    Color, ComponentInfo, LayoutShape, NetClass, NetLabel, PathData, PinLabel, PinSide, ShapeKind,
    Wire,
};

/// Display name of the built-in schematic
pub const NAME: &str = "FOC_DV";

/// (reference, value, title, description, specs)
type InfoRow = (&'static str, &'static str, &'static str, &'static str, &'static [&'static str]);

const COMPONENTS: &[InfoRow] = &[
    (
        "U1",
        "DRV8313PWP",
        "Three-Phase Gate Driver",
        "The core of the motor driver. The DRV8313 accepts PWM logic signals from the STM32 and drives the six half-bridge FETs that switch current through the motor windings. It includes a bootstrap charge pump for high-side gate drive, plus integrated overcurrent and thermal fault protection.",
        &[
            "Motor supply: 8–60V",
            "Output: 2.5A continuous per phase",
            "Bootstrap charge pump for high-side gate drive",
            "Overcurrent + thermal shutdown with nFAULT flag",
            "Package: HTSSOP-28 (PWP)",
        ],
    ),
    (
        "U2",
        "2×5 Pin Header",
        "STM32 / SWD Interface Header",
        "A 10-pin 2.54mm header that serves as the central MCU interface. All PWM control signals, enable pins, and the ADC current sense outputs route through here to the external STM32. The pinout also follows the ARM CoreSight SWD standard for firmware flashing and debugging via ST-Link.",
        &[
            "SWD pins: SWDIO, SWDCLK",
            "PWM inputs: INH/INL for all 3 phases",
            "nFAULT and nSLEEP control",
            "ADC outputs: CA_out, CC_out",
        ],
    ),
    (
        "U3",
        "INA240A2D",
        "Phase A Current Sense Amplifier",
        "Amplifies the voltage drop across the phase A shunt resistor into a 0–3.3V signal readable by the STM32 ADC. The A2 variant has a fixed 50V/V gain. Enhanced PWM rejection is the key feature here: without it, the fast motor switching transients would saturate the amplifier mid-commutation.",
        &[
            "Fixed gain: 50 V/V",
            "Bidirectional: measures + and − current",
            "Enhanced PWM rejection for accurate mid-cycle readings",
            "Zero-drift for low offset error",
            "Supply: isolated +3.3VADC rail",
        ],
    ),
    (
        "U4",
        "INA240A2D",
        "Phase C Current Sense Amplifier",
        "Measures phase C current. Sensing phases A and C is sufficient because phase B is derived by Kirchhoff's current law: Ia + Ib + Ic = 0 for a star-connected motor. This saves one amplifier while enabling full 3-phase current reconstruction for FOC.",
        &[
            "Identical spec to U3 for symmetrical sensing",
            "Output: CC_out to STM32 ADC",
            "KCL allows Phase B derivation in firmware",
        ],
    ),
    (
        "R4",
        "Shunt Resistor",
        "Phase A Current Sense Shunt",
        "A low-resistance power resistor placed inline on motor phase A. Current through it creates a voltage drop (V = I × R) that U3 amplifies. The 2010 (2512) package is chosen for its power rating; at full stall current this resistor dissipates meaningful heat.",
        &[
            "Package: R_2010 (2512 footprint)",
            "Inline on Phase A between DRV8313 OUT1 and motor terminal",
            "Power package required for high stall current",
        ],
    ),
    (
        "R5",
        "Shunt Resistor",
        "Phase C Current Sense Shunt",
        "Identical role to R4 but on phase C. Both shunts must be the same value to ensure symmetrical gain across the two measurement channels.",
        &[
            "Package: R_2010 (2512 footprint)",
            "Inline on Phase C between DRV8313 OUT3 and motor terminal",
        ],
    ),
    (
        "C1",
        "100µF",
        "Bulk Motor Supply Decoupling",
        "Stores charge to supply large transient currents during motor commutation without drooping the supply rail. Without this the sharp current spikes from FET switching can reset the MCU or inject noise into logic signals.",
        &[
            "100µF electrolytic",
            "Placed close to DRV8313 VM pin",
            "Handles low-frequency transient current",
        ],
    ),
    (
        "C2",
        "100nF",
        "DRV8313 High-Frequency Bypass",
        "Ceramic bypass for the DRV8313 logic supply. Ceramics have very low ESL so they absorb the fast switching edges that the bulk electrolytic cannot. Placed as close to the IC supply pin as possible.",
        &["100nF ceramic, 0603", "Handles high-frequency switching noise"],
    ),
    (
        "C3",
        "100nF",
        "DRV8313 High-Frequency Bypass (2nd)",
        "Second ceramic bypass on the DRV8313 logic rail for improved high-frequency filtering. Redundant bypassing increases effectiveness across a wider frequency range.",
        &["100nF ceramic, 0603"],
    ),
    (
        "C4",
        "470nF",
        "ADC Reference Decoupling",
        "Filters the +3.3VADC supply that feeds the INA240 amplifiers. Noise on this rail appears as a DC offset or noise floor in the current measurement. Separating and decoupling the ADC reference is what makes the current sensing accurate.",
        &["470nF ceramic, 0603", "On isolated +3.3VADC rail"],
    ),
    (
        "C5",
        "1µF",
        "INA240 (Phase A) Supply Bypass",
        "Local bypass for U3 (INA240 phase A). Ensures the amplifier has a stable supply during the STM32 ADC sampling window.",
        &["1µF ceramic, 0603"],
    ),
    (
        "C6",
        "1µF",
        "INA240 (Phase C) Supply Bypass",
        "Same role as C5 for U4. Symmetrical bypassing on both current sense channels.",
        &["1µF ceramic, 0603"],
    ),
    (
        "D1",
        "LED",
        "Fault Indicator LED",
        "Connected to the DRV8313 nFAULT open-drain output. Illuminates when the driver detects overcurrent or overtemperature. During debugging this was essential: when the EN pin floated the LED stayed off, confirming a logic problem rather than a power fault.",
        &[
            "Anode: +3.3V via R3 (1kΩ)",
            "Cathode: nFAULT (pulled low on fault)",
            "0603 package",
        ],
    ),
    (
        "R3",
        "1kΩ",
        "LED Series Resistor",
        "Limits LED forward current. At 3.3V supply with ~2V LED Vf: (3.3 − 2.0) / 1000 = 1.3mA. Dim but clearly visible and well within safe operating range.",
        &["1kΩ, 0603"],
    ),
    (
        "R7",
        "10kΩ",
        "nFAULT Pull-up Resistor",
        "The DRV8313 nFAULT pin is open-drain: it can only sink current, not source it. Without this pull-up the pin would float and read garbage. 10kΩ to +3.3V gives a clean logic-HIGH when no fault is present.",
        &["10kΩ, 0603", "Pull-up to +3.3V"],
    ),
    (
        "R1",
        "10kΩ",
        "Enable Pin Pull-down",
        "Holds an EN pin LOW when the MCU GPIO is in high-impedance mode (during boot). Without this the DRV8313 could briefly enable during MCU initialization, sending spurious pulses to the motor.",
        &["10kΩ, 0603", "Pull-down to GND"],
    ),
    (
        "R2",
        "10kΩ",
        "nSLEEP Pull-down",
        "Ensures the DRV8313 starts in sleep mode (outputs disabled) until the MCU explicitly drives nSLEEP HIGH. A safe default state.",
        &["10kΩ, 0603", "Pull-down to GND"],
    ),
    (
        "R6",
        "10kΩ",
        "Control Pin Pull Resistor",
        "Pull resistor for a DRV8313 control input, ensuring a defined default logic state during MCU initialization.",
        &["10kΩ, 0603"],
    ),
    (
        "J1",
        "2-pin Header",
        "ADC Output Connector",
        "Routes CA_out and CC_out from the INA240 amplifiers to the STM32 ADC input pins. Having a dedicated connector makes it easy to probe the current sense signals with an oscilloscope independently of the MCU header.",
        &[
            "Pin 1: CA_out (Phase A, amplified)",
            "Pin 2: CC_out (Phase C, amplified)",
            "2.54mm pitch",
        ],
    ),
    (
        "J3",
        "TB001-500-03BE",
        "Motor Phase Terminal Block",
        "Screw terminal block providing the high-current connection between the PCB and the brushless motor phase wires. The 5mm pitch and screw clamping handle the motor current reliably compared to a standard pin header.",
        &[
            "3-position, 5mm pitch",
            "Connections: Phase A, Phase B, Phase C",
            "Rated for continuous motor current",
        ],
    ),
];

/// (id, x, y, width, height, color, kind, value label)
type ShapeRow = (&'static str, f32, f32, f32, f32, &'static str, ShapeKind, &'static str);

const SHAPES: &[ShapeRow] = &[
    ("U1", 380.0, 110.0, 220.0, 400.0, "#0891b2", ShapeKind::Ic, "DRV8313PWP"),
    ("U2", 830.0, 120.0, 88.0, 200.0, "#059669", ShapeKind::Connector, "2×5 Header\nSWD/MCU"),
    ("U3", 60.0, 460.0, 140.0, 110.0, "#7c3aed", ShapeKind::Ic, "INA240A2D"),
    ("U4", 260.0, 460.0, 140.0, 110.0, "#7c3aed", ShapeKind::Ic, "INA240A2D"),
    ("R4", 160.0, 290.0, 48.0, 22.0, "#d97706", ShapeKind::Resistor, "Shunt"),
    ("R5", 390.0, 290.0, 48.0, 22.0, "#d97706", ShapeKind::Resistor, "Shunt"),
    ("C1", 690.0, 170.0, 28.0, 48.0, "#ca8a04", ShapeKind::Capacitor, "100µF"),
    ("C2", 320.0, 80.0, 22.0, 38.0, "#ca8a04", ShapeKind::Capacitor, "100nF"),
    ("C3", 352.0, 80.0, 22.0, 38.0, "#ca8a04", ShapeKind::Capacitor, "100nF"),
    ("C4", 690.0, 100.0, 22.0, 38.0, "#ca8a04", ShapeKind::Capacitor, "470nF"),
    ("C5", 66.0, 430.0, 22.0, 28.0, "#ca8a04", ShapeKind::Capacitor, "1µF"),
    ("C6", 266.0, 430.0, 22.0, 28.0, "#ca8a04", ShapeKind::Capacitor, "1µF"),
    ("D1", 740.0, 380.0, 32.0, 28.0, "#e11d48", ShapeKind::Led, "LED"),
    ("R3", 800.0, 382.0, 36.0, 20.0, "#d97706", ShapeKind::Resistor, "1kΩ"),
    ("R7", 740.0, 320.0, 36.0, 20.0, "#d97706", ShapeKind::Resistor, "10kΩ"),
    ("R1", 300.0, 410.0, 36.0, 20.0, "#d97706", ShapeKind::Resistor, "10kΩ"),
    ("R2", 300.0, 440.0, 36.0, 20.0, "#d97706", ShapeKind::Resistor, "10kΩ"),
    ("R6", 300.0, 470.0, 36.0, 20.0, "#d97706", ShapeKind::Resistor, "10kΩ"),
    ("J1", 60.0, 360.0, 52.0, 50.0, "#16a34a", ShapeKind::Connector, "ADC Out"),
    (
        "J3",
        430.0,
        590.0,
        140.0,
        52.0,
        "#16a34a",
        ShapeKind::Connector,
        "Motor Phases\nTB001-500-03BE",
    ),
];

/// (path data, color, label; empty for none)
const WIRES: &[(&str, &str, &str)] = &[
    // Supply rails
    ("M 60 55 L 1040 55", "#ef4444", "VCC"),
    ("M 60 92 L 1040 92", "#f97316", "+3.3V"),
    ("M 60 652 L 1040 652", "#6b7280", "GND"),
    // DRV8313 VM and V3P3
    ("M 600 180 L 690 180 L 690 55", "#ef4444", ""),
    ("M 600 220 L 680 220 L 680 92", "#f97316", ""),
    // Bulk and bypass capacitors
    ("M 704 170 L 704 55", "#ef4444", ""),
    ("M 704 218 L 704 652", "#6b7280", ""),
    ("M 331 80 L 331 55", "#ef4444", ""),
    ("M 331 118 L 331 652", "#6b7280", ""),
    ("M 363 80 L 363 55", "#ef4444", ""),
    ("M 363 118 L 363 652", "#6b7280", ""),
    ("M 701 100 L 701 92", "#f97316", ""),
    ("M 701 138 L 701 652", "#6b7280", ""),
    // Motor phases
    ("M 380 210 L 208 210 L 208 290", "#22d3ee", "Phase A"),
    ("M 208 312 L 208 430 L 500 430 L 500 590", "#22d3ee", ""),
    ("M 380 270 L 240 270 L 240 575", "#a78bfa", "Phase B"),
    ("M 240 575 L 500 575 L 500 590", "#a78bfa", ""),
    ("M 380 330 L 390 330 L 390 290", "#4ade80", "Phase C"),
    ("M 438 290 L 438 560 L 500 560", "#4ade80", ""),
    // Fault indicator
    ("M 600 460 L 756 460 L 756 408", "#f43f5e", "nFAULT"),
    ("M 756 380 L 756 340", "#f43f5e", ""),
    ("M 756 320 L 756 92", "#f97316", ""),
    ("M 836 382 L 836 92", "#f97316", ""),
    // MCU header supply
    ("M 874 120 L 874 92", "#f97316", ""),
    ("M 874 320 L 874 652", "#6b7280", ""),
    // PWM and enable
    ("M 830 160 L 620 160 L 620 155 L 600 155", "#94a3b8", "INH1-3"),
    ("M 830 190 L 600 190", "#94a3b8", ""),
    ("M 830 220 L 600 220", "#94a3b8", ""),
    ("M 830 250 L 600 250", "#64748b", "EN1-3"),
    ("M 830 270 L 600 270", "#64748b", ""),
    // Current sense
    ("M 184 310 L 184 515 L 200 515", "#22d3ee", ""),
    ("M 200 495 L 130 495 L 112 495", "#f0abfc", "CA_out"),
    ("M 112 495 L 60 495 L 60 410", "#f0abfc", ""),
    ("M 410 310 L 410 515 L 400 515", "#4ade80", ""),
    ("M 260 495 L 130 495", "#f0abfc", "CC_out"),
    ("M 130 570 L 130 652", "#6b7280", ""),
    ("M 330 570 L 330 652", "#6b7280", ""),
    ("M 77 430 L 77 92", "#f97316", ""),
    ("M 277 430 L 277 92", "#f97316", ""),
    // Pull resistors
    ("M 336 430 L 380 430 L 380 420", "#64748b", ""),
    ("M 336 460 L 380 460 L 380 440", "#64748b", ""),
    ("M 336 490 L 380 490 L 380 460", "#64748b", ""),
    ("M 300 420 L 280 420 L 280 652", "#6b7280", ""),
    ("M 196 301 L 380 301", "#22d3ee", ""),
];

/// (x, y, text, color)
const NET_LABELS: &[(f32, f32, &str, &str)] = &[
    (62.0, 48.0, "VCC (Motor Power)", "#fca5a5"),
    (62.0, 85.0, "+3.3V Logic", "#fdba74"),
    (62.0, 658.0, "GND", "#9ca3af"),
    (194.0, 282.0, "PH_CS_A", "#67e8f9"),
    (390.0, 282.0, "PH_CS_C", "#86efac"),
    (750.0, 470.0, "nFAULT", "#fb7185"),
    (74.0, 488.0, "CA_out", "#e879f9"),
];

/// DRV8313 pins: (side, y, label, net)
const DRIVER_PINS: &[(PinSide, f32, &str, NetClass)] = &[
    (PinSide::Left, 155.0, "INH1", NetClass::Pwm),
    (PinSide::Left, 185.0, "INH2", NetClass::Pwm),
    (PinSide::Left, 215.0, "INH3", NetClass::Pwm),
    (PinSide::Left, 250.0, "EN1", NetClass::En),
    (PinSide::Left, 270.0, "EN2", NetClass::En),
    (PinSide::Left, 295.0, "nSLEEP", NetClass::Ctrl),
    (PinSide::Left, 330.0, "OUT1", NetClass::Phase),
    (PinSide::Left, 360.0, "OUT2", NetClass::Phase),
    (PinSide::Left, 390.0, "OUT3", NetClass::Phase),
    (PinSide::Left, 440.0, "COMP+", NetClass::Ctrl),
    (PinSide::Left, 465.0, "COMP-", NetClass::Ctrl),
    (PinSide::Right, 155.0, "VM", NetClass::Pwr),
    (PinSide::Right, 185.0, "VCP", NetClass::Pwr),
    (PinSide::Right, 215.0, "V3P3", NetClass::Pwr),
    (PinSide::Right, 250.0, "GND", NetClass::Gnd),
    (PinSide::Right, 330.0, "nFAULT", NetClass::Fault),
];

fn color(hex: &str) -> anyhow::Result<Color> {
    Color::from_hex(hex).with_context(|| format!("invalid color {hex:?}"))
}

/// Build the built-in FOC_DV schematic
pub fn foc_driver() -> anyhow::Result<Schematic> {
    let components = COMPONENTS
        .iter()
        .map(|&(reference, value, title, description, specs)| ComponentInfo {
            reference: reference.to_string(),
            value: value.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            specs: specs.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

    let shapes = SHAPES
        .iter()
        .map(|&(id, x, y, width, height, hex, kind, value)| {
            Ok(LayoutShape {
                id: id.to_string(),
                x,
                y,
                width,
                height,
                color: color(hex)?,
                kind,
                label_ref: id.to_string(),
                label_value: value.to_string(),
                clickable: true,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let wires = WIRES
        .iter()
        .map(|&(d, hex, label)| {
            Ok(Wire {
                path: PathData::parse(d)?,
                color: color(hex)?,
                label: (!label.is_empty()).then(|| label.to_string()),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let net_labels = NET_LABELS
        .iter()
        .map(|&(x, y, text, hex)| {
            Ok(NetLabel {
                x,
                y,
                text: text.to_string(),
                color: color(hex)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let pins = DRIVER_PINS
        .iter()
        .map(|&(side, y, label, net)| PinLabel {
            host: "U1".to_string(),
            side,
            y,
            label: label.to_string(),
            net,
        })
        .collect();

    Schematic::new(NAME, components, shapes, wires, net_labels, pins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    #[test]
    fn test_builtin_is_valid_and_complete() {
        let schematic = foc_driver().unwrap();
        assert_eq!(schematic.name(), NAME);
        assert_eq!(schematic.registry().len(), 20);
        assert_eq!(schematic.shapes().len(), 20);
        assert_eq!(schematic.wires().len(), WIRES.len());
        assert_eq!(schematic.pins().len(), 16);
        assert!(schematic.findings().is_empty(), "{:?}", schematic.findings());
    }

    #[test]
    fn test_every_shape_is_interactive() {
        let schematic = foc_driver().unwrap();
        for shape in schematic.shapes() {
            assert!(schematic.is_interactive(shape), "{} is dead", shape.id);
        }
    }

    #[test]
    fn test_driver_hit_at_center() {
        let schematic = foc_driver().unwrap();
        let hit = schematic.hit_test(Point::new(490.0, 310.0));
        assert_eq!(hit.component().map(|s| s.id.as_str()), Some("U1"));
    }
}
