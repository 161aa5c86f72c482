//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use rice_core::error::{BuildError, CoreError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingScale => {
                "What happened: No scale was provided to the controller.\nLikely causes: The HX711 failed to initialize or was not wired into the builder.\nHow to fix: Ensure the load cell is created successfully and passed via with_scale(...).".to_string()
            }
            BuildError::MissingValve => {
                "What happened: No valve output was provided to the controller.\nLikely causes: The valve GPIO failed to initialize or was not wired into the builder.\nHow to fix: Check pins.valve and pass the pin via with_valve(...).".to_string()
            }
            BuildError::MissingInput(name) => format!(
                "What happened: The {name} input was not provided to the controller.\nLikely causes: The GPIO input failed to initialize or was not wired into the builder.\nHow to fix: Check the [pins] section and GPIO permissions."
            ),
            BuildError::MissingDisplay => {
                "What happened: No display was provided to the controller.\nLikely causes: The LCD could not be opened and no fallback was configured.\nHow to fix: Check display.i2c_addr and the I2C wiring.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML or command line.\nHow to fix: Edit the config file, then rerun. See etc/rice_config.toml for a sample."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<CoreError>() {
        match ce {
            CoreError::Timeout => {
                return "What happened: Scale read timed out.\nLikely causes: HX711 not wired correctly, no power/ground, or timeout too low.\nHow to fix: Verify DT/SCK pins and power, and consider increasing scale.read_timeout_ms in the config.".to_string();
            }
            CoreError::Config(msg) => {
                return format!(
                    "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range values, two functions assigned to the same pin, or a pin on the LCD I2C bus.\nHow to fix: Edit the TOML config and try again. See etc/rice_config.toml for a sample."
                );
            }
            _ => {}
        }
        return format!(
            "What happened: {ce}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if (lower.contains("hx711") && lower.contains("timeout")) || lower.contains("data-ready timeout")
    {
        return "What happened: HX711 did not produce data within the configured timeout.\nLikely causes: Wrong DT/SCK pins, wiring/power issues, or timeout configured too low.\nHow to fix: Check [pins] in the config, verify 5V/GND, and raise scale.read_timeout_ms.".to_string();
    }

    if lower.contains("open hx711") || (lower.contains("pin") && lower.contains("open")) {
        return "What happened: Failed to initialize hardware pins.\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO.".to_string();
    }

    if lower.contains("calibration csv must have headers") {
        return "Invalid headers in calibration CSV. Expected 'raw,kg'.".to_string();
    }

    if lower.contains("invalid configuration") || lower.contains("share gpio") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range values or two functions assigned to the same pin.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Every runtime or setup failure exits with 1; clap reports usage errors with 2.
pub fn exit_code_for_error(_err: &eyre::Report) -> i32 {
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use rice_core::error::{BuildError, CoreError};
    use serde_json::json;

    let reason = if err.downcast_ref::<BuildError>().is_some() {
        "Build"
    } else if let Some(ce) = err.downcast_ref::<CoreError>() {
        match ce {
            CoreError::Timeout => "Timeout",
            CoreError::Hardware(_) | CoreError::HardwareFault(_) => "Hardware",
            CoreError::Config(_) => "Config",
            CoreError::Display(_) => "Display",
        }
    } else {
        "Error"
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
