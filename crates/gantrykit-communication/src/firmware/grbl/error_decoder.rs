//! GRBL Error and Alarm Code Decoder
//! Converts the numeric codes most likely during manual jogging to readable text

/// Decode GRBL error code to human-readable message
pub fn decode_error(code: u8) -> &'static str {
    match code {
        1 => "Expected command letter was missing.",
        2 => "Bad number format.",
        3 => "'$' system command not recognized.",
        4 => "Negative value where a positive one was expected.",
        8 => "'$' command only valid when idle.",
        9 => "G-code locked out during alarm or jog state.",
        11 => "Line too long, not executed.",
        15 => "Jog target exceeds machine travel, ignored.",
        16 => "Jog command malformed or uses a prohibited word.",
        20 => "Unsupported or invalid g-code command.",
        22 => "Feed rate undefined.",
        24 => "Conflicting axis word commands in one block.",
        25 => "Repeated word in block.",
        _ => "Unknown error.",
    }
}

/// Decode GRBL alarm code to human-readable message
pub fn decode_alarm(code: u8) -> &'static str {
    match code {
        1 => "Hard limit triggered, re-home before jogging.",
        2 => "Soft limit, target outside machine travel.",
        3 => "Reset while in motion, position may be lost.",
        4 | 5 => "Probe fail.",
        6..=9 => "Homing fail.",
        _ => "Unknown alarm.",
    }
}

/// Format error message with code and description
pub fn format_error(code: u8) -> String {
    format!("error:{} - {}", code, decode_error(code))
}

/// Format alarm message with code and description
pub fn format_alarm(code: u8) -> String {
    format!("ALARM:{} - {}", code, decode_alarm(code))
}
