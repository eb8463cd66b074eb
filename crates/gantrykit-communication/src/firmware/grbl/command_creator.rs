//! GRBL Command Creator
//!
//! Builds the command lines the jog subsystem sends to GRBL. Jogs use the
//! `$J=` jog syntax in millimeters (G21) and relative distance mode (G91), so
//! every command is a self-contained short move.

/// Alarm clear / unlock, sent once after the port opens
pub const ALARM_CLEAR: &str = "$X";

/// Response line that completes a command
pub const COMPLETION_SENTINEL: &str = "ok";

/// Prefix shared by every jog command
pub const JOG_PREFIX: &str = "$J=G21G91";

/// Build a relative jog command.
///
/// Returns `None` when both deltas are zero; there is nothing to send.
/// Axis words are only emitted for axes that move.
///
/// ```
/// use gantrykit_communication::firmware::grbl::build_jog;
///
/// assert_eq!(build_jog(1, 0, 5, 10000).as_deref(), Some("$J=G21G91X5F10000"));
/// assert_eq!(build_jog(-1, 1, 2, 10000).as_deref(), Some("$J=G21G91X-2Y2F10000"));
/// assert_eq!(build_jog(0, 0, 5, 10000), None);
/// ```
pub fn build_jog(dx: i32, dy: i32, step: u32, feedrate: u32) -> Option<String> {
    if dx == 0 && dy == 0 {
        return None;
    }

    let step = i64::from(step);
    let mut command = String::from(JOG_PREFIX);
    if dx != 0 {
        command.push_str(&format!("X{}", i64::from(dx) * step));
    }
    if dy != 0 {
        command.push_str(&format!("Y{}", i64::from(dy) * step));
    }
    command.push_str(&format!("F{}", feedrate));

    Some(command)
}

/// Frame a command line for the wire
pub fn frame(command: &str) -> String {
    format!("{}\n", command)
}
