//! GRBL protocol support: jog command construction and response handling

pub mod command_creator;
pub mod error_decoder;
pub mod response_parser;

pub use command_creator::{build_jog, frame, ALARM_CLEAR, COMPLETION_SENTINEL, JOG_PREFIX};
pub use error_decoder::{decode_alarm, decode_error, format_alarm, format_error};
pub use response_parser::GrblResponse;
