#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod absence_cli_opts;
pub mod absence_event;
pub mod config;
pub mod language;
pub mod timezone;
