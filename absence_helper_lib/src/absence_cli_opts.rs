use anyhow::{Error, format_err};
use chrono::{NaiveDate, NaiveTime};
use clap::{Command, CommandFactory, FromArgMatches, Parser};
use log::info;
use stack_string::StackString;
use std::ffi::OsString;
use thiserror::Error as ThisError;

use gcal_lib::gcal_instance::GCalendarInstance;

use crate::{
    absence_event::AbsenceEvent,
    config::{CalendarConfig, Config},
    language::{Language, Messages},
};

/// Flags that take a single dash even though they are longer than one letter.
const SINGLE_DASH_LONG_FLAGS: [&str; 8] = [
    "de",
    "tb",
    "te",
    "summary",
    "day",
    "end-day",
    "start-time",
    "end-time",
];

const SUMMARY_FLAGS: [&str; 3] = ["-s", "--summary", "-summary"];

#[derive(ThisError, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValidationError {
    #[error("No options provided.")]
    NoOptions,
    #[error("Required options -s and -d are not provided.")]
    MissingRequired,
    #[error("Invalid combination of options.")]
    InvalidCombination,
    #[error("The end of the absence is before its start.")]
    EndBeforeStart,
}

impl ValidationError {
    /// Process exit status for a failed run: 2 when usage was printed for a
    /// validation error, 1 otherwise.
    #[must_use]
    pub fn exit_code(error: &Error) -> i32 {
        if error.downcast_ref::<Self>().is_some() {
            2
        } else {
            1
        }
    }

    #[must_use]
    pub fn localized(self, messages: &Messages) -> &'static str {
        match self {
            Self::NoOptions => messages.no_options,
            Self::MissingRequired => messages.missing_required,
            Self::InvalidCombination => messages.invalid_combination,
            Self::EndBeforeStart => messages.end_before_start,
        }
    }
}

#[derive(Parser, Debug, Default, Clone, PartialEq)]
#[command(name = "absence-helper", about = "Record an absence on a Google Calendar")]
pub struct AbsenceCliOpts {
    #[arg(short = 's', long = "summary", allow_hyphen_values = true)]
    pub summary: Option<String>,
    #[arg(short = 'd', long = "day", value_parser = parse_date)]
    pub day: Option<NaiveDate>,
    #[arg(long = "end-day", alias = "de", value_parser = parse_date)]
    pub end_day: Option<NaiveDate>,
    #[arg(long = "start-time", alias = "tb", value_parser = parse_time)]
    pub start_time: Option<NaiveTime>,
    #[arg(long = "end-time", alias = "te", value_parser = parse_time)]
    pub end_time: Option<NaiveTime>,
}

/// Validated options, one of: day alone, day with end day, or day with both
/// times.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsenceOptions {
    pub summary: StackString,
    pub day: NaiveDate,
    pub end_day: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

fn parse_date(s: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format_err!("{s} is not a date of the form YYYY-MM-DD: {e}"))
}

fn parse_time(s: &str) -> Result<NaiveTime, Error> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format_err!("{s} is not a time of the form HH:MM: {e}"))
}

/// Rewrite `-de 2023-07-20` / `-de=2023-07-20` style flags to the double dash
/// form clap expects. Everything after `--` is left alone, as is the value
/// following a summary flag, which may itself start with `-`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut end_of_flags = false;
    let mut summary_value_next = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 || end_of_flags {
                return arg;
            }
            if summary_value_next {
                summary_value_next = false;
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if SUMMARY_FLAGS.contains(&s) {
                summary_value_next = true;
                if s == "-summary" {
                    return format!("-{s}").into();
                }
                return arg;
            }
            if s == "--" {
                end_of_flags = true;
                return arg;
            }
            if let Some(flag) = s.strip_prefix('-') {
                if flag.starts_with('-') {
                    return arg;
                }
                let name = flag.split('=').next().unwrap_or(flag);
                if SINGLE_DASH_LONG_FLAGS.contains(&name) {
                    return format!("-{s}").into();
                }
            }
            arg
        })
        .collect()
}

impl AbsenceCliOpts {
    /// Clap command with help text taken from the message table of `language`.
    #[must_use]
    pub fn localized_command(language: Language) -> Command {
        let messages = language.messages();
        Self::command()
            .mut_arg("summary", |a| a.help(messages.summary_help))
            .mut_arg("day", |a| a.help(messages.day_help))
            .mut_arg("end_day", |a| a.help(messages.end_day_help))
            .mut_arg("start_time", |a| a.help(messages.start_time_help))
            .mut_arg("end_time", |a| a.help(messages.end_time_help))
            .after_help(messages.examples)
    }

    /// # Errors
    /// Returns the clap error for unknown flags or unparseable values, and
    /// for `--help`
    pub fn try_parse_with_language<I, T>(language: Language, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let matches = Self::localized_command(language).try_get_matches_from(normalize_args(args))?;
        Self::from_arg_matches(&matches)
    }

    fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.day.is_none()
            && self.end_day.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }

    /// # Errors
    /// Returns the first rule the options break
    pub fn validate(self) -> Result<AbsenceOptions, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoOptions);
        }
        let summary = self.summary.filter(|s| !s.trim().is_empty());
        let (Some(summary), Some(day)) = (summary, self.day) else {
            return Err(ValidationError::MissingRequired);
        };
        if self.end_day.is_some() && (self.start_time.is_some() || self.end_time.is_some()) {
            return Err(ValidationError::InvalidCombination);
        }
        if self.start_time.is_some() != self.end_time.is_some() {
            return Err(ValidationError::InvalidCombination);
        }
        if self.end_day.is_some_and(|end_day| end_day < day) {
            return Err(ValidationError::EndBeforeStart);
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(ValidationError::EndBeforeStart);
            }
        }
        Ok(AbsenceOptions {
            summary: summary.into(),
            day,
            end_day: self.end_day,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }

    pub async fn parse_opts() -> Result<(), Error> {
        info!("Starting the application...");
        let config = Config::init_config()?;

        info!("Getting credentials...");
        let gcal = GCalendarInstance::new(&config.credentials_file)
            .await
            .map_err(|e| format_err!("Unable to get credentials: {e}"))?;

        let calendar_config = CalendarConfig::from_file(&config.calendar_config_file)
            .map_err(|e| format_err!("Unable to get config: {e}"))?;
        let language = calendar_config.language;

        info!("Parse and validate args...");
        let opts = Self::try_parse_with_language(language, std::env::args_os())
            .unwrap_or_else(|e| e.exit())
            .validate()
            .map_err(|e| {
                print_usage(language, e);
                e
            })?;

        let event = AbsenceEvent::from_options(opts)
            .map_err(|e| format_err!("Unable to create event: {e}"))?;
        let gcal_event = event.to_gcal_event(calendar_config.time_zone)?;

        info!("Adding event to calendar...");
        let created = gcal
            .insert_gcal_event(calendar_config.calendar_id.as_str(), gcal_event)
            .await
            .map_err(|e| format_err!("Unable to add event to calendar: {e}"))?;
        info!(
            "Created event {} {}",
            created.id.as_deref().unwrap_or(""),
            created.html_link.as_deref().unwrap_or("")
        );

        info!("Finished successfully.");
        Ok(())
    }
}

fn print_usage(language: Language, error: ValidationError) {
    let messages = language.messages();
    println!("{}", error.localized(messages));
    println!("\n{}", messages.usage);
    println!("\n{}\n", messages.examples);
    AbsenceCliOpts::localized_command(language).print_help().ok();
}

#[cfg(test)]
mod tests {
    use anyhow::Error;
    use chrono::{NaiveDate, NaiveTime};
    use std::ffi::OsString;

    use crate::{
        absence_cli_opts::{AbsenceCliOpts, ValidationError, normalize_args},
        language::{JAPANESE, Language},
    };

    fn parse(args: &[&str]) -> Result<AbsenceCliOpts, Error> {
        let args = std::iter::once("absence-helper").chain(args.iter().copied());
        AbsenceCliOpts::try_parse_with_language(Language::English, args).map_err(Into::into)
    }

    #[test]
    fn test_normalize_args() {
        let args = normalize_args([
            "absence-helper",
            "-s",
            "Sato",
            "-de",
            "2023-07-20",
            "-tb=09:30",
            "--te",
            "13:00",
            "--",
            "-te",
        ]);
        let expected: Vec<OsString> = [
            "absence-helper",
            "-s",
            "Sato",
            "--de",
            "2023-07-20",
            "--tb=09:30",
            "--te",
            "13:00",
            "--",
            "-te",
        ]
        .iter()
        .map(Into::into)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_summary_starting_with_dash() -> Result<(), Error> {
        let opts = parse(&["-s", "-day off", "-d", "2023-07-15"])?.validate()?;
        assert_eq!(opts.summary.as_str(), "-day off");

        let opts = parse(&["-s", "-de", "-d", "2023-07-15"])?.validate()?;
        assert_eq!(opts.summary.as_str(), "-de");
        assert_eq!(opts.end_day, None);

        let opts = parse(&["--summary", "-tb", "-d", "2023-07-15"])?.validate()?;
        assert_eq!(opts.summary.as_str(), "-tb");
        assert_eq!(opts.start_time, None);

        let args = normalize_args(["absence-helper", "-summary", "-te", "-te", "10:00"]);
        let expected: Vec<OsString> = ["absence-helper", "--summary", "-te", "--te", "10:00"]
            .iter()
            .map(Into::into)
            .collect();
        assert_eq!(args, expected);
        Ok(())
    }

    #[test]
    fn test_exit_code() {
        let error = Error::from(ValidationError::NoOptions);
        assert_eq!(
            error.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NoOptions)
        );
        assert_eq!(ValidationError::exit_code(&error), 2);

        let result: Result<(), ValidationError> = Err(ValidationError::InvalidCombination);
        let error = result.map_err(Error::from).unwrap_err();
        assert_eq!(ValidationError::exit_code(&error), 2);

        let error = anyhow::format_err!("Unable to add event to calendar: 403");
        assert_eq!(ValidationError::exit_code(&error), 1);
    }

    #[test]
    fn test_all_day_options() -> Result<(), Error> {
        let opts = parse(&["-s", "Sato is absent all day", "-d", "2023-07-15"])?.validate()?;
        assert_eq!(opts.summary.as_str(), "Sato is absent all day");
        assert_eq!(opts.day, NaiveDate::from_ymd_opt(2023, 7, 15).unwrap());
        assert_eq!(opts.end_day, None);
        assert_eq!(opts.start_time, None);
        assert_eq!(opts.end_time, None);
        Ok(())
    }

    #[test]
    fn test_multi_day_options() -> Result<(), Error> {
        let opts = parse(&["-s", "Sato", "-d", "2023-07-15", "-de", "2023-07-20"])?.validate()?;
        assert_eq!(opts.end_day, NaiveDate::from_ymd_opt(2023, 7, 20));
        Ok(())
    }

    #[test]
    fn test_timed_options() -> Result<(), Error> {
        let opts = parse(&[
            "-s",
            "Sato AM off",
            "-d",
            "2023-07-16",
            "-tb",
            "09:30",
            "-te=13:00",
        ])?
        .validate()?;
        assert_eq!(opts.day, NaiveDate::from_ymd_opt(2023, 7, 16).unwrap());
        assert_eq!(opts.start_time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(opts.end_time, NaiveTime::from_hms_opt(13, 0, 0));
        Ok(())
    }

    #[test]
    fn test_long_flags() -> Result<(), Error> {
        let opts = parse(&[
            "--summary",
            "Sato",
            "--day",
            "2023-07-16",
            "--start-time",
            "09:30:15",
            "--end-time",
            "10:00",
        ])?
        .validate()?;
        assert_eq!(opts.start_time, NaiveTime::from_hms_opt(9, 30, 15));
        Ok(())
    }

    #[test]
    fn test_no_options() -> Result<(), Error> {
        let result = parse(&[])?.validate();
        assert_eq!(result, Err(ValidationError::NoOptions));
        assert_eq!(
            ValidationError::NoOptions.to_string(),
            "No options provided."
        );
        Ok(())
    }

    #[test]
    fn test_missing_required() -> Result<(), Error> {
        let result = parse(&["-s", "Sato"])?.validate();
        assert_eq!(result, Err(ValidationError::MissingRequired));
        let result = parse(&["-d", "2023-07-15"])?.validate();
        assert_eq!(result, Err(ValidationError::MissingRequired));
        let result = parse(&["-s", "", "-d", "2023-07-15"])?.validate();
        assert_eq!(result, Err(ValidationError::MissingRequired));
        Ok(())
    }

    #[test]
    fn test_end_day_with_time() -> Result<(), Error> {
        let result = parse(&[
            "-s",
            "Sato",
            "-d",
            "2023-07-15",
            "-de",
            "2023-07-20",
            "-tb",
            "09:00",
        ])?
        .validate();
        assert_eq!(result, Err(ValidationError::InvalidCombination));
        Ok(())
    }

    #[test]
    fn test_start_time_only() -> Result<(), Error> {
        let result = parse(&["-s", "Sato", "-d", "2023-07-15", "-tb", "09:00"])?.validate();
        assert_eq!(result, Err(ValidationError::InvalidCombination));
        let result = parse(&["-s", "Sato", "-d", "2023-07-15", "-te", "09:00"])?.validate();
        assert_eq!(result, Err(ValidationError::InvalidCombination));
        Ok(())
    }

    #[test]
    fn test_end_before_start() -> Result<(), Error> {
        let result = parse(&["-s", "Sato", "-d", "2023-07-15", "-de", "2023-07-14"])?.validate();
        assert_eq!(result, Err(ValidationError::EndBeforeStart));
        let result = parse(&[
            "-s",
            "Sato",
            "-d",
            "2023-07-15",
            "-tb",
            "13:00",
            "-te",
            "09:00",
        ])?
        .validate();
        assert_eq!(result, Err(ValidationError::EndBeforeStart));
        Ok(())
    }

    #[test]
    fn test_bad_values_rejected_by_parser() {
        assert!(parse(&["-s", "Sato", "-d", "15/07/2023"]).is_err());
        assert!(parse(&["-s", "Sato", "-d", "2023-07-15", "-tb", "9am"]).is_err());
        assert!(parse(&["-x", "oops"]).is_err());
    }

    #[test]
    fn test_localized_messages() {
        assert_eq!(
            ValidationError::InvalidCombination.localized(Language::Japanese.messages()),
            JAPANESE.invalid_combination
        );
        let help = AbsenceCliOpts::localized_command(Language::Japanese)
            .render_help()
            .to_string();
        assert!(help.contains(JAPANESE.summary_help));
        assert!(help.contains("使い方") || help.contains("例:"));
    }
}
