use anyhow::{Error, format_err};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::info;
use stack_string::StackString;
use std::fmt;

use gcal_lib::gcal_instance::{Event as GCalEvent, EventDateTime};

use crate::{absence_cli_opts::AbsenceOptions, timezone::TimeZone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSpan {
    /// Whole single day, start and end are the same date
    AllDay { date: NaiveDate },
    /// Whole days from `start` to `end`
    MultiDay { start: NaiveDate, end: NaiveDate },
    /// Part of a single day, in local wall-clock time
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl EventSpan {
    /// # Errors
    /// Returns error for any combination other than day alone, day with end
    /// day, or day with both start and end time
    pub fn from_parts(
        day: NaiveDate,
        end_day: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<Self, Error> {
        match (end_day, start_time, end_time) {
            (None, None, None) => Ok(Self::AllDay { date: day }),
            (Some(end), None, None) => Ok(Self::MultiDay { start: day, end }),
            (None, Some(start), Some(end)) => Ok(Self::Timed {
                start: day.and_time(start),
                end: day.and_time(end),
            }),
            _ => Err(format_err!(
                "Creating event: Invalid command line parameters for event date/time"
            )),
        }
    }

    fn gcal_start_end(self, time_zone: TimeZone) -> Result<(EventDateTime, EventDateTime), Error> {
        let date_only = |date: NaiveDate| EventDateTime {
            date: Some(date),
            time_zone: Some(time_zone.into()),
            ..EventDateTime::default()
        };
        let date_time = |local: NaiveDateTime| -> Result<EventDateTime, Error> {
            Ok(EventDateTime {
                date_time: Some(time_zone.local_to_utc(local)?),
                time_zone: Some(time_zone.into()),
                ..EventDateTime::default()
            })
        };
        match self {
            Self::AllDay { date } => Ok((date_only(date), date_only(date))),
            Self::MultiDay { start, end } => Ok((date_only(start), date_only(end))),
            Self::Timed { start, end } => Ok((date_time(start)?, date_time(end)?)),
        }
    }
}

impl fmt::Display for EventSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllDay { date } => write!(f, "{date}"),
            Self::MultiDay { start, end } => write!(f, "{start} - {end}"),
            Self::Timed { start, end } => write!(
                f,
                "{} {}-{}",
                start.date(),
                start.time().format("%H:%M"),
                end.time().format("%H:%M")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbsenceEvent {
    pub summary: StackString,
    pub span: EventSpan,
}

impl AbsenceEvent {
    /// # Errors
    /// Returns error if the options don't describe exactly one span
    pub fn from_options(opts: AbsenceOptions) -> Result<Self, Error> {
        let AbsenceOptions {
            summary,
            day,
            end_day,
            start_time,
            end_time,
        } = opts;
        let span = EventSpan::from_parts(day, end_day, start_time, end_time)?;
        info!("Creating event: {summary} {span}");
        Ok(Self { summary, span })
    }

    /// # Errors
    /// Returns error if a timed event's local time doesn't exist in
    /// `time_zone`
    pub fn to_gcal_event(&self, time_zone: TimeZone) -> Result<GCalEvent, Error> {
        let (start, end) = self.span.gcal_start_end(time_zone)?;
        Ok(GCalEvent {
            summary: Some(self.summary.to_string()),
            start: Some(start),
            end: Some(end),
            ..GCalEvent::default()
        })
    }
}
