use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Every piece of user-facing text that changes with the configured language.
#[derive(Debug)]
pub struct Messages {
    pub summary_help: &'static str,
    pub day_help: &'static str,
    pub end_day_help: &'static str,
    pub start_time_help: &'static str,
    pub end_time_help: &'static str,
    pub usage: &'static str,
    pub examples: &'static str,
    pub no_options: &'static str,
    pub missing_required: &'static str,
    pub invalid_combination: &'static str,
    pub end_before_start: &'static str,
}

pub static ENGLISH: Messages = Messages {
    summary_help: "Summary of the absence. Example: 'Sato is absent all day'",
    day_help: "Date of the absence. Example: '2023-07-15'",
    end_day_help: "End date when the absence spans several days. Example: '2023-07-20'",
    start_time_help: "Start time when the absence covers part of a day. Example: '13:00'",
    end_time_help: "End time when the absence covers part of a day. Example: '18:00'",
    usage: "Usage: absence-helper -s <summary> -d <date> [-de <end date>] [-tb <start time>] [-te <end time>]",
    examples: "Example:
   All-day        : absence-helper -s \"Sato is absent all day\" -d 2023-07-15
   Multiple days  : absence-helper -s \"Sato is absent all day\" -d 2023-07-15 -de 2023-07-20
   Time specified : absence-helper -s \"Sato is absent in the morning\" -d 2023-07-16 -tb 09:30 -te 13:00",
    no_options: "No options provided.",
    missing_required: "Required options -s and -d are not provided.",
    invalid_combination: "Invalid combination of options.",
    end_before_start: "The end of the absence is before its start.",
};

pub static JAPANESE: Messages = Messages {
    summary_help: "不在情報の要約.例：'佐藤 終日不在'",
    day_help: "不在日の日付.例：'2023-07-15'",
    end_day_help: "複数日指定の場合の終了日.例：'2023-07-20'",
    start_time_help: "時間指定の場合の開始時間.例：'13:00'",
    end_time_help: "時間指定の場合の終了時間.例：'18:00'",
    usage: "使い方: absence-helper -s <summary> -d <date> [-de <end date>] [-tb <start time>] [-te <end time>]",
    examples: "例:
   終日指定  : absence-helper -s \"佐藤 終日不在\" -d 2023-07-15
   複数日指定: absence-helper -s \"佐藤 終日不在\" -d 2023-07-15 -de 2023-07-20
   時間指定  : absence-helper -s \"佐藤 AM休\" -d 2023-07-16 -tb 09:30 -te 13:00",
    no_options: "オプションが指定されていません.",
    missing_required: "必須オプション -s と -d が指定されていません.",
    invalid_combination: "オプションの組み合わせが不正です.",
    end_before_start: "不在の終了が開始より前になっています.",
};

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    /// Unrecognized codes fall back to English.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "ja" | "ja-jp" | "jp" => Self::Japanese,
            _ => Self::English,
        }
    }

    #[must_use]
    pub fn messages(self) -> &'static Messages {
        match self {
            Self::English => &ENGLISH,
            Self::Japanese => &JAPANESE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => f.write_str("en"),
            Self::Japanese => f.write_str("ja"),
        }
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}
