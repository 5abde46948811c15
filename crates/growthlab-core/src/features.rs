//! Feature engineering: engagement rates, title text and publish time

use crate::stats::round_to;
use crate::types::{Upload, VideoRecord};
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static WORD_RE: OnceLock<Regex> = OnceLock::new();
static DIGIT_RE: OnceLock<Regex> = OnceLock::new();

const BRACKETS: &[char] = &['[', ']', '(', ')', '{', '}'];
const EMOJI_CODEPOINT_FLOOR: u32 = 10000;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngagementRates {
    pub engagement_rate: f64,
    pub likes_rate: f64,
    pub comments_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TitleFeatures {
    pub title_length_chars: usize,
    pub title_word_count: usize,
    pub has_number: bool,
    pub has_question: bool,
    pub has_brackets: bool,
    pub caps_ratio: f64,
    pub emoji_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFeatures {
    pub publish_hour: u32,
    /// Monday = 0 ... Sunday = 6
    pub publish_day_of_week: u32,
    pub is_weekend: bool,
}

pub fn numeric_rates(views: u64, likes: u64, comments: u64) -> EngagementRates {
    if views == 0 {
        return EngagementRates::default();
    }
    let views = views as f64;
    EngagementRates {
        engagement_rate: round_to((likes + comments) as f64 / views, 8),
        likes_rate: round_to(likes as f64 / views, 8),
        comments_rate: round_to(comments as f64 / views, 8),
    }
}

pub fn title_features(title: &str) -> TitleFeatures {
    let word_re = WORD_RE.get_or_init(|| Regex::new(r"\b\w+\b").unwrap());
    let digit_re = DIGIT_RE.get_or_init(|| Regex::new(r"\d").unwrap());

    let (letters, upper) = title
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(letters, upper), c| {
            (letters + 1, upper + usize::from(c.is_uppercase()))
        });
    let caps_ratio = if letters > 0 {
        upper as f64 / letters as f64
    } else {
        0.0
    };

    TitleFeatures {
        title_length_chars: title.chars().count(),
        title_word_count: word_re.find_iter(title).count(),
        has_number: digit_re.is_match(title),
        has_question: title.contains('?'),
        has_brackets: title.contains(BRACKETS),
        caps_ratio: round_to(caps_ratio, 5),
        emoji_count: title
            .chars()
            .filter(|&c| u32::from(c) > EMOJI_CODEPOINT_FLOOR)
            .count(),
    }
}

/// Publish-time features, always taken in UTC so results do not depend on the
/// channel's timezone
pub fn time_features<Tz: TimeZone>(published_at: &DateTime<Tz>) -> TimeFeatures {
    let utc = published_at.with_timezone(&Utc);
    let day = utc.weekday().num_days_from_monday();
    TimeFeatures {
        publish_hour: utc.hour(),
        publish_day_of_week: day,
        is_weekend: day >= 5,
    }
}

/// A raw record with its engineered features attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedVideo {
    pub record: VideoRecord,
    pub rates: EngagementRates,
    pub title: TitleFeatures,
    pub time: TimeFeatures,
}

impl FeaturedVideo {
    pub fn from_record(record: VideoRecord) -> Self {
        let rates = numeric_rates(record.views, record.likes, record.comments);
        let title = title_features(&record.title);
        let time = time_features(&record.published_at);
        Self {
            record,
            rates,
            title,
            time,
        }
    }

    /// Look up a model feature column by name; booleans become 0/1
    pub fn feature(&self, name: &str) -> Option<f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let value = match name {
            "duration_seconds" => self.record.duration_seconds as f64,
            "title_length_chars" => self.title.title_length_chars as f64,
            "title_word_count" => self.title.title_word_count as f64,
            "has_number" => flag(self.title.has_number),
            "has_question" => flag(self.title.has_question),
            "has_brackets" => flag(self.title.has_brackets),
            "caps_ratio" => self.title.caps_ratio,
            "emoji_count" => self.title.emoji_count as f64,
            "publish_hour" => self.time.publish_hour as f64,
            "publish_day_of_week" => self.time.publish_day_of_week as f64,
            "is_weekend" => flag(self.time.is_weekend),
            "engagement_rate" => self.rates.engagement_rate,
            "likes_rate" => self.rates.likes_rate,
            "comments_rate" => self.rates.comments_rate,
            _ => return None,
        };
        Some(value)
    }
}

impl Upload for FeaturedVideo {
    fn id(&self) -> &str {
        &self.record.id
    }

    fn title(&self) -> &str {
        &self.record.title
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.record.published_at
    }

    fn views(&self) -> u64 {
        self.record.views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_numeric_rates_zero_views() {
        assert_eq!(numeric_rates(0, 10, 5), EngagementRates::default());
    }

    #[test]
    fn test_numeric_rates_rounded() {
        let rates = numeric_rates(3, 1, 0);
        assert_eq!(rates.likes_rate, 0.33333333);
        assert_eq!(rates.engagement_rate, 0.33333333);
        assert_eq!(rates.comments_rate, 0.0);
    }

    #[test]
    fn test_title_features_basic() {
        let f = title_features("Top 10 Rust Tips (2025)?");
        assert_eq!(f.title_length_chars, 24);
        assert_eq!(f.title_word_count, 5);
        assert!(f.has_number);
        assert!(f.has_question);
        assert!(f.has_brackets);
        // T, R, T uppercase out of 11 letters
        assert_eq!(f.caps_ratio, 0.27273);
        assert_eq!(f.emoji_count, 0);
    }

    #[test]
    fn test_title_features_empty() {
        assert_eq!(title_features(""), TitleFeatures::default());
    }

    #[test]
    fn test_title_features_emoji_counts_chars() {
        let f = title_features("Launch day 🚀🔥");
        assert_eq!(f.emoji_count, 2);
        assert_eq!(f.title_length_chars, 13);
    }

    #[test]
    fn test_time_features_converted_to_utc() {
        // Sunday 22:00 at -05:00 is Monday 03:00 UTC
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2025, 3, 2, 22, 0, 0).unwrap();
        let t = time_features(&local);
        assert_eq!(t.publish_hour, 3);
        assert_eq!(t.publish_day_of_week, 0);
        assert!(!t.is_weekend);
    }

    #[test]
    fn test_time_features_weekend() {
        let saturday = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let t = time_features(&saturday);
        assert_eq!(t.publish_day_of_week, 5);
        assert!(t.is_weekend);
    }

    #[test]
    fn test_feature_lookup() {
        let record = VideoRecord {
            id: "v1".to_string(),
            title: "Why?".to_string(),
            published_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            duration_seconds: 300,
            views: 100,
            likes: 10,
            comments: 5,
        };
        let video = FeaturedVideo::from_record(record);
        assert_eq!(video.feature("duration_seconds"), Some(300.0));
        assert_eq!(video.feature("has_question"), Some(1.0));
        assert_eq!(video.feature("is_weekend"), Some(1.0));
        assert_eq!(video.feature("engagement_rate"), Some(0.15));
        assert_eq!(video.feature("thumbnail_contrast"), None);
    }
}
