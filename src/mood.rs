//! Moods and the audio feature bands that define them.
//!
//! A track fits a mood when its valence, energy and danceability each fall
//! inside the mood's closed interval. Every coordinate is checked on its own.
//! The recommendation seed for a mood carries its own bounds, which are not
//! always the classification band (see [`Mood::recommendation_seed`]).

use std::{fmt, ops::RangeInclusive};

use crate::types::AudioFeatures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Romantic,
    Happy,
    Sad,
    /// Anything unrecognized. Selects nothing and requests no recommendations.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBands {
    pub valence: RangeInclusive<f64>,
    pub energy: RangeInclusive<f64>,
    pub danceability: RangeInclusive<f64>,
}

impl FeatureBands {
    pub fn new(
        valence: RangeInclusive<f64>,
        energy: RangeInclusive<f64>,
        danceability: RangeInclusive<f64>,
    ) -> Self {
        Self {
            valence,
            energy,
            danceability,
        }
    }

    /// NaN is never contained in a range, so broken features never match.
    pub fn contains(&self, features: &AudioFeatures) -> bool {
        self.valence.contains(&features.valence)
            && self.energy.contains(&features.energy)
            && self.danceability.contains(&features.danceability)
    }
}

/// Parameters for the recommendation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSeed {
    pub genres: &'static [&'static str],
    pub bounds: FeatureBands,
}

impl Mood {
    pub fn parse(input: &str) -> Mood {
        match input.trim().to_lowercase().as_str() {
            "romantic" => Mood::Romantic,
            "happy" => Mood::Happy,
            "sad" => Mood::Sad,
            _ => Mood::Other,
        }
    }

    /// The moods that select tracks, in form order.
    pub fn all() -> [Mood; 3] {
        [Mood::Romantic, Mood::Happy, Mood::Sad]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Romantic => "romantic",
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Other => "other",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Mood::Romantic => "Romantic",
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Other => "Other",
        }
    }

    pub fn bands(&self) -> Option<FeatureBands> {
        match self {
            Mood::Romantic => Some(FeatureBands::new(0.4..=0.8, 0.2..=0.6, 0.3..=0.6)),
            Mood::Happy => Some(FeatureBands::new(0.7..=1.0, 0.5..=1.0, 0.5..=1.0)),
            Mood::Sad => Some(FeatureBands::new(0.0..=0.3, 0.2..=0.6, 0.3..=0.4)),
            Mood::Other => None,
        }
    }

    /// Romantic and happy reuse their classification band. Sad asks for a
    /// darker, calmer range than it classifies with.
    pub fn recommendation_seed(&self) -> Option<RecommendationSeed> {
        match self {
            Mood::Romantic => Some(RecommendationSeed {
                genres: &["r-n-b", "soul", "afrobeat"],
                bounds: FeatureBands::new(0.4..=0.8, 0.2..=0.6, 0.3..=0.6),
            }),
            Mood::Happy => Some(RecommendationSeed {
                genres: &["techno", "pop", "hiphop"],
                bounds: FeatureBands::new(0.7..=1.0, 0.5..=1.0, 0.5..=1.0),
            }),
            Mood::Sad => Some(RecommendationSeed {
                genres: &["sad", "emo"],
                bounds: FeatureBands::new(0.0..=0.4, 0.0..=0.5, 0.0..=0.3),
            }),
            Mood::Other => None,
        }
    }

    pub fn matches(&self, features: &AudioFeatures) -> bool {
        self.bands()
            .map(|bands| bands.contains(features))
            .unwrap_or(false)
    }
}

impl From<&str> for Mood {
    fn from(input: &str) -> Self {
        Mood::parse(input)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn format_range(range: &RangeInclusive<f64>) -> String {
    format!("[{:.1}, {:.1}]", range.start(), range.end())
}
