use tabled::Table;

use crate::{
    mood::{Mood, format_range},
    types::MoodTableRow,
};

pub fn moods() {
    println!("{}", Table::new(mood_rows()));
}

/// One row per mood for classification and one for its recommendation seed.
pub fn mood_rows() -> Vec<MoodTableRow> {
    let mut rows = Vec::new();

    for mood in Mood::all() {
        if let Some(bands) = mood.bands() {
            rows.push(MoodTableRow {
                mood: mood.label().to_string(),
                valence: format_range(&bands.valence),
                energy: format_range(&bands.energy),
                danceability: format_range(&bands.danceability),
                seed_genres: String::new(),
            });
        }
        if let Some(seed) = mood.recommendation_seed() {
            rows.push(MoodTableRow {
                mood: format!("{} (recommended)", mood.label()),
                valence: format_range(&seed.bounds.valence),
                energy: format_range(&seed.bounds.energy),
                danceability: format_range(&seed.bounds.danceability),
                seed_genres: seed.genres.join(","),
            });
        }
    }

    rows
}
