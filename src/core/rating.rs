/// Highest rating a student can give
pub const MAX_RATING: f64 = 5.0;

/// Outcome of folding one new rating into a tutor's running average
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    /// Average rounded to one decimal, as stored
    pub rating: f64,
    pub total_ratings: u32,
}

/// Fold a new rating into the running average
///
/// `(old * count + new) / (count + 1)`, rounded to one decimal place.
/// The caller must hold the tutor row for the whole read-modify-write.
pub fn next_average(current: f64, total_ratings: u32, new_rating: f64) -> RatingUpdate {
    let count = f64::from(total_ratings);
    let average = (current * count + new_rating) / (count + 1.0);

    RatingUpdate {
        rating: round_one_decimal(average).clamp(0.0, MAX_RATING),
        total_ratings: total_ratings.saturating_add(1),
    }
}

#[inline]
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
