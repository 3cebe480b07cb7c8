use crate::core::{
    normalize::{normalize, overlaps},
    time::TimePeriod,
};

/// Literal language preference that accepts every tutor
pub const ANY_LANGUAGE: &str = "any";

/// Check whether a tutor teaches the requested topic
///
/// Hard constraint. Matching is substring containment in either direction,
/// so "Physics" covers "Physics 101" and the other way round.
#[inline]
pub fn topic_matches(subjects: &[String], topic: &str) -> bool {
    let topic = normalize(topic);
    if topic.is_empty() {
        return false;
    }

    subjects
        .iter()
        .any(|subject| overlaps(&normalize(subject), &topic))
}

/// Check whether a tutor teaches in the requested language
///
/// Soft constraint: a miss only zeroes the language feature.
#[inline]
pub fn language_matches(languages: &[String], language: &str) -> bool {
    let language = normalize(language);
    if language.is_empty() {
        return false;
    }

    if language == ANY_LANGUAGE {
        return true;
    }

    languages
        .iter()
        .any(|lang| overlaps(&normalize(lang), &language))
}

/// Check whether any of a tutor's slots fits the requested time of day
///
/// Hard constraint. A slot fits when it overlaps the request as text, or
/// when it mentions a keyword of the period the request was classified into.
pub fn time_matches(slots: &[String], time_of_day: &str) -> bool {
    let requested = normalize(time_of_day);
    if requested.is_empty() {
        return false;
    }

    let period = TimePeriod::classify(&requested);

    slots.iter().any(|slot| {
        let slot = normalize(slot);

        if overlaps(&slot, &requested) {
            return true;
        }

        period.is_some_and(|p| p.mentioned_in(&slot))
    })
}
