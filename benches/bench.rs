// Criterion benchmarks for Tutor Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tutor_match::core::{calculate_rating_score, time_matches, Matcher};
use tutor_match::models::{StudentPreferences, TutorCandidate};
use uuid::Uuid;

const SUBJECTS: [&str; 4] = ["Math", "Physics", "Chemistry", "English Literature"];
const LANGUAGES: [&str; 3] = ["English", "Hindi", "Tamil"];
const SLOTS: [&str; 4] = ["Morning (8-11 AM)", "Afternoon", "Evening (5-9 PM)", "Weekends"];

fn create_candidate(id: usize) -> TutorCandidate {
    TutorCandidate {
        id: Uuid::new_v4(),
        name: format!("Tutor {}", id),
        email: format!("tutor{}@example.com", id),
        is_verified: id % 3 != 0,
        subject_domains: vec![SUBJECTS[id % SUBJECTS.len()].to_string()],
        teaching_languages: vec![LANGUAGES[id % LANGUAGES.len()].to_string()],
        available_slots: vec![SLOTS[id % SLOTS.len()].to_string()],
        rating: (id % 6) as f64 * 0.8,
        total_ratings: (id % 40) as u32,
        years_of_experience: (id % 15) as f64,
        total_sessions_completed: (id * 3 % 150) as u32,
    }
}

fn create_preferences() -> StudentPreferences {
    StudentPreferences {
        learning_topic: "Math".to_string(),
        preferred_language: "English".to_string(),
        time_of_day: "Evening".to_string(),
    }
}

fn bench_time_matches(c: &mut Criterion) {
    let slots: Vec<String> = SLOTS.iter().map(|s| s.to_string()).collect();

    c.bench_function("time_matches", |b| {
        b.iter(|| time_matches(black_box(&slots), black_box("Afternoon")));
    });
}

fn bench_rating_score(c: &mut Criterion) {
    let tutor = create_candidate(7);

    c.bench_function("rating_score", |b| {
        b.iter(|| calculate_rating_score(black_box(&tutor)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let matcher = Matcher::with_default_config();
    let preferences = create_preferences();

    let mut group = c.benchmark_group("matching");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<TutorCandidate> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("find_matches", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| matcher.find_matches(black_box(&candidates), black_box(&preferences)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_time_matches, bench_rating_score, bench_matching);

criterion_main!(benches);
