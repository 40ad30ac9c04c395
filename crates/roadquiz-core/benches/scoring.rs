use criterion::{black_box, criterion_group, criterion_main, Criterion};

use roadquiz_core::clock::fixed_clock;
use roadquiz_core::engine::{QuizEngine, QuizEngineConfig};
use roadquiz_core::model::Question;
use roadquiz_core::scoring::{build_review, percentage, QuizOutcome};

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            id: i as u32 + 1,
            prompt: format!("Bench question {i}"),
            image: None,
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct: i % 4,
        })
        .collect()
}

fn make_answers(questions: &[Question]) -> Vec<Option<usize>> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| match i % 5 {
            0 => None,
            1 => Some((q.correct + 1) % 4),
            _ => Some(q.correct),
        })
        .collect()
}

fn bench_percentage(c: &mut Criterion) {
    let mut group = c.benchmark_group("percentage");

    group.bench_function("7/10", |b| {
        b.iter(|| percentage(black_box(7), black_box(10)))
    });

    group.bench_function("333/1000", |b| {
        b.iter(|| percentage(black_box(333), black_box(1000)))
    });

    group.finish();
}

fn bench_outcome(c: &mut Criterion) {
    let mut group = c.benchmark_group("outcome");

    for n in [20, 200, 2000] {
        let questions = make_questions(n);
        let answers = make_answers(&questions);

        group.bench_function(format!("compute/{n}"), |b| {
            b.iter(|| QuizOutcome::compute(black_box(&questions), black_box(&answers), 600, false))
        });

        group.bench_function(format!("review/{n}"), |b| {
            b.iter(|| build_review(black_box(&questions), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_full_attempt(c: &mut Criterion) {
    let questions = make_questions(20);

    c.bench_function("attempt/20", |b| {
        b.iter(|| {
            let mut engine =
                QuizEngine::new(questions.clone(), QuizEngineConfig::default(), fixed_clock())
                    .unwrap();
            for _ in 0..20 {
                let correct = engine.current_question().correct;
                engine.select_answer(correct).unwrap();
                engine.lock();
                engine.go_next().unwrap();
            }
            engine.finish().unwrap().percentage
        })
    });
}

criterion_group!(benches, bench_percentage, bench_outcome, bench_full_attempt);
criterion_main!(benches);
