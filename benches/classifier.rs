use agit::git::split_command;
use agit::security::classify;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Typical model suggestions, safe and destructive
const COMMANDS: &[&str] = &[
    "git status",
    "git log --oneline -10",
    "git commit -m 'fix: handle empty diff'",
    "git push --force origin main",
    "git reset --hard HEAD~1",
    "git branch -D feature",
    "git -C ../repo push origin +main:main",
    "git stash drop stash@{0}",
];

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for command in COMMANDS {
        group.bench_with_input(BenchmarkId::from_parameter(command), command, |b, command| {
            b.iter(|| classify(black_box(command)))
        });
    }

    group.finish();
}

fn bench_compound_command(c: &mut Criterion) {
    let chained = COMMANDS.join(" && ");

    c.bench_function("classify_chained", |b| {
        b.iter(|| classify(black_box(&chained)))
    });
}

fn bench_split(c: &mut Criterion) {
    let quoted = r#"git commit -m "feat: add \"quoted\" subject" --author='Test User <test@example.com>'"#;

    c.bench_function("split_quoted", |b| {
        b.iter(|| split_command(black_box(quoted)))
    });
}

criterion_group!(benches, bench_classify, bench_compound_command, bench_split);
criterion_main!(benches);
