use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rextest_core::{
    FlagSet, Inputs, PatternSpec, Regex, ViewMode, Workbench, compute_match_state, enumerate,
    render,
};

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_email", |b| {
        b.iter(|| {
            black_box(Regex::new(
                black_box(r"(?<user>[\w.%+-]+)@(?<host>[\w.-]+\.[a-zA-Z]{2,})"),
                FlagSet::new(),
            ))
        })
    });
}

fn bench_basic_matching(c: &mut Criterion) {
    let pattern = Regex::new(r"hello\s+\w+", FlagSet::new()).unwrap();
    let input = "hello world this is a test hello universe";

    c.bench_function("basic_match", |b| {
        b.iter(|| black_box(pattern.find(black_box(input))))
    });
}

fn bench_backreferences(c: &mut Criterion) {
    let pattern = Regex::new(r"(?<name>\w+) is \k<name>", FlagSet::new()).unwrap();
    let input = "John is Jane and Jane is Jane";

    c.bench_function("backref_match", |b| {
        b.iter(|| black_box(pattern.find(black_box(input))))
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let pattern = Regex::new(r"\d+", FlagSet::new()).unwrap();
    let input = "abc 123 def 456 ghi 789 jkl 012 mno 345 pqr 678 stu 901";

    c.bench_function("enumerate_numbers", |b| {
        b.iter(|| black_box(enumerate(&pattern, black_box(input), true)))
    });
}

fn bench_replace(c: &mut Criterion) {
    let pattern = Regex::new(r"(\w+)@(\w+)", FlagSet::new()).unwrap();
    let input = "alice@home bob@work carol@lab dave@field";

    c.bench_function("replace_swap", |b| {
        b.iter(|| black_box(render(&pattern, black_box(input), "$2 at $1", true)))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let inputs = Inputs {
        spec: PatternSpec::new(r"\b[a-z]+\b", "gi".parse().unwrap()),
        subject: "The quick brown fox jumps over the lazy dog. ".repeat(20),
        template: String::new(),
        mode: ViewMode::Match,
    };

    c.bench_function("compute_match_state", |b| {
        b.iter(|| black_box(compute_match_state(black_box(&inputs))))
    });

    c.bench_function("workbench_subject_edit", |b| {
        let mut bench = Workbench::with_inputs(inputs.clone());
        let edited = format!("{}x", inputs.subject);
        let subjects = [inputs.subject.as_str(), edited.as_str()];
        let mut turn = 0;
        b.iter(|| {
            turn ^= 1;
            black_box(bench.set_subject(subjects[turn]).clone())
        })
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_basic_matching,
    bench_backreferences,
    bench_enumerate,
    bench_replace,
    bench_pipeline,
);

criterion_main!(benches);
