use bank_ledger::run::run;
use criterion::{criterion_group, criterion_main, Criterion};

fn commands(repeat: usize) -> String {
    format!(
        "command,account,to,amount,kind,holder,customer,description\n{}{}",
        r#"open,,,5000,savings,Alice,1,
        open,,,0,current,Bob,2,
        "#,
        r#"deposit,    ACC0000000001,  ,               10.5,,,,
        withdraw,   ACC0000000002,  ,               3,,,,
        badly formated record
        transfer,   ACC0000000001,  ACC0000000002,  2,,,,bench
        transfer,   ACC0000000002,  ACC0000000001,  1,,,,bench
        withdraw,   ACC0000000001,  ,               100000,,,,
        "#
        .repeat(repeat)
    )
}

pub fn bench_replay_6000_lines(c: &mut Criterion) {
    c.bench_function("replay_commands_6_000", |b| {
        let cursor = std::io::Cursor::new(commands(1_000));

        b.iter(move || run(cursor.clone(), std::io::sink()))
    });
}

pub fn bench_replay_120000_lines(c: &mut Criterion) {
    c.bench_function("replay_commands_120_000", |b| {
        let cursor = std::io::Cursor::new(commands(20_000));

        b.iter(move || run(cursor.clone(), std::io::sink()))
    });
}

criterion_group!(benches, bench_replay_6000_lines, bench_replay_120000_lines);
criterion_main!(benches);
