use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use memquery::{ColumnDef, DataType, Database, EngineConfig, Schema, Value, parse_select};
use std::hint::black_box;
use std::sync::Arc;

fn users_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("id", DataType::Int),
        ColumnDef::new("name", DataType::Text),
        ColumnDef::new("age", DataType::Int),
        ColumnDef::new("active", DataType::Bool),
    ])
}

fn setup_populated_db(n: usize, config: EngineConfig) -> Database {
    let db = Database::with_config(config);
    db.create_table("users", users_schema()).unwrap();
    db.create_table(
        "posts",
        Schema::new(vec![ColumnDef::new("id", DataType::Int), ColumnDef::new("user_id", DataType::Int)]),
    )
    .unwrap();

    for i in 0..n {
        let row = vec![
            Value::Int(i as i64),
            Value::Text(Arc::from(format!("user{}", i).as_str())),
            Value::Int((i % 100) as i64),
            Value::Bool(i % 2 == 0),
        ];
        db.insert("users", row).unwrap();
        db.insert("posts", vec![Value::Int(i as i64), Value::Int((i % 50) as i64)])
            .unwrap();
    }
    db
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parse_Select");
    group.bench_function("three_way_join", |b| {
        b.iter(|| {
            parse_select(black_box(
                "select a.* from Table1 a join Table2 ta on (a.ID = ta.ID) join Table3 tab on (ta.ID = tab.ID) where tab.name = null and ta.name = null order by a.ID desc",
            ))
            .unwrap()
        });
    });
    group.finish();
}

fn bench_select_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Where_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let db = setup_populated_db(n, EngineConfig::default());
            b.iter(|| {
                let res = db.query("SELECT * FROM users WHERE age = 42 ORDER BY name DESC").unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

fn bench_join_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Join_Performance");
    let sql = "select u.name, p.id from users u join posts p on p.user_id = u.id where u.active = true";

    for n in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("nested_loop", n), n, |b, &n| {
            let db = setup_populated_db(n, EngineConfig::for_testing());
            b.iter(|| black_box(db.query(sql).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("hash_index", n), n, |b, &n| {
            let db = setup_populated_db(n, EngineConfig::default().with_hash_join_min_rows(0));
            b.iter(|| black_box(db.query(sql).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_select_scaling, bench_join_scaling);
criterion_main!(benches);
