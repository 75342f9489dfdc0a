//! Example rendering templates with conditional blocks and typed placeholders.
//!
//! Run with:
//!   cargo run --example build_query -p sqltmpl

use sqltmpl::{Database, MysqlEscaper, TemplateResult, Value, value};

#[derive(Debug)]
struct Filters {
    ids: Vec<i64>,
    blocked: Option<bool>,
    min_score: Option<f64>,
}

fn list_users(db: &Database<MysqlEscaper>, filters: &Filters) -> TemplateResult<String> {
    let blocked = filters.blocked.map_or_else(|| db.skip().clone(), Value::from);
    let min_score = filters.min_score.map_or_else(|| db.skip().clone(), Value::from);

    db.build_query(
        "select ?# from users where ?# in (?a){ and block = ?d}{ and score >= ?f}",
        &[
            vec!["id", "name", "email"].into(),
            "user_id".into(),
            filters.ids.clone().into(),
            blocked,
            min_score,
        ],
    )
}

fn main() -> TemplateResult<()> {
    let db = Database::new(MysqlEscaper);

    println!("== Optional filters ==");
    let all = Filters {
        ids: vec![1, 2, 3],
        blocked: None,
        min_score: None,
    };
    println!("{all:?}\n  {}", list_users(&db, &all)?);

    let narrowed = Filters {
        ids: vec![7],
        blocked: Some(false),
        min_score: Some(4.5),
    };
    println!("{narrowed:?}\n  {}", list_users(&db, &narrowed)?);

    println!("\n== Keyed update ==");
    let sql = db.build_query(
        "update users set ?a where user_id = ?d",
        &[
            value::map([("name", Value::from("O'Brien")), ("email", Value::Null)]),
            Value::from(42),
        ],
    )?;
    println!("  {sql}");

    println!("\n== Literals are left alone ==");
    let sql = db.build_query("select '?{not a block}' as raw, ? as bound", &["x".into()])?;
    println!("  {sql}");

    println!("\n== Errors ==");
    let cases: [(&str, &[Value]); 4] = [
        ("select ??", &[]),
        ("select {a {b}}", &[]),
        ("select 'open", &[]),
        ("select ?d", &[]),
    ];
    for (template, params) in cases {
        match db.build_query(template, params) {
            Ok(sql) => println!("  unexpected success: {sql}"),
            Err(e) => println!("  {template:?}: {e}"),
        }
    }

    Ok(())
}
