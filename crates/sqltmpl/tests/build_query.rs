use sqltmpl::{Database, MysqlEscaper, ParseErrorKind, QueryParser, Value, value};
use std::sync::Arc;

fn db() -> Database<MysqlEscaper> {
    Database::new(MysqlEscaper)
}

#[test]
fn plain_query() {
    let sql = db()
        .build_query("select name from users where user_id = 1", &[])
        .unwrap();
    assert_eq!(sql, "select name from users where user_id = 1");
}

#[test]
fn string_parameter() {
    let sql = db()
        .build_query(
            "select * from users where name = ? and block = 0",
            &["Jack".into()],
        )
        .unwrap();
    assert_eq!(sql, "select * from users where name = 'Jack' and block = 0");
}

#[test]
fn identifier_list_and_int_placeholders() {
    let sql = db()
        .build_query(
            "select ?# from users where user_id = ?d and block = ?d",
            &[vec!["name", "email"].into(), Value::from(2), true.into()],
        )
        .unwrap();
    assert_eq!(
        sql,
        "select `name`, `email` from users where user_id = 2 and block = 1"
    );
}

#[test]
fn keyed_array_renders_assignments() {
    let sql = db()
        .build_query(
            "update users set ?a where user_id = -1",
            &[value::map([("name", Value::from("Jack")), ("email", Value::Null)])],
        )
        .unwrap();
    assert_eq!(
        sql,
        "update users set `name` = 'Jack', `email` = null where user_id = -1"
    );
}

#[test]
fn conditional_block_follows_skip() {
    let db = db();
    let template = "select name from users where ?# in (?a){ and block = ?d}";

    let skipped = db
        .build_query(
            template,
            &["user_id".into(), vec![1, 2, 3].into(), db.skip().clone()],
        )
        .unwrap();
    assert_eq!(skipped, "select name from users where `user_id` in (1, 2, 3)");

    let kept = db
        .build_query(template, &["user_id".into(), vec![1, 2, 3].into(), true.into()])
        .unwrap();
    assert_eq!(
        kept,
        "select name from users where `user_id` in (1, 2, 3) and block = 1"
    );
}

#[test]
fn question_mark_inside_literal() {
    let sql = db()
        .build_query(
            "select * from users where name = 'J?ack' and block = ?",
            &[true.into()],
        )
        .unwrap();
    assert_eq!(sql, "select * from users where name = 'J?ack' and block = 1");
}

#[test]
fn braces_inside_literal() {
    let sql = db()
        .build_query(
            "select * from users where name = 'J ?a {insi ?d e} ck' and block = ?",
            &[true.into()],
        )
        .unwrap();
    assert_eq!(
        sql,
        "select * from users where name = 'J ?a {insi ?d e} ck' and block = 1"
    );
}

#[test]
fn block_opened_right_after_placeholder() {
    let db = db();
    let template = "update users set ?a where user_id = ?{ and (block = ? or email = ?)}";
    let row = value::map([("name", Value::from("Jack")), ("email", Value::Null)]);

    let sql = db
        .build_query(
            template,
            &[row.clone(), Value::from(2), Value::Null, "jack@me.com".into()],
        )
        .unwrap();
    assert_eq!(
        sql,
        "update users set `name` = 'Jack', `email` = null where user_id = 2"
    );

    let sql = db
        .build_query(template, &[row, Value::from(2), true.into(), "jack@me.com".into()])
        .unwrap();
    assert_eq!(
        sql,
        "update users set `name` = 'Jack', `email` = null where user_id = 2 and (block = 1 or email = 'jack@me.com')"
    );
}

#[test]
fn block_opened_and_closed_right_after_placeholders() {
    let db = db();
    let template = "update users set ?a where user_id = ?{ or email = ?}";
    let row = value::map([("name", Value::from("Jack")), ("email", Value::Null)]);

    let sql = db
        .build_query(template, &[row.clone(), Value::from(2), Value::Null])
        .unwrap();
    assert_eq!(
        sql,
        "update users set `name` = 'Jack', `email` = null where user_id = 2"
    );

    let sql = db
        .build_query(template, &[row, Value::from(2), "jack@me.com".into()])
        .unwrap();
    assert_eq!(
        sql,
        "update users set `name` = 'Jack', `email` = null where user_id = 2 or email = 'jack@me.com'"
    );
}

#[test]
fn escaping_prevents_breaking_out_of_literal() {
    let sql = db()
        .build_query("select * from users where name = ?", &["x' or '1'='1".into()])
        .unwrap();
    assert_eq!(sql, "select * from users where name = 'x\\' or \\'1\\'=\\'1'");
}

#[test]
fn parse_errors() {
    let db = db();
    let cases = [
        ("select * from users where name = 'J?ack", ParseErrorKind::UnterminatedString),
        (
            "select * from users where name = 'J?ack' and {block = ?",
            ParseErrorKind::UnterminatedBlock,
        ),
        (
            "select * from users where name = 'J?ack' and {block = ??}",
            ParseErrorKind::DoublePlaceholder,
        ),
        (
            "select * from users where name = 'J?ack' and {{block = ?}",
            ParseErrorKind::NestedBlock,
        ),
        (
            "select * from users where name = 'J?ack' and {block = ?}}",
            ParseErrorKind::UnmatchedBlockClose,
        ),
    ];

    for (template, expected) in cases {
        let err = db.build_query(template, &[true.into()]).unwrap_err();
        assert!(err.is_parse_error(), "{template}: {err}");
        assert_eq!(err.parse_kind(), Some(expected), "{template}");
    }
}

#[test]
fn missing_parameter_is_not_a_parse_error() {
    let err = db()
        .build_query("select * from users where id = ?d", &[])
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(!err.is_parse_error());
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = Arc::new(QueryParser::new(MysqlEscaper));
    let handles: Vec<_> = (0..4_i64)
        .map(|i| {
            let parser = Arc::clone(&parser);
            std::thread::spawn(move || {
                parser.parse("select ?d{ and ?}", &[i.into(), Value::Null], &Value::Null)
            })
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.join().unwrap().unwrap(), format!("select {i}"));
    }
}
