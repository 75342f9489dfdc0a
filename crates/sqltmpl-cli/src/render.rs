use crate::cli::{RenderArgs, TemplateSource};
use crate::config::{EscaperKind, ProjectConfig, parse_json_params, parse_json_value};
use sqltmpl::{Database, MysqlEscaper, Value};

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let sql = render(&args)?;
    println!("{sql}");
    Ok(())
}

/// Resolve config, template and parameters, then render.
pub fn render(args: &RenderArgs) -> anyhow::Result<String> {
    let project = ProjectConfig::load(&args.config, args.config_explicit)?;

    let template = match &args.template {
        TemplateSource::Inline(t) => t.clone(),
        TemplateSource::File(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("failed to read template {}: {e}", path.display())
            })?;
            // Template files usually end with a newline.
            raw.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let params = match &args.params {
        Some(raw) => parse_json_params(raw)?,
        None => Vec::new(),
    };

    let skip = match &args.skip {
        Some(raw) => {
            parse_json_value(raw).map_err(|e| anyhow::anyhow!("invalid --skip JSON: {e}"))?
        }
        None => project.file.render.skip_value()?,
    };

    render_with(project.file.render.escaper, &template, &params, skip)
}

fn render_with(
    escaper: EscaperKind,
    template: &str,
    params: &[Value],
    skip: Value,
) -> anyhow::Result<String> {
    let db = match escaper {
        EscaperKind::Mysql => Database::new(MysqlEscaper).with_skip(skip),
    };
    let sql = db.build_query(template, params)?;
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn inline(template: &str, params: Option<&str>, skip: Option<&str>) -> RenderArgs {
        RenderArgs {
            config: PathBuf::from("definitely/not/here/sqltmpl.toml"),
            config_explicit: false,
            template: TemplateSource::Inline(template.to_string()),
            params: params.map(str::to_string),
            skip: skip.map(str::to_string),
        }
    }

    #[test]
    fn renders_with_default_config() {
        let args = inline(
            "select name from users where ?# in (?a){ and block = ?d}",
            Some(r#"["user_id", [1, 2, 3], null]"#),
            None,
        );
        assert_eq!(
            render(&args).unwrap(),
            "select name from users where `user_id` in (1, 2, 3)"
        );
    }

    #[test]
    fn keyed_object_keeps_json_order() {
        let args = inline(
            "update users set ?a where user_id = -1",
            Some(r#"[{"name": "Jack", "email": null}]"#),
            None,
        );
        assert_eq!(
            render(&args).unwrap(),
            "update users set `name` = 'Jack', `email` = null where user_id = -1"
        );
    }

    #[test]
    fn skip_override_from_args() {
        let args = inline("x{ and y = ?}", Some("[null]"), Some("false"));
        assert_eq!(render(&args).unwrap(), "x and y = null");
    }

    #[test]
    fn template_errors_surface() {
        let args = inline("x = ??", Some("[1]"), None);
        let err = render(&args).unwrap_err();
        let err = err.downcast_ref::<sqltmpl::TemplateError>().unwrap();
        assert!(err.is_parse_error());
    }

    #[test]
    fn explicit_missing_config_fails() {
        let mut args = inline("select 1", None, None);
        args.config_explicit = true;
        assert!(render(&args).is_err());
    }

    #[test]
    fn file_template_drops_trailing_newline() {
        let path = std::env::temp_dir().join(format!("sqltmpl-render-{}.sql", std::process::id()));
        std::fs::write(&path, "select ?d\r\n").unwrap();

        let mut args = inline("", Some("[1]"), None);
        args.template = TemplateSource::File(path.clone());
        let out = render(&args);
        let _ = std::fs::remove_file(&path);
        assert_eq!(out.unwrap(), "select 1");
    }

    #[test]
    fn inline_template_is_rendered_verbatim() {
        let args = inline("select ?\n", Some("[1]"), None);
        assert_eq!(render(&args).unwrap(), "select 1\n");
    }

    #[test]
    fn missing_template_file_fails() {
        let mut args = inline("", None, None);
        args.template = TemplateSource::File(PathBuf::from("definitely/not/here/query.sql"));
        let err = render(&args).unwrap_err();
        assert!(err.to_string().contains("failed to read template"));
    }
}
