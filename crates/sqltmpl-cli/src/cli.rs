use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "sqltmpl.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Render,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Render(RenderArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub config: PathBuf,
    /// `true` when `--config` was given; a missing file is then an error.
    pub config_explicit: bool,
    pub template: TemplateSource,
    /// JSON array of parameters.
    pub params: Option<String>,
    /// JSON literal overriding `render.skip` from config.
    pub skip: Option<String>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "render" => parse_render(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_render<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut config_explicit = false;
    let mut file: Option<PathBuf> = None;
    let mut inline: Option<String> = None;
    let mut params: Option<String> = None;
    let mut skip: Option<String> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Render)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
                config_explicit = true;
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
                config_explicit = true;
            }
            "--file" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--file requires a value");
                };
                file = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--file=") => {
                file = Some(PathBuf::from(token.trim_start_matches("--file=")));
            }
            "--params" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--params requires a value");
                };
                params = Some(v.to_string());
            }
            _ if token.starts_with("--params=") => {
                params = Some(token.trim_start_matches("--params=").to_string());
            }
            "--skip" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--skip requires a value");
                };
                skip = Some(v.to_string());
            }
            _ if token.starts_with("--skip=") => {
                skip = Some(token.trim_start_matches("--skip=").to_string());
            }
            other if other.starts_with("--") => anyhow::bail!("unknown argument: {other}"),
            other => {
                if inline.is_some() {
                    anyhow::bail!("unexpected extra template argument: {other}");
                }
                inline = Some(other.to_string());
            }
        }
    }

    let template = match (inline, file) {
        (Some(_), Some(_)) => anyhow::bail!("pass either a template or --file, not both"),
        (Some(t), None) => TemplateSource::Inline(t),
        (None, Some(f)) => TemplateSource::File(f),
        (None, None) => return Ok(Command::Help(HelpTopic::Render)),
    };

    Ok(Command::Render(RenderArgs {
        config,
        config_explicit,
        template,
        params,
        skip,
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqltmpl - render placeholder SQL templates into inlined SQL

USAGE:
  sqltmpl <COMMAND> [OPTIONS]

COMMANDS:
  render        Substitute parameters into a template and print the SQL

Run `sqltmpl <command> --help` for more."
            );
        }
        HelpTopic::Render => {
            println!(
                "\
USAGE:
  sqltmpl render [OPTIONS] <TEMPLATE>
  sqltmpl render [OPTIONS] --file <FILE>

OPTIONS:
  --config <FILE>       Config file path (default: sqltmpl.toml, optional)
  --file <FILE>         Read the template from a file
  --params <JSON>       JSON array of parameters, e.g. '[\"Jack\", [1, 2], null]'
  --skip <JSON>         Skip sentinel as a JSON literal (overrides render.skip)
  -h, --help            Print help

PLACEHOLDERS:
  ?  ?d  ?f  ?a  ?#     generic, integer, float, array, identifier
  {{ ... }}             dropped when a value inside equals the skip sentinel"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_prints_root_help() {
        let cmd = parse_args(&args(&["sqltmpl"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_render_inline() {
        let cmd = parse_args(&args(&[
            "sqltmpl",
            "render",
            "--params",
            "[1]",
            "--skip=\"none\"",
            "select ?d",
        ]))
        .unwrap();
        let Command::Render(render) = cmd else {
            panic!("expected render");
        };

        assert_eq!(render.template, TemplateSource::Inline("select ?d".to_string()));
        assert_eq!(render.params.as_deref(), Some("[1]"));
        assert_eq!(render.skip.as_deref(), Some("\"none\""));
        assert_eq!(render.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(!render.config_explicit);
    }

    #[test]
    fn parse_render_file_with_config() {
        let cmd = parse_args(&args(&[
            "sqltmpl",
            "render",
            "--config=conf/sqltmpl.toml",
            "--file",
            "q.sql",
        ]))
        .unwrap();
        let Command::Render(render) = cmd else {
            panic!("expected render");
        };

        assert_eq!(render.template, TemplateSource::File(PathBuf::from("q.sql")));
        assert_eq!(render.config, PathBuf::from("conf/sqltmpl.toml"));
        assert!(render.config_explicit);
    }

    #[test]
    fn render_without_template_prints_help() {
        let cmd = parse_args(&args(&["sqltmpl", "render"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Render)));
    }

    #[test]
    fn rejects_template_and_file_together() {
        assert!(parse_args(&args(&["sqltmpl", "render", "select 1", "--file", "q.sql"])).is_err());
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(parse_args(&args(&["sqltmpl", "render", "--nope"])).is_err());
        assert!(parse_args(&args(&["sqltmpl", "frobnicate"])).is_err());
        assert!(parse_args(&args(&["sqltmpl", "render", "--params"])).is_err());
    }
}
