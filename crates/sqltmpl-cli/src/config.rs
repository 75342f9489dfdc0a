use serde::Deserialize;
use sqltmpl::Value;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load `config_path`. A missing file yields defaults unless `required`.
    pub fn load(config_path: &Path, required: bool) -> anyhow::Result<Self> {
        if !required && !config_path.exists() {
            return Ok(Self {
                file: ConfigFile::default(),
            });
        }

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::from_toml(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self { file })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub render: RenderConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscaperKind {
    #[default]
    Mysql,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub escaper: EscaperKind,

    /// Skip sentinel as a JSON literal (TOML has no null).
    #[serde(default = "default_skip")]
    pub skip: String,
}

fn default_skip() -> String {
    "null".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            escaper: EscaperKind::default(),
            skip: default_skip(),
        }
    }
}

impl RenderConfig {
    pub fn skip_value(&self) -> anyhow::Result<Value> {
        parse_json_value(&self.skip)
            .map_err(|e| anyhow::anyhow!("invalid render.skip {:?}: {e}", self.skip))
    }
}

impl ConfigFile {
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        self.render.skip = expand_env_vars(&self.render.skip)?;
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if self.render.skip.trim().is_empty() {
            anyhow::bail!("render.skip must not be empty");
        }
        self.render.skip_value()?;
        Ok(())
    }
}

/// Parse a JSON literal into a template [`Value`].
pub fn parse_json_value(raw: &str) -> anyhow::Result<Value> {
    let json: serde_json::Value = serde_json::from_str(raw)?;
    Ok(Value::from(json))
}

/// Parse a JSON array into a positional parameter list.
pub fn parse_json_params(raw: &str) -> anyhow::Result<Vec<Value>> {
    let json: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| anyhow::anyhow!("invalid --params JSON: {e}"))?;
    match json {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(Value::from).collect()),
        other => anyhow::bail!("--params must be a JSON array, got: {other}"),
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}}}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
