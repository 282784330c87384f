use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 原工具以單一破折號傳入的長參數
const SINGLE_DASH_FLAGS: [&str; 5] = ["env", "domainID", "certName", "certPath", "keyPath"];

/// 命令列參數
///
/// 參數名稱保留原工具的駝峰寫法，同時接受 kebab-case。
/// 必填參數由 [`CliArgs::has_required`] 檢查，缺少時只印出提示，不呼叫遠端。
#[derive(Debug, Clone, Parser)]
#[command(name = "auto-ucdn-cert")]
#[command(about = "Rotate a TLS certificate bound to UCloud UCDN domains")]
pub struct CliArgs {
    /// Config environment: "dev" selects base_config.toml, anything else config.toml
    #[arg(long = "env", default_value = "")]
    pub environment: String,

    /// Domain ID for UCloud CDN; discovered from the certificate when empty
    #[arg(long = "domainID", visible_alias = "domain-id", default_value = "")]
    pub domain_id: String,

    /// Certificate name
    #[arg(long = "certName", visible_alias = "cert-name", default_value = "")]
    pub cert_name: String,

    /// Path to the certificate file
    #[arg(long = "certPath", visible_alias = "cert-path", default_value = "")]
    pub cert_path: String,

    /// Path to the private key file
    #[arg(long = "keyPath", visible_alias = "key-path", default_value = "")]
    pub key_path: String,

    /// Explicit config file, overrides --env
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Resolve domains and print the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit tracing output as JSON
    #[arg(long)]
    pub log_json: bool,
}

/// 把 `-certName x`、`-certName=x` 改寫成 clap 接受的 `--certName`
fn normalize_flag(arg: OsString) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };
    let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
        return arg;
    };
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    if SINGLE_DASH_FLAGS.contains(&name) {
        OsString::from(format!("-{}", text))
    } else {
        arg
    }
}

impl CliArgs {
    /// 解析參數，同時接受原工具的單破折號寫法
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(args.into_iter().map(Into::into).map(normalize_flag))
    }

    /// 解析失敗時只印出訊息並回傳 `None`，由呼叫端以結束碼 0 結束
    pub fn parse_or_report<I, T>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match Self::try_parse_args(args) {
            Ok(args) => Some(args),
            Err(e) => {
                if let Err(print_err) = e.print() {
                    eprintln!("{}", print_err);
                }
                None
            }
        }
    }

    pub fn has_required(&self) -> bool {
        !self.cert_name.is_empty() && !self.cert_path.is_empty() && !self.key_path.is_empty()
    }

    pub fn domain_id(&self) -> Option<&str> {
        Some(self.domain_id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn config_path(&self, work_dir: &Path) -> PathBuf {
        match &self.config {
            Some(path) => work_dir.join(path),
            None => work_dir.join(super::config_file_name(&self.environment)),
        }
    }
}
