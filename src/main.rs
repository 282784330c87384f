use auto_ucdn_cert::adapters::alert::WebhookAlert;
use auto_ucdn_cert::core::CredentialStore;
use auto_ucdn_cert::utils::{logger, validation::Validate};
use auto_ucdn_cert::{
    AppConfig, CliArgs, FileOperationLog, LocalCredentialStore, Phase, RotateError, RotationEngine,
    RotationReport, RotationRequest, RunControl, RunState, UcloudClient,
};
use tokio_util::sync::CancellationToken;

/// 設定階段的錯誤只輸出到終端，不呼叫任何遠端介面
fn report_setup_error(context: &str, e: &RotateError) {
    tracing::error!(severity = ?e.severity(), "❌ {}: {}", context, e);
    println!("{}: {}", context, e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = CliArgs::parse_or_report(std::env::args_os()) else {
        return Ok(());
    };

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting auto-ucdn-cert");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let work_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("获取工作目录失败: {}", e);
            return Ok(());
        }
    };

    // 載入並驗證配置
    let config_path = args.config_path(&work_dir);
    tracing::info!("📁 Loading configuration from: {}", config_path.display());
    let config = match AppConfig::from_file(&config_path).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            report_setup_error("加载配置失败", &e);
            return Ok(());
        }
    };

    if !args.has_required() {
        println!("All parameters (certName, certPath, keyPath) are required.");
        return Ok(());
    }

    // 讀取證書與私鑰
    let store = LocalCredentialStore::new(&work_dir);
    let cert = match store.read_file(&args.cert_path).await {
        Ok(data) => data,
        Err(e) => {
            report_setup_error("读取证书文件失败", &e);
            return Ok(());
        }
    };
    let key = match store.read_file(&args.key_path).await {
        Ok(data) => data,
        Err(e) => {
            report_setup_error("读取密钥文件失败", &e);
            return Ok(());
        }
    };

    let request = match RotationRequest::new(args.domain_id(), &args.cert_name, cert, key) {
        Ok(request) => request,
        Err(e) => {
            report_setup_error("参数无效", &e);
            return Ok(());
        }
    };

    let mut log = match FileOperationLog::open(work_dir.join(config.operation_log_path())) {
        Ok(log) => log,
        Err(e) => {
            report_setup_error("无法创建日志文件", &e);
            return Ok(());
        }
    };
    if let Some(url) = config.webhook_url() {
        log = log.with_alert(WebhookAlert::new(url));
    }

    let client = match UcloudClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            report_setup_error("创建 UCloud 客户端失败", &e);
            return Ok(());
        }
    };

    // Ctrl-C 取消整個輪換
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling rotation");
            ctrl_c.cancel();
        }
    });

    let mut control = RunControl::new(cancel);
    if let Some(timeout) = config.request_timeout() {
        control = control.with_request_timeout(timeout);
    }
    if let Some(timeout) = config.run_timeout() {
        control = control.with_run_timeout(timeout);
    }

    let engine = RotationEngine::new(client, log)
        .with_policy(config.propagation_policy())
        .with_control(control);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No changes will be made");
        let (domains, steps) = engine.plan(&request).await;
        println!("📋 Certificate: {}", request.cert_name);
        println!("📋 Domains: {:?}", domains);
        for (i, step) in steps.iter().enumerate() {
            println!(
                "  {}. {} {} (wait {:?})",
                i + 1,
                step.phase,
                step.domain.as_deref().unwrap_or(""),
                step.delay
            );
        }
        return Ok(());
    }

    let report = engine.run(&request).await;
    print_summary(&report, config.operation_log_path());

    // 失敗只透過日誌與終端輸出呈現，結束碼一律為 0
    Ok(())
}

fn print_summary(report: &RotationReport, log_path: &str) {
    match report.state {
        RunState::Completed => {
            let failed = report.failed_domains(Phase::EnableHttps);
            if failed.is_empty() {
                println!(
                    "✅ Certificate {} rotated on {} domain(s)",
                    report.cert_name,
                    report.domains.len()
                );
            } else {
                println!(
                    "⚠️ Certificate {} rotated; HTTPS not re-enabled on: {}",
                    report.cert_name,
                    failed.join(", ")
                );
            }
        }
        RunState::Aborted { phase } => {
            let reason = report
                .outcomes
                .last()
                .and_then(|o| o.error())
                .map(|e| e.to_string())
                .unwrap_or_default();
            println!(
                "❌ Rotation of {} aborted during {}: {}",
                report.cert_name, phase, reason
            );
            println!("📁 See {} for details", log_path);
        }
    }
}
