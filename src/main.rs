//! chatguard 命令行：手工核查与监控脚本使用
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chatguard::{ConfigManager, ContentSanitizer, MessageSegmenter, SanitizerConfig, XssDetector};

#[derive(Parser, Debug)]
#[command(name = "chatguard", version, about = "聊天内容安全处理工具")]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON格式的剥离配置文件（仅作用于 message / segment）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 净化消息正文
    Message { text: Option<String> },
    /// 校验URL，被拒绝时以非零状态退出
    Url { text: Option<String> },
    /// 净化用户名
    Username { text: Option<String> },
    /// 检测XSS攻击特征（JSON输出）
    Detect { text: Option<String> },
    /// 净化并切分消息（JSON输出）
    Segment { text: Option<String> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => SanitizerConfig::from_file(path)
            .with_context(|| format!("加载配置失败：{}", path.display()))?,
        None => ConfigManager::get_default(),
    };
    let sanitizer = ContentSanitizer::new(config);

    match cli.command {
        Command::Message { text } => {
            println!("{}", sanitizer.sanitize_message_content(&read_input(text)?));
        }
        Command::Url { text } => {
            let input = read_input(text)?;
            println!("{}", check_url(&sanitizer, &input)?);
        }
        Command::Username { text } => {
            println!("{}", sanitizer.sanitize_username(&read_input(text)?));
        }
        Command::Detect { text } => {
            let report = XssDetector::new().scan(&read_input(text)?);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Segment { text } => {
            let segments = MessageSegmenter::new(&sanitizer).segment(&read_input(text)?);
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
    }

    Ok(())
}

/// 优先取命令行参数，否则读取标准输入（去掉末尾一个换行）
fn read_input(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("读取标准输入失败")?;
    Ok(trim_trailing_newline(buffer))
}

/// 去掉末尾一个换行（\n 或 \r\n），其余内容原样保留
fn trim_trailing_newline(mut buffer: String) -> String {
    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    buffer
}

/// URL子命令：被拒绝时返回错误，main 以非零状态退出
fn check_url<'a>(sanitizer: &ContentSanitizer, input: &'a str) -> Result<&'a str> {
    match sanitizer.validate_url(input) {
        Ok(url) => Ok(url),
        Err(e) => bail!("URL被拒绝：{}", e),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "chatguard=debug" } else { "chatguard=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
