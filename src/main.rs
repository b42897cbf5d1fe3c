use anyhow::Result;
use openproject_feedback::app::{App, Command};
use openproject_feedback::config::Config;
use openproject_feedback::utils::logging;

const USAGE: &str = "用法: openproject-feedback <probe | submit <feedback.toml>>";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let Some(command) = Command::parse(std::env::args().skip(1)) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    // 初始化并运行应用
    let app = App::initialize(config)?;
    if !app.run(command).await? {
        std::process::exit(1);
    }

    Ok(())
}
