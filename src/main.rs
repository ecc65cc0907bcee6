use anyhow::Result;
use clap::Parser;
use story_explore::cli::Args;
use story_explore::config::Config;
use story_explore::generator::types::PipelineOutput;
use story_explore::{StoryError, launch};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.to_config()?;

    if args.interactive {
        return run_interactive(&config, args.json).await;
    }

    match launch(&config, &args.idea).await {
        Ok(output) => print_output(&output, args.json),
        Err(err) => match user_warning(&config, &err) {
            Some(warning) => {
                eprintln!("{}", warning);
                Ok(())
            }
            None => Err(err),
        },
    }
}

/// `RUST_LOG`优先，否则按`--verbose`选择级别
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "story_explore=debug"
    } else {
        "story_explore=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// 每行输入都是一次独立提交，单次失败不影响后续输入
async fn run_interactive(config: &Config, json: bool) -> Result<()> {
    eprintln!("💡 Enter a story idea per line (Ctrl-D to quit)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match launch(config, &line).await {
            Ok(output) => print_output(&output, json)?,
            Err(err) => match user_warning(config, &err) {
                Some(warning) => eprintln!("{}", warning),
                None => eprintln!("❌ {:#}", err),
            },
        }
    }

    Ok(())
}

fn print_output(output: &PipelineOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        println!("{}", output.content);
    }
    Ok(())
}

/// 只有用户可修正的本地错误转为提示，其余错误照常返回
fn user_warning(config: &Config, err: &anyhow::Error) -> Option<String> {
    err.downcast_ref::<StoryError>()?
        .user_warning(&config.llm.provider)
}
