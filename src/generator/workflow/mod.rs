use crate::config::Config;
use crate::generator::context::RequestContext;
use crate::generator::pipeline::Pipeline;
use crate::generator::types::PipelineOutput;
use crate::llm::client::CompletionModel;
use crate::types::Idea;

use anyhow::Result;
use std::time::{Duration, Instant};

/// 时间跟踪作用域，按阶段开始的先后顺序记录耗时
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: Vec<(String, Instant)>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .push((phase_name.to_string(), Instant::now()));
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let index = self
            .phase_start_times
            .iter()
            .position(|(name, _)| name == phase_name)?;
        let (name, start_time) = self.phase_start_times.remove(index);
        let duration = start_time.elapsed();
        self.phase_durations.push((name, duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取所有已结束阶段的执行时间
    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 处理一次提交：本地校验 -> 构建客户端与流水线 -> 执行
pub async fn launch(config: &Config, idea: &str) -> Result<PipelineOutput> {
    config.validate()?;
    let context = RequestContext::new(config.clone(), idea)?;
    let client = context.build_client()?;
    let pipeline = context.build_pipeline()?;

    execute(&pipeline, &client, &context.idea).await
}

/// 用给定的模型执行流水线
pub async fn execute(
    pipeline: &Pipeline,
    model: &dyn CompletionModel,
    idea: &Idea,
) -> Result<PipelineOutput> {
    tracing::info!(variant = %pipeline.variant(), "🚀 开始执行故事探索流程");
    let started = Instant::now();

    let output = pipeline.run(model, idea).await?;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        tool_calls = output.tool_calls.len(),
        stopped_by_max_iterations = output.stopped_by_max_iterations,
        "✓ 故事探索流程执行完毕"
    );
    Ok(output)
}
