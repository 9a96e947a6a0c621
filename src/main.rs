// ==========================================
// 课表同步系统 - 批处理主入口
// ==========================================
// 用法: timetable-sync <BEST事件> <SOPHIA课表> <课程> <学科> <学生组> <教师> [config.json]
// 输出: actions.json (回写动作列表) 写入当前目录
// ==========================================

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use timetable_sync::engine::gateway::{dispatch_actions, NoOpGateway};
use timetable_sync::importer::{
    expand_best_events, load_reference_data, map_sophia_slots, RawRecord, SnapshotFileParser,
};
use timetable_sync::{logging, ReconcileConfig, ReconcileOrchestrator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("课表同步系统 - BEST→SOPHIA 对账批处理");
    tracing::info!("==================================================");

    let args: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if args.len() < 6 {
        bail!(
            "用法: timetable-sync <BEST事件> <SOPHIA课表> <课程> <学科> <学生组> <教师> [config.json]"
        );
    }

    let config = match args.get(6) {
        Some(path) => ReconcileConfig::load(path).context("装载配置失败")?,
        None => ReconcileConfig::default(),
    };

    let parser = SnapshotFileParser;
    let parse = |path: &Path| -> Result<Vec<RawRecord>> {
        parser
            .parse(path)
            .with_context(|| format!("解析快照失败: {}", path.display()))
    };

    let assignments = expand_best_events(&parse(&args[0])?);
    let slots = map_sophia_slots(&parse(&args[1])?);
    let reference = load_reference_data(
        &parse(&args[2])?,
        &parse(&args[3])?,
        &parse(&args[4])?,
        &parse(&args[5])?,
    );

    let orchestrator = ReconcileOrchestrator::new(config);
    let result = orchestrator.run(assignments, slots, &reference);

    // 演练模式: 动作列表落盘, 外部调用走空操作网关
    let outcomes =
        dispatch_actions(&NoOpGateway, &result.actions, orchestrator.config().academic_year).await;

    let actions_json =
        serde_json::to_string_pretty(&result.actions).context("序列化动作列表失败")?;
    std::fs::write("actions.json", actions_json).context("写入 actions.json 失败")?;

    tracing::info!(
        groups = result.groups.len(),
        actions = result.actions.len(),
        invalid = result.invalid_assignments.len(),
        dispatched = outcomes.len(),
        "批次完成, 动作列表已写入 actions.json"
    );
    Ok(())
}
