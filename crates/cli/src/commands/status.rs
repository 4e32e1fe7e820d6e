use super::print_json;
use crate::di::UseCases;

pub async fn run(use_cases: &UseCases, json: bool) -> anyhow::Result<()> {
    let summary = use_cases.check_status.execute().await?;
    if json {
        return print_json(&summary);
    }
    println!(
        "Checked {} switches: {} reachable, {} unreachable",
        summary.checked, summary.reachable, summary.unreachable
    );
    Ok(())
}
