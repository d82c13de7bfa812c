//! `typeflow plan` command implementation

use colored::Colorize;
use typeflow_foundation::chain::PathPlan;

use crate::cli::RequestArgs;
use crate::output::{OutputFormat, Table, to_json};

/// Execute the `typeflow plan` command
pub async fn run(request: &RequestArgs, format: OutputFormat) -> anyhow::Result<()> {
    let chain = super::load_chain(request)?;
    let path = chain.resolve(&super::converter_args(request, Vec::new())).await?;
    println!("{}", render(&path.plan(), format)?);
    Ok(())
}

fn render(plan: &PathPlan, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(plan),
        OutputFormat::Table => Ok(render_table(plan)),
        OutputFormat::Text => Ok(render_text(plan)),
    }
}

fn render_text(plan: &PathPlan) -> String {
    if plan.hops.is_empty() {
        return format!(
            "{} is already acceptable (score {})",
            plan.source_type.cyan(),
            plan.score
        );
    }

    let mut lines = vec![format!(
        "{} {} {} (score {})",
        plan.source_type.cyan(),
        "->".dimmed(),
        plan.target_type.cyan(),
        plan.score.to_string().yellow()
    )];
    for (step, hop) in plan.hops.iter().enumerate() {
        lines.push(format!(
            "  {}. {} {} -> {} (weight {})",
            step + 1,
            hop.converter.bold(),
            hop.in_type,
            hop.out_type,
            hop.weight
        ));
    }
    lines.join("\n")
}

fn render_table(plan: &PathPlan) -> String {
    let mut table = Table::new(&["step", "converter", "input", "output", "weight"]);
    for (step, hop) in plan.hops.iter().enumerate() {
        table.add_row([
            (step + 1).to_string(),
            hop.converter.clone(),
            hop.in_type.clone(),
            hop.out_type.clone(),
            hop.weight.to_string(),
        ]);
    }
    format!("{table}\nscore: {}", plan.score)
}
