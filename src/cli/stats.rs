use anyhow::Result;
use heattrail::config::HeattrailConfig;
use heattrail::engine::Engine;

/// Display the heat-map summary in the terminal.
pub fn stats(config: &HeattrailConfig, limit: Option<usize>) -> Result<()> {
    let engine = Engine::open(config.clone())?;
    let summary = engine.heat_map(limit)?;

    println!("Heat Map");
    println!("{}", "=".repeat(40));
    println!("  Knowledge paths:     {}", summary.total_paths);
    println!("  Nodes:               {}", summary.total_nodes);
    println!("  Edges:               {}", summary.total_edges);
    println!("  Last maintenance:    {}", summary.last_maintenance.to_rfc3339());
    println!();

    println!("Hottest nodes:");
    for node in &summary.nodes {
        println!("  {:.2}  {:>5}x  {}", node.heat, node.access_count, node.id);
    }
    println!();

    println!("Hottest edges:");
    for edge in &summary.edges {
        println!(
            "  {:.2}  {:>5}x  {} -> {}",
            edge.heat, edge.traversal_count, edge.from, edge.to
        );
    }

    Ok(())
}
