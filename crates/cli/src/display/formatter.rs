use pantsbridge_core::{BuildGraph, Error, Preview};

pub fn print_preview(preview: &Preview) {
    for (address, expansion) in preview {
        let noun = if expansion.len() == 1 { "target" } else { "targets" };
        println!("📋 {} ({} {})", address, expansion.len(), noun);
        for target in expansion {
            println!("   • {}", target);
        }
    }
}

pub fn preview_to_json(preview: &Preview) -> serde_json::Result<String> {
    serde_json::to_string_pretty(preview)
}

pub fn print_graph_summary(graph: &BuildGraph, level: Option<usize>) {
    println!("🕸️  {} targets, {} roots", graph.len(), graph.roots().len());

    match graph.max_depth() {
        Some(depth) => println!("   • max depth: {}", depth),
        None => {
            let orphans = graph.orphans();
            println!(
                "   • max depth: unknown ({} targets unreachable from the roots)",
                orphans.len()
            );
            for orphan in orphans {
                println!("      - {}", orphan);
            }
        }
    }

    if let Some(level) = level {
        let nodes = graph.nodes_by_level(level);
        println!("\n📦 Level {} ({} targets):", level, nodes.len());
        for node in nodes {
            println!("   • {}", node);
        }
    }
}

/// One line for the user, plus the build tool's stderr when it has any
pub fn describe_error(error: &Error) -> String {
    match error.stderr().map(str::trim) {
        Some(stderr) if !stderr.is_empty() => format!("{error}\n{stderr}"),
        _ => error.to_string(),
    }
}
