//! Dead-branch lint example
//!
//! This example demonstrates:
//! - Describing the conditions of a proxy bundle as `ConditionElement`s
//! - Running the dead-branch rule over all of them
//! - Printing the diagnostics as JSON
//!
//! Options can be loaded from a YAML file passed as the first argument:
//!
//! ```text
//! cargo run --example lint_conditions -- proxylint.yaml
//! ```

use proxylint_analyzer::{
    AnalyzerOptions, ConditionElement, ConditionKind, ConditionLocation, DeadBranchRule,
    DiagnosticSeverity,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Dead Branch Lint Example ===\n");

    let options = match std::env::args().nth(1) {
        Some(path) => AnalyzerOptions::from_yaml_file(&path)?,
        None => AnalyzerOptions::default(),
    };
    println!("Combination limit: {}\n", options.max_combinations);

    let conditions = vec![
        ConditionElement::new(
            ConditionLocation::new(ConditionKind::Flow, "GetOrders"),
            r#"(proxy.pathsuffix MatchesPath "/orders") and (request.verb = "GET")"#,
        ),
        ConditionElement::new(
            ConditionLocation::new(ConditionKind::Flow, "CreateOrder"),
            r#"request.verb = "POST" and request.verb = "PUT""#,
        ),
        ConditionElement::new(
            ConditionLocation::new(ConditionKind::Step, "RaiseFault-TooLarge"),
            "request.header.content-length > 1000 and request.header.content-length < 10",
        ),
        ConditionElement::new(
            ConditionLocation::new(ConditionKind::Step, "VerifyAPIKey"),
            r#"proxy.pathsuffix Not StartsWith "/public""#,
        ),
        ConditionElement::new(
            ConditionLocation::new(ConditionKind::Policy, "Quota"),
            r#"client.ip Not Equals "10.0.0.1""#,
        ),
        ConditionElement::new(
            ConditionLocation::new(ConditionKind::RouteRule, "legacy"),
            "false",
        ),
    ];

    let rule = DeadBranchRule::with_options(options);
    let diagnostics = rule.check_all(&conditions);

    println!("Checked {} conditions\n", conditions.len());
    for diagnostic in &diagnostics {
        let label = match diagnostic.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        };
        println!("{}[{}]: {}", label, diagnostic.code, diagnostic.message);
        println!("  --> {}", diagnostic.context);
        if let Some(offset) = diagnostic.offset {
            println!("      {}^", " ".repeat(offset));
        }
    }

    println!("\nJSON:");
    println!("{}", serde_json::to_string_pretty(&diagnostics)?);

    Ok(())
}
