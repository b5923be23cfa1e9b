//! Condition analysis walkthrough
//!
//! Prints every stage of the analysis of one condition: tokens, syntax tree,
//! variable domains, truth table size and verdict.
//!
//! ```text
//! RUST_LOG=debug cargo run --example explain_condition -- 'a StartsWith "foo" and a = "bar"'
//! ```

use proxylint_analyzer::{Condition, Substitutions};
use proxylint_core::ast::TokenKind;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r#"(request.verb = "GET") and (request.verb != "GET")"#.to_string());

    println!("=== Condition Analysis ===\n");
    println!("Condition: {}\n", input);

    let condition = Condition::new(input);

    let tokens = match condition.tokens() {
        Ok(tokens) => tokens,
        Err(err) => {
            println!("Tokenizing failed: {}", err);
            return Ok(());
        }
    };
    println!("Tokens:");
    for token in tokens {
        let kind = match &token.kind {
            TokenKind::Variable => "variable".to_string(),
            TokenKind::Constant(value) => format!("constant ({:?})", value.literal_type()),
            TokenKind::Operator(op) => format!("operator ({})", op),
            TokenKind::Boundary(_) => "boundary".to_string(),
        };
        println!("  {:>3}  {:<24} {}", token.offset, token.text, kind);
    }

    let expression = match condition.expression() {
        Ok(expression) => expression,
        Err(err) => {
            println!("\nParsing failed: {}", err);
            return Ok(());
        }
    };
    println!("\nExpression: {}", expression);
    println!("\nAST:\n{}", serde_json::to_string_pretty(expression)?);

    let domains = condition.domains()?;
    println!("\nDomains:");
    for (name, values) in domains.iter() {
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        println!("  {} = {{{}}}", name, rendered.join(", "));
    }

    match condition.evaluation() {
        Ok(evaluation) => {
            println!(
                "\nEvaluated {} combinations, {} satisfied",
                evaluation.combinations(),
                evaluation.satisfied()
            );
            let witness = Substitutions::new(domains)
                .zip(evaluation.results())
                .find(|(_, result)| **result);
            if let Some((substitution, _)) = witness {
                let bindings: Vec<String> = domains
                    .iter()
                    .filter_map(|(name, _)| substitution.get(name).map(|v| format!("{} = {}", name, v)))
                    .collect();
                println!("Witness: {}", bindings.join(", "));
            }
        }
        Err(err) => {
            println!("\nEvaluation skipped: {}", err);
            return Ok(());
        }
    }

    println!("\nVerdict: {}", condition.verdict()?);
    Ok(())
}
