//! Rules command implementation

use std::io::{self, Write};

use lintel_core::RuleRegistry;
use miette::{IntoDiagnostic, Result};

pub fn run_list_rules() -> Result<()> {
    let registry = RuleRegistry::builtin();
    let mut out = io::stdout().lock();
    write_rules(&mut out, &registry).into_diagnostic()
}

fn write_rules(out: &mut impl Write, registry: &RuleRegistry) -> io::Result<()> {
    let width = registry.rules().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in registry.rules() {
        writeln!(out, "{:<width$}  {}", name, description)?;
    }
    Ok(())
}
