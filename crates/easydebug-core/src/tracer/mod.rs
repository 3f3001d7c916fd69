/*!
# Tracer - Dump Injection and Extraction

Rewrites Go function bodies so that every simple binding is followed by a
call to the `dmp` helper, and strips those calls back out again.

## Architecture

- `StatementRule`: trait for a per-statement rewrite plus a file-scope pass
- `Walker`: the one recursive walk shared by every rule; it descends into
  each compound statement and hands every other statement to the rule
- `HelperCallMatcher`: marker-based recognition of helper calls
- `dump_rules`: the `InjectDumps` and `ExtractDumps` rules
- `FileTracer`: parse, walk, render and atomically replace one file

## Example Usage

```rust,no_run
use easydebug_core::{EasyDebugConfig, FileTracer, Mode};

let config = EasyDebugConfig::new(Mode::Inject, "main.go");
let mut tracer = FileTracer::new()?;
let summary = tracer.run(&config)?;
println!("{} dumps inserted", summary.dumps_inserted);
# Ok::<(), easydebug_core::EasyDebugError>(())
```
*/

pub mod dump_rules;
pub mod file_tracer;
pub mod patterns;
pub mod rules;
pub mod walker;

// Re-export main types
pub use dump_rules::{ExtractDumps, InjectDumps};
pub use file_tracer::FileTracer;
pub use patterns::{HelperCallMatcher, StmtPattern};
pub use rules::{rule_for, StatementRule};
pub use walker::Walker;

/// Counters collected while transforming one file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransformSummary {
    pub functions_visited: usize,
    pub dumps_inserted: usize,
    pub dumps_removed: usize,
    pub helpers_appended: usize,
    pub helpers_removed: usize,
}

impl TransformSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the run changed the statement tree at all
    pub fn changed(&self) -> bool {
        self.dumps_inserted + self.dumps_removed + self.helpers_appended + self.helpers_removed > 0
    }
}
