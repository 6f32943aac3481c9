use crate::cli::CleanArgs;
use crate::config::{SentiConfig, resolve_normalizer};
use crate::corpus::collect_inputs;
use crate::SentiError;
use std::io::Write;

pub fn handle_clean(config: &SentiConfig, args: &CleanArgs) -> Result<(), SentiError> {
    let normalizer = resolve_normalizer(config);
    let inputs = collect_inputs(&args.texts)?;

    let mut out = std::io::stdout().lock();
    for cleaned in normalizer.clean_batch(&inputs) {
        writeln!(out, "{cleaned}")?;
    }
    Ok(())
}
