use crate::cli::InfoArgs;
use crate::config::{SentiConfig, build_pipeline};
use crate::predict::train_from_corpus;
use crate::SentiError;
use std::io::Write;

pub fn handle_info(config: &SentiConfig, args: &InfoArgs) -> Result<(), SentiError> {
    let (normalizer, analyzer) = build_pipeline(config);
    if let Some(corpus) = &args.corpus {
        train_from_corpus(&normalizer, &analyzer, corpus)?;
    }

    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, &analyzer.model_info())?;
    writeln!(out)?;
    Ok(())
}
