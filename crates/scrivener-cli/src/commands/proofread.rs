//! Proofread command implementation.

use crate::cli::ProofreadArgs;
use crate::config::Config;
use crate::document::TextDocument;
use crate::error::Result;
use crate::output::Formatter;
use scrivener_cache::{CorrectionCache, SimilarityCache, SqliteStore};
use scrivener_cascade::{
    CascadeConfig, CorrectionCascade, DictionarySource, GrammarSource, LlmSource, PatternRule,
    PatternRuleSource,
};
use scrivener_orchestrator::{Orchestrator, RunReport};
use scrivener_remote::{LanguageToolChecker, OllamaCorrector, RateLimitedClient};
use scrivener_scorer::{AcceptancePolicy, HeuristicScorer};
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};

/// Execute the proofread command.
///
/// Returns the run report; the caller decides the exit status from its state.
pub async fn execute_proofread(
    args: ProofreadArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<RunReport> {
    let config = apply_overrides(config, &args);

    // 1. Validate everything before touching the document
    config.validate()?;
    let cascade = build_cascade(&config)?;
    info!(sources = ?cascade.sources(), mode = %config.cascade.acceptance.mode, "Cascade ready");

    // 2. Load
    let mut document = TextDocument::open(&args.file)?;

    // 3. Run, stopping after the current batch on Ctrl-C
    let mut orchestrator = Orchestrator::new(config.orchestrator.clone(), Arc::new(cascade))?;
    let token = orchestrator.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current batch");
            token.cancel();
        }
    });
    let report = orchestrator.run(&mut document).await;
    interrupt.abort();
    let report = report?;

    // 4. Write back only a completed, uninterrupted run
    if report.dry_run {
        println!("{}", formatter.info("Dry run: document left untouched"));
    } else if !report.is_completed() {
        println!(
            "{}",
            formatter.warning(&format!(
                "Success rate below threshold, {} left untouched",
                document.path().display()
            ))
        );
    } else if report.cancelled {
        println!(
            "{}",
            formatter.warning(&format!(
                "Run interrupted, {} left untouched",
                document.path().display()
            ))
        );
    } else if document.is_modified() {
        let backup = document.save(config.settings.backup && !args.no_backup)?;
        println!(
            "{}",
            formatter.success(&format!(
                "Wrote {} correction(s) to {}",
                report.applied,
                document.path().display()
            ))
        );
        if let Some(backup) = backup {
            println!("{}", formatter.info(&format!("Backup: {}", backup.display())));
        }
    }

    if let Some(path) = &args.report {
        fs::write(path, report.to_json()?)?;
        println!("{}", formatter.info(&format!("Report: {}", path.display())));
    }

    println!("{}", formatter.format_report(&report)?);
    Ok(report)
}

/// Fold command-line flags into a copy of the file configuration.
fn apply_overrides(config: &Config, args: &ProofreadArgs) -> Config {
    let mut config = config.clone();
    if let Some(mode) = args.mode {
        config.cascade = CascadeConfig {
            acceptance: AcceptancePolicy::for_mode(mode.into()),
            ..config.cascade
        };
    }
    if let Some(path) = &args.dictionary {
        config.dictionary.path = Some(path.clone());
    }
    if args.dry_run {
        config.orchestrator.dry_run = true;
    }
    if args.no_llm {
        config.llm.enabled = false;
    }
    if args.no_grammar {
        config.grammar.enabled = false;
    }
    config
}

/// Assemble the correction cascade described by `config`.
///
/// Sources run cheapest first: dictionary, pattern rules, grammar checker,
/// LLM. The remote sources share one rate-limited client.
pub fn build_cascade(config: &Config) -> Result<CorrectionCascade> {
    let mut dictionary = DictionarySource::builtin();
    if let Some(path) = &config.dictionary.path {
        dictionary = dictionary.merged(DictionarySource::from_path(path)?)?;
    }

    // Dictionary fixes are known-equivalent pairs for the scorer
    let scorer = HeuristicScorer::new(config.scorer.clone().with_semantic_pairs(dictionary.pairs()));

    let cache: Arc<dyn CorrectionCache> = match &config.cache.sqlite_path {
        Some(path) => Arc::new(SimilarityCache::new(
            SqliteStore::new(path)?,
            config.cache.clone(),
        )),
        None => Arc::new(SimilarityCache::in_memory(config.cache.clone())),
    };

    let mut patterns = if config.patterns.builtin {
        PatternRuleSource::builtin()
    } else {
        PatternRuleSource::empty()
    };
    for spec in &config.patterns.rules {
        patterns = patterns.with_rule(PatternRule::from_spec(spec)?);
    }

    let mut cascade = CorrectionCascade::new(config.cascade.clone(), Arc::new(scorer), cache)?
        .with_source(Arc::new(dictionary))
        .with_source(Arc::new(patterns));

    let client = Arc::new(RateLimitedClient::new(config.rate_limit.clone()));

    if config.grammar.enabled {
        let checker = LanguageToolChecker::new(&config.grammar.endpoint, &config.grammar.language)?;
        cascade = cascade.with_source(Arc::new(
            GrammarSource::new(Arc::new(checker), client.clone())
                .with_max_candidates(config.cascade.max_candidates),
        ));
    }

    if config.llm.enabled {
        let mut corrector = OllamaCorrector::with_timeout(
            &config.llm.endpoint,
            &config.llm.model,
            config.rate_limit.timeout(),
        )?;
        if let Some(api_key) = config.llm.api_key() {
            corrector = corrector.with_api_key(api_key);
        }
        cascade = cascade.with_source(Arc::new(
            LlmSource::new(Arc::new(corrector), client).with_context(config.cascade.llm_context),
        ));
    }

    Ok(cascade)
}
