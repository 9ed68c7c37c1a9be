//! Pipeline orchestration
//!
//! One run: ingest the four sources into the store, read them back, clean
//! the claim tables, score inpatient claims, store the scored snapshot and
//! write the static outputs. Stages run strictly in order; the first
//! failure ends the run.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{Table, TableName, TableStore};
use domain_claims::{
    Beneficiary, BeneficiarySummary, CleaningReport, Cleaner, DataDictionary, ProviderDirectory,
    Reporter, RiskScorer, ScoredClaims, ScoringReport,
};
use infra_db::read_csv_table;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::output::{chart, console, dictionary};

/// Scored claims and what is displayed next to them
#[derive(Debug, Clone)]
pub struct ScreeningResults {
    pub claims: ScoredClaims,
    /// `None` when loaded from a stored snapshot
    pub report: Option<ScoringReport>,
    pub providers: ProviderDirectory,
}

/// Everything a run produced
#[derive(Debug)]
pub struct PipelineOutcome {
    pub results: ScreeningResults,
    pub inpatient_cleaning: CleaningReport,
    pub outpatient_cleaning: CleaningReport,
    pub beneficiaries: BeneficiarySummary,
    /// Rendered sample of high-risk claims
    pub console_sample: String,
}

pub struct Pipeline {
    config: PipelineConfig,
    store: Arc<dyn TableStore>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, store: Arc<dyn TableStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        self.ingest().await?;

        let beneficiaries = self.store.load_table(TableName::Beneficiaries).await?;
        let inpatient = self.store.load_table(TableName::InpatientClaims).await?;
        let outpatient = self.store.load_table(TableName::OutpatientClaims).await?;
        let providers = self.store.load_table(TableName::Providers).await?;

        let data_dictionary = [
            (TableName::Beneficiaries, &beneficiaries),
            (TableName::InpatientClaims, &inpatient),
            (TableName::OutpatientClaims, &outpatient),
            (TableName::Providers, &providers),
        ]
        .into_iter()
        .fold(DataDictionary::standard(), |data_dictionary, (name, table)| {
            data_dictionary.with_observed(name, table.schema())
        });

        let beneficiaries =
            BeneficiarySummary::from_beneficiaries(&Beneficiary::from_table(&beneficiaries));
        let providers = ProviderDirectory::from_table(&providers);

        let cleaner = Cleaner::for_claims();
        let inpatient = cleaner.clean(inpatient);
        let outpatient = cleaner.clean(outpatient);

        let scoring = RiskScorer::new()
            .score_with_evidence(&inpatient.table, &inpatient.report.duplicate_evidence);
        self.store
            .replace_table(TableName::InpatientClaimsScored, scoring.claims.table())
            .await?;

        let console_sample = console::render_high_risk_sample(&scoring.claims, &providers);
        let histogram = Reporter::new(&scoring.claims).histogram();
        chart::write_score_chart(&self.config.chart_path, &histogram)?;
        dictionary::write_dictionary(&self.config.dictionary_path, &data_dictionary).await?;

        info!(
            claims = scoring.claims.len(),
            high_risk = scoring.claims.high_risk_count(),
            beneficiaries = beneficiaries.total,
            chronic = beneficiaries.with_chronic_condition,
            providers = providers.len(),
            "Pipeline completed"
        );

        Ok(PipelineOutcome {
            results: ScreeningResults {
                claims: scoring.claims,
                report: Some(scoring.report),
                providers,
            },
            inpatient_cleaning: inpatient.report,
            outpatient_cleaning: outpatient.report,
            beneficiaries,
            console_sample,
        })
    }

    /// Reads every source file and replaces its table in the store
    async fn ingest(&self) -> Result<(), PipelineError> {
        for (name, path) in self.config.sources() {
            let table: Table = read_csv_table(path)
                .await
                .map_err(|source| PipelineError::Ingest {
                    path: path.clone(),
                    source,
                })?;
            self.store.replace_table(name, &table).await?;
            info!(table = %name, rows = table.len(), "Source ingested");
        }
        Ok(())
    }
}

/// Loads the results of a previous run from the store
///
/// A missing providers table only loses the `PotentialFraud` column.
pub async fn load_snapshot(store: &dyn TableStore) -> Result<ScreeningResults, PipelineError> {
    let claims = ScoredClaims::from_snapshot(
        store.load_table(TableName::InpatientClaimsScored).await?,
    )?;

    let providers = match store.load_table(TableName::Providers).await {
        Ok(table) => ProviderDirectory::from_table(&table),
        Err(e) if e.is_not_found() => {
            warn!("No providers table stored, fraud flags unavailable");
            ProviderDirectory::default()
        }
        Err(e) => return Err(e.into()),
    };

    info!(claims = claims.len(), "Scored snapshot loaded");
    Ok(ScreeningResults {
        claims,
        report: None,
        providers,
    })
}
