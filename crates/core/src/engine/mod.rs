//! Advisor pipeline engine.
//!
//! The AdvisorEngine runs the fixed stage sequence
//! `address -> [geocode] -> official rate -> place search -> bank quotes -> recommendation`.
//! The geocode stage runs only when a geocoder is configured.
//! Each stage awaits the previous one; tool errors become stage outcomes
//! and never abort the run.

pub mod outcome;
pub mod report;

pub use outcome::{FailureKind, StageFailure, StageOutcome};
pub use report::AdvisorReport;

use crate::agents::RoleRegistry;
use crate::config::{AppConfig, ConfigError, ConfigResult, Secrets, CONFIG_DIR};
use crate::llm::{ChatMessage, ChatModel, OpenAiCompatibleModel};
use crate::state::run::{
    begin_stage, complete_run, create_run, fail_run, finish_stage, log_to_run, start_run,
};
use crate::tools::{
    BankRateTool, GeocodeTool, OfficialRateTool, PlaceSearchTool, SearchRequest, Tool,
    UserPromptTool,
};
use anyhow::{anyhow, Result};
use fx_protocol::agent_models::AgentRole;
use fx_protocol::config_models::SearchConfig;
use fx_protocol::geo_models::GeoLocation;
use fx_protocol::ipc::Event;
use fx_protocol::place_models::PlaceResult;
use fx_protocol::query_models::UserQuery;
use fx_protocol::quote_models::BankLookup;
use fx_protocol::rate_models::ExchangeRate;
use fx_protocol::run_models::{Run, StageKind};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, warn};

pub type AddressStage = Arc<dyn Tool<Input = (), Output = UserQuery>>;
pub type RateStage = Arc<dyn Tool<Input = Option<String>, Output = ExchangeRate>>;
pub type SearchStage = Arc<dyn Tool<Input = SearchRequest, Output = Vec<PlaceResult>>>;
pub type GeocodeStage = Arc<dyn Tool<Input = String, Output = GeoLocation>>;

/// The tools behind the pipeline stages.
pub struct AdvisorTools {
    pub address: AddressStage,
    pub official_rate: RateStage,
    pub place_search: SearchStage,
    pub bank_rates: BankRateTool,
}

/// Per-run choices made on the command line.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Role name; `None` uses the default advisor.
    pub role: Option<String>,
    /// Skip the recommendation stage and the language-model key check.
    pub no_llm: bool,
}

/// The main pipeline execution engine.
pub struct AdvisorEngine {
    tools: AdvisorTools,
    geocoder: Option<GeocodeStage>,
    model: Option<Arc<dyn ChatModel>>,
    role: AgentRole,
    search: SearchConfig,
    anchor_to_official: bool,
}

impl AdvisorEngine {
    /// Create an engine without a language model.
    pub fn new(tools: AdvisorTools, role: AgentRole) -> Self {
        Self {
            tools,
            geocoder: None,
            model: None,
            role,
            search: SearchConfig::default(),
            anchor_to_official: true,
        }
    }

    /// Locate the address before searching, to bias the search.
    pub fn with_geocoder(mut self, geocoder: GeocodeStage) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Search settings used to turn the address into a query.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Whether demo quotes are rescaled to the official rate.
    pub fn with_anchoring(mut self, enabled: bool) -> Self {
        self.anchor_to_official = enabled;
        self
    }

    pub fn role(&self) -> &AgentRole {
        &self.role
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn has_geocoder(&self) -> bool {
        self.geocoder.is_some()
    }

    /// Build an engine from loaded configuration and credentials.
    ///
    /// Fails fast, before any stage runs, when a credential the run will
    /// need is missing.
    pub fn from_config(
        config: &AppConfig,
        secrets: &Secrets,
        options: &EngineOptions,
    ) -> ConfigResult<Self> {
        let search_key = secrets.require_search()?.to_string();
        let llm_key = if options.no_llm {
            None
        } else {
            Some(secrets.require_llm()?.to_string())
        };

        let global = &config.global;
        let official_rate = OfficialRateTool::new(&global.official_rate)?;
        let place_search = PlaceSearchTool::new(&global.search, Some(search_key))?;
        let bank_rates = match &config.banks {
            Some(table) => {
                BankRateTool::from_table(table).map_err(|e| ConfigError::InvalidConfig {
                    path: PathBuf::from(CONFIG_DIR).join("banks.yaml"),
                    reason: e.to_string(),
                })?
            }
            None => BankRateTool::builtin(),
        };

        let role = RoleRegistry::new(config.agents.clone())
            .resolve(options.role.as_deref())
            .clone();

        let tools = AdvisorTools {
            address: Arc::new(UserPromptTool::stdio(global.prompt.text.clone())),
            official_rate: Arc::new(official_rate),
            place_search: Arc::new(place_search),
            bank_rates,
        };

        let mut engine = Self::new(tools, role)
            .with_search(global.search.clone())
            .with_anchoring(global.bank_rates.anchor_to_official);

        match secrets.geocode_api_key() {
            Some(key) => {
                let geocoder = GeocodeTool::new(&global.geocode, key)?;
                engine = engine.with_geocoder(Arc::new(geocoder));
            }
            None => debug!("no geocoder key, place search runs without a location bias"),
        }

        if let Some(key) = llm_key {
            let model_name = engine.role.effective_model(&global.llm.model).to_string();
            let model = OpenAiCompatibleModel::new(&global.llm, key)?.with_model(model_name);
            engine = engine.with_model(Arc::new(model));
        }

        Ok(engine)
    }

    /// Execute one advisor run.
    ///
    /// `address` skips the interactive prompt when given. Stage failures
    /// are recorded in the report. The run itself fails only when neither
    /// the official rate nor any bank quote is available, since there is
    /// nothing left to compare.
    pub async fn run(
        &self,
        address: Option<UserQuery>,
        events_tx: Sender<Event>,
    ) -> Result<(Run, AdvisorReport)> {
        let mut run = create_run();
        start_run(&mut run, &events_tx).await;
        info!(run_id = %run.id, role = %self.role.name, "advisor run started");

        let address = match address {
            Some(query) => {
                begin_stage(&mut run, &events_tx, StageKind::UserAddress).await;
                log_to_run(
                    &mut run,
                    &events_tx,
                    "Using the address given on the command line".to_string(),
                )
                .await;
                finish_stage(&mut run, &events_tx, StageKind::UserAddress, true).await;
                StageOutcome::Ok(query)
            }
            None => {
                run_stage(
                    &mut run,
                    &events_tx,
                    StageKind::UserAddress,
                    self.tools.address.as_ref(),
                    (),
                )
                .await
            }
        }
        .map(UserQuery::into_inner);

        let location = match &self.geocoder {
            None => None,
            Some(geocoder) => Some(match address.value() {
                Some(address) => {
                    run_stage(
                        &mut run,
                        &events_tx,
                        StageKind::Geocode,
                        geocoder.as_ref(),
                        address.clone(),
                    )
                    .await
                }
                None => skip_stage(&mut run, &events_tx, StageKind::Geocode, "no address").await,
            }),
        };

        let official_rate = run_stage(
            &mut run,
            &events_tx,
            StageKind::OfficialRate,
            self.tools.official_rate.as_ref(),
            None,
        )
        .await;

        let places = match address.value() {
            Some(address) => {
                let request = self.search_request(address, location.as_ref());
                run_stage(
                    &mut run,
                    &events_tx,
                    StageKind::PlaceSearch,
                    self.tools.place_search.as_ref(),
                    request,
                )
                .await
            }
            None => skip_stage(&mut run, &events_tx, StageKind::PlaceSearch, "no address").await,
        };

        let bank_quotes = match places.value() {
            Some(places) => {
                let table = self.bank_table(official_rate.value());
                let names: Vec<String> = places.iter().map(|p| p.name.clone()).collect();
                run_stage(&mut run, &events_tx, StageKind::BankRates, &table, names).await
            }
            None => {
                skip_stage(
                    &mut run,
                    &events_tx,
                    StageKind::BankRates,
                    "no places to look up",
                )
                .await
            }
        };

        let mut report = AdvisorReport {
            run_id: run.id,
            address,
            location,
            official_rate,
            places,
            bank_quotes,
            recommendation: None,
        };

        let any_quote = report
            .bank_quotes
            .value()
            .is_some_and(|lookups| lookups.iter().any(BankLookup::is_found));
        if report.official_rate.value().is_none() && !any_quote {
            let summary: Vec<String> = report.failures().iter().map(|f| format!("- {f}")).collect();
            let message = format!("no exchange data available:\n{}", summary.join("\n"));
            fail_run(&mut run, &events_tx, message.clone()).await;
            return Err(anyhow!(message));
        }

        match &self.model {
            Some(model) => {
                let context = report.render_context();
                report.recommendation =
                    Some(self.recommend(&mut run, &events_tx, model.as_ref(), context).await);
            }
            None => {
                log_to_run(
                    &mut run,
                    &events_tx,
                    "Language model disabled, skipping recommendation".to_string(),
                )
                .await;
            }
        }

        complete_run(&mut run, &events_tx).await;
        info!(
            run_id = %run.id,
            failures = report.failures().len(),
            "advisor run completed"
        );

        Ok((run, report))
    }

    /// The search for `address`, biased toward the geocoded city unless a
    /// location is configured explicitly.
    fn search_request(
        &self,
        address: &str,
        location: Option<&StageOutcome<GeoLocation>>,
    ) -> SearchRequest {
        let request = SearchRequest::new(self.search.render_query(address));
        if self.search.location.is_some() {
            return request;
        }
        match location
            .and_then(StageOutcome::value)
            .and_then(GeoLocation::search_hint)
        {
            Some(hint) => request.with_location(hint),
            None => request,
        }
    }

    /// The bank table for this run, anchored to the official rate when
    /// enabled and available.
    fn bank_table(&self, official_rate: Option<&ExchangeRate>) -> BankRateTool {
        match official_rate {
            Some(rate) if self.anchor_to_official => self.tools.bank_rates.anchored_to(rate.rate),
            _ => self.tools.bank_rates.clone(),
        }
    }

    async fn recommend(
        &self,
        run: &mut Run,
        events_tx: &Sender<Event>,
        model: &dyn ChatModel,
        context: String,
    ) -> StageOutcome<String> {
        let stage = StageKind::Recommendation;
        begin_stage(run, events_tx, stage).await;
        log_to_run(
            run,
            events_tx,
            format!("Asking {} as '{}'", model.name(), self.role.name),
        )
        .await;

        let messages = [
            ChatMessage::system(self.role.system_prompt.clone()),
            ChatMessage::user(context),
        ];

        match model.complete(&messages).await {
            Ok(text) => {
                finish_stage(run, events_tx, stage, true).await;
                StageOutcome::Ok(text)
            }
            Err(e) => {
                warn!(error = %e, "recommendation failed");
                let failure = StageFailure::from_llm(&e);
                log_to_run(run, events_tx, failure.to_string()).await;
                finish_stage(run, events_tx, stage, false).await;
                StageOutcome::Failed(failure)
            }
        }
    }
}

/// Run one tool as a pipeline stage, converting its error into an outcome.
async fn run_stage<T>(
    run: &mut Run,
    events_tx: &Sender<Event>,
    stage: StageKind,
    tool: &T,
    input: T::Input,
) -> StageOutcome<T::Output>
where
    T: Tool + ?Sized,
{
    begin_stage(run, events_tx, stage).await;
    log_to_run(run, events_tx, format!("Running {stage} ({})", tool.name())).await;

    let outcome = StageOutcome::from_tool(stage, tool.call(input).await);
    match outcome.failure() {
        None => {
            debug!(%stage, tool = tool.name(), "stage succeeded");
            finish_stage(run, events_tx, stage, true).await;
        }
        Some(failure) => {
            warn!(%stage, kind = failure.kind.as_str(), error = %failure.message, "stage failed");
            log_to_run(run, events_tx, failure.to_string()).await;
            finish_stage(run, events_tx, stage, false).await;
        }
    }
    outcome
}

async fn skip_stage<T>(
    run: &mut Run,
    events_tx: &Sender<Event>,
    stage: StageKind,
    reason: &str,
) -> StageOutcome<T> {
    let failure = StageFailure::skipped(stage, reason);
    begin_stage(run, events_tx, stage).await;
    log_to_run(run, events_tx, failure.to_string()).await;
    finish_stage(run, events_tx, stage, false).await;
    StageOutcome::Failed(failure)
}
