//! Textile Mill Inventory - end-to-end smoke check
//!
//! Walks the program-entry flow against a running inventory backend: loads
//! reference data, drafts a one-meter program against the first lot with
//! balance, resolves its rate and validates the draft. Dry run by default;
//! pass --execute to actually submit.

use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textile_inventory_client::prefs::{Section, UiState};
use textile_inventory_client::{Config, HttpApi, LotDirectory, ProgramApi, ProgramForm};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mill_smoke=info,textile_inventory_client=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load().context("loading configuration")?;
    let execute = std::env::args().any(|arg| arg == "--execute");

    tracing::info!("Textile Mill Inventory smoke check");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Backend: {}", config.api.base_url);

    let state_path = Path::new(&config.ui.state_path).to_path_buf();
    let mut ui = UiState::load(&state_path);
    tracing::info!(section = ?ui.active_section, "loaded UI state");

    let api = HttpApi::new(&config.api).context("building API client")?;

    tracing::info!("Loading reference data...");
    let parties = api.list_parties().await?;
    let qualities = api.list_quality_types().await?;
    tracing::info!(
        parties = parties.len(),
        qualities = qualities.len(),
        "reference data loaded"
    );

    let mut directory = LotDirectory::new();
    directory.refresh(&api).await?;
    tracing::info!(
        all = directory.all().len(),
        available = directory.available().len(),
        "lot directory loaded"
    );

    let Some(lot) = directory
        .available()
        .iter()
        .find(|lot| lot.has_balance())
        .cloned()
    else {
        tracing::warn!("no lot with available balance; nothing to check");
        return Ok(());
    };
    tracing::info!(
        lot = %lot.lot_number,
        party = %lot.party_name,
        quality = %lot.quality_name,
        balance = %lot.current_balance,
        "drafting against lot"
    );

    let mut form = ProgramForm::new(api.clone(), directory);
    form.set_party(Some(lot.party_id));
    form.set_design_number(format!("SMOKE-{}", chrono::Utc::now().format("%Y%m%d%H%M%S")));
    form.set_input_meters(Decimal::ONE);
    form.set_row_lot(0, Some(lot.id));
    form.set_row_meters(0, Decimal::ONE);

    let outcome = form.autofill_rate().await;
    tracing::info!(?outcome, rate = ?form.draft().rate_per_meter, "rate resolution");

    shared::validate_draft(form.draft()).context("draft failed validation")?;
    tracing::info!(
        allocated = %form.total_allocated(),
        input = %form.draft().input_meters,
        wastage = %form.wastage(),
        "draft is consistent"
    );

    if execute {
        let saved = form.submit().await.context("submitting program")?;
        tracing::info!(program = %saved.program_number, "program submitted");
        match form.directory().lot(lot.id) {
            Some(after) => tracing::info!(
                lot = %after.lot_number,
                balance = %after.current_balance,
                "balance after submission"
            ),
            None => tracing::info!(lot = %lot.lot_number, "lot fully consumed"),
        }
    } else {
        tracing::info!("dry run complete; pass --execute to submit");
    }

    ui.active_section = Section::Program;
    ui.save(&state_path).context("saving UI state")?;
    tracing::info!("smoke check finished");

    Ok(())
}
